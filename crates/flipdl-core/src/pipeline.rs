//! Preparation pipeline: reference → config payload → metadata → page list.
//!
//! The result is an explicit `PreparedBook` handed to the retriever; nothing
//! is kept in process-wide state between stages or runs.

use crate::error::FlipbookError;
use crate::fetch::{fetch_config, Fetcher};
use crate::locator::{locate_pages, Addressing, PageResource};
use crate::metadata::FlipbookMetadata;
use crate::reference::FlipbookReference;
use crate::retry::RetryPolicy;

/// Everything known about a book before its pages are retrieved.
#[derive(Debug, Clone)]
pub struct PreparedBook {
    pub reference: FlipbookReference,
    pub metadata: FlipbookMetadata,
    /// Resolved title: explicit override, else `bookTitle`, else the book id.
    pub title: String,
    pub addressing: Addressing,
    /// Ordered page resources; order is final document order.
    pub pages: Vec<PageResource>,
}

#[derive(Debug, Clone, Copy)]
pub struct PrepareOptions<'a> {
    pub image_host: &'a str,
    /// Skips title derivation when set and non-empty.
    pub title_override: Option<&'a str>,
    pub retry: Option<&'a RetryPolicy>,
}

/// Normalizes `input`, fetches and parses its config, and locates every page.
pub fn prepare(
    fetcher: &dyn Fetcher,
    input: &str,
    opts: PrepareOptions<'_>,
) -> Result<PreparedBook, FlipbookError> {
    let reference = FlipbookReference::parse(input)?;
    tracing::info!(%reference, "normalized reference");
    let payload = fetch_config(fetcher, &reference, opts.retry)?;
    prepare_from_payload(reference, &payload, opts.image_host, opts.title_override)
}

/// Pure part of `prepare`: everything after the config payload is in hand.
pub fn prepare_from_payload(
    reference: FlipbookReference,
    payload: &[u8],
    image_host: &str,
    title_override: Option<&str>,
) -> Result<PreparedBook, FlipbookError> {
    let metadata = FlipbookMetadata::parse(payload)?;
    let title = resolve_title(title_override, &metadata, &reference);
    let addressing = Addressing::choose(&metadata)?;
    let pages = locate_pages(image_host, &reference, &addressing, metadata.page_count)?;
    tracing::info!(
        title = %title,
        pages = pages.len(),
        addressing = addressing.label(),
        "book prepared"
    );
    Ok(PreparedBook {
        reference,
        metadata,
        title,
        addressing,
        pages,
    })
}

/// Title precedence: non-empty override, then `bookTitle`, then the reference's last segment.
pub fn resolve_title(
    title_override: Option<&str>,
    metadata: &FlipbookMetadata,
    reference: &FlipbookReference,
) -> String {
    if let Some(t) = title_override.map(str::trim).filter(|t| !t.is_empty()) {
        return t.to_string();
    }
    match metadata.title() {
        Ok(t) if !t.trim().is_empty() => t.to_string(),
        _ => {
            let fallback = reference.last_segment().to_string();
            tracing::warn!(%fallback, "book title missing; using book id");
            fallback
        }
    }
}
