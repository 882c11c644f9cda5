//! Typed extraction of book metadata from the `?configjs` payload.
//!
//! The payload is either a bare JSON object or a script embedding one
//! (`var htmlConfig = {...};`). Fields used: `bookTitle`, `pageCount`,
//! `pageFileNames`.

use serde_json::{Map, Value};

use crate::error::FlipbookError;

/// Largest page count accepted from a payload.
pub const MAX_PAGE_COUNT: usize = 100_000;

/// Book metadata as published by the viewer's config endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipbookMetadata {
    pub title: Option<String>,
    pub page_count: usize,
    /// Per-page image names; empty when the book uses numbered pages.
    pub page_file_names: Vec<String>,
}

impl FlipbookMetadata {
    /// Parses raw payload bytes.
    pub fn parse(payload: &[u8]) -> Result<Self, FlipbookError> {
        let config = parse_object(payload)?;
        Ok(Self {
            title: extract_title(&config),
            page_count: extract_page_count(&config)?,
            page_file_names: extract_page_file_names(&config)?,
        })
    }

    /// Title from the payload, or `TitleNotFound` so the caller can fall back.
    pub fn title(&self) -> Result<&str, FlipbookError> {
        self.title.as_deref().ok_or(FlipbookError::TitleNotFound)
    }
}

fn parse_object(payload: &[u8]) -> Result<Map<String, Value>, FlipbookError> {
    let err = match serde_json::from_slice::<Map<String, Value>>(payload) {
        Ok(map) => return Ok(map),
        Err(e) => e,
    };
    // Fall back to the outermost `{...}` span of a script payload.
    let start = payload.iter().position(|&b| b == b'{');
    let end = payload.iter().rposition(|&b| b == b'}');
    match (start, end) {
        (Some(s), Some(e)) if s < e => {
            serde_json::from_slice(&payload[s..=e]).map_err(FlipbookError::MalformedConfig)
        }
        _ => Err(FlipbookError::MalformedConfig(err)),
    }
}

fn extract_title(config: &Map<String, Value>) -> Option<String> {
    match config.get("bookTitle") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            tracing::debug!("bookTitle is not a string: {}", other);
            None
        }
        None => None,
    }
}

fn extract_page_count(config: &Map<String, Value>) -> Result<usize, FlipbookError> {
    let n = config
        .get("pageCount")
        .and_then(Value::as_f64)
        .ok_or(FlipbookError::PageCountNotFound)?;
    if !n.is_finite() || n < 0.0 {
        return Err(FlipbookError::PageCountNotFound);
    }
    let n = n.trunc();
    if n > MAX_PAGE_COUNT as f64 {
        return Err(FlipbookError::PageCountOutOfRange {
            found: n,
            max: MAX_PAGE_COUNT,
        });
    }
    Ok(n as usize)
}

fn extract_page_file_names(config: &Map<String, Value>) -> Result<Vec<String>, FlipbookError> {
    let list = match config.get("pageFileNames") {
        Some(Value::Array(list)) => list,
        Some(other) => {
            tracing::debug!("pageFileNames is not a list, ignoring: {}", other);
            return Ok(Vec::new());
        }
        None => {
            tracing::debug!("pageFileNames absent; numbered pages assumed");
            return Ok(Vec::new());
        }
    };
    list.iter()
        .enumerate()
        .map(|(index, v)| match v {
            Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
            _ => Err(FlipbookError::MalformedFileNameList { index }),
        })
        .collect()
}
