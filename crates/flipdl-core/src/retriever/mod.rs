//! Page retrieval into a staging directory.
//!
//! Fetches every located page, writes it under its final URL segment and
//! reports progress. Fail-fast: the first page that cannot be fetched or
//! written ends the run with `RetrievalFailed`; pages already finalized stay
//! on disk, cleanup is left to the caller.

mod page;
mod pool;
mod progress;

pub use page::StagedPage;
pub use progress::RetrievalProgress;

use std::collections::HashMap;
use std::path::Path;

use crate::error::FlipbookError;
use crate::fetch::Fetcher;
use crate::locator::PageResource;
use crate::retry::{FetchError, RetryPolicy};
use crate::storage;

use progress::ProgressTracker;

/// How pages are scheduled. Both strategies return pages in resource order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetrievalStrategy {
    /// One request at a time in page order; pages after a failure are never requested.
    #[default]
    Sequential,
    /// Up to `workers` concurrent requests; no new pages are started after a failure.
    WorkerPool { workers: usize },
}

impl RetrievalStrategy {
    /// `workers <= 1` means sequential.
    pub fn from_workers(workers: usize) -> Self {
        if workers <= 1 {
            RetrievalStrategy::Sequential
        } else {
            RetrievalStrategy::WorkerPool { workers }
        }
    }
}

/// Retrieves `pages` into `staging_dir` (created if missing).
///
/// Returns one `StagedPage` per resource, in resource order. If `progress_tx`
/// is `Some`, a `RetrievalProgress` snapshot is sent after every finished page.
pub fn retrieve_pages(
    fetcher: &dyn Fetcher,
    pages: &[PageResource],
    staging_dir: &Path,
    strategy: RetrievalStrategy,
    retry: Option<&RetryPolicy>,
    progress_tx: Option<&tokio::sync::mpsc::Sender<RetrievalProgress>>,
) -> Result<Vec<StagedPage>, FlipbookError> {
    storage::ensure_staging_dir(staging_dir)?;
    let work = staged_names(pages)?;
    let mut tracker = ProgressTracker::new(pages.len(), progress_tx);
    tracing::info!(
        pages = pages.len(),
        ?strategy,
        dir = %staging_dir.display(),
        "retrieving pages"
    );

    let staged = match strategy {
        RetrievalStrategy::Sequential => {
            let mut staged = Vec::with_capacity(work.len());
            for (page, name) in work {
                let done = page::retrieve_page(fetcher, page, &name, staging_dir, retry)
                    .map_err(|source| FlipbookError::RetrievalFailed {
                        index: page.index,
                        url: page.location.clone(),
                        source,
                    })?;
                tracker.record(done.bytes);
                staged.push(done);
            }
            staged
        }
        RetrievalStrategy::WorkerPool { workers } => {
            pool::retrieve_pool(fetcher, work, staging_dir, workers, retry, &mut tracker)?
        }
    };

    let done = tracker.snapshot();
    tracing::info!(
        pages = done.pages_done,
        bytes = done.bytes_done,
        "retrieval finished in {:.1}s",
        done.elapsed_secs
    );
    Ok(staged)
}

/// Pairs every page with its staged file name; names must be present and unique.
fn staged_names(pages: &[PageResource]) -> Result<Vec<(&PageResource, String)>, FlipbookError> {
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(pages.len());
    pages
        .iter()
        .map(|page| {
            let name = page.file_name().ok_or_else(|| FlipbookError::RetrievalFailed {
                index: page.index,
                url: page.location.clone(),
                source: FetchError::Storage(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "page URL has no file name",
                )),
            })?;
            if let Some(&first) = seen.get(&name) {
                return Err(FlipbookError::DuplicatePageFile {
                    name,
                    first,
                    second: page.index,
                });
            }
            seen.insert(name.clone(), page.index);
            Ok((page, name))
        })
        .collect()
}
