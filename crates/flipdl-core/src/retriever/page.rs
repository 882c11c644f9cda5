//! Retrieval of one page into the staging directory.

use std::path::{Path, PathBuf};

use crate::fetch::Fetcher;
use crate::locator::PageResource;
use crate::retry::{run_maybe_retry, FetchError, RetryPolicy};
use crate::storage::StagedFile;

/// A page written to the staging directory under its final name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPage {
    pub resource: PageResource,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Streams one page into `<dir>/<name>.part`, then renames it to `<dir>/<name>`.
/// A failed attempt leaves no partial file behind.
pub(super) fn retrieve_page(
    fetcher: &dyn Fetcher,
    page: &PageResource,
    name: &str,
    dir: &Path,
    retry: Option<&RetryPolicy>,
) -> Result<StagedPage, FetchError> {
    run_maybe_retry(retry, || {
        let mut file = StagedFile::create(dir, name)?;
        match fetcher.fetch_into(&page.location, &mut file) {
            Ok(bytes) => {
                let path = file.finalize()?;
                tracing::debug!(index = page.index, bytes, "staged {}", path.display());
                Ok(StagedPage {
                    resource: page.clone(),
                    path,
                    bytes,
                })
            }
            Err(e) => {
                file.discard();
                Err(e)
            }
        }
    })
}
