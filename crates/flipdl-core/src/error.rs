//! Pipeline error taxonomy.
//!
//! Every stage returns `FlipbookError`; only `TitleNotFound` is recovered
//! (the caller falls back to a title derived from the reference).

use std::path::PathBuf;

use crate::retry::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum FlipbookError {
    /// Input is not an absolute URL with at least two path segments.
    #[error("invalid flipbook reference {input:?}: {reason}")]
    InvalidReference { input: String, reason: String },

    /// Transport failure or non-2xx status reaching the config endpoint.
    #[error("fetching {url} failed")]
    FetchFailed {
        url: String,
        #[source]
        source: FetchError,
    },

    /// Payload contains no parseable JSON object.
    #[error("config payload is not a JSON object")]
    MalformedConfig(#[source] serde_json::Error),

    #[error("bookTitle not found in config payload")]
    TitleNotFound,

    #[error("pageCount not found in config payload")]
    PageCountNotFound,

    #[error("pageCount {found} exceeds the limit of {max} pages")]
    PageCountOutOfRange { found: f64, max: usize },

    /// `pageFileNames` has an element that is not a non-empty string.
    #[error("pageFileNames entry {index} is not a file name")]
    MalformedFileNameList { index: usize },

    /// Filename addressing selected but fewer names than pages.
    #[error("config lists {found} page file names for {expected} pages")]
    PageFileNameCountMismatch { expected: usize, found: usize },

    /// A page could not be fetched or written; the run stops here.
    #[error("page {index} ({url}) failed")]
    RetrievalFailed {
        index: usize,
        url: String,
        #[source]
        source: FetchError,
    },

    /// Two pages would be staged under the same file name.
    #[error("pages {first} and {second} share the file name {name:?}")]
    DuplicatePageFile {
        name: String,
        first: usize,
        second: usize,
    },

    #[error("staging directory {path} unusable")]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
