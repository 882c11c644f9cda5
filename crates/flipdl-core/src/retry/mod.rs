//! Retry and backoff for page and config fetches.
//!
//! Classifies transport failures (timeouts, throttling, connection errors,
//! 5xx) and computes exponential backoff. Retrying is opt-in: callers pass
//! `Some(&RetryPolicy)` only when the `[retry]` config table is present.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status, ErrorKind};
pub use error::FetchError;
pub use policy::{RetryDecision, RetryPolicy};
pub use run::{run_maybe_retry, run_with_retry};
