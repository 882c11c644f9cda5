//! HTTP GET transport and the metadata fetch.
//!
//! Uses the curl crate (libcurl). Every request follows redirects, applies the
//! configured timeouts, and treats any non-2xx status as a failure so error
//! pages are never mistaken for config payloads or page images.

mod curl_fetcher;

pub use curl_fetcher::{CurlFetcher, TransportOptions};

use std::io::Write;

use crate::error::FlipbookError;
use crate::reference::FlipbookReference;
use crate::retry::{run_maybe_retry, FetchError, RetryPolicy};

/// Blocking GET transport. Implementations must be shareable across worker threads.
pub trait Fetcher: Send + Sync {
    /// GETs `url` and streams the body into `out`. Returns the number of bytes written.
    fn fetch_into(&self, url: &str, out: &mut dyn Write) -> Result<u64, FetchError>;

    /// GETs `url` into memory.
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut buf = Vec::new();
        self.fetch_into(url, &mut buf)?;
        Ok(buf)
    }
}

/// Retrieves the raw `?configjs` payload for a book.
pub fn fetch_config(
    fetcher: &dyn Fetcher,
    reference: &FlipbookReference,
    retry: Option<&RetryPolicy>,
) -> Result<Vec<u8>, FlipbookError> {
    let url = reference.config_url();
    tracing::info!(%url, "fetching book config");
    let payload = run_maybe_retry(retry, || fetcher.fetch_bytes(&url))
        .map_err(|source| FlipbookError::FetchFailed { url: url.clone(), source })?;
    tracing::debug!(bytes = payload.len(), "config payload received");
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Canned {
        requests: Mutex<Vec<String>>,
        response: Result<&'static [u8], u32>,
    }

    impl Fetcher for Canned {
        fn fetch_into(&self, url: &str, out: &mut dyn Write) -> Result<u64, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            let body = self.response.map_err(FetchError::Http)?;
            out.write_all(body)?;
            Ok(body.len() as u64)
        }
    }

    #[test]
    fn requests_configjs_endpoint() {
        let fetcher = Canned {
            requests: Mutex::new(Vec::new()),
            response: Ok(br#"{"pageCount":1}"#),
        };
        let r = FlipbookReference::parse("https://anyflip.com/abc/def/basic").unwrap();
        let payload = fetch_config(&fetcher, &r, None).unwrap();
        assert_eq!(payload, br#"{"pageCount":1}"#);
        assert_eq!(
            *fetcher.requests.lock().unwrap(),
            vec!["https://anyflip.com/abc/def?configjs".to_string()]
        );
    }

    #[test]
    fn http_error_is_fetch_failed() {
        let fetcher = Canned {
            requests: Mutex::new(Vec::new()),
            response: Err(404),
        };
        let r = FlipbookReference::parse("https://anyflip.com/abc/def").unwrap();
        match fetch_config(&fetcher, &r, None).unwrap_err() {
            FlipbookError::FetchFailed { url, source } => {
                assert_eq!(url, "https://anyflip.com/abc/def?configjs");
                assert!(matches!(source, FetchError::Http(404)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
