//! libcurl-backed `Fetcher`.

use std::io::Write;
use std::time::Duration;

use crate::config::FlipdlConfig;
use crate::retry::FetchError;

use super::Fetcher;

/// Per-request transport settings.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    /// Whole-request limit; None leaves the transfer unbounded.
    pub timeout: Option<Duration>,
    /// Skip TLS peer and host verification.
    pub insecure: bool,
    pub user_agent: Option<String>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self::from_config(&FlipdlConfig::default())
    }
}

impl TransportOptions {
    pub fn from_config(cfg: &FlipdlConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: (cfg.timeout_secs > 0).then(|| Duration::from_secs(cfg.timeout_secs)),
            insecure: cfg.insecure,
            user_agent: cfg.user_agent.clone(),
        }
    }
}

/// Issues one curl Easy transfer per request; cheap to share between threads.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    opts: TransportOptions,
}

impl CurlFetcher {
    pub fn new(opts: TransportOptions) -> Self {
        if opts.insecure {
            tracing::warn!("TLS certificate verification disabled");
        }
        Self { opts }
    }

    fn configure(&self, easy: &mut curl::easy::Easy, url: &str) -> Result<(), curl::Error> {
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        // >= 400 aborts before the body is written; the code is read back below.
        easy.fail_on_error(true)?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        if let Some(t) = self.opts.timeout {
            easy.timeout(t)?;
        }
        if self.opts.insecure {
            easy.ssl_verify_peer(false)?;
            easy.ssl_verify_host(false)?;
        }
        if let Some(ua) = &self.opts.user_agent {
            easy.useragent(ua)?;
        }
        Ok(())
    }
}

impl Fetcher for CurlFetcher {
    fn fetch_into(&self, url: &str, out: &mut dyn Write) -> Result<u64, FetchError> {
        let mut easy = curl::easy::Easy::new();
        self.configure(&mut easy, url)?;

        let mut written = 0u64;
        let mut write_err: Option<std::io::Error> = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match out.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_err {
            return Err(FetchError::Storage(e));
        }
        if let Err(e) = performed {
            if e.is_http_returned_error() {
                if let Ok(code) = easy.response_code() {
                    return Err(FetchError::Http(code));
                }
            }
            return Err(FetchError::Curl(e));
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        out.flush()?;
        Ok(written)
    }
}
