//! `flipdl info <url>` – resolve a book without downloading its pages.

use anyhow::{Context, Result};
use flipdl_core::config::FlipdlConfig;
use flipdl_core::fetch::{CurlFetcher, TransportOptions};
use flipdl_core::pipeline::{self, PrepareOptions};
use flipdl_core::retry::RetryPolicy;

pub async fn run_info(cfg: &FlipdlConfig, url: &str) -> Result<()> {
    let fetcher = CurlFetcher::new(TransportOptions::from_config(cfg));
    let retry = cfg.retry.as_ref().map(RetryPolicy::from_config);
    let image_host = cfg.image_host.clone();
    let url = url.to_string();

    let book = tokio::task::spawn_blocking(move || {
        let opts = PrepareOptions {
            image_host: &image_host,
            title_override: None,
            retry: retry.as_ref(),
        };
        pipeline::prepare(&fetcher, &url, opts)
    })
    .await
    .context("prepare task panicked")??;

    println!("Title:      {}", book.title);
    println!("Reference:  {}", book.reference);
    println!("Pages:      {}", book.metadata.page_count);
    println!("Addressing: {}", book.addressing.label());
    for page in &book.pages {
        println!("{:>5}  {}", page.index, page.location);
    }
    Ok(())
}
