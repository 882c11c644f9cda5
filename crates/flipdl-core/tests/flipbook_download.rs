//! Integration tests: local HTTP server standing in for both the viewer host
//! and the image host; full prepare + retrieve through libcurl.

mod common;

use std::collections::HashMap;

use flipdl_core::fetch::{CurlFetcher, TransportOptions};
use flipdl_core::locator::Addressing;
use flipdl_core::pipeline::{self, PrepareOptions};
use flipdl_core::retriever::{retrieve_pages, RetrievalStrategy};
use flipdl_core::retry::FetchError;
use flipdl_core::FlipbookError;
use tempfile::tempdir;

fn page_body(i: usize) -> Vec<u8> {
    (0u8..=255).cycle().skip(i).take(4096 + i * 7).collect()
}

fn routes(config: &str, pages: &[(&str, u16, Vec<u8>)]) -> HashMap<String, (u16, Vec<u8>)> {
    let mut r = HashMap::new();
    r.insert("/abc/123?configjs".to_string(), (200, config.as_bytes().to_vec()));
    for (path, status, body) in pages {
        r.insert(path.to_string(), (*status, body.clone()));
    }
    r
}

fn prepare_opts(host: &str) -> PrepareOptions<'_> {
    PrepareOptions {
        image_host: host,
        title_override: None,
        retry: None,
    }
}

#[test]
fn positional_book_downloads_every_page() {
    let pages: Vec<(String, u16, Vec<u8>)> = (1..=3)
        .map(|i| (format!("/abc/123/files/mobile/{i}.jpg"), 200, page_body(i)))
        .collect();
    let page_refs: Vec<(&str, u16, Vec<u8>)> =
        pages.iter().map(|(p, s, b)| (p.as_str(), *s, b.clone())).collect();
    let server = common::page_server::start(routes(r#"{"bookTitle":"Foo","pageCount":3}"#, &page_refs));

    let fetcher = CurlFetcher::new(TransportOptions::default());
    let input = server.url("/abc/123/456");
    let book = pipeline::prepare(&fetcher, &input, prepare_opts(&server.base_url)).unwrap();
    assert_eq!(book.title, "Foo");
    assert_eq!(book.reference.path(), "/abc/123");
    assert_eq!(book.addressing, Addressing::Positional);

    let dir = tempdir().unwrap();
    let staged = retrieve_pages(&fetcher, &book.pages, dir.path(), RetrievalStrategy::Sequential, None, None)
        .unwrap();

    assert_eq!(staged.len(), 3);
    let files = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(files, 3, "staging dir holds exactly one file per page");
    for (i, s) in staged.iter().enumerate() {
        assert_eq!(s.path, dir.path().join(format!("{}.jpg", i + 1)));
        assert_eq!(std::fs::read(&s.path).unwrap(), page_body(i + 1));
    }
    assert_eq!(
        server.requests(),
        vec![
            "/abc/123?configjs",
            "/abc/123/files/mobile/1.jpg",
            "/abc/123/files/mobile/2.jpg",
            "/abc/123/files/mobile/3.jpg",
        ]
    );
}

#[test]
fn filename_book_uses_large_images_in_listed_order() {
    let config = r#"var htmlConfig = {"pageCount":2,"pageFileNames":["zz.webp","aa.webp"]};"#;
    let server = common::page_server::start(routes(
        config,
        &[
            ("/abc/123/files/large/zz.webp", 200, page_body(1)),
            ("/abc/123/files/large/aa.webp", 200, page_body(2)),
        ],
    ));

    let fetcher = CurlFetcher::new(TransportOptions::default());
    let book = pipeline::prepare(&fetcher, &server.url("/abc/123"), prepare_opts(&server.base_url)).unwrap();
    assert_eq!(book.title, "123", "missing bookTitle falls back to the book id");

    let dir = tempdir().unwrap();
    let staged = retrieve_pages(
        &fetcher,
        &book.pages,
        dir.path(),
        RetrievalStrategy::WorkerPool { workers: 2 },
        None,
        None,
    )
    .unwrap();
    let names: Vec<_> = staged
        .iter()
        .map(|s| s.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["zz.webp", "aa.webp"]);
    assert_eq!(std::fs::read(&staged[0].path).unwrap(), page_body(1));
    assert_eq!(std::fs::read(&staged[1].path).unwrap(), page_body(2));
}

#[test]
fn failing_page_aborts_the_run() {
    let server = common::page_server::start(routes(
        r#"{"bookTitle":"Foo","pageCount":5}"#,
        &[
            ("/abc/123/files/mobile/1.jpg", 200, page_body(1)),
            ("/abc/123/files/mobile/2.jpg", 500, b"boom".to_vec()),
            ("/abc/123/files/mobile/3.jpg", 200, page_body(3)),
            ("/abc/123/files/mobile/4.jpg", 200, page_body(4)),
            ("/abc/123/files/mobile/5.jpg", 200, page_body(5)),
        ],
    ));

    let fetcher = CurlFetcher::new(TransportOptions::default());
    let book = pipeline::prepare(&fetcher, &server.url("/abc/123/7"), prepare_opts(&server.base_url)).unwrap();
    let dir = tempdir().unwrap();
    let err = retrieve_pages(&fetcher, &book.pages, dir.path(), RetrievalStrategy::Sequential, None, None)
        .unwrap_err();

    match err {
        FlipbookError::RetrievalFailed { index, source, .. } => {
            assert_eq!(index, 2);
            assert!(matches!(source, FetchError::Http(500)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(dir.path().join("1.jpg").exists());
    assert!(!dir.path().join("2.jpg").exists());
    assert!(!dir.path().join("2.jpg.part").exists());
    let requested = server.requests();
    assert!(!requested.iter().any(|r| r.ends_with("/3.jpg") || r.ends_with("/4.jpg") || r.ends_with("/5.jpg")));
}

#[test]
fn missing_config_is_fetch_failed() {
    let server = common::page_server::start(HashMap::new());
    let fetcher = CurlFetcher::new(TransportOptions::default());
    let err = pipeline::prepare(&fetcher, &server.url("/abc/123"), prepare_opts(&server.base_url)).unwrap_err();
    match err {
        FlipbookError::FetchFailed { url, source } => {
            assert!(url.ends_with("/abc/123?configjs"));
            assert!(matches!(source, FetchError::Http(404)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn progress_reaches_completion() {
    let server = common::page_server::start(routes(
        r#"{"bookTitle":"Foo","pageCount":2}"#,
        &[
            ("/abc/123/files/mobile/1.jpg", 200, page_body(1)),
            ("/abc/123/files/mobile/2.jpg", 200, page_body(2)),
        ],
    ));
    let fetcher = CurlFetcher::new(TransportOptions::default());
    let book = pipeline::prepare(&fetcher, &server.url("/abc/123"), prepare_opts(&server.base_url)).unwrap();
    let dir = tempdir().unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::channel(8);
    retrieve_pages(&fetcher, &book.pages, dir.path(), RetrievalStrategy::Sequential, None, Some(&tx)).unwrap();
    drop(tx);

    let mut last = None;
    while let Ok(p) = rx.try_recv() {
        last = Some(p);
    }
    let last = last.expect("at least one progress snapshot");
    assert!(last.is_complete());
    assert_eq!(last.bytes_done, (page_body(1).len() + page_body(2).len()) as u64);
}
