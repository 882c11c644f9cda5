//! `flipdl fetch <url>` – download a book's pages and assemble them.

use anyhow::{Context, Result};
use flipdl_core::assemble::{CommandAssembler, DocumentAssembler};
use flipdl_core::config::FlipdlConfig;
use flipdl_core::fetch::{CurlFetcher, TransportOptions};
use flipdl_core::pipeline::{self, PrepareOptions, PreparedBook};
use flipdl_core::retriever::{self, RetrievalProgress, RetrievalStrategy, StagedPage};
use flipdl_core::retry::RetryPolicy;
use flipdl_core::url_model::document_file_name;
use std::path::{Path, PathBuf};

use super::progress::spawn_progress_printer;

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub url: String,
    pub title: Option<String>,
    pub keep_staging: bool,
    /// User-chosen staging directory; never removed.
    pub staging_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
}

/// Where pages are staged for this run.
enum Staging {
    Temp(tempfile::TempDir),
    User(PathBuf),
}

impl Staging {
    fn create(user_dir: Option<&Path>) -> Result<Self> {
        Ok(match user_dir {
            Some(dir) => Staging::User(dir.to_path_buf()),
            None => Staging::Temp(
                tempfile::Builder::new()
                    .prefix("flipdl-")
                    .tempdir()
                    .context("create staging directory")?,
            ),
        })
    }

    fn path(&self) -> &Path {
        match self {
            Staging::Temp(d) => d.path(),
            Staging::User(p) => p,
        }
    }

    /// Keeps a temporary directory on disk and returns its path.
    fn persist(self) -> PathBuf {
        match self {
            Staging::Temp(d) => d.into_path(),
            Staging::User(p) => p,
        }
    }

    /// Removes a temporary directory; a user directory is left alone.
    fn release(self) -> Option<PathBuf> {
        match self {
            Staging::Temp(d) => {
                let path = d.path().to_path_buf();
                if let Err(e) = d.close() {
                    tracing::warn!("could not remove {}: {}", path.display(), e);
                    return Some(path);
                }
                None
            }
            Staging::User(p) => Some(p),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Document {
    /// No assembler configured; pages are the only output.
    NotAssembled,
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

/// Result of a successful fetch after staging has been dealt with.
#[derive(Debug)]
struct Finished {
    document: Document,
    /// Staging directory still on disk, if any.
    kept: Option<PathBuf>,
}

pub async fn run_fetch(cfg: &FlipdlConfig, opts: FetchOptions) -> Result<()> {
    let staging = Staging::create(opts.staging_dir.as_deref())?;
    let assembler = cfg
        .assemble_command
        .as_deref()
        .and_then(CommandAssembler::from_template);

    println!("Preparing to download");
    let (book, staged) = match download(cfg, &opts, staging.path()).await {
        Ok(done) => done,
        Err(e) => {
            let dir = staging.persist();
            eprintln!("Pages retrieved so far were left in {}", dir.display());
            return Err(e);
        }
    };
    println!(
        "Downloaded {} pages of \"{}\"",
        staged.len(),
        book.title
    );

    let pages: Vec<PathBuf> = staged.iter().map(|s| s.path.clone()).collect();
    let done = finish(
        staging,
        &book.title,
        &pages,
        assembler.as_ref().map(|a| a as &dyn DocumentAssembler),
        &opts.output_dir,
        opts.keep_staging,
    )?;

    match &done.document {
        Document::NotAssembled => {
            println!("No assemble_command configured; pages were left in place.")
        }
        Document::Created(p) => println!("PDF created: {}", p.display()),
        Document::AlreadyExists(p) => println!("Output file {} already exists", p.display()),
    }
    if let Some(dir) = &done.kept {
        println!("Pages kept in {}", dir.display());
    }
    Ok(())
}

/// Assembles the staged pages and settles the staging directory.
///
/// The staging directory survives when `keep_staging` is set, when there is
/// no assembler, or when it was supplied by the user. An existing output
/// document is never overwritten.
fn finish(
    staging: Staging,
    title: &str,
    pages: &[PathBuf],
    assembler: Option<&dyn DocumentAssembler>,
    output_dir: &Path,
    keep_staging: bool,
) -> Result<Finished> {
    let Some(assembler) = assembler else {
        return Ok(Finished {
            document: Document::NotAssembled,
            kept: Some(staging.persist()),
        });
    };

    let output = output_dir.join(document_file_name(title, "pdf"));
    let document = if output.exists() {
        tracing::warn!("skipping assembly, {} exists", output.display());
        Document::AlreadyExists(output)
    } else {
        println!("Converting to pdf");
        if let Err(e) = assembler.assemble(pages, &output) {
            let dir = staging.persist();
            eprintln!("Pages were left in {}", dir.display());
            return Err(e);
        }
        Document::Created(output)
    };

    let kept = if keep_staging {
        Some(staging.persist())
    } else {
        staging.release()
    };
    Ok(Finished { document, kept })
}

/// Prepares the book and retrieves its pages on a blocking thread, printing progress.
async fn download(
    cfg: &FlipdlConfig,
    opts: &FetchOptions,
    staging_dir: &Path,
) -> Result<(PreparedBook, Vec<StagedPage>)> {
    let fetcher = CurlFetcher::new(TransportOptions::from_config(cfg));
    let retry = cfg.retry.as_ref().map(RetryPolicy::from_config);
    let strategy = RetrievalStrategy::from_workers(cfg.workers);
    let image_host = cfg.image_host.clone();
    let url = opts.url.clone();
    let title = opts.title.clone();
    let staging_dir = staging_dir.to_path_buf();

    let (progress_tx, progress_rx) = tokio::sync::mpsc::channel::<RetrievalProgress>(64);
    let printer = spawn_progress_printer(progress_rx);

    let res = tokio::task::spawn_blocking(move || {
        let prepare_opts = PrepareOptions {
            image_host: &image_host,
            title_override: title.as_deref(),
            retry: retry.as_ref(),
        };
        let book = pipeline::prepare(&fetcher, &url, prepare_opts)?;
        println!("\"{}\": {} pages", book.title, book.pages.len());
        let staged = retriever::retrieve_pages(
            &fetcher,
            &book.pages,
            &staging_dir,
            strategy,
            retry.as_ref(),
            Some(&progress_tx),
        )?;
        Ok::<_, flipdl_core::FlipbookError>((book, staged))
    })
    .await
    .context("download task panicked");

    let _ = printer.await;
    Ok(res??)
}
