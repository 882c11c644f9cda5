//! CLI for the flipdl flipbook downloader.

mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use flipdl_core::config::{self, FlipdlConfig};
use std::path::PathBuf;

use commands::{run_completions, run_fetch, run_info, run_man, FetchOptions};

/// Top-level CLI for flipdl.
#[derive(Debug, Parser)]
#[command(name = "flipdl")]
#[command(about = "flipdl: download an online flipbook as one document", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every page of a flipbook and assemble them into one document.
    Fetch {
        /// Any viewer URL of the book (e.g. https://anyflip.com/abcd/efgh/basic).
        url: String,

        /// Document title; defaults to the book's own title, else its id.
        #[arg(long)]
        title: Option<String>,

        /// Skip TLS certificate validation.
        #[arg(long)]
        insecure: bool,

        /// Keep the staging directory with the downloaded pages.
        #[arg(long)]
        keep_staging: bool,

        /// Stage pages in DIR instead of a temporary directory (never deleted).
        #[arg(long, value_name = "DIR")]
        staging_dir: Option<PathBuf>,

        /// Directory for the assembled document (default: current directory).
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Download up to N pages concurrently (default from config, 1 = in order).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Show a book's title, page count and page URLs without downloading.
    Info {
        /// Any viewer URL of the book.
        url: String,

        /// Skip TLS certificate validation.
        #[arg(long)]
        insecure: bool,
    },

    /// Print shell completions to stdout.
    Completions {
        shell: clap_complete::Shell,
    },

    /// Print the man page to stdout.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Fetch {
                url,
                title,
                insecure,
                keep_staging,
                staging_dir,
                output_dir,
                jobs,
            } => {
                let mut cfg = load_config()?;
                cfg.insecure |= insecure;
                if let Some(n) = jobs {
                    cfg.workers = n;
                }
                let output_dir = match output_dir {
                    Some(d) => d,
                    None => std::env::current_dir()?,
                };
                let opts = FetchOptions {
                    url,
                    title,
                    keep_staging,
                    staging_dir,
                    output_dir,
                };
                run_fetch(&cfg, opts).await?;
            }
            CliCommand::Info { url, insecure } => {
                let mut cfg = load_config()?;
                cfg.insecure |= insecure;
                run_info(&cfg, &url).await?;
            }
            CliCommand::Completions { shell } => run_completions(shell, Cli::command())?,
            CliCommand::Man => run_man(Cli::command())?,
        }

        Ok(())
    }
}

fn load_config() -> Result<FlipdlConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
