//! Hand-off to the document assembler.
//!
//! Turning page images into one document is done by an external tool; this
//! module defines the interface, a command-line implementation, and the
//! ordering used when re-assembling from a kept staging directory.

use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Image extensions accepted as pages.
const PAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Produces one document from ordered page images.
pub trait DocumentAssembler {
    fn assemble(&self, pages: &[PathBuf], output: &Path) -> Result<()>;
}

/// Runs an external program, e.g. `["img2pdf", "{pages}", "-o", "{output}"]`.
///
/// `{output}` is replaced by the output path; an argument that is exactly
/// `{pages}` expands to every page path in order.
#[derive(Debug, Clone)]
pub struct CommandAssembler {
    program: String,
    args: Vec<String>,
}

impl CommandAssembler {
    /// Builds from an argv template; None if the template is empty.
    pub fn from_template(template: &[String]) -> Option<Self> {
        let (program, args) = template.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn expand_args(&self, pages: &[PathBuf], output: &Path) -> Vec<String> {
        let output = output.to_string_lossy();
        let mut args = Vec::with_capacity(self.args.len() + pages.len());
        for arg in &self.args {
            if arg == "{pages}" {
                args.extend(pages.iter().map(|p| p.to_string_lossy().into_owned()));
            } else {
                args.push(arg.replace("{output}", &output));
            }
        }
        args
    }
}

impl DocumentAssembler for CommandAssembler {
    fn assemble(&self, pages: &[PathBuf], output: &Path) -> Result<()> {
        let args = self.expand_args(pages, output);
        tracing::info!(program = %self.program, pages = pages.len(), "assembling {}", output.display());
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .with_context(|| format!("failed to run {}", self.program))?;
        if !status.success() {
            anyhow::bail!("{} exited with {}", self.program, status);
        }
        if !output.exists() {
            anyhow::bail!("{} did not create {}", self.program, output.display());
        }
        Ok(())
    }
}

/// Lists page images in `dir` in natural order (`2.jpg` before `10.jpg`).
pub fn ordered_page_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| PAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
            .unwrap_or(false);
        if is_image {
            pages.push(path);
        }
    }
    pages.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
    Ok(pages)
}

/// Compares strings treating runs of ASCII digits as numbers.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a.as_bytes(), b.as_bytes());
    while let (Some(&x), Some(&y)) = (a.first(), b.first()) {
        if x.is_ascii_digit() && y.is_ascii_digit() {
            let na = a.iter().take_while(|c| c.is_ascii_digit()).count();
            let nb = b.iter().take_while(|c| c.is_ascii_digit()).count();
            let da = trim_zeros(&a[..na]);
            let db = trim_zeros(&b[..nb]);
            let ord = da.len().cmp(&db.len()).then_with(|| da.cmp(db));
            if ord != Ordering::Equal {
                return ord;
            }
            a = &a[na..];
            b = &b[nb..];
        } else {
            if x != y {
                return x.cmp(&y);
            }
            a = &a[1..];
            b = &b[1..];
        }
    }
    a.len().cmp(&b.len())
}

fn trim_zeros(digits: &[u8]) -> &[u8] {
    let skip = digits.iter().take_while(|&&d| d == b'0').count();
    &digits[skip..]
}
