//! Sequential writer for one staged page.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::temp_path;

/// A page being written to `<dir>/<name>.part`. Call `finalize` to publish it
/// under `<dir>/<name>`, or `discard` to remove the partial file.
pub struct StagedFile {
    out: BufWriter<File>,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl StagedFile {
    /// Creates (truncating) the temp file for `name` inside `dir`.
    pub fn create(dir: &Path, name: &str) -> io::Result<Self> {
        let final_path = dir.join(name);
        let temp_path = temp_path(&final_path);
        let file = File::create(&temp_path)?;
        Ok(Self {
            out: BufWriter::new(file),
            temp_path,
            final_path,
        })
    }

    /// Path to the current temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flushes, syncs and renames the temp file to its final name.
    pub fn finalize(self) -> io::Result<PathBuf> {
        let file = self.out.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&self.temp_path, &self.final_path)?;
        Ok(self.final_path)
    }

    /// Removes the temp file; errors are logged, not returned.
    pub fn discard(self) {
        let temp_path = self.temp_path.clone();
        drop(self.out);
        if let Err(e) = std::fs::remove_file(&temp_path) {
            tracing::warn!("could not remove {}: {}", temp_path.display(), e);
        }
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
