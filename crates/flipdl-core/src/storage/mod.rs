//! Staging directory file lifecycle.
//!
//! Each page is streamed into `<name>.part` and renamed to `<name>` once the
//! transfer completed, so the staging directory only ever holds whole pages
//! under their final names.

mod writer;

pub use writer::StagedFile;

use std::path::{Path, PathBuf};

use crate::error::FlipbookError;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `3.jpg` → `3.jpg.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Creates the staging directory (and parents) if missing.
pub fn ensure_staging_dir(dir: &Path) -> Result<(), FlipbookError> {
    std::fs::create_dir_all(dir).map_err(|source| FlipbookError::Staging {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("1.jpg"));
        assert_eq!(p.to_string_lossy(), "1.jpg.part");
        let p2 = temp_path(Path::new("/tmp/stage/a1.webp"));
        assert_eq!(p2.to_string_lossy(), "/tmp/stage/a1.webp.part");
    }

    #[test]
    fn create_write_finalize() {
        let dir = tempfile::tempdir().unwrap();
        let mut staged = StagedFile::create(dir.path(), "1.jpg").unwrap();
        assert!(dir.path().join("1.jpg.part").exists());
        staged.write_all(b"hello ").unwrap();
        staged.write_all(b"page").unwrap();
        let final_path = staged.finalize().unwrap();

        assert_eq!(final_path, dir.path().join("1.jpg"));
        assert!(!dir.path().join("1.jpg.part").exists());
        assert_eq!(std::fs::read(&final_path).unwrap(), b"hello page");
    }

    #[test]
    fn discard_removes_part_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut staged = StagedFile::create(dir.path(), "2.jpg").unwrap();
        staged.write_all(b"partial").unwrap();
        staged.discard();
        assert!(!dir.path().join("2.jpg.part").exists());
        assert!(!dir.path().join("2.jpg").exists());
    }

    #[test]
    fn ensure_staging_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_staging_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
