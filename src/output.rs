//! Atomic file writes for generated artifacts.
//!
//! Content is written to a temp file in the destination directory and then
//! renamed into place, so a reader never sees a partial file.

use crate::error::OutputError;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

fn staged(dir: &Path, bytes: &[u8]) -> Result<NamedTempFile, OutputError> {
    let mut file = NamedTempFile::new_in(dir).map_err(|e| OutputError::io(dir, e))?;
    let written = file.write_all(bytes).and_then(|_| file.flush());
    if let Err(e) = written {
        return Err(OutputError::io(file.path(), e));
    }
    Ok(file)
}

/// Write `bytes` to `path`, replacing any existing file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), OutputError> {
    let dir = parent_dir(path);
    let file = staged(dir, bytes)?;
    file.persist(path)
        .map_err(|e| OutputError::io(path, e.error))?;
    Ok(())
}

/// Write `bytes` to `<dir>/<stem>.<ext>` without overwriting anything.
///
/// If that name is taken, `_1`, `_2`, ... is appended to the stem. Returns
/// the path actually written.
pub fn write_new(dir: &Path, stem: &str, ext: &str, bytes: &[u8]) -> Result<PathBuf, OutputError> {
    let mut file = staged(dir, bytes)?;
    let mut attempt = 0u32;
    loop {
        let candidate = if attempt == 0 {
            dir.join(format!("{}.{}", stem, ext))
        } else {
            dir.join(format!("{}_{}.{}", stem, attempt, ext))
        };
        match file.persist_noclobber(&candidate) {
            Ok(_) => return Ok(candidate),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                file = e.file;
                attempt += 1;
            }
            Err(e) => return Err(OutputError::io(candidate, e.error)),
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chart.svg");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_new_appends_suffix() {
        let dir = TempDir::new().unwrap();

        let first = write_new(dir.path(), "report_20240101_120000", "md", b"a").unwrap();
        let second = write_new(dir.path(), "report_20240101_120000", "md", b"b").unwrap();
        let third = write_new(dir.path(), "report_20240101_120000", "md", b"c").unwrap();

        assert!(first.ends_with("report_20240101_120000.md"));
        assert!(second.ends_with("report_20240101_120000_1.md"));
        assert!(third.ends_with("report_20240101_120000_2.md"));
        assert_eq!(std::fs::read_to_string(first).unwrap(), "a");
    }

    #[test]
    fn test_write_into_missing_dir_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("chart.svg");

        let err = write_atomic(&path, b"data").unwrap_err();
        assert!(matches!(err, OutputError::Io { .. }));
        assert!(!path.exists());
    }
}
