//! `FileProbe` backed by the real filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use warden_core::traits::FileProbe;

/// Read-only `std::fs` queries. Never creates, modifies, or deletes.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProbe;

impl FileProbe for OsProbe {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }

    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        match fs::metadata(path) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_reports_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "hello").unwrap();

        let probe = OsProbe;
        assert!(probe.exists(&file).unwrap());
        assert!(!probe.is_dir(&file).unwrap());
        assert!(probe.is_dir(dir.path()).unwrap());
        assert!(!probe.exists(&dir.path().join("missing")).unwrap());
        assert!(!probe.is_dir(&dir.path().join("missing")).unwrap());
    }

    #[test]
    fn canonicalize_resolves_dot_components() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();

        let probe = OsProbe;
        let canonical = probe.canonicalize(&dir.path().join("a").join("..")).unwrap();
        assert_eq!(canonical, fs::canonicalize(dir.path()).unwrap());
    }
}
