//! Filesystem checks used to validate extension source paths.

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};

/// Answers whether a path names an existing directory.
pub trait DirectoryProbe: Send + Sync {
    /// Returns `true` when `path` is an existing directory.
    fn is_directory(&self, path: &Utf8Path) -> bool;
}

/// Probe backed by the process's ambient filesystem authority.
#[derive(Clone, Copy, Debug, Default)]
pub struct AmbientDirectoryProbe;

impl DirectoryProbe for AmbientDirectoryProbe {
    fn is_directory(&self, path: &Utf8Path) -> bool {
        // Opening as a directory fails for missing paths and regular files.
        Dir::open_ambient_dir(path, ambient_authority()).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_path_buf()).expect("temp path is UTF-8")
    }

    #[test]
    fn accepts_existing_directory() {
        let dir = tempfile::tempdir().expect("create temp dir");
        assert!(AmbientDirectoryProbe.is_directory(&utf8(dir.path())));
    }

    #[test]
    fn rejects_regular_file() {
        let file = tempfile::NamedTempFile::new().expect("create temp file");
        assert!(!AmbientDirectoryProbe.is_directory(&utf8(file.path())));
    }

    #[test]
    fn rejects_missing_path() {
        assert!(!AmbientDirectoryProbe.is_directory(Utf8Path::new("/does/not/exist")));
    }
}
