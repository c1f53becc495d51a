//! Deterministic platform and directory probes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use deferred_config::{DirectoryProbe, PlatformProbe};

/// Platform probe returning a fixed identifier and counting reads.
///
/// Clones share the read counter.
#[derive(Clone, Debug)]
pub struct FixedPlatform {
    id: String,
    reads: Arc<AtomicUsize>,
}

impl FixedPlatform {
    /// Probe reporting `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reads: Arc::default(),
        }
    }

    /// Number of times the identifier was read.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl PlatformProbe for FixedPlatform {
    fn platform_id(&self) -> String {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.id.clone()
    }
}

/// Directory probe accepting only an explicit list of paths.
#[derive(Clone, Debug, Default)]
pub struct FixedDirectories {
    dirs: Vec<Utf8PathBuf>,
}

impl FixedDirectories {
    /// Probe treating each of `dirs` as an existing directory.
    #[must_use]
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }
}

impl DirectoryProbe for FixedDirectories {
    fn is_directory(&self, path: &Utf8Path) -> bool {
        self.dirs.iter().any(|dir| dir == path)
    }
}
