//! Uniform read access over the places a specification can live.

pub mod archive;
pub mod fs;

pub use archive::ArchiveSource;
pub use fs::FileSystemSource;

use crate::error::SourceError;
use crate::load::LoaderOptions;
use crate::path;

/// Read capability shared by every backing store. Resolution logic is
/// written once against this trait.
pub trait ContentSource {
    /// Whether a file or entry exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Read the raw bytes at `path`.
    fn read(&self, path: &str) -> Result<Vec<u8>, SourceError>;

    /// Canonical cache key for `path` in this source's namespace.
    fn canonicalize(&self, path: &str) -> String;

    /// Resolve `reference` relative to the fragment at canonical location `base`.
    fn resolve(&self, base: &str, reference: &str) -> String {
        self.canonicalize(&path::join(path::parent_dir(base), reference))
    }

    /// Human-readable description for logs and errors.
    fn describe(&self) -> String;
}

/// Open the content source selected by the loader options: the archive when
/// one is configured, the plain filesystem otherwise.
pub fn open_source(options: &LoaderOptions) -> Result<Box<dyn ContentSource>, SourceError> {
    match &options.archive {
        Some(archive) => Ok(Box::new(ArchiveSource::open(archive)?)),
        None => Ok(Box::new(FileSystemSource::new())),
    }
}
