//! Spec loading: read the root fragment and every fragment it references,
//! and merge them into one [`Document`].

mod session;

pub use session::LoadSession;

use std::path::PathBuf;

use crate::document::Document;
use crate::error::LoadError;
use crate::source::open_source;

/// Loader-facing configuration.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Directories consulted, in order, when a file reference does not
    /// resolve relative to the referencing fragment.
    pub search_paths: Vec<PathBuf>,
    /// Read every fragment from this archive instead of the filesystem.
    pub archive: Option<PathBuf>,
}

/// Load the specification rooted at `root`.
///
/// The session (fragment cache and any opened archive) is dropped before
/// this returns, whether loading succeeded or not.
pub fn load(root: &str, options: &LoaderOptions) -> Result<Document, LoadError> {
    let source = open_source(options)?;
    let search_paths = options
        .search_paths
        .iter()
        .map(|dir| dir.to_string_lossy().into_owned())
        .collect();
    LoadSession::new(source, search_paths).load(root)
}
