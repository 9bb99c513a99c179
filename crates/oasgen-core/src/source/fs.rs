use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::ContentSource;
use crate::error::SourceError;
use crate::path::{self, PathFlavor};

/// Content source backed by the plain filesystem.
#[derive(Debug, Clone, Default)]
pub struct FileSystemSource;

impl FileSystemSource {
    pub fn new() -> Self {
        Self
    }
}

impl ContentSource for FileSystemSource {
    fn exists(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, SourceError> {
        fs::read(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => SourceError::NotFound {
                path: path.to_string(),
            },
            _ => SourceError::Io {
                path: path.to_string(),
                source: err,
            },
        })
    }

    fn canonicalize(&self, path: &str) -> String {
        path::canonicalize(Some(path), PathFlavor::FileSystem).unwrap_or_default()
    }

    fn describe(&self) -> String {
        "filesystem".to_string()
    }
}
