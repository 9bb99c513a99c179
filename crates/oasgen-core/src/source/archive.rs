use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use indexmap::IndexMap;
use tar::Archive;
use zip::ZipArchive;

use super::ContentSource;
use crate::error::SourceError;
use crate::path::{self, PathFlavor};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
/// Local file header, or the end-of-directory record of an empty zip.
const ZIP_MAGIC: [&[u8]; 2] = [b"PK\x03\x04", b"PK\x05\x06"];

/// Content source backed by the entries of a `.zip`, `.tar` or `.tar.gz` archive.
///
/// Entries are indexed once when the archive is opened; the index is
/// released when the source is dropped.
#[derive(Debug)]
pub struct ArchiveSource {
    location: String,
    entries: IndexMap<String, Vec<u8>>,
}

impl ArchiveSource {
    /// Open an archive on disk. The format is detected from the content.
    pub fn open(archive: &Path) -> Result<Self, SourceError> {
        let location = path::canonicalize_path(archive, PathFlavor::FileSystem);
        let bytes = fs::read(archive).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => SourceError::NotFound {
                path: location.clone(),
            },
            _ => SourceError::Io {
                path: location.clone(),
                source: err,
            },
        })?;
        Self::from_bytes(&location, &bytes)
    }

    /// Index an in-memory archive. `location` is used for diagnostics only.
    pub fn from_bytes(location: &str, bytes: &[u8]) -> Result<Self, SourceError> {
        let entries = if ZIP_MAGIC.iter().any(|magic| bytes.starts_with(magic)) {
            index_zip_entries(location, bytes)?
        } else if bytes.starts_with(&GZIP_MAGIC) {
            index_tar_entries(location, GzDecoder::new(bytes))?
        } else {
            index_tar_entries(location, bytes)?
        };
        log::debug!("opened archive {location} with {} entries", entries.len());
        Ok(Self {
            location: location.to_string(),
            entries,
        })
    }

    /// Canonical names of every file entry, in archive order.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

fn index_tar_entries<R: Read>(
    location: &str,
    reader: R,
) -> Result<IndexMap<String, Vec<u8>>, SourceError> {
    let archive_error = |err: std::io::Error| SourceError::Archive {
        path: location.to_string(),
        message: err.to_string(),
    };

    let mut archive = Archive::new(reader);
    let mut entries = IndexMap::new();
    for entry in archive.entries().map_err(archive_error)? {
        let mut entry = entry.map_err(archive_error)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let name = entry.path().map_err(archive_error)?.to_string_lossy().into_owned();
        let key = path::canonicalize(Some(&name), PathFlavor::Archive).unwrap_or_default();
        let mut content = Vec::new();
        entry.read_to_end(&mut content).map_err(archive_error)?;
        entries.insert(key, content);
    }
    Ok(entries)
}

fn index_zip_entries(
    location: &str,
    bytes: &[u8],
) -> Result<IndexMap<String, Vec<u8>>, SourceError> {
    let archive_error = |message: String| SourceError::Archive {
        path: location.to_string(),
        message,
    };

    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|err| archive_error(err.to_string()))?;
    let mut entries = IndexMap::new();
    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|err| archive_error(err.to_string()))?;
        if file.is_dir() {
            continue;
        }
        let key = path::canonicalize(Some(file.name()), PathFlavor::Archive).unwrap_or_default();
        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|err| archive_error(err.to_string()))?;
        entries.insert(key, content);
    }
    Ok(entries)
}

impl ContentSource for ArchiveSource {
    fn exists(&self, path: &str) -> bool {
        self.entries.contains_key(&self.canonicalize(path))
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, SourceError> {
        let key = self.canonicalize(path);
        self.entries
            .get(&key)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                path: format!("{}!/{key}", self.location),
            })
    }

    fn canonicalize(&self, path: &str) -> String {
        path::canonicalize(Some(path), PathFlavor::Archive).unwrap_or_default()
    }

    fn describe(&self) -> String {
        format!("archive {}", self.location)
    }
}

impl Drop for ArchiveSource {
    fn drop(&mut self) {
        log::debug!("releasing archive {}", self.location);
    }
}
