use std::fs;
use std::path::Path;

use crate::GeneratedFile;
use crate::error::WriteError;

/// Write generated files under `base`, one at a time, creating directories
/// as needed. Not transactional: a failure leaves earlier files in place.
pub fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<usize, WriteError> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }
        fs::write(&path, &file.content).map_err(|source| WriteError::Write {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("wrote {}", path.display());
    }
    log::info!("wrote {} file(s) under {}", files.len(), base.display());
    Ok(files.len())
}
