//! Canonical forward-slash paths used as fragment cache keys.
//!
//! Normalisation is purely lexical so the same logical location yields the
//! same key on every host, including Windows-style inputs such as
//! `E:\specs\api.yaml` processed on Unix.

use std::path::Path;

/// The namespace a path lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathFlavor {
    /// Plain filesystem; canonical paths are absolute.
    FileSystem,
    /// Entry names inside an archive; canonical paths never start with `/`.
    Archive,
}

/// Convert any path string to Unix style: forward slashes, no null bytes,
/// trimmed, with `.` and `..` segments resolved. Relative paths stay relative.
pub fn to_unix_path(path: Option<&str>) -> Option<String> {
    let cleaned = clean(path?);
    Some(normalize(&cleaned))
}

/// Canonicalize a path string for the given flavor.
///
/// `None` stays `None`; empty or whitespace-only input yields `""`.
pub fn canonicalize(path: Option<&str>, flavor: PathFlavor) -> Option<String> {
    let cleaned = clean(path?);
    if cleaned.is_empty() {
        return Some(String::new());
    }
    let canonical = match flavor {
        PathFlavor::FileSystem => {
            let normalized = normalize(&cleaned);
            if is_absolute(&normalized) {
                normalized
            } else {
                absolutize(&normalized)
            }
        }
        PathFlavor::Archive => {
            let stripped = cleaned.strip_prefix('/').unwrap_or(&cleaned);
            let rooted = normalize(&format!("/{stripped}"));
            rooted.trim_start_matches('/').trim().to_string()
        }
    };
    Some(canonical)
}

/// Canonicalize a path handle.
pub fn canonicalize_path(path: &Path, flavor: PathFlavor) -> String {
    canonicalize(Some(&path.to_string_lossy()), flavor).unwrap_or_default()
}

/// Whether a (cleaned) path is rooted: a leading `/` or a drive prefix like `E:/`.
pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || drive_prefix_len(path).is_some()
}

/// The directory portion of a canonical location, including the trailing `/`.
///
/// `"/specs/api.yaml"` → `"/specs/"`, `"api.yaml"` → `""`.
pub fn parent_dir(location: &str) -> &str {
    match location.rfind('/') {
        Some(idx) => &location[..=idx],
        None => "",
    }
}

/// Join a reference onto a directory produced by [`parent_dir`]. Rooted
/// references replace the base entirely.
pub fn join(dir: &str, reference: &str) -> String {
    let reference = reference.replace('\\', "/");
    if is_absolute(&reference) || dir.is_empty() {
        return reference;
    }
    if dir.ends_with('/') {
        format!("{dir}{reference}")
    } else {
        format!("{dir}/{reference}")
    }
}

/// The final segment of a path without its extension.
pub fn file_stem(location: &str) -> &str {
    let name = location.rsplit('/').next().unwrap_or(location);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

fn clean(path: &str) -> String {
    path.replace('\0', "").trim().replace('\\', "/")
}

fn drive_prefix_len(path: &str) -> Option<usize> {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        match bytes.get(2) {
            Some(b'/') => Some(3),
            None => Some(2),
            _ => None,
        }
    } else {
        None
    }
}

fn normalize(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }

    let (root, rest) = if let Some(len) = drive_prefix_len(path) {
        let drive = &path[..2];
        (format!("{drive}/"), &path[len.min(path.len())..])
    } else if path.starts_with('/') {
        ("/".to_string(), path.trim_start_matches('/'))
    } else {
        (String::new(), path)
    };
    let rooted = !root.is_empty();

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment.trim() {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            _ => segments.push(segment),
        }
    }

    // Segments keep inner whitespace; only the edges of the whole path are trimmed.
    format!("{root}{}", segments.join("/")).trim().to_string()
}

fn absolutize(relative: &str) -> String {
    match std::env::current_dir() {
        Ok(cwd) => {
            let base = clean(&cwd.to_string_lossy());
            normalize(&join(&base, relative))
        }
        Err(err) => {
            log::warn!("cannot resolve working directory, keeping {relative} relative: {err}");
            relative.to_string()
        }
    }
}
