#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

pub const CONTENT_API: &str = include_str!("../fixtures/content/api.yaml");
pub const ARTICLE_TYPES: &str = include_str!("../fixtures/content/models/article-types.yaml");
pub const ERRORS: &str = include_str!("../fixtures/common/errors.yaml");
pub const CYCLE: &str = include_str!("../fixtures/cycle.yaml");
pub const POLYMORPHIC: &str = include_str!("../fixtures/polymorphic.yaml");

/// Relative layout of the multi-file content spec. `errors.yaml` is not
/// next to `api.yaml`; it is only found through the `common` search path.
pub const CONTENT_FILES: [(&str, &str); 3] = [
    ("content/api.yaml", CONTENT_API),
    ("content/models/article-types.yaml", ARTICLE_TYPES),
    ("common/errors.yaml", ERRORS),
];

pub fn write_tree(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

/// The content spec on disk, plus its root and the `common` search path.
pub fn content_on_disk() -> (TempDir, String, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), &CONTENT_FILES);
    let root = dir.path().join("content/api.yaml").to_string_lossy().into_owned();
    let common = dir.path().join("common");
    (dir, root, common)
}

pub fn tar_gz(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .unwrap();
    }
    let tar = builder.into_inner().unwrap();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    std::io::Write::write_all(&mut encoder, &tar).unwrap();
    encoder.finish().unwrap()
}

pub fn single_file(content: &str) -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("openapi.yaml");
    fs::write(&path, content).unwrap();
    (dir, path.to_string_lossy().into_owned())
}
