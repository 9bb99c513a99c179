use std::fs;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use oasgen_sdk::{BatchRequest, Error, LoaderOptions, Oasgen, run_batch};

const ARTICLES: &str = include_str!("fixtures/articles.yaml");
const KNOWLEDGE_PORTAL: &str = include_str!("fixtures/bundle-openapi-knowledge-portal.yaml");
const PORTAL_MODELS: &str = include_str!("fixtures/portal.yaml");

fn write_spec(dir: &Path, content: &str) -> String {
    let path = dir.join("test-spec.yaml");
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

fn relative_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                let relative = path.strip_prefix(root).unwrap();
                files.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }
    }
    files.sort();
    files
}

#[test]
fn test_generate_application_writes_layout() {
    let dir = tempfile::tempdir().unwrap();
    let spec = write_spec(dir.path(), ARTICLES);
    let out = dir.path().join("generated-sdk");

    let mut sdk = Oasgen::new(LoaderOptions::default());
    sdk.load_spec(&spec).unwrap();
    let report = sdk
        .generate_application("java", "jersey", "com.test.api", &out)
        .unwrap();

    assert_eq!(report.models, 4);
    assert_eq!(report.executors, 2);
    assert_eq!(report.files_written, 8);
    insta::assert_snapshot!(relative_files(&out).join("\n"), @r"
    src/main/java/com/test/api/executor/ArticleTypeInfoBOExecutor.java
    src/main/java/com/test/api/executor/ItemBOExecutor.java
    src/main/java/com/test/api/model/ArticleTypeInfo.java
    src/main/java/com/test/api/model/ArticleTypes.java
    src/main/java/com/test/api/model/Item.java
    src/main/java/com/test/api/model/Items.java
    src/main/java/com/test/api/model/JAXBBean.java
    src/main/java/com/test/api/model/ObjectFactory.java
    ");

    let article_types =
        fs::read_to_string(out.join("src/main/java/com/test/api/model/ArticleTypes.java")).unwrap();
    assert!(article_types.contains("private List<ArticleTypeInfo> items"));
}

#[test]
fn test_document_is_reused_across_targets() {
    let dir = tempfile::tempdir().unwrap();
    let spec = write_spec(dir.path(), ARTICLES);

    let mut sdk = Oasgen::new(LoaderOptions::default());
    sdk.load_spec(&spec).unwrap();
    let first = sdk.generate_files("java", "jersey", "com.first").unwrap();
    let second = sdk.generate_files("java", "jersey", "com.second").unwrap();

    assert_eq!(first.len(), second.len());
    assert!(first[0].path.starts_with("src/main/java/com/first/"));
    assert!(second[0].path.starts_with("src/main/java/com/second/"));
    assert_eq!(sdk.document().unwrap().info.title, "Test API");
}

#[test]
fn test_unsupported_target_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let spec = write_spec(dir.path(), ARTICLES);
    let out = dir.path().join("out");

    let mut sdk = Oasgen::new(LoaderOptions::default());
    sdk.load_spec(&spec).unwrap();
    let err = sdk
        .generate_application("kotlin", "ktor", "com.test.api", &out)
        .unwrap_err();
    assert!(matches!(err, Error::Generate(_)));
    assert!(!out.exists());
}

#[test]
fn test_invalid_package_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let spec = write_spec(dir.path(), ARTICLES);

    let mut sdk = Oasgen::new(LoaderOptions::default());
    sdk.load_spec(&spec).unwrap();
    let err = sdk.generate_files("java", "jersey", "com.test-api").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_failed_load_clears_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let spec = write_spec(dir.path(), ARTICLES);

    let mut sdk = Oasgen::new(LoaderOptions::default());
    sdk.load_spec(&spec).unwrap();
    let missing = dir.path().join("missing.yaml");
    let err = sdk.load_spec(&missing.to_string_lossy()).unwrap_err();
    assert!(matches!(err, Error::Load(_)));
    assert!(sdk.document().is_none());
}

fn tar_gz(files: &[(&str, &str)]) -> Vec<u8> {
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

#[test]
fn test_batch_over_archive() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("platform-api-interfaces.tar.gz");
    fs::write(
        &archive,
        tar_gz(&[
            ("published/core/v4/api.yaml", ARTICLES),
            (
                "published/portal/bundle-openapi-knowledge-portal.yaml",
                KNOWLEDGE_PORTAL,
            ),
            ("published/models/portal.yaml", PORTAL_MODELS),
        ]),
    )
    .unwrap();

    let out = dir.path().join("generated");
    let mut request = BatchRequest::new(&archive, &out);
    request.package_prefix = "egain.ws.oas.generated".to_string();
    request.entries = vec![
        "\"/published/core/v4/api.yaml\",published/portal/bundle-openapi-knowledge-portal.yaml"
            .to_string(),
        "published/missing.yaml".to_string(),
    ];

    let report = run_batch(&request);
    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);

    let names: Vec<&str> = report.entries.iter().map(|e| e.spec_name.as_str()).collect();
    assert_eq!(names, vec!["api", "knowledge_portal", "missing"]);
    assert!(matches!(report.entries[2].result, Err(Error::Load(_))));

    assert!(out
        .join("api/src/main/java/egain/ws/oas/generated/api/model/ArticleTypes.java")
        .is_file());
    let portal = out.join("knowledge_portal/src/main/java/egain/ws/oas/generated/knowledge_portal");
    assert!(portal.join("model/Portals.java").is_file());
    assert!(portal.join("model/Portal.java").is_file());
    assert!(portal.join("executor/PortalBOExecutor.java").is_file());
}

fn zip_bundle(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, content) in files {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        std::io::Write::write_all(&mut writer, content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn test_batch_over_zip_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("platform-api-interfaces.zip");
    fs::write(
        &archive,
        zip_bundle(&[
            (
                "published/portal/bundle-openapi-knowledge-portal.yaml",
                KNOWLEDGE_PORTAL,
            ),
            ("published/models/portal.yaml", PORTAL_MODELS),
        ]),
    )
    .unwrap();

    let out = dir.path().join("generated");
    let mut request = BatchRequest::new(&archive, &out);
    request.entries = vec!["published\\portal\\bundle-openapi-knowledge-portal.yaml".to_string()];

    let report = run_batch(&request);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 0);
    let portal = out.join("knowledge_portal/src/main/java/com/example/generated/knowledge_portal");
    assert!(portal.join("model/Portals.java").is_file());
    assert!(portal.join("executor/PortalBOExecutor.java").is_file());
}
