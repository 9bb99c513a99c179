use std::path::PathBuf;

use oasgen_core::config::ExecutorGrouping;
use oasgen_core::load::LoaderOptions;
use oasgen_core::transform::name_normalizer::derive_spec_name;

use crate::{Error, GenerationReport, Oasgen};

/// Generate one application per spec entry of an archive.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub archive: PathBuf,
    /// Each spec is generated into `<output_dir>/<spec name>`.
    pub output_dir: PathBuf,
    /// Each spec gets package `<package_prefix>.<spec name>`.
    pub package_prefix: String,
    /// Entry paths inside the archive, already split (see [`parse_entries`]).
    pub entries: Vec<String>,
    pub language: String,
    pub framework: String,
    pub search_paths: Vec<PathBuf>,
    pub grouping: ExecutorGrouping,
}

impl BatchRequest {
    pub fn new(archive: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            archive: archive.into(),
            output_dir: output_dir.into(),
            package_prefix: "com.example.generated".to_string(),
            entries: Vec::new(),
            language: "java".to_string(),
            framework: "jersey".to_string(),
            search_paths: Vec::new(),
            grouping: ExecutorGrouping::default(),
        }
    }
}

#[derive(Debug)]
pub struct BatchEntryReport {
    pub entry: String,
    pub spec_name: String,
    pub result: Result<GenerationReport, Error>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<BatchEntryReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }
}

/// Normalize raw entry arguments: each may hold several comma separated
/// paths. Surrounding quotes and a leading `/` are stripped, backslashes
/// become `/`, and empty entries are dropped.
pub fn parse_entries<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .flat_map(|arg| arg.as_ref().split(','))
        .map(|entry| {
            let entry = strip_quotes(entry.trim()).replace('\\', "/");
            entry.strip_prefix('/').unwrap_or(&entry).to_string()
        })
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

/// Run every entry in its own session. A failing entry is recorded and the
/// remaining entries still run.
pub fn run_batch(request: &BatchRequest) -> BatchReport {
    let options = LoaderOptions {
        search_paths: request.search_paths.clone(),
        archive: Some(request.archive.clone()),
    };

    let mut report = BatchReport::default();
    for entry in parse_entries(&request.entries) {
        let spec_name = derive_spec_name(&entry);
        let output_dir = request.output_dir.join(&spec_name);
        let package = format!("{}.{spec_name}", request.package_prefix);

        let mut sdk = Oasgen::new(options.clone()).with_grouping(request.grouping);
        let result = sdk.load_spec(&entry).map(|_| ()).and_then(|()| {
            sdk.generate_application(&request.language, &request.framework, &package, &output_dir)
        });
        match &result {
            Ok(generated) => log::info!(
                "generated {entry} -> {} ({} file(s))",
                generated.output_dir.display(),
                generated.files_written
            ),
            Err(err) => log::error!("failed for {entry}: {err}"),
        }
        report.entries.push(BatchEntryReport {
            entry,
            spec_name,
            result,
        });
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entries() {
        assert_eq!(
            parse_entries(&["\"/published/core/v4/api.yaml\""]),
            vec!["published/core/v4/api.yaml"]
        );
        assert_eq!(
            parse_entries(&["a/bundle-openapi.yaml, \\b\\c.yml,,"]),
            vec!["a/bundle-openapi.yaml", "b/c.yml"]
        );
        assert_eq!(
            parse_entries(&["one.yaml", "two.yaml"]),
            vec!["one.yaml", "two.yaml"]
        );
        assert!(parse_entries(&["  ", "\"\""]).is_empty());
    }

    #[test]
    fn test_missing_archive_fails_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = BatchRequest::new(dir.path().join("missing.zip"), dir.path());
        request.entries = vec!["a.yaml,b.yaml".to_string()];

        let report = run_batch(&request);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.entries[1].spec_name, "b");
    }
}
