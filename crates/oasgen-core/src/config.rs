use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::load::LoaderOptions;

/// Top-level project configuration loaded from `.oasgen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OasgenConfig {
    pub input: String,
    pub output: String,
    /// Dotted Java package for generated sources.
    pub package: String,
    pub target: TargetConfig,
    /// Consulted in order when a reference does not resolve next to its fragment.
    pub search_paths: Vec<PathBuf>,
    /// Read fragments from this archive instead of the filesystem.
    pub spec_archive: Option<PathBuf>,
    pub executor_grouping: ExecutorGrouping,
}

impl Default for OasgenConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: "generated".to_string(),
            package: "com.example.api".to_string(),
            target: TargetConfig::default(),
            search_paths: Vec::new(),
            spec_archive: None,
            executor_grouping: ExecutorGrouping::default(),
        }
    }
}

impl OasgenConfig {
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            search_paths: self.search_paths.clone(),
            archive: self.spec_archive.clone(),
        }
    }
}

/// Target language and framework tags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub language: String,
    pub framework: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            language: "java".to_string(),
            framework: "jersey".to_string(),
        }
    }
}

/// How operations are grouped into executor stubs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorGrouping {
    /// By the model the operation primarily returns.
    #[default]
    BusinessObject,
    /// By first tag.
    Tag,
    /// By first literal path segment.
    Route,
    /// One executor per operation.
    Operation,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oasgen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OasgenConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: OasgenConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oasgen configuration
input: openapi.yaml
output: generated
package: com.example.api

target:
  language: java
  framework: jersey

# Directories searched, in order, for fragments that do not resolve
# relative to the file that references them.
search_paths: []
  # - ../shared-models

# Load every fragment from a .zip, .tar or .tar.gz bundle instead of the filesystem.
# spec_archive: specs.tar.gz

executor_grouping: business_object  # business_object | tag | route | operation
"#
}
