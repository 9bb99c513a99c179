//! The oasgen pipeline behind one handle: load a specification once, then
//! generate any registered target from it.
//!
//! ```no_run
//! use oasgen_sdk::{LoaderOptions, Oasgen};
//!
//! let mut sdk = Oasgen::new(LoaderOptions::default());
//! sdk.load_spec("published/core/v4/api.yaml")?;
//! sdk.generate_application("java", "jersey", "com.acme.content", "generated".as_ref())?;
//! # Ok::<(), oasgen_sdk::Error>(())
//! ```

mod batch;
mod error;
mod registry;

use std::path::{Path, PathBuf};

use oasgen_core::analyze::reachable;
use oasgen_core::config::{ExecutorGrouping, OasgenConfig};
use oasgen_core::document::Document;
use oasgen_core::output::write_files;
use oasgen_core::transform::{TransformOptions, build_ir};
use oasgen_core::{GeneratedFile, GeneratorConfig};

pub use batch::{BatchEntryReport, BatchReport, BatchRequest, parse_entries, run_batch};
pub use error::Error;
pub use oasgen_core::load::LoaderOptions;
pub use oasgen_core::transform::name_normalizer::derive_spec_name;
pub use registry::{generator_for, targets};

/// What one `generate_application` call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    pub files_written: usize,
    pub models: usize,
    pub executors: usize,
}

/// One generation session: loader options plus at most one loaded document.
///
/// Each instance owns its document. Nothing is shared between instances, so
/// separate sessions may run side by side.
#[derive(Debug)]
pub struct Oasgen {
    options: LoaderOptions,
    grouping: ExecutorGrouping,
    document: Option<Document>,
}

impl Oasgen {
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            grouping: ExecutorGrouping::default(),
            document: None,
        }
    }

    pub fn from_config(config: &OasgenConfig) -> Self {
        Self::new(config.loader_options()).with_grouping(config.executor_grouping)
    }

    pub fn with_grouping(mut self, grouping: ExecutorGrouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// Load `path` (a filesystem path, or an entry path when an archive is
    /// configured), replacing any previously loaded document.
    pub fn load_spec(&mut self, path: &str) -> Result<&Document, Error> {
        self.document = None;
        let document = oasgen_core::load::load(path, &self.options)?;
        Ok(self.document.insert(document))
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Render every artifact for the target in memory. Reachability and the
    /// type mapping run afresh on each call.
    pub fn generate_files(
        &self,
        language: &str,
        framework: &str,
        package: &str,
    ) -> Result<Vec<GeneratedFile>, Error> {
        Ok(self.render(language, framework, package)?.files)
    }

    /// Generate and write the application under `output_dir`. Nothing is
    /// written unless every artifact rendered.
    pub fn generate_application(
        &self,
        language: &str,
        framework: &str,
        package: &str,
        output_dir: &Path,
    ) -> Result<GenerationReport, Error> {
        let rendered = self.render(language, framework, package)?;
        let files_written = write_files(output_dir, &rendered.files)?;
        Ok(GenerationReport {
            output_dir: output_dir.to_path_buf(),
            files_written,
            models: rendered.models,
            executors: rendered.executors,
        })
    }

    fn render(&self, language: &str, framework: &str, package: &str) -> Result<Rendered, Error> {
        let document = self.document.as_ref().ok_or(Error::NoSpecLoaded)?;
        validate_package(package)?;
        let generator = generator_for(language, framework)?;

        let reachable = reachable(document);
        let ir = build_ir(
            document,
            &reachable,
            &TransformOptions {
                grouping: self.grouping,
            },
        )?;
        let files = generator.generate(
            &ir,
            &GeneratorConfig {
                package: package.to_string(),
            },
        )?;
        log::info!(
            "{}: {} model(s), {} executor(s), {} file(s)",
            generator.target(),
            ir.models.len(),
            ir.groups.len(),
            files.len()
        );
        Ok(Rendered {
            files,
            models: ir.models.len(),
            executors: ir.groups.len(),
        })
    }
}

struct Rendered {
    files: Vec<GeneratedFile>,
    models: usize,
    executors: usize,
}

/// A dotted package of Java-style identifiers, e.g. `com.acme.content`.
fn validate_package(package: &str) -> Result<(), Error> {
    let valid = !package.is_empty()
        && package.split('.').all(|segment| {
            segment
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if valid {
        Ok(())
    } else {
        Err(Error::Config(format!("invalid package name '{package}'")))
    }
}
