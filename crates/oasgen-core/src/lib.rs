pub mod analyze;
pub mod config;
pub mod document;
pub mod error;
pub mod ir;
pub mod load;
pub mod output;
pub mod parse;
pub mod path;
pub mod source;
pub mod transform;

use std::fmt;

pub use error::GeneratorError;

/// A generated file with path (relative to the output root) and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Language and framework tags a generator answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId {
    pub language: &'static str,
    pub framework: &'static str,
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.language, self.framework)
    }
}

/// Settings shared by every generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Dotted package identifier, e.g. `com.acme.content`.
    pub package: String,
}

/// Trait for code generators that produce files from an IR spec.
pub trait CodeGenerator {
    fn target(&self) -> TargetId;

    fn generate(
        &self,
        ir: &ir::IrSpec,
        config: &GeneratorConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError>;
}
