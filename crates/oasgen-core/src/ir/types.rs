use std::fmt;

use super::grouping::IrExecutorGroup;
use super::operations::IrOperation;
use super::schemas::IrModel;

/// Generator-ready view of a loaded document: only materialized models,
/// every operation, and the executor groups over those operations.
#[derive(Debug, Clone)]
pub struct IrSpec {
    pub info: IrInfo,
    pub models: Vec<IrModel>,
    pub operations: Vec<IrOperation>,
    pub groups: Vec<IrExecutorGroup>,
}

impl IrSpec {
    pub fn model(&self, name: &str) -> Option<&IrModel> {
        self.models
            .iter()
            .find(|model| model.name().pascal_case == name)
    }
}

/// API metadata.
#[derive(Debug, Clone)]
pub struct IrInfo {
    pub title: String,
    pub description: Option<String>,
    pub version: String,
}

/// A name with multiple casing variants pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
    pub snake_case: String,
    pub screaming_snake: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
