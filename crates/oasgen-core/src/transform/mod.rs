//! Type mapping: from a loaded [`Document`] and its reachable schemas to the
//! generator-facing IR.

pub mod name_normalizer;
pub mod type_mapper;

pub use type_mapper::TypeMapper;

use crate::analyze::ReachableSet;
use crate::config::ExecutorGrouping;
use crate::document::Document;
use crate::error::TransformError;
use crate::ir::{IrInfo, IrSpec, group_operations};

/// Options controlling the transform phase.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    pub grouping: ExecutorGrouping,
}

/// Build the IR. Fails on the first schema the mapper cannot represent.
pub fn build_ir(
    document: &Document,
    reachable: &ReachableSet,
    options: &TransformOptions,
) -> Result<IrSpec, TransformError> {
    let mapper = TypeMapper::new(document, reachable);
    let models = mapper.models()?;
    let operations = mapper.operations()?;
    let groups = group_operations(&models, &operations, options.grouping);

    log::debug!(
        "{} model(s), {} operation(s), {} executor group(s)",
        models.len(),
        operations.len(),
        groups.len()
    );

    Ok(IrSpec {
        info: IrInfo {
            title: document.info.title.clone(),
            description: document.info.description.clone(),
            version: document.info.version.clone(),
        },
        models,
        operations,
        groups,
    })
}
