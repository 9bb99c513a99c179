use std::collections::HashSet;

use indexmap::IndexMap;

use super::operations::IrOperation;
use super::schemas::IrModel;
use super::types::NormalizedName;
use crate::config::ExecutorGrouping;
use crate::transform::name_normalizer::normalize_name;

/// Operations handled by one generated `<Name>BOExecutor`.
#[derive(Debug, Clone)]
pub struct IrExecutorGroup {
    pub name: NormalizedName,
    pub operation_indices: Vec<usize>,
}

/// Group operations according to the configured strategy. Groups appear in
/// order of their first operation.
pub fn group_operations(
    models: &[IrModel],
    operations: &[IrOperation],
    grouping: ExecutorGrouping,
) -> Vec<IrExecutorGroup> {
    if grouping == ExecutorGrouping::Operation {
        let mut taken = HashSet::new();
        return operations
            .iter()
            .enumerate()
            .map(|(i, op)| IrExecutorGroup {
                name: distinct_group_name(&mut taken, &op.name),
                operation_indices: vec![i],
            })
            .collect();
    }

    let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (i, op) in operations.iter().enumerate() {
        let key = match grouping {
            ExecutorGrouping::BusinessObject => business_object(models, op),
            ExecutorGrouping::Tag => tag_or_default(op),
            ExecutorGrouping::Route => extract_path_prefix(&op.path),
            ExecutorGrouping::Operation => op.name.original.clone(),
        };
        groups
            .entry(normalize_name(&key).pascal_case)
            .or_default()
            .push(i);
    }

    groups
        .into_iter()
        .map(|(name, operation_indices)| IrExecutorGroup {
            name: normalize_name(&name),
            operation_indices,
        })
        .collect()
}

/// The model an operation primarily returns. A container is unwrapped to
/// the model it repeats. Falls back to the first tag, then the route.
fn business_object(models: &[IrModel], op: &IrOperation) -> String {
    let returned = op
        .response
        .as_ref()
        .and_then(|response| response.response_type.model_ref())
        .and_then(|name| models.iter().find(|m| m.name().pascal_case == name));
    match returned {
        Some(model) => model.item().unwrap_or(model.name()).pascal_case.clone(),
        None => op
            .tags
            .first()
            .cloned()
            .unwrap_or_else(|| extract_path_prefix(&op.path)),
    }
}

/// Operations derived from different routes can share a name; every
/// per-operation group needs its own class.
fn distinct_group_name(taken: &mut HashSet<String>, name: &NormalizedName) -> NormalizedName {
    if taken.insert(name.pascal_case.clone()) {
        return name.clone();
    }
    let mut suffix = 1;
    loop {
        let candidate = format!("{}{suffix}", name.pascal_case);
        if taken.insert(candidate.clone()) {
            log::warn!(
                "executor name {} is already taken; using {candidate}",
                name.pascal_case
            );
            return NormalizedName {
                original: name.original.clone(),
                pascal_case: candidate,
                camel_case: format!("{}{suffix}", name.camel_case),
                snake_case: format!("{}_{suffix}", name.snake_case),
                screaming_snake: format!("{}_{suffix}", name.screaming_snake),
            };
        }
        suffix += 1;
    }
}

fn tag_or_default(op: &IrOperation) -> String {
    op.tags
        .first()
        .cloned()
        .unwrap_or_else(|| "default".to_string())
}

/// Extract the first meaningful path segment as a group name.
/// e.g. "/pets/{petId}" → "pets", "/store/inventory" → "store"
fn extract_path_prefix(path: &str) -> String {
    path.split('/')
        .find(|s| !s.is_empty() && !s.starts_with('{'))
        .unwrap_or("default")
        .to_string()
}
