use std::collections::{BTreeSet, HashSet};

use minijinja::context;
use oasgen_core::GeneratorError;
use oasgen_core::ir::{IrExecutorGroup, IrOperation, IrSpec, IrType};

use super::{doc_lines, render};
use crate::type_mapper::{collect_imports, escape_identifier, java_type, unique_name};

/// Emit `executor/<Name>BOExecutor.java` for one operation group.
pub fn emit_executor(
    package: &str,
    ir: &IrSpec,
    group: &IrExecutorGroup,
) -> Result<String, GeneratorError> {
    let model_package = format!("{package}.model");
    let mut imports = BTreeSet::new();
    let mut method_names = HashSet::new();

    let operations: Vec<minijinja::Value> = group
        .operation_indices
        .iter()
        .filter_map(|&index| ir.operations.get(index))
        .map(|op| {
            for ty in operation_types(op) {
                collect_imports(ty, Some(&model_package), &mut imports);
            }
            let name = unique_name(&mut method_names, &escape_identifier(&op.name.camel_case));
            operation_ctx(op, name)
        })
        .collect();

    render(
        "executor.java.j2",
        include_str!("../../templates/executor.java.j2"),
        context! {
            package => package,
            imports => imports,
            name => group.name.pascal_case.clone(),
            operations => operations,
        },
    )
}

fn operation_types(op: &IrOperation) -> impl Iterator<Item = &IrType> {
    op.parameters
        .iter()
        .map(|param| &param.param_type)
        .chain(op.request_body.iter().map(|body| &body.body_type))
        .chain(op.response.iter().map(|response| &response.response_type))
}

fn operation_ctx(op: &IrOperation, name: String) -> minijinja::Value {
    let mut param_names = HashSet::new();
    let mut params: Vec<minijinja::Value> = op
        .parameters
        .iter()
        .map(|param| {
            let doc = param.description.clone().unwrap_or_else(|| {
                format!("{} parameter `{}`", param.location.as_str(), param.original_name)
            });
            context! {
                name => unique_name(&mut param_names, &escape_identifier(&param.name.camel_case)),
                java_type => java_type(&param.param_type),
                doc => doc,
            }
        })
        .collect();

    if let Some(body) = &op.request_body {
        params.push(context! {
            name => unique_name(&mut param_names, "body"),
            java_type => java_type(&body.body_type),
            doc => body
                .description
                .clone()
                .unwrap_or_else(|| format!("request body ({})", body.content_type)),
        });
    }

    let (return_type, returns_doc) = match &op.response {
        Some(response) => (
            java_type(&response.response_type),
            Some(
                response
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("the {} response", response.status)),
            ),
        ),
        None => ("void".to_string(), None),
    };

    context! {
        name => name,
        method => op.method.as_str(),
        path => op.path.clone(),
        summary => op.summary.clone(),
        description => doc_lines(op.description.as_deref()),
        params => params,
        return_type => return_type,
        returns_doc => returns_doc,
        deprecated => op.deprecated,
    }
}
