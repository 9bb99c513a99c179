use std::collections::{BTreeSet, HashSet};

use minijinja::context;
use oasgen_core::GeneratorError;
use oasgen_core::ir::{IrContainerModel, IrField, IrObjectModel, IrType};

use super::{doc_lines, render};
use crate::type_mapper::{
    accessor_suffix, collect_imports, enum_values, escape_identifier, java_type, unique_name,
};

const MODEL_IMPORTS: &[&str] = &[
    "java.io.Serializable",
    "java.util.LinkedHashSet",
    "java.util.Objects",
    "java.util.Set",
    "javax.xml.bind.annotation.XmlAccessType",
    "javax.xml.bind.annotation.XmlAccessorType",
    "javax.xml.bind.annotation.XmlElement",
    "javax.xml.bind.annotation.XmlRootElement",
];

/// One Java field on an object model.
struct JavaField {
    name: String,
    accessor: String,
    xml_name: String,
    java_type: String,
    required: bool,
    doc: Vec<String>,
    binary: bool,
}

impl JavaField {
    fn equality(&self) -> String {
        if self.binary {
            format!("Arrays.equals({0}, other.{0})", self.name)
        } else {
            format!("Objects.equals({0}, other.{0})", self.name)
        }
    }

    fn display(&self) -> String {
        if self.binary {
            format!("Arrays.toString({})", self.name)
        } else {
            self.name.clone()
        }
    }
}

fn java_fields(model: &IrObjectModel) -> Vec<JavaField> {
    let mut names = HashSet::new();
    let mut accessors = HashSet::new();
    model
        .fields
        .iter()
        .map(|field| JavaField {
            name: unique_name(&mut names, &escape_identifier(&field.name.camel_case)),
            accessor: unique_name(&mut accessors, &accessor_suffix(&field.name.pascal_case)),
            xml_name: field.original_name.clone(),
            java_type: java_type(&field.field_type),
            required: field.required,
            doc: field_doc(field),
            binary: field.field_type == IrType::Binary,
        })
        .collect()
}

fn field_doc(field: &IrField) -> Vec<String> {
    let mut doc = doc_lines(field.description.as_deref());
    if let Some(values) = enum_values(&field.field_type) {
        if !doc.is_empty() {
            doc.push(String::new());
        }
        doc.push(format!("Allowed values: {}.", values.join(", ")));
    }
    doc
}

/// Emit `model/<Name>.java` for an object model.
pub fn emit_object_model(package: &str, model: &IrObjectModel) -> Result<String, GeneratorError> {
    let fields = java_fields(model);

    let mut imports: BTreeSet<String> = MODEL_IMPORTS.iter().map(|i| i.to_string()).collect();
    for field in &model.fields {
        collect_imports(&field.field_type, None, &mut imports);
    }
    if fields.iter().any(|f| f.binary) {
        imports.insert("java.util.Arrays".to_string());
    }

    let equality = fields
        .iter()
        .map(JavaField::equality)
        .collect::<Vec<_>>()
        .join("\n                && ");
    let has_generic_fields = fields.iter().any(|f| f.java_type.contains('<'));

    let fields_ctx: Vec<minijinja::Value> = fields
        .iter()
        .map(|f| {
            context! {
                name => f.name.clone(),
                accessor => f.accessor.clone(),
                xml_name => f.xml_name.clone(),
                java_type => f.java_type.clone(),
                required => f.required,
                doc => f.doc.clone(),
                display => f.display(),
            }
        })
        .collect();

    render(
        "model.java.j2",
        include_str!("../../templates/model.java.j2"),
        context! {
            package => package,
            imports => imports,
            name => model.name.pascal_case.clone(),
            description => doc_lines(model.description.as_deref()),
            fields => fields_ctx,
            equality => equality,
            has_generic_fields => has_generic_fields,
        },
    )
}

/// Emit `model/<Name>.java` for a container model: one wrapped, repeating
/// `items` element of the item model.
pub fn emit_container_model(
    package: &str,
    model: &IrContainerModel,
) -> Result<String, GeneratorError> {
    let mut imports: BTreeSet<String> = MODEL_IMPORTS.iter().map(|i| i.to_string()).collect();
    imports.insert("java.util.ArrayList".to_string());
    imports.insert("java.util.List".to_string());
    imports.insert("javax.xml.bind.annotation.XmlElementWrapper".to_string());

    render(
        "container.java.j2",
        include_str!("../../templates/container.java.j2"),
        context! {
            package => package,
            imports => imports,
            name => model.name.pascal_case.clone(),
            description => doc_lines(model.description.as_deref()),
            item => model.item.pascal_case.clone(),
            min_items => model.min_items,
            max_items => model.max_items,
        },
    )
}
