use std::collections::HashSet;

use indexmap::IndexMap;

use crate::analyze::ReachableSet;
use crate::document::{
    Document, NamedSchema, Operation, PrimitiveKind, RequestBody, Response, Schema, SchemaId,
};
use crate::error::TransformError;
use crate::ir::{
    IrContainerModel, IrField, IrModel, IrObjectModel, IrOperation, IrParameter, IrRequestBody,
    IrResponse, IrType, NormalizedName,
};

use super::name_normalizer::{normalize_name, route_to_name};

/// Decides which reachable schemas become models and maps every schema use
/// onto an [`IrType`].
pub struct TypeMapper<'a> {
    document: &'a Document,
    materialized: IndexMap<SchemaId, NormalizedName>,
}

impl<'a> TypeMapper<'a> {
    /// Materialize every reachable object, and every reachable array whose
    /// items reference an object. Order follows the schema table.
    pub fn new(document: &'a Document, reachable: &ReachableSet) -> Self {
        let mut materialized = IndexMap::new();
        let mut taken: HashSet<String> = HashSet::new();

        for named in document.components.schemas.iter() {
            if !reachable.contains(named.id) {
                continue;
            }
            if !is_materialized(document, &named.schema) {
                log::debug!("{} is inlined at its use sites", named.name);
                continue;
            }
            let mut name = normalize_name(&named.name);
            let mut suffix = 1;
            while !taken.insert(name.pascal_case.clone()) {
                let candidate = format!("{}{suffix}", normalize_name(&named.name).pascal_case);
                log::warn!("model name {} is already taken; using {candidate}", name.pascal_case);
                name = normalize_name(&candidate);
                suffix += 1;
            }
            materialized.insert(named.id, name);
        }

        Self {
            document,
            materialized,
        }
    }

    pub fn models(&self) -> Result<Vec<IrModel>, TransformError> {
        self.materialized
            .iter()
            .map(|(id, name)| self.model(self.document.schema(*id), name))
            .collect()
    }

    fn model(&self, named: &NamedSchema, name: &NormalizedName) -> Result<IrModel, TransformError> {
        match &named.schema {
            Schema::Object(object) => {
                let mut fields = Vec::with_capacity(object.properties.len());
                for (property, definition) in &object.properties {
                    let context = format!("{}.{property}", named.name);
                    fields.push(IrField {
                        name: normalize_name(property),
                        original_name: property.clone(),
                        field_type: self.type_of(&definition.schema, &context)?,
                        required: object.required.contains(property),
                        description: definition
                            .description
                            .clone()
                            .or_else(|| self.referenced_description(&definition.schema)),
                    });
                }
                Ok(IrModel::Object(IrObjectModel {
                    name: name.clone(),
                    description: named.description.clone(),
                    fields,
                }))
            }
            Schema::Array(array) => {
                let item = match array.items.as_ref() {
                    Schema::Reference(id) => self.materialized.get(id),
                    _ => None,
                };
                let item = item.ok_or_else(|| TransformError::UnsupportedSchema {
                    schema: named.name.clone(),
                    reason: "array items do not reference an object model".to_string(),
                })?;
                Ok(IrModel::Container(IrContainerModel {
                    name: name.clone(),
                    description: named.description.clone(),
                    item: item.clone(),
                    min_items: array.min_items,
                    max_items: array.max_items,
                }))
            }
            _ => Err(TransformError::UnsupportedSchema {
                schema: named.name.clone(),
                reason: "only objects and arrays of objects are materialized".to_string(),
            }),
        }
    }

    /// Map a schema use onto a field type. `context` names the use site in errors.
    pub fn type_of(&self, schema: &Schema, context: &str) -> Result<IrType, TransformError> {
        self.type_of_inner(schema, context, &mut Vec::new())
    }

    fn type_of_inner(
        &self,
        schema: &Schema,
        context: &str,
        inlining: &mut Vec<SchemaId>,
    ) -> Result<IrType, TransformError> {
        match schema {
            Schema::Reference(id) => {
                if let Some(name) = self.materialized.get(id) {
                    return Ok(IrType::Ref(name.pascal_case.clone()));
                }
                if inlining.contains(id) {
                    return Err(unsupported(context, "recursive schema that is not an object"));
                }
                inlining.push(*id);
                let inlined = self.type_of_inner(&self.document.schema(*id).schema, context, inlining);
                inlining.pop();
                inlined
            }
            Schema::Primitive { kind, format, .. } => Ok(primitive_type(*kind, format.as_deref())),
            Schema::Enum(enumeration) => Ok(IrType::Enum {
                base: Box::new(primitive_type(enumeration.kind, None)),
                values: enumeration.values.iter().map(enum_literal).collect(),
            }),
            Schema::Object(object) => {
                if !object.properties.is_empty() {
                    log::debug!("inline object at {context} is mapped to a free-form value");
                }
                Ok(IrType::Any)
            }
            Schema::Array(array) => Ok(IrType::List(Box::new(
                self.type_of_inner(&array.items, context, inlining)?,
            ))),
            Schema::Map(values) => Ok(IrType::Map(Box::new(
                self.type_of_inner(values, context, inlining)?,
            ))),
            Schema::Any => Ok(IrType::Any),
            Schema::Composite(composite) => match composite.parts.as_slice() {
                [single] => self.type_of_inner(single, context, inlining),
                parts => Err(unsupported(
                    context,
                    &format!("{:?} with {} parts", composite.kind, parts.len()),
                )),
            },
        }
    }

    fn referenced_description(&self, schema: &Schema) -> Option<String> {
        match schema {
            Schema::Reference(id) => self.document.schema(*id).description.clone(),
            _ => None,
        }
    }

    pub fn operations(&self) -> Result<Vec<IrOperation>, TransformError> {
        self.document
            .operations()
            .map(|op| self.operation(op))
            .collect()
    }

    fn operation(&self, op: &Operation) -> Result<IrOperation, TransformError> {
        let name = match &op.operation_id {
            Some(id) => normalize_name(id),
            None => normalize_name(&route_to_name(op.method.as_str(), &op.path)),
        };
        let context = format!("{} {}", op.method, op.path);

        let parameters = op
            .parameters
            .iter()
            .map(|param| IrParameter {
                name: normalize_name(&param.name),
                original_name: param.name.clone(),
                location: param.location,
                param_type: param
                    .schema
                    .as_ref()
                    .map(|schema| self.lenient_type_of(schema, &context))
                    .unwrap_or(IrType::String),
                required: param.required,
                description: param.description.clone(),
            })
            .collect();

        let request_body = op
            .request_body
            .as_ref()
            .and_then(|body| self.request_body(body, &context));

        Ok(IrOperation {
            name,
            method: op.method,
            path: op.path.clone(),
            summary: op.summary.clone(),
            description: op.description.clone(),
            tags: op.tags.clone(),
            parameters,
            request_body,
            response: self.primary_response(op, &context)?,
            deprecated: op.deprecated,
        })
    }

    /// First 2xx response with content, else `default`. Response types are
    /// mapped strictly: they are the surface models are generated for.
    fn primary_response(
        &self,
        op: &Operation,
        context: &str,
    ) -> Result<Option<IrResponse>, TransformError> {
        let document = self.document;
        let primary = op
            .responses
            .keys()
            .filter(|status| status.starts_with('2'))
            .find_map(|status| response_with_content(document, op, status))
            .or_else(|| response_with_content(document, op, "default"));

        let Some((status, response)) = primary else {
            return Ok(None);
        };
        let Some(schema) = preferred_content(&response.content) else {
            return Ok(None);
        };
        Ok(Some(IrResponse {
            status: status.clone(),
            response_type: self.type_of(schema, context)?,
            description: Some(response.description.clone()).filter(|d| !d.is_empty()),
        }))
    }

    fn request_body(&self, body: &RequestBody, context: &str) -> Option<IrRequestBody> {
        let content_type = body
            .content
            .keys()
            .find(|media| media.contains("json"))
            .or_else(|| body.content.keys().next())?;
        Some(IrRequestBody {
            body_type: self.lenient_type_of(&body.content[content_type], context),
            required: body.required,
            content_type: content_type.clone(),
            description: body.description.clone(),
        })
    }

    /// Request-side types never abort generation; unmappable shapes become `Any`.
    fn lenient_type_of(&self, schema: &Schema, context: &str) -> IrType {
        self.type_of(schema, context).unwrap_or_else(|err| {
            log::debug!("{err}; using a free-form value");
            IrType::Any
        })
    }
}

fn response_with_content<'d>(
    document: &'d Document,
    op: &'d Operation,
    status: &str,
) -> Option<(&'d String, &'d Response)> {
    let (key, slot) = op.responses.get_key_value(status)?;
    let response = document.response(slot);
    (!response.content.is_empty()).then_some((key, response))
}

fn is_materialized(document: &Document, schema: &Schema) -> bool {
    match schema {
        Schema::Object(_) => true,
        Schema::Array(array) => match array.items.as_ref() {
            Schema::Reference(id) => matches!(document.schema(*id).schema, Schema::Object(_)),
            _ => false,
        },
        _ => false,
    }
}

fn preferred_content(content: &IndexMap<String, Schema>) -> Option<&Schema> {
    content
        .iter()
        .find(|(media, _)| media.contains("json"))
        .or_else(|| content.first())
        .map(|(_, schema)| schema)
}

fn primitive_type(kind: PrimitiveKind, format: Option<&str>) -> IrType {
    match (kind, format) {
        (PrimitiveKind::String, Some("date")) => IrType::Date,
        (PrimitiveKind::String, Some("date-time")) => IrType::DateTime,
        (PrimitiveKind::String, Some("binary" | "byte")) => IrType::Binary,
        (PrimitiveKind::String, Some("decimal")) => IrType::Decimal,
        (PrimitiveKind::String, _) => IrType::String,
        (PrimitiveKind::Integer, Some("int64")) => IrType::Long,
        (PrimitiveKind::Integer, _) => IrType::Integer,
        (PrimitiveKind::Number, Some("float")) => IrType::Float,
        (PrimitiveKind::Number, Some("decimal")) => IrType::Decimal,
        (PrimitiveKind::Number, _) => IrType::Double,
        (PrimitiveKind::Boolean, _) => IrType::Boolean,
    }
}

fn enum_literal(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn unsupported(context: &str, reason: &str) -> TransformError {
    TransformError::UnsupportedSchema {
        schema: context.to_string(),
        reason: reason.to_string(),
    }
}
