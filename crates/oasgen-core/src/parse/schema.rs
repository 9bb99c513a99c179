use indexmap::IndexMap;
use serde::Deserialize;

use super::{Node, RefOr};

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

/// The `type` field can be a single type or an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

impl TypeSet {
    /// Non-null members, in declaration order, plus whether `null` was listed.
    pub fn split_null(&self) -> (Vec<SchemaType>, bool) {
        let all: &[SchemaType] = match self {
            TypeSet::Single(t) => std::slice::from_ref(t),
            TypeSet::Multiple(ts) => ts,
        };
        let non_null = all
            .iter()
            .copied()
            .filter(|t| *t != SchemaType::Null)
            .collect();
        (non_null, all.contains(&SchemaType::Null))
    }
}

/// A reference or inline schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Schema(Box<RawSchema>),
}

impl RefOr for SchemaOrRef {
    type Item = Box<RawSchema>;

    fn into_node(self) -> Node<Self::Item> {
        match self {
            SchemaOrRef::Ref { ref_path } => Node::Ref(ref_path),
            SchemaOrRef::Schema(schema) => match schema.sole_all_of_ref() {
                Some(reference) => Node::Ref(reference.to_string()),
                None => Node::Item(schema),
            },
        }
    }
}

/// A schema node as written in a fragment, before reference resolution.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RawSchema {
    #[serde(rename = "type")]
    pub schema_type: Option<TypeSet>,

    pub format: Option<String>,

    pub title: Option<String>,

    pub description: Option<String>,

    pub nullable: Option<bool>,

    #[serde(default)]
    pub properties: IndexMap<String, SchemaOrRef>,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(rename = "additionalProperties")]
    pub additional_properties: Option<AdditionalProperties>,

    pub items: Option<Box<SchemaOrRef>>,

    #[serde(rename = "allOf", default)]
    pub all_of: Vec<SchemaOrRef>,

    #[serde(rename = "oneOf", default)]
    pub one_of: Vec<SchemaOrRef>,

    #[serde(rename = "anyOf", default)]
    pub any_of: Vec<SchemaOrRef>,

    #[serde(rename = "enum", default)]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(rename = "minItems")]
    pub min_items: Option<u64>,

    #[serde(rename = "maxItems")]
    pub max_items: Option<u64>,
}

impl RawSchema {
    /// `allOf: [{$ref}]` with nothing else structural is just that reference.
    pub fn sole_all_of_ref(&self) -> Option<&str> {
        let [SchemaOrRef::Ref { ref_path }] = self.all_of.as_slice() else {
            return None;
        };
        let structural = self.schema_type.is_some()
            || !self.properties.is_empty()
            || self.items.is_some()
            || self.additional_properties.is_some()
            || !self.one_of.is_empty()
            || !self.any_of.is_empty()
            || !self.enum_values.is_empty();
        (!structural).then_some(ref_path.as_str())
    }

    /// Non-null declared types and the effective nullability.
    pub fn types(&self) -> (Vec<SchemaType>, bool) {
        let (types, listed_null) = self
            .schema_type
            .as_ref()
            .map(TypeSet::split_null)
            .unwrap_or_default();
        (types, listed_null || self.nullable.unwrap_or(false))
    }
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaOrRef>),
}
