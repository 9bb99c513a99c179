use serde::{Deserialize, Serialize};

use super::schema::SchemaOrRef;
use super::{Node, RefOr};

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Path => "path",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

/// An API parameter as written in a fragment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawParameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    pub schema: Option<SchemaOrRef>,
}

/// A reference or inline parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Parameter(RawParameter),
}

impl RefOr for ParameterOrRef {
    type Item = RawParameter;

    fn into_node(self) -> Node<RawParameter> {
        match self {
            ParameterOrRef::Ref { ref_path } => Node::Ref(ref_path),
            ParameterOrRef::Parameter(parameter) => Node::Item(parameter),
        }
    }
}
