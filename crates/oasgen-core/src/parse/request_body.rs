use indexmap::IndexMap;
use serde::Deserialize;

use super::media_type::MediaType;
use super::{Node, RefOr};

/// A request body definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRequestBody {
    pub description: Option<String>,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    #[serde(default)]
    pub required: bool,
}

/// A reference or inline request body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RequestBodyOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    RequestBody(RawRequestBody),
}

impl RefOr for RequestBodyOrRef {
    type Item = RawRequestBody;

    fn into_node(self) -> Node<RawRequestBody> {
        match self {
            RequestBodyOrRef::Ref { ref_path } => Node::Ref(ref_path),
            RequestBodyOrRef::RequestBody(body) => Node::Item(body),
        }
    }
}
