use indexmap::IndexMap;
use serde::Deserialize;

use super::media_type::MediaType;
use super::{Node, RefOr};

/// A response definition.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// A reference or inline response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(RawResponse),
}

impl RefOr for ResponseOrRef {
    type Item = RawResponse;

    fn into_node(self) -> Node<RawResponse> {
        match self {
            ResponseOrRef::Ref { ref_path } => Node::Ref(ref_path),
            ResponseOrRef::Response(response) => Node::Item(response),
        }
    }
}
