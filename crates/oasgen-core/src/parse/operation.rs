use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::parameter::ParameterOrRef;
use super::request_body::RequestBodyOrRef;
use super::response::ResponseOrRef;
use super::{Node, RefOr};

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An API operation as written in a fragment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawOperation {
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,

    pub summary: Option<String>,

    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(rename = "requestBody")]
    pub request_body: Option<RequestBodyOrRef>,

    #[serde(default)]
    pub responses: IndexMap<String, ResponseOrRef>,

    #[serde(default)]
    pub deprecated: bool,
}

/// A path item, containing operations keyed by HTTP method.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RawPathItem {
    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,

    pub get: Option<RawOperation>,
    pub post: Option<RawOperation>,
    pub put: Option<RawOperation>,
    pub delete: Option<RawOperation>,
    pub patch: Option<RawOperation>,
    pub options: Option<RawOperation>,
    pub head: Option<RawOperation>,
    pub trace: Option<RawOperation>,
}

impl RawPathItem {
    /// Declared operations in a fixed method order.
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &RawOperation)> {
        [
            (HttpMethod::Get, &self.get),
            (HttpMethod::Post, &self.post),
            (HttpMethod::Put, &self.put),
            (HttpMethod::Delete, &self.delete),
            (HttpMethod::Patch, &self.patch),
            (HttpMethod::Options, &self.options),
            (HttpMethod::Head, &self.head),
            (HttpMethod::Trace, &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
    }
}

/// A path item may itself be a `$ref` to a shared definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PathItemOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Item(RawPathItem),
}

impl RefOr for PathItemOrRef {
    type Item = RawPathItem;

    fn into_node(self) -> Node<RawPathItem> {
        match self {
            PathItemOrRef::Ref { ref_path } => Node::Ref(ref_path),
            PathItemOrRef::Item(item) => Node::Item(item),
        }
    }
}
