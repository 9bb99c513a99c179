use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::operation::PathItemOrRef;

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub version: String,
}

/// A server URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The root fragment's top-level fields. The version is checked by
/// [`super::validate_version`]; components are read node by node by the
/// loader so each keeps its own location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSpec {
    #[serde(default)]
    pub info: Info,

    #[serde(default)]
    pub servers: Vec<Server>,

    #[serde(default)]
    pub paths: IndexMap<String, PathItemOrRef>,
}
