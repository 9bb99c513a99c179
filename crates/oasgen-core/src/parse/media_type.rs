use serde::Deserialize;

use super::schema::SchemaOrRef;

/// A media type object. Only the schema matters for generation.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MediaType {
    pub schema: Option<SchemaOrRef>,
}
