use super::schemas::IrType;
use super::types::NormalizedName;

pub use crate::document::{HttpMethod, ParameterLocation};

/// A fully resolved API operation.
#[derive(Debug, Clone)]
pub struct IrOperation {
    pub name: NormalizedName,
    pub method: HttpMethod,
    pub path: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub parameters: Vec<IrParameter>,
    pub request_body: Option<IrRequestBody>,
    /// The primary (first successful, else `default`) response with content.
    pub response: Option<IrResponse>,
    pub deprecated: bool,
}

/// A resolved response.
#[derive(Debug, Clone)]
pub struct IrResponse {
    pub status: String,
    pub response_type: IrType,
    pub description: Option<String>,
}

/// A resolved path/query/header/cookie parameter.
#[derive(Debug, Clone)]
pub struct IrParameter {
    pub name: NormalizedName,
    pub original_name: String,
    pub location: ParameterLocation,
    pub param_type: IrType,
    pub required: bool,
    pub description: Option<String>,
}

/// A resolved request body.
#[derive(Debug, Clone)]
pub struct IrRequestBody {
    pub body_type: IrType,
    pub required: bool,
    pub content_type: String,
    pub description: Option<String>,
}
