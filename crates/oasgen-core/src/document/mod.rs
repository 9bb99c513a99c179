//! The merged, fully resolved specification produced by the loader.
//!
//! A `Document` is immutable once built. Every schema reached by a `$ref`
//! lives exactly once in [`SchemaTable`]; everything else refers to it by
//! [`SchemaId`].

mod schema;

pub use schema::{
    ArraySchema, CompositeKind, CompositeSchema, EnumSchema, NamedSchema, ObjectSchema,
    PrimitiveKind, Property, Schema, SchemaId, SchemaTable,
};

use indexmap::IndexMap;

pub use crate::parse::operation::HttpMethod;
pub use crate::parse::parameter::ParameterLocation;
pub use crate::parse::spec::{Info, Server};

#[derive(Debug)]
pub struct Document {
    pub info: Info,
    pub servers: Vec<Server>,
    pub paths: IndexMap<String, PathItem>,
    pub components: Components,
    /// Canonical location of the root fragment.
    pub root: String,
    /// Canonical locations of every fragment read, in load order.
    pub fragments: Vec<String>,
}

impl Document {
    /// All operations in path then method declaration order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.paths.values().flat_map(|item| item.operations.iter())
    }

    pub fn schema(&self, id: SchemaId) -> &NamedSchema {
        self.components.schemas.get(id)
    }

    pub fn response<'a>(&'a self, slot: &'a ResponseSlot) -> &'a Response {
        match slot {
            ResponseSlot::Inline(response) => response,
            ResponseSlot::Shared(id) => &self.components.responses.get(*id).response,
        }
    }
}

#[derive(Debug, Default)]
pub struct Components {
    pub schemas: SchemaTable,
    pub responses: ResponseTable,
    pub parameters: IndexMap<String, Parameter>,
    pub request_bodies: IndexMap<String, RequestBody>,
}

#[derive(Debug, Clone, Default)]
pub struct PathItem {
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone)]
pub struct Operation {
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub path: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    /// Keyed by status code (`"200"`, `"default"`), in declaration order.
    pub responses: IndexMap<String, ResponseSlot>,
}

#[derive(Debug, Clone)]
pub enum ResponseSlot {
    Inline(Response),
    Shared(ResponseId),
}

#[derive(Debug, Clone, Default)]
pub struct Response {
    pub description: String,
    /// Keyed by media type.
    pub content: IndexMap<String, Schema>,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub description: Option<String>,
    pub schema: Option<Schema>,
}

#[derive(Debug, Clone)]
pub struct RequestBody {
    pub description: Option<String>,
    pub required: bool,
    pub content: IndexMap<String, Schema>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResponseId(usize);

#[derive(Debug, Clone)]
pub struct SharedResponse {
    pub key: String,
    pub name: String,
    pub response: Response,
}

/// Reusable responses, stored once per canonical key.
#[derive(Debug, Default)]
pub struct ResponseTable {
    entries: Vec<SharedResponse>,
    keys: IndexMap<String, ResponseId>,
}

impl ResponseTable {
    pub fn get(&self, id: ResponseId) -> &SharedResponse {
        &self.entries[id.0]
    }

    pub fn lookup(&self, key: &str) -> Option<ResponseId> {
        self.keys.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedResponse> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn insert(&mut self, key: String, name: String, response: Response) -> ResponseId {
        let id = ResponseId(self.entries.len());
        self.keys.insert(key.clone(), id);
        self.entries.push(SharedResponse {
            key,
            name,
            response,
        });
        id
    }

    pub(crate) fn alias(&mut self, key: String, id: ResponseId) {
        self.keys.entry(key).or_insert(id);
    }
}
