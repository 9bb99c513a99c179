use std::collections::HashMap;
use std::fmt;

use indexmap::{IndexMap, IndexSet};

/// Index of a named schema in a [`SchemaTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(usize);

impl SchemaId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Scalar kinds a `Primitive` or `Enum` may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Integer,
    Number,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    AllOf,
    OneOf,
    AnyOf,
}

/// A resolved schema. References hold only an identifier into the
/// [`SchemaTable`]; the referenced subtree is never copied.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Primitive {
        kind: PrimitiveKind,
        format: Option<String>,
        nullable: bool,
    },
    Object(ObjectSchema),
    Array(ArraySchema),
    Enum(EnumSchema),
    /// `additionalProperties` map with no declared properties.
    Map(Box<Schema>),
    /// No type constraint at all.
    Any,
    Composite(CompositeSchema),
    Reference(SchemaId),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    pub properties: IndexMap<String, Property>,
    pub required: IndexSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub schema: Schema,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub items: Box<Schema>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    pub kind: PrimitiveKind,
    pub values: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeSchema {
    pub kind: CompositeKind,
    pub parts: Vec<Schema>,
}

/// A schema stored once in the table under its canonical key.
#[derive(Debug, Clone)]
pub struct NamedSchema {
    pub id: SchemaId,
    /// `<canonical fragment>#<json pointer>`.
    pub key: String,
    /// Unique, collision-free display name.
    pub name: String,
    pub description: Option<String>,
    pub schema: Schema,
}

/// Arena of named schemas with a key index. Aliases (pure `$ref` hops)
/// map additional keys onto an existing entry.
#[derive(Debug, Default)]
pub struct SchemaTable {
    entries: Vec<NamedSchema>,
    keys: HashMap<String, SchemaId>,
    names: IndexSet<String>,
}

impl SchemaTable {
    pub fn get(&self, id: SchemaId) -> &NamedSchema {
        &self.entries[id.0]
    }

    pub fn lookup(&self, key: &str) -> Option<SchemaId> {
        self.keys.get(key).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&NamedSchema> {
        self.names
            .get_index_of(name)
            .map(|index| &self.entries[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedSchema> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry's display name, in registration order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Reserve a slot for `key` before its content is converted, so that
    /// recursive references find it. Returns the new id.
    pub(crate) fn reserve(&mut self, key: String, name: &str) -> SchemaId {
        let id = SchemaId(self.entries.len());
        let name = self.unique_name(name, &key);
        self.names.insert(name.clone());
        self.keys.insert(key.clone(), id);
        self.entries.push(NamedSchema {
            id,
            key,
            name,
            description: None,
            schema: Schema::Any,
        });
        id
    }

    pub(crate) fn define(&mut self, id: SchemaId, schema: Schema, description: Option<String>) {
        let entry = &mut self.entries[id.0];
        entry.schema = schema;
        entry.description = description;
    }

    pub(crate) fn alias(&mut self, key: String, id: SchemaId) {
        self.keys.entry(key).or_insert(id);
    }

    fn unique_name(&self, base: &str, key: &str) -> String {
        if !self.names.contains(base) {
            return base.to_string();
        }
        let mut suffix = 1;
        loop {
            let candidate = format!("{base}_{suffix}");
            if !self.names.contains(&candidate) {
                log::warn!("schema name {base} is already taken; {key} is renamed to {candidate}");
                return candidate;
            }
            suffix += 1;
        }
    }
}
