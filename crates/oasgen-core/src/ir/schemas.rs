use indexmap::IndexSet;

use super::types::NormalizedName;

/// A schema materialized as its own generated type.
#[derive(Debug, Clone)]
pub enum IrModel {
    Object(IrObjectModel),
    /// Top-level array of references to an object model.
    Container(IrContainerModel),
}

impl IrModel {
    pub fn name(&self) -> &NormalizedName {
        match self {
            IrModel::Object(o) => &o.name,
            IrModel::Container(c) => &c.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            IrModel::Object(o) => o.description.as_deref(),
            IrModel::Container(c) => c.description.as_deref(),
        }
    }

    /// The element model for containers, `None` for objects.
    pub fn item(&self) -> Option<&NormalizedName> {
        match self {
            IrModel::Object(_) => None,
            IrModel::Container(c) => Some(&c.item),
        }
    }
}

/// An object model with fields in declaration order.
#[derive(Debug, Clone)]
pub struct IrObjectModel {
    pub name: NormalizedName,
    pub description: Option<String>,
    pub fields: Vec<IrField>,
}

impl IrObjectModel {
    /// Declared property names in declaration order. A new set on every call.
    pub fn attribute_names(&self) -> IndexSet<String> {
        self.fields
            .iter()
            .map(|field| field.original_name.clone())
            .collect()
    }
}

/// A field on an object model.
#[derive(Debug, Clone)]
pub struct IrField {
    pub name: NormalizedName,
    pub original_name: String,
    pub field_type: IrType,
    pub required: bool,
    pub description: Option<String>,
}

/// A wrapper around a repeated object model.
#[derive(Debug, Clone)]
pub struct IrContainerModel {
    pub name: NormalizedName,
    pub description: Option<String>,
    pub item: NormalizedName,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

/// A resolved, language-neutral field type.
#[derive(Debug, Clone, PartialEq)]
pub enum IrType {
    String,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Long,
    Float,
    Double,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Binary,
    Any,
    /// Closed value set over a scalar base type.
    Enum {
        base: Box<IrType>,
        values: Vec<String>,
    },
    /// Reference to a materialized model by PascalCase name.
    Ref(String),
    List(Box<IrType>),
    /// String-keyed map.
    Map(Box<IrType>),
}

impl IrType {
    /// Name of the model this type refers to, looking through lists and maps.
    pub fn model_ref(&self) -> Option<&str> {
        match self {
            IrType::Ref(name) => Some(name),
            IrType::List(inner) | IrType::Map(inner) => inner.model_ref(),
            _ => None,
        }
    }
}
