use std::collections::VecDeque;

use indexmap::IndexSet;

use crate::document::{Document, Schema, SchemaId};

/// Schemas exercised by at least one response body, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReachableSet {
    ids: IndexSet<SchemaId>,
}

impl ReachableSet {
    pub fn contains(&self, id: SchemaId) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = SchemaId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Breadth-first walk from every response content schema through object
/// properties, array items, map values, composite parts, and references.
///
/// Request bodies and parameters are not roots: only the response surface
/// is materialized.
pub fn reachable(document: &Document) -> ReachableSet {
    let mut queue: VecDeque<&Schema> = document
        .operations()
        .flat_map(|op| op.responses.values())
        .flat_map(|slot| document.response(slot).content.values())
        .collect();

    let mut ids = IndexSet::new();
    while let Some(schema) = queue.pop_front() {
        match schema {
            Schema::Reference(id) => {
                if ids.insert(*id) {
                    queue.push_back(&document.schema(*id).schema);
                }
            }
            Schema::Object(object) => {
                queue.extend(object.properties.values().map(|p| &p.schema));
            }
            Schema::Array(array) => queue.push_back(&array.items),
            Schema::Map(values) => queue.push_back(values),
            Schema::Composite(composite) => queue.extend(composite.parts.iter()),
            Schema::Primitive { .. } | Schema::Enum(_) | Schema::Any => {}
        }
    }

    log::debug!(
        "{} of {} schema(s) reachable from responses",
        ids.len(),
        document.components.schemas.len()
    );
    ReachableSet { ids }
}
