use std::collections::VecDeque;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::document::{
    ArraySchema, Components, CompositeKind, CompositeSchema, Document, EnumSchema, ObjectSchema,
    Operation, Parameter, PathItem, PrimitiveKind, Property, RequestBody, Response, ResponseId,
    ResponseSlot, ResponseTable, Schema, SchemaId, SchemaTable,
};
use crate::error::{LoadError, ResolveError};
use crate::parse::media_type::MediaType;
use crate::parse::operation::{PathItemOrRef, RawPathItem};
use crate::parse::parameter::ParameterOrRef;
use crate::parse::request_body::RequestBodyOrRef;
use crate::parse::response::{RawResponse, ResponseOrRef};
use crate::parse::schema::{AdditionalProperties, RawSchema, SchemaOrRef, SchemaType};
use crate::parse::spec::RawSpec;
use crate::parse::{self, Node, RefOr};
use crate::path;
use crate::source::ContentSource;

/// A resolved reference target: a canonical fragment plus a JSON pointer.
#[derive(Debug, Clone)]
struct Target {
    location: String,
    pointer: String,
}

impl Target {
    fn key(&self) -> String {
        format!("{}#{}", self.location, self.pointer)
    }

    fn name(&self) -> String {
        parse::last_pointer_segment(&self.pointer)
            .unwrap_or_else(|| path::file_stem(&self.location).to_string())
    }
}

/// The end of an alias chain.
struct Resolved<T> {
    target: Target,
    item: T,
    /// Keys passed through on the way, excluding `target` itself.
    aliases: Vec<String>,
}

struct PendingSchema {
    id: SchemaId,
    location: String,
    raw: Box<RawSchema>,
}

/// One resolution session. Owns the fragment cache and the content source;
/// both are released when the session is consumed by [`LoadSession::load`].
pub struct LoadSession {
    source: Box<dyn ContentSource>,
    search_paths: Vec<String>,
    fragments: IndexMap<String, Rc<Value>>,
    schemas: SchemaTable,
    responses: ResponseTable,
    pending: VecDeque<PendingSchema>,
}

impl LoadSession {
    pub fn new(source: Box<dyn ContentSource>, search_paths: Vec<String>) -> Self {
        Self {
            source,
            search_paths,
            fragments: IndexMap::new(),
            schemas: SchemaTable::default(),
            responses: ResponseTable::default(),
            pending: VecDeque::new(),
        }
    }

    pub fn load(mut self, root: &str) -> Result<Document, LoadError> {
        let location = self.source.canonicalize(root);
        log::debug!("loading {location} from {}", self.source.describe());

        let fragment = self.fragment(&location)?;
        parse::validate_version(&fragment, &location)?;
        let spec: RawSpec = parse::from_node(&fragment, &location)?;

        let mut components = Components::default();
        self.load_components(&fragment, &location, &mut components)?;

        let mut paths = IndexMap::with_capacity(spec.paths.len());
        for (route, item) in spec.paths {
            let (item_location, item) = self.inline_or_follow::<PathItemOrRef>(item, &location)?;
            let path_item = self.convert_path_item(&route, item, &item_location)?;
            paths.insert(route, path_item);
        }

        self.drain()?;

        components.schemas = std::mem::take(&mut self.schemas);
        components.responses = std::mem::take(&mut self.responses);
        let document = Document {
            info: spec.info,
            servers: spec.servers,
            paths,
            components,
            root: location,
            fragments: self.fragments.keys().cloned().collect(),
        };
        log::info!(
            "loaded {} fragment(s): {} schema(s), {} operation(s)",
            document.fragments.len(),
            document.components.schemas.len(),
            document.operations().count()
        );
        Ok(document)
    }

    /// Root components are always resolved, whether or not anything uses them.
    fn load_components(
        &mut self,
        root: &Value,
        location: &str,
        components: &mut Components,
    ) -> Result<(), LoadError> {
        for name in component_keys(root, "schemas") {
            self.schema_ref(&component_ref("schemas", &name), location)?;
        }
        for name in component_keys(root, "responses") {
            self.response_ref(&component_ref("responses", &name), location)?;
        }
        for name in component_keys(root, "parameters") {
            let node = ParameterOrRef::Ref {
                ref_path: component_ref("parameters", &name),
            };
            let parameter = self.parameter(node, location)?;
            components.parameters.insert(name, parameter);
        }
        for name in component_keys(root, "requestBodies") {
            let node = RequestBodyOrRef::Ref {
                ref_path: component_ref("requestBodies", &name),
            };
            let body = self.request_body(node, location)?;
            components.request_bodies.insert(name, body);
        }
        Ok(())
    }

    // --- fragments and references ---------------------------------------

    /// Cached read + parse. A fragment is inserted before any of its own
    /// references are followed.
    fn fragment(&mut self, location: &str) -> Result<Rc<Value>, LoadError> {
        if let Some(fragment) = self.fragments.get(location) {
            log::debug!("fragment cache hit: {location}");
            return Ok(Rc::clone(fragment));
        }
        let bytes = self.source.read(location)?;
        log::debug!("read fragment {location} ({} bytes)", bytes.len());
        let fragment = Rc::new(parse::parse_fragment(location, &bytes)?);
        self.fragments
            .insert(location.to_string(), Rc::clone(&fragment));
        Ok(fragment)
    }

    fn read_node<T: DeserializeOwned>(&mut self, target: &Target) -> Result<T, LoadError> {
        let fragment = self.fragment(&target.location)?;
        let node = fragment
            .pointer(&target.pointer)
            .ok_or_else(|| ResolveError::TargetNotFound {
                reference: target.key(),
                pointer: target.pointer.clone(),
            })?;
        Ok(parse::from_node(node, &target.key())?)
    }

    fn locate(&self, reference: &str, from: &str) -> Result<Target, LoadError> {
        let reference = reference.trim();
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Err(ResolveError::Remote(reference.to_string()).into());
        }
        let (file, pointer) = reference.split_once('#').unwrap_or((reference, ""));
        if (file.is_empty() && pointer.is_empty()) || (!pointer.is_empty() && !pointer.starts_with('/'))
        {
            return Err(ResolveError::InvalidRef(reference.to_string()).into());
        }

        let location = if file.is_empty() {
            from.to_string()
        } else {
            self.locate_file(file, reference, from)?
        };
        Ok(Target {
            location,
            pointer: pointer.to_string(),
        })
    }

    /// Relative to the referencing fragment first, then each search path in
    /// order. The first location that is cached or exists wins.
    fn locate_file(&self, file: &str, reference: &str, from: &str) -> Result<String, ResolveError> {
        let relative = self.source.resolve(from, file);
        if self.is_available(&relative) {
            return Ok(relative);
        }
        for dir in &self.search_paths {
            let candidate = self.source.canonicalize(&path::join(dir, file));
            if self.is_available(&candidate) {
                log::debug!("resolved {file} through search path {dir}");
                return Ok(candidate);
            }
        }
        Err(ResolveError::Dangling {
            reference: reference.to_string(),
            from: from.to_string(),
        })
    }

    fn is_available(&self, location: &str) -> bool {
        self.fragments.contains_key(location) || self.source.exists(location)
    }

    /// Follow a chain of pure `$ref` nodes to the first node with content.
    fn follow<T>(&mut self, mut target: Target) -> Result<Resolved<T::Item>, LoadError>
    where
        T: RefOr + DeserializeOwned,
    {
        let mut chain: IndexSet<String> = IndexSet::new();
        loop {
            let key = target.key();
            if !chain.insert(key.clone()) {
                let mut chain: Vec<String> = chain.into_iter().collect();
                chain.push(key);
                return Err(ResolveError::Circular { chain }.into());
            }
            let node: T = self.read_node(&target)?;
            match node.into_node() {
                Node::Ref(reference) => target = self.locate(&reference, &target.location)?,
                Node::Item(item) => {
                    let mut aliases: Vec<String> = chain.into_iter().collect();
                    aliases.pop();
                    return Ok(Resolved {
                        target,
                        item,
                        aliases,
                    });
                }
            }
        }
    }

    /// Inline content stays where it is; a `$ref` is followed to its owner.
    /// Returns the location the content was found in alongside the content.
    fn inline_or_follow<T>(&mut self, node: T, from: &str) -> Result<(String, T::Item), LoadError>
    where
        T: RefOr + DeserializeOwned,
    {
        match node.into_node() {
            Node::Item(item) => Ok((from.to_string(), item)),
            Node::Ref(reference) => {
                let target = self.locate(&reference, from)?;
                let resolved = self.follow::<T>(target)?;
                Ok((resolved.target.location, resolved.item))
            }
        }
    }

    // --- schemas -----------------------------------------------------------

    /// Resolve a schema reference to its single arena slot. Content is
    /// converted later by [`Self::drain`], so recursive schemas terminate.
    fn schema_ref(&mut self, reference: &str, from: &str) -> Result<SchemaId, LoadError> {
        let target = self.locate(reference, from)?;
        if let Some(id) = self.schemas.lookup(&target.key()) {
            return Ok(id);
        }

        let Resolved {
            target,
            item,
            aliases,
        } = self.follow::<SchemaOrRef>(target)?;
        let key = target.key();
        let id = match self.schemas.lookup(&key) {
            Some(id) => id,
            None => {
                let id = self.schemas.reserve(key, &target.name());
                self.pending.push_back(PendingSchema {
                    id,
                    location: target.location,
                    raw: item,
                });
                id
            }
        };
        for alias in aliases {
            self.schemas.alias(alias, id);
        }
        Ok(id)
    }

    fn drain(&mut self) -> Result<(), LoadError> {
        while let Some(PendingSchema { id, location, raw }) = self.pending.pop_front() {
            let description = raw.description.clone().or_else(|| raw.title.clone());
            let schema = self.convert_schema(*raw, &location)?;
            self.schemas.define(id, schema, description);
        }
        Ok(())
    }

    fn convert(&mut self, node: SchemaOrRef, location: &str) -> Result<Schema, LoadError> {
        match node.into_node() {
            Node::Ref(reference) => Ok(Schema::Reference(self.schema_ref(&reference, location)?)),
            Node::Item(raw) => self.convert_schema(*raw, location),
        }
    }

    fn convert_schema(&mut self, raw: RawSchema, location: &str) -> Result<Schema, LoadError> {
        let (types, nullable) = raw.types();
        let RawSchema {
            format,
            properties,
            required,
            additional_properties,
            items,
            all_of,
            one_of,
            any_of,
            enum_values,
            min_items,
            max_items,
            ..
        } = raw;

        let composite = [
            (CompositeKind::OneOf, one_of),
            (CompositeKind::AnyOf, any_of),
            (CompositeKind::AllOf, all_of),
        ]
        .into_iter()
        .find(|(_, parts)| !parts.is_empty());
        if let Some((kind, parts)) = composite {
            let mut converted = Vec::with_capacity(parts.len() + 1);
            for part in parts {
                converted.push(self.convert(part, location)?);
            }
            if !properties.is_empty() {
                converted.push(self.convert_object(properties, required, None, location)?);
            }
            return Ok(Schema::Composite(CompositeSchema {
                kind,
                parts: converted,
            }));
        }

        if !enum_values.is_empty() {
            let kind = types
                .first()
                .and_then(|t| primitive_kind(*t))
                .unwrap_or(PrimitiveKind::String);
            return Ok(Schema::Enum(EnumSchema {
                kind,
                values: enum_values,
            }));
        }

        let shape = match types.as_slice() {
            [] if !properties.is_empty() || additional_properties.is_some() => {
                Some(SchemaType::Object)
            }
            [] if items.is_some() => Some(SchemaType::Array),
            [] => None,
            [single] => Some(*single),
            several => {
                let parts = several
                    .iter()
                    .map(|t| match primitive_kind(*t) {
                        Some(kind) => Schema::Primitive {
                            kind,
                            format: None,
                            nullable,
                        },
                        None => Schema::Any,
                    })
                    .collect();
                return Ok(Schema::Composite(CompositeSchema {
                    kind: CompositeKind::AnyOf,
                    parts,
                }));
            }
        };

        match shape {
            None => Ok(Schema::Any),
            Some(SchemaType::Object) => {
                self.convert_object(properties, required, additional_properties, location)
            }
            Some(SchemaType::Array) => {
                let items = match items {
                    Some(items) => self.convert(*items, location)?,
                    None => Schema::Any,
                };
                Ok(Schema::Array(ArraySchema {
                    items: Box::new(items),
                    min_items,
                    max_items,
                }))
            }
            Some(other) => Ok(primitive_kind(other)
                .map(|kind| Schema::Primitive {
                    kind,
                    format,
                    nullable,
                })
                .unwrap_or(Schema::Any)),
        }
    }

    fn convert_object(
        &mut self,
        properties: IndexMap<String, SchemaOrRef>,
        required: Vec<String>,
        additional_properties: Option<AdditionalProperties>,
        location: &str,
    ) -> Result<Schema, LoadError> {
        if properties.is_empty() {
            if let Some(AdditionalProperties::Schema(values)) = additional_properties {
                return Ok(Schema::Map(Box::new(self.convert(*values, location)?)));
            }
        }

        let mut object = ObjectSchema {
            required: required.into_iter().collect(),
            ..ObjectSchema::default()
        };
        for (name, node) in properties {
            let description = match &node {
                SchemaOrRef::Schema(schema) => schema.description.clone(),
                SchemaOrRef::Ref { .. } => None,
            };
            let schema = self.convert(node, location)?;
            object
                .properties
                .insert(name, Property { schema, description });
        }
        Ok(Schema::Object(object))
    }

    // --- responses, parameters, bodies ---------------------------------------

    fn response_ref(&mut self, reference: &str, from: &str) -> Result<ResponseId, LoadError> {
        let target = self.locate(reference, from)?;
        if let Some(id) = self.responses.lookup(&target.key()) {
            return Ok(id);
        }

        let Resolved {
            target,
            item,
            aliases,
        } = self.follow::<ResponseOrRef>(target)?;
        let key = target.key();
        let id = match self.responses.lookup(&key) {
            Some(id) => id,
            None => {
                let response = self.convert_response(item, &target.location)?;
                self.responses.insert(key, target.name(), response)
            }
        };
        for alias in aliases {
            self.responses.alias(alias, id);
        }
        Ok(id)
    }

    fn convert_response(&mut self, raw: RawResponse, location: &str) -> Result<Response, LoadError> {
        Ok(Response {
            description: raw.description,
            content: self.convert_content(raw.content, location)?,
        })
    }

    fn convert_content(
        &mut self,
        content: IndexMap<String, MediaType>,
        location: &str,
    ) -> Result<IndexMap<String, Schema>, LoadError> {
        let mut converted = IndexMap::with_capacity(content.len());
        for (media_type, body) in content {
            if let Some(schema) = body.schema {
                converted.insert(media_type, self.convert(schema, location)?);
            }
        }
        Ok(converted)
    }

    fn parameter(&mut self, node: ParameterOrRef, from: &str) -> Result<Parameter, LoadError> {
        let (location, raw) = self.inline_or_follow(node, from)?;
        let schema = match raw.schema {
            Some(schema) => Some(self.convert(schema, &location)?),
            None => None,
        };
        Ok(Parameter {
            name: raw.name,
            location: raw.location,
            required: raw.required,
            description: raw.description,
            schema,
        })
    }

    fn request_body(&mut self, node: RequestBodyOrRef, from: &str) -> Result<RequestBody, LoadError> {
        let (location, raw) = self.inline_or_follow(node, from)?;
        Ok(RequestBody {
            description: raw.description,
            required: raw.required,
            content: self.convert_content(raw.content, &location)?,
        })
    }

    // --- paths ---------------------------------------------------------------

    fn convert_path_item(
        &mut self,
        route: &str,
        item: RawPathItem,
        location: &str,
    ) -> Result<PathItem, LoadError> {
        let mut shared = Vec::with_capacity(item.parameters.len());
        for node in item.parameters.iter().cloned() {
            shared.push(self.parameter(node, location)?);
        }

        let mut operations = Vec::new();
        for (method, raw) in item.operations() {
            // Operation-level parameters override path-level ones by (name, in).
            let mut parameters = shared.clone();
            for node in raw.parameters.iter().cloned() {
                let parameter = self.parameter(node, location)?;
                match parameters
                    .iter_mut()
                    .find(|p| p.name == parameter.name && p.location == parameter.location)
                {
                    Some(existing) => *existing = parameter,
                    None => parameters.push(parameter),
                }
            }

            let request_body = match raw.request_body.clone() {
                Some(body) => Some(self.request_body(body, location)?),
                None => None,
            };

            let mut responses = IndexMap::with_capacity(raw.responses.len());
            for (status, node) in &raw.responses {
                let slot = match node.clone().into_node() {
                    Node::Item(response) => {
                        ResponseSlot::Inline(self.convert_response(response, location)?)
                    }
                    Node::Ref(reference) => {
                        ResponseSlot::Shared(self.response_ref(&reference, location)?)
                    }
                };
                responses.insert(status.clone(), slot);
            }

            operations.push(Operation {
                method,
                operation_id: raw.operation_id.clone(),
                path: route.to_string(),
                summary: raw.summary.clone(),
                description: raw.description.clone(),
                tags: raw.tags.clone(),
                deprecated: raw.deprecated,
                parameters,
                request_body,
                responses,
            });
        }
        Ok(PathItem { operations })
    }
}

fn component_keys(root: &Value, kind: &str) -> Vec<String> {
    root.get("components")
        .and_then(|components| components.get(kind))
        .and_then(Value::as_object)
        .map(|entries| entries.keys().cloned().collect())
        .unwrap_or_default()
}

fn component_ref(kind: &str, name: &str) -> String {
    format!(
        "#/components/{kind}/{}",
        parse::escape_pointer_segment(name)
    )
}

fn primitive_kind(schema_type: SchemaType) -> Option<PrimitiveKind> {
    match schema_type {
        SchemaType::String => Some(PrimitiveKind::String),
        SchemaType::Integer => Some(PrimitiveKind::Integer),
        SchemaType::Number => Some(PrimitiveKind::Number),
        SchemaType::Boolean => Some(PrimitiveKind::Boolean),
        SchemaType::Array | SchemaType::Object | SchemaType::Null => None,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::error::{SourceError, SpecLoadError};
    use crate::path::PathFlavor;

    /// In-memory source that counts reads per location.
    #[derive(Default)]
    struct MemorySource {
        files: HashMap<String, String>,
        reads: Rc<RefCell<HashMap<String, usize>>>,
    }

    impl MemorySource {
        fn with(files: &[(&str, &str)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(path, content)| (path.to_string(), content.to_string()))
                    .collect(),
                ..Self::default()
            }
        }
    }

    impl ContentSource for MemorySource {
        fn exists(&self, path: &str) -> bool {
            self.files.contains_key(path)
        }

        fn read(&self, path: &str) -> Result<Vec<u8>, SourceError> {
            *self.reads.borrow_mut().entry(path.to_string()).or_default() += 1;
            self.files
                .get(path)
                .map(|content| content.clone().into_bytes())
                .ok_or_else(|| SourceError::NotFound {
                    path: path.to_string(),
                })
        }

        fn canonicalize(&self, path: &str) -> String {
            path::canonicalize(Some(path), PathFlavor::Archive).unwrap_or_default()
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    fn named<'a>(doc: &'a Document, name: &str) -> &'a Schema {
        &doc.components.schemas.by_name(name).unwrap().schema
    }

    fn load(files: &[(&str, &str)], root: &str) -> Result<Document, LoadError> {
        LoadSession::new(Box::new(MemorySource::with(files)), Vec::new()).load(root)
    }

    const ARTICLES: &str = r##"
openapi: 3.0.3
info:
  title: Articles
  version: "1.0"
paths:
  /articletypes:
    get:
      operationId: listArticleTypes
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/ArticleTypes"
components:
  schemas:
    ArticleTypes:
      type: array
      items:
        $ref: "#/components/schemas/ArticleTypeInfo"
    ArticleTypeInfo:
      type: object
      required: [articleTypeId]
      properties:
        articleTypeId:
          type: string
        typeName:
          type: string
"##;

    #[test]
    fn local_refs_share_one_schema() {
        let doc = load(&[("api.yaml", ARTICLES)], "api.yaml").unwrap();
        assert_eq!(doc.root, "api.yaml");
        assert_eq!(doc.fragments, vec!["api.yaml"]);

        let schemas = &doc.components.schemas;
        assert_eq!(
            schemas.component_names().collect::<Vec<_>>(),
            vec!["ArticleTypes", "ArticleTypeInfo"]
        );
        let list = schemas.lookup("api.yaml#/components/schemas/ArticleTypes").unwrap();
        let info = schemas.lookup("api.yaml#/components/schemas/ArticleTypeInfo").unwrap();
        let Schema::Array(array) = &schemas.get(list).schema else {
            panic!("ArticleTypes should be an array");
        };
        assert_eq!(*array.items, Schema::Reference(info));

        let Schema::Object(object) = &schemas.get(info).schema else {
            panic!("ArticleTypeInfo should be an object");
        };
        assert_eq!(
            object.properties.keys().collect::<Vec<_>>(),
            vec!["articleTypeId", "typeName"]
        );
        assert!(object.required.contains("articleTypeId"));

        let op = doc.operations().next().unwrap();
        let response = doc.response(&op.responses["200"]);
        assert_eq!(response.content["application/json"], Schema::Reference(list));
    }

    #[test]
    fn shared_fragment_is_read_once_and_stored_once() {
        let api = r##"
openapi: 3.0.0
paths:
  /a:
    get:
      responses:
        "200":
          description: a
          content:
            application/json:
              schema:
                $ref: "models/common.yaml#/Widget"
  /b:
    get:
      responses:
        "200":
          description: b
          content:
            application/json:
              schema:
                $ref: "./models/../models/common.yaml#/Widget"
"##;
        let common = "Widget:\n  type: object\n  properties:\n    id: {type: integer}\n";
        let source = MemorySource::with(&[("specs/api.yaml", api), ("specs/models/common.yaml", common)]);
        let reads = Rc::clone(&source.reads);
        let doc = LoadSession::new(Box::new(source), Vec::new())
            .load("/specs/api.yaml")
            .unwrap();

        assert_eq!(reads.borrow()["specs/models/common.yaml"], 1);
        assert_eq!(reads.borrow()["specs/api.yaml"], 1);

        let ops: Vec<&Operation> = doc.operations().collect();
        let first = &doc.response(&ops[0].responses["200"]).content["application/json"];
        let second = &doc.response(&ops[1].responses["200"]).content["application/json"];
        let (Schema::Reference(a), Schema::Reference(b)) = (first, second) else {
            panic!("responses should reference the shared schema");
        };
        assert_eq!(a, b);
        assert!(std::ptr::eq(doc.schema(*a), doc.schema(*b)));
        assert_eq!(doc.components.schemas.len(), 1);
        assert_eq!(doc.schema(*a).key, "specs/models/common.yaml#/Widget");
    }

    #[test]
    fn alias_cycle_is_reported_with_its_chain() {
        let api = r##"
openapi: 3.0.0
paths: {}
components:
  schemas:
    A:
      $ref: "#/components/schemas/B"
    B:
      $ref: "#/components/schemas/A"
"##;
        let err = load(&[("api.yaml", api)], "api.yaml").unwrap_err();
        let LoadError::Resolve(ResolveError::Circular { chain }) = &err else {
            panic!("expected a circular reference error, got {err}");
        };
        assert_eq!(
            chain,
            &vec![
                "api.yaml#/components/schemas/A".to_string(),
                "api.yaml#/components/schemas/B".to_string(),
                "api.yaml#/components/schemas/A".to_string(),
            ]
        );
    }

    #[test]
    fn cross_file_alias_cycle_terminates() {
        let api = "openapi: 3.0.0\ncomponents:\n  schemas:\n    Start:\n      $ref: a.yaml\n";
        let err = load(
            &[("api.yaml", api), ("a.yaml", "$ref: b.yaml\n"), ("b.yaml", "$ref: a.yaml\n")],
            "api.yaml",
        )
        .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("a.yaml#"), "{text}");
        assert!(text.contains("b.yaml#"), "{text}");
    }

    #[test]
    fn recursive_objects_are_legal() {
        let api = r##"
openapi: 3.0.0
paths: {}
components:
  schemas:
    Node:
      type: object
      properties:
        value: {type: string}
        children:
          type: array
          items:
            $ref: "#/components/schemas/Node"
        parent:
          $ref: "#/components/schemas/Node"
"##;
        let doc = load(&[("api.yaml", api)], "api.yaml").unwrap();
        let id = doc
            .components
            .schemas
            .lookup("api.yaml#/components/schemas/Node")
            .unwrap();
        let Schema::Object(node) = &doc.schema(id).schema else {
            panic!("Node should be an object");
        };
        assert_eq!(node.properties["parent"].schema, Schema::Reference(id));
    }

    #[test]
    fn aliases_collapse_onto_their_owner() {
        let api = r##"
openapi: 3.0.0
paths: {}
components:
  schemas:
    Pet:
      allOf:
        - $ref: "#/components/schemas/Animal"
    Animal:
      type: object
      properties:
        name: {type: string}
"##;
        let doc = load(&[("api.yaml", api)], "api.yaml").unwrap();
        let schemas = &doc.components.schemas;
        assert_eq!(schemas.len(), 1);
        assert_eq!(
            schemas.lookup("api.yaml#/components/schemas/Pet"),
            schemas.lookup("api.yaml#/components/schemas/Animal")
        );
    }

    #[test]
    fn search_paths_are_consulted_in_order() {
        let api = r##"
openapi: 3.0.0
paths:
  /x:
    get:
      responses:
        "200":
          $ref: "errors.yaml#/NotFound"
"##;
        let errors_a = "NotFound:\n  description: from a\n";
        let errors_b = "NotFound:\n  description: from b\n";
        let source = MemorySource::with(&[
            ("root/api.yaml", api),
            ("lib/a/errors.yaml", errors_a),
            ("lib/b/errors.yaml", errors_b),
        ]);
        let doc = LoadSession::new(Box::new(source), vec!["lib/a".into(), "lib/b".into()])
            .load("root/api.yaml")
            .unwrap();
        let op = doc.operations().next().unwrap();
        assert_eq!(doc.response(&op.responses["200"]).description, "from a");
        assert_eq!(doc.components.responses.len(), 1);
    }

    #[test]
    fn dangling_references_name_their_origin() {
        let api = "openapi: 3.0.0\ncomponents:\n  schemas:\n    X:\n      $ref: missing.yaml#/X\n";
        let err = load(&[("dir/api.yaml", api)], "dir/api.yaml").unwrap_err();
        assert!(matches!(
            &err,
            LoadError::Resolve(ResolveError::Dangling { reference, from })
                if reference == "missing.yaml#/X" && from == "dir/api.yaml"
        ));
    }

    #[test]
    fn missing_pointer_targets_are_reported() {
        let api = "openapi: 3.0.0\npaths:\n  /x:\n    get:\n      responses:\n        '200':\n          $ref: '#/components/responses/Nope'\n";
        let err = load(&[("api.yaml", api)], "api.yaml").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Resolve(ResolveError::TargetNotFound { .. })
        ));
    }

    #[test]
    fn remote_and_malformed_references_are_rejected() {
        let remote = "openapi: 3.0.0\ncomponents:\n  schemas:\n    X:\n      $ref: https://example.com/x.yaml\n";
        assert!(matches!(
            load(&[("api.yaml", remote)], "api.yaml").unwrap_err(),
            LoadError::Resolve(ResolveError::Remote(_))
        ));

        let bad = "openapi: 3.0.0\ncomponents:\n  schemas:\n    X:\n      $ref: '#components'\n";
        assert!(matches!(
            load(&[("api.yaml", bad)], "api.yaml").unwrap_err(),
            LoadError::Resolve(ResolveError::InvalidRef(_))
        ));
    }

    #[test]
    fn missing_root_is_a_spec_load_error() {
        let err = load(&[], "nope.yaml").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Spec(SpecLoadError::Source(SourceError::NotFound { .. }))
        ));
    }

    #[test]
    fn path_parameters_merge_with_operation_overrides() {
        let api = r##"
openapi: 3.0.0
paths:
  /items/{id}:
    parameters:
      - name: id
        in: path
        required: true
        schema: {type: string}
      - $ref: "#/components/parameters/Limit"
    get:
      parameters:
        - name: id
          in: path
          required: true
          description: overridden
          schema: {type: integer}
      responses:
        "204":
          description: none
components:
  parameters:
    Limit:
      name: limit
      in: query
      schema: {type: integer, format: int32}
"##;
        let doc = load(&[("api.yaml", api)], "api.yaml").unwrap();
        let op = doc.operations().next().unwrap();
        let names: Vec<&str> = op.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "limit"]);
        assert_eq!(op.parameters[0].description.as_deref(), Some("overridden"));
        assert!(doc.components.parameters.contains_key("Limit"));
    }

    #[test]
    fn schema_shapes() {
        let api = r##"
openapi: 3.0.0
paths: {}
components:
  schemas:
    Status:
      type: string
      enum: [active, retired]
    Counts:
      type: object
      additionalProperties:
        type: integer
    Loose: {}
    Either:
      oneOf:
        - type: string
        - type: integer
    Multi:
      type: [string, integer]
    Maybe:
      type: [string, "null"]
      format: date
"##;
        let doc = load(&[("api.yaml", api)], "api.yaml").unwrap();
        let schema = |name: &str| named(&doc, name).clone();
        assert!(matches!(schema("Status"), Schema::Enum(e) if e.values.len() == 2));
        assert!(matches!(schema("Counts"), Schema::Map(_)));
        assert_eq!(schema("Loose"), Schema::Any);
        assert!(matches!(
            schema("Either"),
            Schema::Composite(c) if c.kind == CompositeKind::OneOf && c.parts.len() == 2
        ));
        assert!(matches!(
            schema("Multi"),
            Schema::Composite(c) if c.kind == CompositeKind::AnyOf
        ));
        assert_eq!(
            schema("Maybe"),
            Schema::Primitive {
                kind: PrimitiveKind::String,
                format: Some("date".into()),
                nullable: true,
            }
        );
    }
}
