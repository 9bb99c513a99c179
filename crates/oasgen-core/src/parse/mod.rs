//! Raw fragment parsing: bytes to an order-preserving JSON tree, and the
//! serde model used to read individual nodes out of that tree.

pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod spec;

use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use crate::error::SpecLoadError;

/// A node split into its two possible shapes.
#[derive(Debug)]
pub enum Node<T> {
    Ref(String),
    Item(T),
}

/// A node that is either inline content or a `$ref` to content elsewhere.
pub trait RefOr {
    type Item;

    fn into_node(self) -> Node<Self::Item>;
}

/// Parse a fragment. `.json` locations are read as JSON, anything else as YAML.
pub fn parse_fragment(location: &str, bytes: &[u8]) -> Result<Value, SpecLoadError> {
    if location.to_ascii_lowercase().ends_with(".json") {
        return serde_json::from_slice(bytes).map_err(|source| SpecLoadError::Json {
            location: location.to_string(),
            source,
        });
    }
    let yaml: serde_yaml_ng::Value =
        serde_yaml_ng::from_slice(bytes).map_err(|source| SpecLoadError::Yaml {
            location: location.to_string(),
            source,
        })?;
    Ok(yaml_to_json(yaml))
}

/// Parse a root fragment from YAML text.
pub fn from_yaml(location: &str, input: &str) -> Result<Value, SpecLoadError> {
    parse_fragment(location, input.as_bytes())
}

/// Deserialize a typed node out of a parsed fragment.
pub fn from_node<T: DeserializeOwned>(node: &Value, location: &str) -> Result<T, SpecLoadError> {
    T::deserialize(node).map_err(|err| SpecLoadError::Malformed {
        location: location.to_string(),
        message: err.to_string(),
    })
}

/// Ensure the root fragment declares an OpenAPI 3.x document.
pub fn validate_version(root: &Value, location: &str) -> Result<(), SpecLoadError> {
    let version = match root.get("openapi") {
        Some(Value::String(version)) => version.clone(),
        // `openapi: 3.1` parses as a float
        Some(Value::Number(number)) => number.to_string(),
        Some(other) => return Err(SpecLoadError::UnsupportedVersion(other.to_string())),
        None => {
            return Err(SpecLoadError::Malformed {
                location: location.to_string(),
                message: "missing `openapi` version field".to_string(),
            });
        }
    };
    if version.starts_with("3.") {
        Ok(())
    } else {
        Err(SpecLoadError::UnsupportedVersion(version))
    }
}

/// YAML allows non-string mapping keys (`200:`); JSON does not. Keys are
/// stringified so status codes and other scalars survive the conversion.
fn yaml_to_json(value: serde_yaml_ng::Value) -> Value {
    use serde_yaml_ng::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(yaml_key(key), yaml_to_json(value));
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml_ng::Value) -> String {
    use serde_yaml_ng::Value as Yaml;

    match key {
        Yaml::String(s) => s,
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Null => "null".to_string(),
        other => serde_yaml_ng::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Escape a key for use as a JSON-pointer segment.
pub fn escape_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// The last segment of a JSON pointer, unescaped.
pub fn last_pointer_segment(pointer: &str) -> Option<String> {
    pointer
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_preserves_key_order_and_stringifies_keys() {
        let value = from_yaml(
            "api.yaml",
            "zeta: 1\nalpha: 2\n200:\n  description: ok\ntrue: yes\n",
        )
        .unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "200", "true"]);
        assert_eq!(value["200"]["description"], "ok");
    }

    #[test]
    fn json_fragments_use_json_parser() {
        let value = parse_fragment("/a/types.JSON", br#"{"b": 1, "a": [1.5, "x"]}"#).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(value["a"][0], 1.5);
    }

    #[test]
    fn malformed_yaml_reports_location() {
        let err = parse_fragment("/a/bad.yaml", b"key: [unclosed").unwrap_err();
        assert!(err.to_string().contains("/a/bad.yaml"), "{err}");
    }

    #[test]
    fn invalid_utf8_is_a_yaml_error() {
        let err = parse_fragment("/a/latin1.yaml", b"title: caf\xe9\n").unwrap_err();
        assert!(matches!(&err, SpecLoadError::Yaml { location, .. } if location == "/a/latin1.yaml"));
    }

    #[test]
    fn version_validation() {
        let ok = from_yaml("a.yaml", "openapi: 3.0.3\n").unwrap();
        assert!(validate_version(&ok, "a.yaml").is_ok());

        let old = from_yaml("a.yaml", "openapi: \"2.0\"\n").unwrap();
        assert!(matches!(
            validate_version(&old, "a.yaml"),
            Err(SpecLoadError::UnsupportedVersion(v)) if v == "2.0"
        ));

        let float = from_yaml("a.yaml", "openapi: 3.1\n").unwrap();
        assert!(validate_version(&float, "a.yaml").is_ok());

        let missing = from_yaml("a.yaml", "info: {}\n").unwrap();
        assert!(matches!(
            validate_version(&missing, "a.yaml"),
            Err(SpecLoadError::Malformed { .. })
        ));
    }

    #[test]
    fn pointer_segments() {
        assert_eq!(escape_pointer_segment("a/b~c"), "a~1b~0c");
        assert_eq!(
            last_pointer_segment("/components/schemas/a~1b~0c").as_deref(),
            Some("a/b~c")
        );
        assert_eq!(last_pointer_segment(""), None);
    }
}
