//! Attribute tree over decoded JSON
//!
//! Wraps a JSON value so that nested object fields can be reached by name
//! without indexing into raw maps. Objects become `Object` nodes, everything
//! else (strings, numbers, booleans, null and arrays) is kept as a `Leaf`.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Read-only tree view of a JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeTree {
    /// Own fields of a JSON object, in document order
    Object(Vec<(String, AttributeTree)>),

    /// Any non-object value, copied through unchanged
    Leaf(Value),
}

impl AttributeTree {
    /// Wrap a decoded JSON value, recursing into nested objects
    pub fn wrap(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, child)| (key, Self::wrap(child)))
                    .collect(),
            ),
            other => Self::Leaf(other),
        }
    }

    /// Look up a field by name on an object node
    #[allow(dead_code)] // Read API for decoded upstream bodies
    pub fn get(&self, name: &str) -> Option<&AttributeTree> {
        match self {
            Self::Object(fields) => fields
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, child)| child),
            Self::Leaf(_) => None,
        }
    }

    /// Follow a chain of field names, e.g. `["choices", "message"]`
    #[allow(dead_code)] // Read API for decoded upstream bodies
    pub fn lookup(&self, path: &[&str]) -> Option<&AttributeTree> {
        path.iter().try_fold(self, |node, name| node.get(name))
    }

    /// Field names of an object node; empty for leaves
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let fields: &[(String, AttributeTree)] = match self {
            Self::Object(fields) => fields,
            Self::Leaf(_) => &[],
        };
        fields.iter().map(|(key, _)| key.as_str())
    }

    #[allow(dead_code)] // Read API for decoded upstream bodies
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    #[allow(dead_code)] // Read API for decoded upstream bodies
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Leaf(value) => Some(value),
            Self::Object(_) => None,
        }
    }

    #[allow(dead_code)] // Read API for decoded upstream bodies
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// Rebuild the equivalent JSON value
    #[allow(dead_code)] // Read API for decoded upstream bodies
    pub fn to_value(&self) -> Value {
        match self {
            Self::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_value()))
                    .collect::<Map<String, Value>>(),
            ),
            Self::Leaf(value) => value.clone(),
        }
    }
}

impl Serialize for AttributeTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        match self {
            Self::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, child) in fields {
                    map.serialize_entry(key, child)?;
                }
                map.end()
            }
            Self::Leaf(value) => value.serialize(serializer),
        }
    }
}
