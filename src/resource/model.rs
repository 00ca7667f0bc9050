//! Resource model
//!
//! A resource is the JSON object the server returned for it, tagged with the
//! kind it was fetched as. Nothing is added or merged client-side.

use crate::sgs::error::{Error, Result};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// A server-side resource
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    kind: &'static str,
    info: Map<String, Value>,
}

impl Resource {
    /// Wrap a JSON object returned by the server
    pub fn new(kind: &'static str, info: Map<String, Value>) -> Self {
        Self { kind, info }
    }

    /// Wrap a response value, which must be a JSON object
    pub fn from_value(kind: &'static str, value: Value) -> Result<Self> {
        match value {
            Value::Object(info) => Ok(Self::new(kind, info)),
            other => Err(Error::Decode(format!(
                "expected a {} object, got {}",
                kind,
                json_type(&other)
            ))),
        }
    }

    /// Display name of the kind, e.g. `Volume`
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Attribute lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.info.get(key)
    }

    /// Attribute lookup for string values
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.info.get(key).and_then(|v| v.as_str())
    }

    /// Opaque identifier; numeric ids are rendered as strings
    pub fn id(&self) -> Option<String> {
        match self.info.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn status(&self) -> Option<&str> {
        self.get_str("status")
    }

    /// Every attribute, in key order
    pub fn to_dict(&self) -> Map<String, Value> {
        self.info.clone()
    }

    pub fn into_dict(self) -> Map<String, Value> {
        self.info
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {}>", self.kind, Value::Object(self.info.clone()))
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.info.serialize(serializer)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn volume() -> Resource {
        Resource::from_value(
            "Volume",
            json!({"id": "vol-1", "name": "data", "status": "available", "size": 10}),
        )
        .unwrap()
    }

    #[test]
    fn test_attribute_access_matches_every_key() {
        let vol = volume();
        assert_eq!(vol.id().as_deref(), Some("vol-1"));
        assert_eq!(vol.name(), Some("data"));
        assert_eq!(vol.status(), Some("available"));
        assert_eq!(vol.get("size"), Some(&json!(10)));
        assert_eq!(vol.get("volume_type"), None);
        assert_eq!(vol.to_dict().len(), 4);
    }

    #[test]
    fn test_numeric_id() {
        let res = Resource::from_value("Backup", json!({"id": 42})).unwrap();
        assert_eq!(res.id().as_deref(), Some("42"));
        assert_eq!(res.name(), None);
    }

    #[test]
    fn test_equality_requires_same_kind_and_fields() {
        let a = volume();
        let b = volume();
        assert_eq!(a, b);

        let other_kind = Resource::new("Snapshot", a.to_dict());
        assert_ne!(a, other_kind);

        let mut fields = a.to_dict();
        fields.insert("status".to_string(), json!("error"));
        assert_ne!(a, Resource::new("Volume", fields));
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = Resource::from_value("Volume", json!(["vol-1"])).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_display_and_serialize() {
        let vol = Resource::from_value("Volume", json!({"id": "vol-1"})).unwrap();
        assert_eq!(vol.to_string(), r#"<Volume {"id":"vol-1"}>"#);
        assert_eq!(serde_json::to_value(&vol).unwrap(), json!({"id": "vol-1"}));
    }
}
