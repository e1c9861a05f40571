//! Traverser values flowing between pipeline steps.
//!
//! The host hands each step one `TraverserValue` at a time. Steps dispatch on
//! the variant instead of inspecting types at runtime.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The current item of a traversal step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TraverserValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<TraverserValue>),
    Map(IndexMap<String, TraverserValue>),
    Null,
}

impl TraverserValue {
    /// Name of the runtime variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            TraverserValue::String(_) => "String",
            TraverserValue::Int(_) => "Integer",
            TraverserValue::Float(_) => "Float",
            TraverserValue::Bool(_) => "Boolean",
            TraverserValue::List(_) => "List",
            TraverserValue::Map(_) => "Map",
            TraverserValue::Null => "Null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TraverserValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TraverserValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for TraverserValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraverserValue::String(s) => write!(f, "{}", s),
            TraverserValue::Int(i) => write!(f, "{}", i),
            TraverserValue::Float(fl) => write!(f, "{}", fl),
            TraverserValue::Bool(b) => write!(f, "{}", b),
            TraverserValue::List(l) => write!(f, "{:?}", l),
            TraverserValue::Map(m) => write!(f, "{:?}", m),
            TraverserValue::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for TraverserValue {
    fn from(s: &str) -> Self {
        TraverserValue::String(s.to_string())
    }
}

impl From<String> for TraverserValue {
    fn from(s: String) -> Self {
        TraverserValue::String(s)
    }
}

impl From<i64> for TraverserValue {
    fn from(i: i64) -> Self {
        TraverserValue::Int(i)
    }
}

impl From<Option<String>> for TraverserValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(TraverserValue::Null, TraverserValue::String)
    }
}

impl From<serde_json::Value> for TraverserValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => TraverserValue::String(s),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    TraverserValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    TraverserValue::Float(f)
                } else {
                    TraverserValue::Null
                }
            }
            serde_json::Value::Bool(b) => TraverserValue::Bool(b),
            serde_json::Value::Array(arr) => {
                TraverserValue::List(arr.into_iter().map(TraverserValue::from).collect())
            }
            serde_json::Value::Object(map) => TraverserValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, TraverserValue::from(v)))
                    .collect(),
            ),
            serde_json::Value::Null => TraverserValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_value() {
        let value = TraverserValue::from(json!({"name": "marko", "age": 29, "tags": [true, null]}));

        let TraverserValue::Map(map) = value else {
            panic!("expected map");
        };
        assert_eq!(map.get("name"), Some(&TraverserValue::from("marko")));
        assert_eq!(map.get("age"), Some(&TraverserValue::Int(29)));
        assert_eq!(
            map.get("tags"),
            Some(&TraverserValue::List(vec![TraverserValue::Bool(true), TraverserValue::Null]))
        );
    }

    #[test]
    fn test_deserialize_untagged() {
        let values: Vec<TraverserValue> = serde_json::from_str(r#"["a", 1, 1.5, false, null]"#).unwrap();

        assert_eq!(
            values,
            vec![
                TraverserValue::from("a"),
                TraverserValue::Int(1),
                TraverserValue::Float(1.5),
                TraverserValue::Bool(false),
                TraverserValue::Null,
            ]
        );
    }

    #[test]
    fn test_type_name() {
        assert_eq!(TraverserValue::from("x").type_name(), "String");
        assert_eq!(TraverserValue::Int(42).type_name(), "Integer");
        assert_eq!(TraverserValue::Null.type_name(), "Null");
        assert_eq!(TraverserValue::List(vec![]).type_name(), "List");
    }

    #[test]
    fn test_accessors() {
        assert!(TraverserValue::Null.is_null());
        assert!(!TraverserValue::from("").is_null());
        assert_eq!(TraverserValue::from("marko").as_str(), Some("marko"));
        assert_eq!(TraverserValue::Int(1).as_str(), None);
        assert_eq!(TraverserValue::Null.as_str(), None);
    }

    #[test]
    fn test_from_option_string() {
        assert_eq!(TraverserValue::from(None::<String>), TraverserValue::Null);
        assert_eq!(
            TraverserValue::from(Some("el".to_string())),
            TraverserValue::from("el")
        );
    }
}
