//! Built values
//!
//! The result of instantiating a tree: scalars, ordered containers, and
//! opaque objects returned by registered constructors.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::instance::{BuiltObject, PulseError};

/// A fully built value
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i32),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Text(String),
    Array(Vec<Value>),
    /// First-insertion key order; a repeated key keeps its slot and takes the later value
    Map(IndexMap<String, Value>),
    Object(BuiltObject),
}

impl Value {
    /// Semantic type used by overload selection
    pub fn semantic_type(&self) -> ArgType {
        match self {
            Value::Integer(_) => ArgType::Integer,
            Value::Long(_) => ArgType::Long,
            Value::Double(_) => ArgType::Double,
            Value::Boolean(_) => ArgType::Boolean,
            Value::Text(_) => ArgType::Text,
            Value::Array(_) => ArgType::Array,
            Value::Map(_) => ArgType::Map,
            Value::Object(obj) => ArgType::Object(obj.type_name().to_string()),
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// 64-bit view, widening 32-bit integers
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(l) => Some(*l),
            Value::Integer(i) => Some(i64::from(*i)),
            _ => None,
        }
    }

    /// Floating view, widening integers
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            Value::Integer(i) => Some(f64::from(*i)),
            // i64 -> f64 may round for magnitudes above 2^53
            Value::Long(l) => Some(*l as f64),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BuiltObject> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Trigger the value's unit of work, if it has one
    pub fn pulse(&self) -> Result<(), PulseError> {
        match self {
            Value::Object(obj) => obj.pulse(),
            other => Err(PulseError::NotAnInstance {
                type_name: other.semantic_type().to_string(),
            }),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.same_object(b),
            _ => false,
        }
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i)
    }
}

impl From<i64> for Value {
    fn from(l: i64) -> Self {
        Value::Long(l)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

// =============================================================================
// SEMANTIC TYPES
// =============================================================================

/// Semantic type of a built argument, as seen by overload selection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArgType {
    Integer,
    Long,
    Double,
    Boolean,
    Text,
    Array,
    Map,
    /// Object built by a registered constructor, keyed by its type name
    Object(String),
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgType::Integer => f.write_str("Integer"),
            ArgType::Long => f.write_str("Long"),
            ArgType::Double => f.write_str("Double"),
            ArgType::Boolean => f.write_str("Boolean"),
            ArgType::Text => f.write_str("String"),
            ArgType::Array => f.write_str("Array"),
            ArgType::Map => f.write_str("Map"),
            ArgType::Object(name) => f.write_str(name),
        }
    }
}

/// `Integer, Long` style list for diagnostics
pub fn join_types(types: &[ArgType]) -> String {
    types
        .iter()
        .map(ArgType::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widening_views() {
        assert_eq!(Value::Integer(7).as_long(), Some(7));
        assert_eq!(Value::Integer(7).as_double(), Some(7.0));
        assert_eq!(Value::Long(7).as_integer(), None);
        assert_eq!(Value::Double(1.5).as_long(), None);
    }

    #[test]
    fn test_semantic_types() {
        assert_eq!(Value::from("x").semantic_type(), ArgType::Text);
        assert_eq!(Value::from(8i64).semantic_type(), ArgType::Long);
        let obj = Value::Object(BuiltObject::new("com.Foo", 1u8));
        assert_eq!(obj.semantic_type(), ArgType::Object("com.Foo".to_string()));
    }

    #[test]
    fn test_join_types() {
        assert_eq!(
            join_types(&[ArgType::Integer, ArgType::Text, ArgType::Object("a.B".into())]),
            "Integer, String, a.B"
        );
        assert_eq!(join_types(&[]), "");
    }

    #[test]
    fn test_map_last_wins_keeps_first_slot() {
        let mut map = IndexMap::new();
        map.insert("a".to_string(), Value::Integer(1));
        map.insert("b".to_string(), Value::Integer(2));
        map.insert("a".to_string(), Value::Integer(3));
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map["a"], Value::Integer(3));
    }

    #[test]
    fn test_pulse_on_scalar_fails() {
        let err = Value::Integer(1).pulse().unwrap_err();
        assert!(matches!(err, PulseError::NotAnInstance { ref type_name } if type_name == "Integer"));
    }
}
