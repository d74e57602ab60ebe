//! Parameter values and their type tags

use super::Array;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Declared parameter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTag {
    Keyword,
    Integer,
    Double,
    String,
    FilePath,
    Array,
    Record,
    Keystring,
    /// Every occurrence of a repeating parameter
    List,
}

impl ValueTag {
    /// Whether values of this type are written on a single line
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            ValueTag::Keyword
                | ValueTag::Integer
                | ValueTag::Double
                | ValueTag::String
                | ValueTag::FilePath
        )
    }
}

/// Sub-parameter values of a record or keystring, keyed by lowercase name
pub type Fields = IndexMap<String, Value>;

/// A loaded parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Flag; `true` when the keyword was present
    Keyword(bool),
    Integer(i64),
    Double(f64),
    String(String),
    FilePath(PathBuf),
    Array(Array),
    Record(Fields),
    Keystring(Fields),
    /// Occurrences of a repeating parameter, in file order
    List(Vec<Value>),
}

impl Value {
    /// Get the tag for this value
    pub fn tag(&self) -> ValueTag {
        match self {
            Value::Keyword(_) => ValueTag::Keyword,
            Value::Integer(_) => ValueTag::Integer,
            Value::Double(_) => ValueTag::Double,
            Value::String(_) => ValueTag::String,
            Value::FilePath(_) => ValueTag::FilePath,
            Value::Array(_) => ValueTag::Array,
            Value::Record(_) => ValueTag::Record,
            Value::Keystring(_) => ValueTag::Keystring,
            Value::List(_) => ValueTag::List,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Keyword(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Doubles, and integers widened to f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Double(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Value::FilePath(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Sub-values of a record or keystring
    pub fn as_fields(&self) -> Option<&Fields> {
        match self {
            Value::Record(f) | Value::Keystring(f) => Some(f),
            _ => None,
        }
    }

    /// Get a nested value by dot-separated path (e.g., "r.ri")
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for key in path.split('.') {
            current = current.as_fields()?.get(&key.to_ascii_lowercase())?;
        }
        Some(current)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Keyword(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<PathBuf> for Value {
    fn from(v: PathBuf) -> Self {
        Value::FilePath(v)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Value::Array(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_get_is_case_insensitive() {
        let mut fields = Fields::new();
        fields.insert("ri".into(), Value::Integer(2));
        fields.insert("rk".into(), Value::Keyword(true));
        let record = Value::Record(fields);

        assert_eq!(record.get("RI").and_then(Value::as_int), Some(2));
        assert_eq!(record.get("rk").and_then(Value::as_bool), Some(true));
        assert!(record.get("missing").is_none());
        assert!(Value::Integer(1).get("x").is_none());
    }

    #[test]
    fn integers_widen_to_float() {
        assert_eq!(Value::Integer(3).as_float(), Some(3.0));
        assert_eq!(Value::String("3".into()).as_float(), None);
    }
}
