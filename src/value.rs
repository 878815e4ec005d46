use std::fmt;

use serde_json::{Map, Number, Value};

/// A decoded document: objects keep the key order they had in the source text.
#[derive(Debug, Clone, PartialEq)]
pub enum NestedValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<NestedValue>),
    Object(Vec<(String, NestedValue)>),
}

impl NestedValue {
    pub fn as_object(&self) -> Option<&[(String, NestedValue)]> {
        match self {
            NestedValue::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Field lookup on an object. Anything else has no fields.
    pub fn get(&self, key: &str) -> Option<&NestedValue> {
        self.as_object()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Compact JSON text, the same form `serde_json` would print.
    pub fn to_json_text(&self) -> String {
        Value::from(self).to_string()
    }
}

impl From<Value> for NestedValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => NestedValue::Null,
            Value::Bool(b) => NestedValue::Bool(b),
            Value::Number(n) => NestedValue::Number(n),
            Value::String(s) => NestedValue::String(s),
            Value::Array(items) => NestedValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                NestedValue::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&NestedValue> for Value {
    fn from(value: &NestedValue) -> Self {
        match value {
            NestedValue::Null => Value::Null,
            NestedValue::Bool(b) => Value::Bool(*b),
            NestedValue::Number(n) => Value::Number(n.clone()),
            NestedValue::String(s) => Value::String(s.clone()),
            NestedValue::Array(items) => Value::Array(items.iter().map(Into::into).collect()),
            NestedValue::Object(fields) => {
                let mut map = Map::with_capacity(fields.len());
                for (k, v) in fields {
                    map.insert(k.clone(), v.into());
                }
                Value::Object(map)
            }
        }
    }
}

/// One table cell.
///
/// `Blank` stands for null or absent. It renders as `""` just like an empty
/// string, but writers can still tell the two apart (empty cell vs. empty text).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Scalar {
    #[default]
    Blank,
    Text(String),
    Number(Number),
    Bool(bool),
}

impl Scalar {
    pub fn is_blank(&self) -> bool {
        matches!(self, Scalar::Blank)
    }

    /// Cell value for an arbitrary field. Containers end up as their JSON text.
    pub fn from_field(value: Option<&NestedValue>) -> Self {
        match value {
            None | Some(NestedValue::Null) => Scalar::Blank,
            Some(NestedValue::Bool(b)) => Scalar::Bool(*b),
            Some(NestedValue::Number(n)) => Scalar::Number(n.clone()),
            Some(NestedValue::String(s)) => Scalar::Text(s.clone()),
            Some(other) => Scalar::Text(other.to_json_text()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Blank => Ok(()),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}
