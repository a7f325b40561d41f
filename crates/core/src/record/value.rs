use std::fmt;
use serde::ser::{Serialize, SerializeSeq, Serializer};

use super::Record;

/// Largest magnitude at which every integral f64 is exactly representable.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A dynamically typed field value.
///
/// `Display` renders the canonical string form that filters compare
/// against and that the text and logfmt renderers print.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Record),
}

impl Value {
    /// Short name of the value kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Canonical string form, used by filters, stats and the text renderers.
/// Numbers are plain decimals and never use an exponent.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Array(_) | Value::Object(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(record) => record.serialize(serializer),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            // Without arbitrary_precision every JSON number has an f64 view.
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(Record::from(map)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_strings() {
        assert_eq!(Value::from("plain").to_string(), "plain");
        assert_eq!(Value::Number(42.0).to_string(), "42");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
        assert_eq!(Value::Number(1704067200.0).to_string(), "1704067200");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn test_canonical_numbers_never_use_exponents() {
        assert_eq!(Value::Number(1e300).to_string(), format!("1{}", "0".repeat(300)));
        assert_eq!(Value::Number(1.5e20).to_string(), "150000000000000000000");
        assert_eq!(Value::Number(1e-7).to_string(), "0.0000001");
        assert_eq!(Value::Number(-2.5e-3).to_string(), "-0.0025");
    }

    #[test]
    fn test_nested_values_render_as_compact_json() {
        let inner: Record = [("b", 1.0)].into_iter().collect();
        assert_eq!(Value::Object(inner).to_string(), r#"{"b":1}"#);

        let list = Value::Array(vec![Value::from("x"), Value::Number(2.5), Value::Null]);
        assert_eq!(list.to_string(), r#"["x",2.5,null]"#);
    }

    #[test]
    fn test_integral_numbers_serialize_as_integers() {
        assert_eq!(serde_json::to_string(&Value::Number(2.0)).unwrap(), "2");
        assert_eq!(serde_json::to_string(&Value::Number(-7.0)).unwrap(), "-7");
        assert_eq!(serde_json::to_string(&Value::Number(0.25)).unwrap(), "0.25");
        assert_eq!(serde_json::to_string(&Value::Number(1e300)).unwrap(), "1e300");
    }

    #[test]
    fn test_from_json_preserves_kinds() {
        let json: serde_json::Value =
            serde_json::from_str(r#"[1, "two", false, null, {"k": [3]}]"#).unwrap();
        let value = Value::from(json);
        let Value::Array(items) = value else {
            panic!("expected array");
        };
        let kinds: Vec<&str> = items.iter().map(Value::kind).collect();
        assert_eq!(kinds, vec!["number", "string", "boolean", "null", "object"]);
    }
}
