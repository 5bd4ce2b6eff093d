//! Scalar parameter values and parameter sets.
//!
//! Parameter providers return raw JSON; the factory validates the shape and
//! lowers it into `ParameterSet`s. A parameter set is an ordered sequence of
//! named scalars and is immutable once resolved.

use serde::{Deserialize, Serialize};

/// A scalar parameter value.
///
/// Only scalars are allowed as parameter values; anything deeper fails
/// metadata validation with the concrete type name of the offender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// String
    Str(String),
}

impl ParamValue {
    /// Build from a raw JSON value, rejecting non-scalars.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(ParamValue::Null),
            serde_json::Value::Bool(b) => Some(ParamValue::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(ParamValue::Int(i))
                } else {
                    n.as_f64().map(ParamValue::Float)
                }
            }
            serde_json::Value::String(s) => Some(ParamValue::Str(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    /// Numeric view for comparisons, where one exists.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(i) => Some(*i as f64),
            ParamValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Encode as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ParamValue::Null => serde_json::Value::Null,
            ParamValue::Bool(b) => serde_json::Value::Bool(*b),
            ParamValue::Int(i) => serde_json::Value::from(*i),
            ParamValue::Float(f) => serde_json::Value::from(*f),
            ParamValue::Str(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Null => write!(f, "null"),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Type name of a raw JSON value as reported in validation errors.
///
/// These names are load-bearing: downstream tooling matches on the exact
/// strings (`"NULL"`, `"object"`, ...), so they follow the historical
/// convention rather than Rust type names.
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "NULL",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "double"
            }
        }
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// An ordered sequence of named scalar values.
///
/// Produced by invoking a parameter provider; immutable once resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    values: Vec<(String, ParamValue)>,
}

impl ParameterSet {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Create from named values, preserving order.
    pub fn from_pairs(values: Vec<(String, ParamValue)>) -> Self {
        Self { values }
    }

    /// Look up a value by name.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Iterate over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of values in the set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Combine two sets into one, used when taking the cross-provider
    /// product. Later values win on name collision.
    pub fn merged_with(&self, other: &ParameterSet) -> ParameterSet {
        let mut values = self.values.clone();
        for (name, value) in &other.values {
            if let Some(slot) = values.iter_mut().find(|(n, _)| n == name) {
                slot.1 = value.clone();
            } else {
                values.push((name.clone(), value.clone()));
            }
        }
        ParameterSet { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_from_json() {
        assert_eq!(ParamValue::from_json(&json!(null)), Some(ParamValue::Null));
        assert_eq!(
            ParamValue::from_json(&json!("hi")),
            Some(ParamValue::Str("hi".to_string()))
        );
        assert_eq!(ParamValue::from_json(&json!(3)), Some(ParamValue::Int(3)));
        assert_eq!(
            ParamValue::from_json(&json!(1.5)),
            Some(ParamValue::Float(1.5))
        );
        assert_eq!(ParamValue::from_json(&json!([1])), None);
        assert_eq!(ParamValue::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "NULL");
        assert_eq!(json_type_name(&json!(true)), "boolean");
        assert_eq!(json_type_name(&json!(1)), "integer");
        assert_eq!(json_type_name(&json!(1.5)), "double");
        assert_eq!(json_type_name(&json!("x")), "string");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }

    #[test]
    fn test_merge_preserves_order() {
        let a = ParameterSet::from_pairs(vec![("foo".into(), ParamValue::Int(1))]);
        let b = ParameterSet::from_pairs(vec![
            ("bar".into(), ParamValue::Int(2)),
            ("foo".into(), ParamValue::Int(3)),
        ]);
        let merged = a.merged_with(&b);
        let names: Vec<_> = merged.iter().map(|(n, _)| n.to_string()).collect();
        assert_eq!(names, vec!["foo", "bar"]);
        assert_eq!(merged.get("foo"), Some(&ParamValue::Int(3)));
    }
}
