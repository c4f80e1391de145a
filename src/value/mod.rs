//! Dynamic value domain for schema validation
//!
//! Inputs to the validator are arbitrary in-memory values. The `Value` enum
//! models every kind the contract distinguishes, which is a superset of JSON:
//! `undefined`, `bigint` and `date` exist as first-class kinds so that type
//! checks on them are exact rather than convention-based.
//!
//! For interchange with JSON files an extended notation is used for the
//! non-JSON kinds:
//! - `{"$date": "<rfc3339>"}` round-trips `Value::Date`
//! - `{"$bigint": "<digits>"}` round-trips `Value::BigInt`
//! - `{"$undefined": true}` round-trips `Value::Undefined`
//!
//! A single-key object in exactly one of these forms converts to the special
//! value; every other object converts verbatim.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A dynamic value as seen by the validator.
///
/// Values are immutable from the validator's point of view: parsing borrows
/// the input and produces a fresh canonical output.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null
    Null,
    /// Explicit undefined; a missing object key behaves as undefined
    Undefined,
    /// Boolean
    Bool(bool),
    /// 64-bit floating point number (the single numeric kind)
    Number(f64),
    /// Arbitrary-magnitude integer kind, distinct from `Number`
    BigInt(i128),
    /// UTF-8 string
    String(String),
    /// Point in time with timezone, normalized to UTC
    Date(DateTime<Utc>),
    /// Ordered sequence of values
    Array(Vec<Value>),
    /// String-keyed mapping with deterministic (sorted) key order
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the kind name used in validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Returns true for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for `Value::Undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Borrows the string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrows the elements, if this is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows the entries, if this is an object.
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Converts to a `serde_json::Value`, using the extended notation for
    /// the kinds JSON cannot express directly.
    ///
    /// Numbers with an integral value serialize as JSON integers. A number
    /// that JSON cannot represent (NaN or infinity) serializes as null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Undefined => serde_json::json!({ "$undefined": true }),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => {
                if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 {
                    serde_json::Value::Number(serde_json::Number::from(*n as i64))
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null)
                }
            }
            Value::BigInt(i) => serde_json::json!({ "$bigint": i.to_string() }),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => serde_json::json!({ "$date": d.to_rfc3339() }),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(entries) => {
                let mut map = serde_json::Map::new();
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_json());
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

/// Recognizes the extended single-key forms on conversion from JSON.
fn special_from_json(map: &serde_json::Map<String, serde_json::Value>) -> Option<Value> {
    if map.len() != 1 {
        return None;
    }

    if let Some(raw) = map.get("$date").and_then(|v| v.as_str()) {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(Value::Date(parsed.with_timezone(&Utc)));
        }
    }

    if let Some(raw) = map.get("$bigint").and_then(|v| v.as_str()) {
        if let Ok(parsed) = raw.parse::<i128>() {
            return Some(Value::BigInt(parsed));
        }
    }

    if map.get("$undefined").and_then(|v| v.as_bool()) == Some(true) {
        return Some(Value::Undefined);
    }

    None
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Value::Number(f),
                None => Value::Null,
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                if let Some(special) = special_from_json(&map) {
                    return special;
                }
                Value::Object(
                    map.into_iter()
                        .map(|(key, value)| (key, Value::from(value)))
                        .collect(),
                )
            }
        }
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

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::BigInt(n)
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

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::Object(entries)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Ok(Value::from(json))
    }
}
