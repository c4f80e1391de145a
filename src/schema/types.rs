//! Schema type definitions
//!
//! A schema is an immutable description of the shape a value must have.
//! Supported kinds:
//! - string: UTF-8 string, with optional length bounds and pattern
//! - number: 64-bit floating point, with optional value bounds
//! - boolean, date, bigint, null, undefined, void
//! - enum: closed set of string members
//! - array: homogeneous array with element schema and length bounds
//! - object: named fields with per-field modifiers and an unknown-key policy
//!
//! Construction is fluent and by value. Kinds that carry refinements are
//! built through their own config type (`Schema::string().min(1).max(5)`),
//! which converts into `Schema` or `Field` wherever one is expected.
//! Composite schemas share subtrees through `Arc`, so deriving one schema
//! from another never copies the parts they have in common.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::Value;

/// Supported schema kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Schema {
    /// UTF-8 string with optional refinements
    String(StringSchema),
    /// 64-bit floating point number with optional bounds
    Number(NumberSchema),
    /// Boolean
    Boolean,
    /// Point in time
    Date,
    /// Arbitrary-magnitude integer, distinct from number
    BigInt,
    /// Exactly the null value
    Null,
    /// Exactly the undefined value
    Undefined,
    /// Accepts undefined; the kind of "no meaningful value"
    Void,
    /// Closed set of string members
    Enum(EnumSchema),
    /// Homogeneous array with element schema
    Array(ArraySchema),
    /// Object with named fields
    Object(ObjectSchema),
}

impl Schema {
    /// Starts a string schema. Refine with `min`, `max`, `length`, `pattern`.
    pub fn string() -> StringSchema {
        StringSchema::default()
    }

    /// Starts a number schema. Refine with `min` and `max`.
    pub fn number() -> NumberSchema {
        NumberSchema::default()
    }

    /// A boolean schema.
    pub fn boolean() -> Schema {
        Schema::Boolean
    }

    /// A date schema.
    pub fn date() -> Schema {
        Schema::Date
    }

    /// A bigint schema.
    pub fn bigint() -> Schema {
        Schema::BigInt
    }

    /// A schema matching exactly the null value.
    pub fn null() -> Schema {
        Schema::Null
    }

    /// A schema matching exactly the undefined value.
    pub fn undefined() -> Schema {
        Schema::Undefined
    }

    /// A schema for "no meaningful value"; accepts undefined.
    pub fn void() -> Schema {
        Schema::Void
    }

    /// A schema matching one of a closed set of string members.
    pub fn enumeration<I, S>(members: I) -> Schema
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Schema::Enum(EnumSchema {
            values: members.into_iter().map(Into::into).collect(),
        })
    }

    /// Starts an array schema over the given element schema.
    pub fn array(element: impl Into<Schema>) -> ArraySchema {
        ArraySchema {
            element: Arc::new(element.into()),
            min: None,
            max: None,
            length: None,
        }
    }

    /// Starts an empty object schema.
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    /// Returns the kind name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::String(_) => "string",
            Schema::Number(_) => "number",
            Schema::Boolean => "boolean",
            Schema::Date => "date",
            Schema::BigInt => "bigint",
            Schema::Null => "null",
            Schema::Undefined => "undefined",
            Schema::Void => "void",
            Schema::Enum(_) => "enum",
            Schema::Array(_) => "array",
            Schema::Object(_) => "object",
        }
    }

    /// True when the kind accepts the undefined value on its own.
    pub fn accepts_undefined(&self) -> bool {
        matches!(self, Schema::Undefined | Schema::Void)
    }

    /// Validates the schema description itself (not an input value).
    ///
    /// Catches contradictions that would make every parse fail or that
    /// signal a typo in a schema file: inverted bounds, empty or duplicated
    /// enum members, empty field names.
    pub fn validate_structure(&self) -> Result<(), String> {
        match self {
            Schema::String(s) => check_bounds(s.min, s.max),
            Schema::Number(n) => {
                if let (Some(min), Some(max)) = (n.min, n.max) {
                    if min > max {
                        return Err(format!("min {} exceeds max {}", min, max));
                    }
                }
                Ok(())
            }
            Schema::Enum(e) => {
                if e.values.is_empty() {
                    return Err("enum must declare at least one member".into());
                }
                let mut seen = HashSet::new();
                for member in &e.values {
                    if !seen.insert(member.as_str()) {
                        return Err(format!("enum member '{}' is declared twice", member));
                    }
                }
                Ok(())
            }
            Schema::Array(a) => {
                check_bounds(a.min, a.max)?;
                a.element
                    .validate_structure()
                    .map_err(|e| format!("array element: {}", e))
            }
            Schema::Object(o) => {
                for (name, field) in &o.fields {
                    if name.is_empty() {
                        return Err("field name cannot be empty".into());
                    }
                    field
                        .schema
                        .validate_structure()
                        .map_err(|e| format!("field '{}': {}", name, e))?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Wraps into a field that may be absent.
    pub fn optional(self) -> Field {
        Field::new(self).optional()
    }

    /// Wraps into a field that also accepts null.
    pub fn nullable(self) -> Field {
        Field::new(self).nullable()
    }

    /// Wraps into a field with a default for absent or undefined input.
    pub fn default_value(self, value: impl Into<Value>) -> Field {
        Field::new(self).default_value(value)
    }
}

fn check_bounds(min: Option<usize>, max: Option<usize>) -> Result<(), String> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(format!("min {} exceeds max {}", min, max));
        }
    }
    Ok(())
}

// ============================================================
// Kind Configurations
// ============================================================

/// String refinements. Lengths count Unicode scalar values, not bytes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StringSchema {
    /// Minimum length, inclusive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    /// Maximum length, inclusive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
    /// Exact length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Full-match is not implied; the pattern matches anywhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<StringPattern>,
}

impl StringSchema {
    /// Sets the inclusive minimum length.
    pub fn min(mut self, n: usize) -> Self {
        self.min = Some(n);
        self
    }

    /// Sets the inclusive maximum length.
    pub fn max(mut self, n: usize) -> Self {
        self.max = Some(n);
        self
    }

    /// Sets the exact length.
    pub fn length(mut self, n: usize) -> Self {
        self.length = Some(n);
        self
    }

    /// Sets the pattern the string must match.
    pub fn pattern(mut self, regex: Regex) -> Self {
        self.pattern = Some(StringPattern::new(regex));
        self
    }

    pub fn optional(self) -> Field {
        Field::new(self).optional()
    }

    pub fn nullable(self) -> Field {
        Field::new(self).nullable()
    }

    pub fn default_value(self, value: impl Into<Value>) -> Field {
        Field::new(self).default_value(value)
    }
}

/// Number refinements. Bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NumberSchema {
    /// Minimum value, inclusive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Maximum value, inclusive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl NumberSchema {
    /// Sets the inclusive minimum value.
    pub fn min(mut self, n: f64) -> Self {
        self.min = Some(n);
        self
    }

    /// Sets the inclusive maximum value.
    pub fn max(mut self, n: f64) -> Self {
        self.max = Some(n);
        self
    }

    pub fn optional(self) -> Field {
        Field::new(self).optional()
    }

    pub fn nullable(self) -> Field {
        Field::new(self).nullable()
    }

    pub fn default_value(self, value: impl Into<Value>) -> Field {
        Field::new(self).default_value(value)
    }
}

/// Closed set of string members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumSchema {
    /// Allowed members, in declaration order
    pub values: Vec<String>,
}

/// Homogeneous array refinements. Bounds are inclusive element counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArraySchema {
    /// Schema every element must satisfy
    pub element: Arc<Schema>,
    /// Minimum element count, inclusive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    /// Maximum element count, inclusive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
    /// Exact element count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
}

impl ArraySchema {
    /// Sets the inclusive minimum element count.
    pub fn min(mut self, n: usize) -> Self {
        self.min = Some(n);
        self
    }

    /// Sets the inclusive maximum element count.
    pub fn max(mut self, n: usize) -> Self {
        self.max = Some(n);
        self
    }

    /// Sets the exact element count.
    pub fn length(mut self, n: usize) -> Self {
        self.length = Some(n);
        self
    }

    pub fn optional(self) -> Field {
        Field::new(self).optional()
    }

    pub fn nullable(self) -> Field {
        Field::new(self).nullable()
    }

    pub fn default_value(self, value: impl Into<Value>) -> Field {
        Field::new(self).default_value(value)
    }
}

// ============================================================
// Object Schemas
// ============================================================

/// What parsing does with input keys no field declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeyPolicy {
    /// Drop unknown keys from the output (the default)
    Strip,
    /// Copy unknown keys into the output unvalidated
    Passthrough,
    /// Reject the input with one issue per unknown key
    Strict,
}

impl UnknownKeyPolicy {
    fn is_strip(policy: &UnknownKeyPolicy) -> bool {
        *policy == UnknownKeyPolicy::Strip
    }
}

impl Default for UnknownKeyPolicy {
    fn default() -> Self {
        UnknownKeyPolicy::Strip
    }
}

/// Object schema: named fields plus an unknown-key policy.
///
/// Field order is the key order of the map, which makes issue order and
/// serialization deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectSchema {
    /// Declared fields by name
    #[serde(default)]
    pub fields: BTreeMap<String, Field>,
    /// Unknown-key handling, strip unless declared otherwise
    #[serde(default, skip_serializing_if = "UnknownKeyPolicy::is_strip")]
    pub unknown_keys: UnknownKeyPolicy,
}

impl ObjectSchema {
    /// Creates an empty object schema with the strip policy.
    pub fn new() -> Self {
        ObjectSchema {
            fields: BTreeMap::new(),
            unknown_keys: UnknownKeyPolicy::Strip,
        }
    }

    /// Adds or replaces a field. Accepts anything convertible to a field,
    /// so both `Schema::string()` and `Schema::string().optional()` work.
    pub fn field(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        self.fields.insert(name.into(), field.into());
        self
    }

    /// True when a field with the given name is declared.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Declared field names in key order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn optional(self) -> Field {
        Field::new(self).optional()
    }

    pub fn nullable(self) -> Field {
        Field::new(self).nullable()
    }

    pub fn default_value(self, value: impl Into<Value>) -> Field {
        Field::new(self).default_value(value)
    }
}

// ============================================================
// Fields
// ============================================================

/// A schema plus the modifiers that only make sense on an object field.
///
/// The schema part is shared, so cloning a field or deriving a schema from
/// one that contains it is cheap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Schema the field value must satisfy
    #[serde(flatten)]
    pub schema: Arc<Schema>,
    /// Absence and explicit undefined are accepted
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    /// Explicit null is accepted and kept as null
    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
    /// Substituted when the field is absent or explicitly undefined
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl Field {
    /// Creates a required field with no modifiers.
    pub fn new(schema: impl Into<Schema>) -> Self {
        Field {
            schema: Arc::new(schema.into()),
            optional: false,
            nullable: false,
            default: None,
        }
    }

    /// Marks the field as allowed to be absent or explicitly undefined.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Marks the field as also accepting null. Null is kept as null and is
    /// never replaced by the default.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets the value substituted when the field is absent or explicitly
    /// undefined. The substituted value is validated like any other input.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

impl From<Schema> for Field {
    fn from(schema: Schema) -> Self {
        Field::new(schema)
    }
}

impl From<StringSchema> for Field {
    fn from(config: StringSchema) -> Self {
        Field::new(config)
    }
}

impl From<NumberSchema> for Field {
    fn from(config: NumberSchema) -> Self {
        Field::new(config)
    }
}

impl From<ArraySchema> for Field {
    fn from(config: ArraySchema) -> Self {
        Field::new(config)
    }
}

impl From<ObjectSchema> for Field {
    fn from(config: ObjectSchema) -> Self {
        Field::new(config)
    }
}

impl From<StringSchema> for Schema {
    fn from(config: StringSchema) -> Self {
        Schema::String(config)
    }
}

impl From<NumberSchema> for Schema {
    fn from(config: NumberSchema) -> Self {
        Schema::Number(config)
    }
}

impl From<ArraySchema> for Schema {
    fn from(config: ArraySchema) -> Self {
        Schema::Array(config)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(config: ObjectSchema) -> Self {
        Schema::Object(config)
    }
}

// ============================================================
// String Patterns
// ============================================================

/// A compiled regex that serializes as its pattern source.
#[derive(Debug, Clone)]
pub struct StringPattern {
    regex: Regex,
}

impl StringPattern {
    pub fn new(regex: Regex) -> Self {
        StringPattern { regex }
    }

    /// Compiles a pattern source.
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        Ok(StringPattern {
            regex: Regex::new(pattern)?,
        })
    }

    /// The original pattern source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// True when the pattern matches anywhere in the text.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl From<Regex> for StringPattern {
    fn from(regex: Regex) -> Self {
        StringPattern::new(regex)
    }
}

impl PartialEq for StringPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for StringPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StringPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        StringPattern::compile(&source)
            .map_err(|e| D::Error::custom(format!("invalid pattern '{}': {}", source, e)))
    }
}
