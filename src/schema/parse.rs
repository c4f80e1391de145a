//! Parsing: validating an input value against a schema
//!
//! `parse` walks the schema and the input together, collecting every issue
//! it finds instead of stopping at the first. On success it returns a
//! canonical copy of the input: defaults substituted, unknown keys handled
//! per the object's policy. All-or-nothing: a single issue anywhere means
//! no output at all, and the input is never changed either way.
//!
//! Parsing is deterministic. The same schema and input always produce the
//! same output or the same issues in the same order.

use std::collections::BTreeMap;

use super::errors::{Issue, IssueCode, IssuePath, PathSegment, ValidationError};
use super::types::{
    ArraySchema, EnumSchema, Field, NumberSchema, ObjectSchema, Schema, StringSchema,
    UnknownKeyPolicy,
};
use crate::value::Value;

/// Outcome of `safe_parse`: a tagged success or failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// The canonical output value
    Success(Value),
    /// Every issue found in the input
    Failure(ValidationError),
}

impl ParseOutcome {
    /// True on success.
    pub fn is_success(&self) -> bool {
        matches!(self, ParseOutcome::Success(_))
    }

    /// The canonical output, when successful.
    pub fn data(&self) -> Option<&Value> {
        match self {
            ParseOutcome::Success(value) => Some(value),
            ParseOutcome::Failure(_) => None,
        }
    }

    /// The validation error, when failed.
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ParseOutcome::Success(_) => None,
            ParseOutcome::Failure(error) => Some(error),
        }
    }

    /// Converts into the equivalent `Result`.
    pub fn into_result(self) -> Result<Value, ValidationError> {
        match self {
            ParseOutcome::Success(value) => Ok(value),
            ParseOutcome::Failure(error) => Err(error),
        }
    }
}

impl Schema {
    /// Validates `input` against this schema.
    ///
    /// Returns the canonical output on success. On failure the error
    /// carries every issue found, in walk order.
    pub fn parse(&self, input: &Value) -> Result<Value, ValidationError> {
        let mut walk = Walk::new();
        let output = walk.check_schema(self, input);
        finish(output, walk.issues)
    }

    /// Like `parse`, but the outcome is a plain value instead of `Err`.
    pub fn safe_parse(&self, input: &Value) -> ParseOutcome {
        match self.parse(input) {
            Ok(value) => ParseOutcome::Success(value),
            Err(error) => ParseOutcome::Failure(error),
        }
    }

    /// Converts from JSON first, then parses. The extended `$date`,
    /// `$bigint` and `$undefined` forms are recognized during conversion.
    pub fn parse_json(&self, input: &serde_json::Value) -> Result<Value, ValidationError> {
        self.parse(&Value::from(input.clone()))
    }
}

impl ObjectSchema {
    /// Validates `input` against this object schema.
    pub fn parse(&self, input: &Value) -> Result<Value, ValidationError> {
        let mut walk = Walk::new();
        let output = walk.check_object(self, input);
        finish(output, walk.issues)
    }

    /// Like `parse`, but the outcome is a plain value instead of `Err`.
    pub fn safe_parse(&self, input: &Value) -> ParseOutcome {
        match self.parse(input) {
            Ok(value) => ParseOutcome::Success(value),
            Err(error) => ParseOutcome::Failure(error),
        }
    }

    /// Converts from JSON first, then parses.
    pub fn parse_json(&self, input: &serde_json::Value) -> Result<Value, ValidationError> {
        self.parse(&Value::from(input.clone()))
    }
}

fn finish(output: Option<Value>, issues: Vec<Issue>) -> Result<Value, ValidationError> {
    match output {
        Some(value) if issues.is_empty() => Ok(value),
        _ => Err(ValidationError::new(issues)),
    }
}

/// What checking one object field produced.
enum FieldOutcome {
    /// Key goes into the output with this value
    Set(Value),
    /// Key stays out of the output
    Omit,
    /// One or more issues were reported
    Fail,
}

/// One walk over schema and input.
///
/// `path` tracks the current location; every reported issue snapshots it.
/// Checks return `None` after reporting, so siblings keep being checked
/// while the failed subtree produces no output.
struct Walk {
    path: Vec<PathSegment>,
    issues: Vec<Issue>,
}

impl Walk {
    fn new() -> Self {
        Walk {
            path: Vec::new(),
            issues: Vec::new(),
        }
    }

    fn here(&self) -> IssuePath {
        IssuePath::from(self.path.as_slice())
    }

    fn report(&mut self, code: IssueCode, message: String) {
        let path = self.here();
        self.issues.push(Issue::new(path, code, message));
    }

    fn fail_type(&mut self, expected: &str, actual: &Value) -> Option<Value> {
        let path = self.here();
        self.issues
            .push(Issue::type_mismatch(path, expected, actual.type_name()));
        None
    }

    fn check_schema(&mut self, schema: &Schema, value: &Value) -> Option<Value> {
        match schema {
            Schema::String(config) => self.check_string(config, value),
            Schema::Number(config) => self.check_number(config, value),
            Schema::Boolean => match value {
                Value::Bool(b) => Some(Value::Bool(*b)),
                other => self.fail_type("boolean", other),
            },
            Schema::Date => match value {
                Value::Date(d) => Some(Value::Date(*d)),
                other => self.fail_type("date", other),
            },
            Schema::BigInt => match value {
                Value::BigInt(i) => Some(Value::BigInt(*i)),
                other => self.fail_type("bigint", other),
            },
            Schema::Null => match value {
                Value::Null => Some(Value::Null),
                other => self.fail_type("null", other),
            },
            Schema::Undefined => match value {
                Value::Undefined => Some(Value::Undefined),
                other => self.fail_type("undefined", other),
            },
            Schema::Void => match value {
                Value::Undefined => Some(Value::Undefined),
                other => self.fail_type("void", other),
            },
            Schema::Enum(config) => self.check_enum(config, value),
            Schema::Array(config) => self.check_array(config, value),
            Schema::Object(config) => self.check_object(config, value),
        }
    }

    fn check_string(&mut self, config: &StringSchema, value: &Value) -> Option<Value> {
        let text = match value {
            Value::String(s) => s,
            other => return self.fail_type("string", other),
        };

        // Lengths count chars, not bytes.
        let count = text.chars().count();
        let mut ok = true;

        if let Some(length) = config.length {
            if count != length {
                self.report(
                    IssueCode::SizeOutOfBounds,
                    format!("expected exactly {} chars, got {}", length, count),
                );
                ok = false;
            }
        }
        if let Some(min) = config.min {
            if count < min {
                self.report(
                    IssueCode::SizeOutOfBounds,
                    format!("expected at least {} chars, got {}", min, count),
                );
                ok = false;
            }
        }
        if let Some(max) = config.max {
            if count > max {
                self.report(
                    IssueCode::SizeOutOfBounds,
                    format!("expected at most {} chars, got {}", max, count),
                );
                ok = false;
            }
        }
        if let Some(pattern) = &config.pattern {
            if !pattern.is_match(text) {
                self.report(
                    IssueCode::PatternMismatch,
                    format!("string does not match pattern '{}'", pattern.as_str()),
                );
                ok = false;
            }
        }

        if ok {
            Some(Value::String(text.clone()))
        } else {
            None
        }
    }

    fn check_number(&mut self, config: &NumberSchema, value: &Value) -> Option<Value> {
        let number = match value {
            Value::Number(n) => *n,
            other => return self.fail_type("number", other),
        };

        let mut ok = true;
        if let Some(min) = config.min {
            if number < min {
                self.report(
                    IssueCode::ValueOutOfRange,
                    format!("expected at least {}, got {}", min, number),
                );
                ok = false;
            }
        }
        if let Some(max) = config.max {
            if number > max {
                self.report(
                    IssueCode::ValueOutOfRange,
                    format!("expected at most {}, got {}", max, number),
                );
                ok = false;
            }
        }

        if ok {
            Some(Value::Number(number))
        } else {
            None
        }
    }

    fn check_enum(&mut self, config: &EnumSchema, value: &Value) -> Option<Value> {
        let text = match value {
            Value::String(s) => s,
            other => return self.fail_type("string", other),
        };

        if config.values.iter().any(|member| member == text) {
            Some(Value::String(text.clone()))
        } else {
            let path = self.here();
            self.issues
                .push(Issue::enum_mismatch(path, &config.values, text));
            None
        }
    }

    fn check_array(&mut self, config: &ArraySchema, value: &Value) -> Option<Value> {
        let items = match value {
            Value::Array(items) => items,
            other => return self.fail_type("array", other),
        };

        let count = items.len();
        let mut ok = true;

        if let Some(length) = config.length {
            if count != length {
                self.report(
                    IssueCode::SizeOutOfBounds,
                    format!("expected exactly {} elements, got {}", length, count),
                );
                ok = false;
            }
        }
        if let Some(min) = config.min {
            if count < min {
                self.report(
                    IssueCode::SizeOutOfBounds,
                    format!("expected at least {} elements, got {}", min, count),
                );
                ok = false;
            }
        }
        if let Some(max) = config.max {
            if count > max {
                self.report(
                    IssueCode::SizeOutOfBounds,
                    format!("expected at most {} elements, got {}", max, count),
                );
                ok = false;
            }
        }

        // Elements are checked even when the size is wrong, so element
        // issues are never masked by a size issue.
        let mut output = Vec::with_capacity(count);
        for (index, item) in items.iter().enumerate() {
            self.path.push(PathSegment::Index(index));
            match self.check_schema(&config.element, item) {
                Some(element) => output.push(element),
                None => ok = false,
            }
            self.path.pop();
        }

        if ok {
            Some(Value::Array(output))
        } else {
            None
        }
    }

    fn check_object(&mut self, config: &ObjectSchema, value: &Value) -> Option<Value> {
        let entries = match value {
            Value::Object(entries) => entries,
            other => return self.fail_type("object", other),
        };

        let mut output = BTreeMap::new();
        let mut ok = true;

        for (name, field) in &config.fields {
            self.path.push(PathSegment::Key(name.clone()));
            match self.check_field(field, entries.get(name)) {
                FieldOutcome::Set(value) => {
                    output.insert(name.clone(), value);
                }
                FieldOutcome::Omit => {}
                FieldOutcome::Fail => ok = false,
            }
            self.path.pop();
        }

        for (key, value) in entries {
            if config.fields.contains_key(key) {
                continue;
            }
            match config.unknown_keys {
                UnknownKeyPolicy::Strip => {}
                UnknownKeyPolicy::Passthrough => {
                    output.insert(key.clone(), value.clone());
                }
                UnknownKeyPolicy::Strict => {
                    self.path.push(PathSegment::Key(key.clone()));
                    let path = self.here();
                    self.issues.push(Issue::unrecognized_key(path));
                    self.path.pop();
                    ok = false;
                }
            }
        }

        if ok {
            Some(Value::Object(output))
        } else {
            None
        }
    }

    /// Applies the field modifiers before the schema itself.
    ///
    /// A missing key and an explicit undefined share the default rule but
    /// raise different issues when the field is required: absence is a
    /// missing field, explicit undefined is a type mismatch.
    fn check_field(&mut self, field: &Field, present: Option<&Value>) -> FieldOutcome {
        match present {
            None | Some(Value::Undefined) => {
                if let Some(default) = &field.default {
                    // The default is validated like any other input.
                    return match self.check_field_value(field, default) {
                        Some(value) => FieldOutcome::Set(value),
                        None => FieldOutcome::Fail,
                    };
                }
                if field.optional || field.schema.accepts_undefined() {
                    return match present {
                        None => FieldOutcome::Omit,
                        Some(_) => FieldOutcome::Set(Value::Undefined),
                    };
                }
                let path = self.here();
                match present {
                    None => self
                        .issues
                        .push(Issue::missing_required(path, field.schema.type_name())),
                    Some(actual) => self.issues.push(Issue::type_mismatch(
                        path,
                        field.schema.type_name(),
                        actual.type_name(),
                    )),
                }
                FieldOutcome::Fail
            }
            Some(value) => match self.check_field_value(field, value) {
                Some(value) => FieldOutcome::Set(value),
                None => FieldOutcome::Fail,
            },
        }
    }

    /// Null short-circuits for nullable fields and is kept as null; the
    /// default is never substituted for an explicit null.
    fn check_field_value(&mut self, field: &Field, value: &Value) -> Option<Value> {
        if field.nullable && value.is_null() {
            return Some(Value::Null);
        }
        self.check_schema(&field.schema, value)
    }
}
