//! Primitive Type Tests
//!
//! Kind checks and refinements for the leaf schemas:
//! - Strings with min/max/exact length, patterns, and defaults
//! - Numbers with range bounds, bigints as a distinct kind
//! - Dates, booleans, null, undefined, and void
//! - Optional, nullable, and default field modifiers

use chrono::{TimeZone, Utc};
use conform::schema::{IssueCode, Schema};
use conform::value::Value;
use serde_json::json;

// =============================================================================
// Kind Matching Tests
// =============================================================================

/// A string field accepts a string.
#[test]
fn test_string_field_accepts_string() {
    let schema = Schema::object().field("username", Schema::string());
    let output = schema
        .parse_json(&json!({ "username": "Nicholas" }))
        .unwrap();

    assert_eq!(output, Value::from(json!({ "username": "Nicholas" })));
}

/// A string field rejects a number with a type mismatch.
#[test]
fn test_string_field_rejects_number() {
    let schema = Schema::object().field("username", Schema::string());
    let error = schema.parse_json(&json!({ "username": 1 })).unwrap_err();

    assert_eq!(error.issue_count(), 1);
    assert_eq!(error.issues()[0].code, IssueCode::TypeMismatch);
    assert_eq!(
        error.issues()[0].message,
        "expected string, got number"
    );
}

/// Every primitive kind validates in one document.
#[test]
fn test_all_primitive_kinds_together() {
    let schema = Schema::object()
        .field("count", Schema::number())
        .field("big", Schema::bigint())
        .field("flag", Schema::boolean())
        .field("when", Schema::date())
        .field("nothing", Schema::null())
        .field("absent", Schema::undefined())
        .field("gap", Schema::void());

    let output = schema
        .parse_json(&json!({
            "count": 1.5,
            "big": { "$bigint": "9007199254740993" },
            "flag": true,
            "when": { "$date": "2024-06-01T12:00:00Z" },
            "nothing": null
        }))
        .unwrap();

    let fields = output.as_object().unwrap();
    assert_eq!(fields.get("count"), Some(&Value::Number(1.5)));
    assert_eq!(fields.get("big"), Some(&Value::BigInt(9007199254740993)));
    assert_eq!(fields.get("flag"), Some(&Value::Bool(true)));
    assert_eq!(
        fields.get("when"),
        Some(&Value::Date(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()))
    );
    assert_eq!(fields.get("nothing"), Some(&Value::Null));
    // Undefined-accepting fields may simply be left out.
    assert!(!fields.contains_key("absent"));
    assert!(!fields.contains_key("gap"));
}

/// An undefined field accepts the explicit undefined form and keeps it.
#[test]
fn test_explicit_undefined_is_kept() {
    let schema = Schema::object().field("gap", Schema::void());
    let output = schema
        .parse_json(&json!({ "gap": { "$undefined": true } }))
        .unwrap();

    assert_eq!(
        output.as_object().unwrap().get("gap"),
        Some(&Value::Undefined)
    );
}

// =============================================================================
// String Refinement Tests
// =============================================================================

/// Bounds plus a default: an absent field becomes the empty string.
#[test]
fn test_string_bounds_with_empty_default() {
    let schema =
        Schema::object().field("note", Schema::string().min(0).max(5).default_value(""));

    let output = schema.parse_json(&json!({})).unwrap();
    assert_eq!(output, Value::from(json!({ "note": "" })));

    let error = schema.parse_json(&json!({ "note": "abcdef" })).unwrap_err();
    assert_eq!(error.issues()[0].code, IssueCode::SizeOutOfBounds);
}

/// An exact length accepts only that length.
#[test]
fn test_string_exact_length() {
    let schema = Schema::object().field("code", Schema::string().length(3));

    assert!(schema.parse_json(&json!({ "code": "abc" })).is_ok());
    assert!(schema.parse_json(&json!({ "code": "ab" })).is_err());
    assert!(schema.parse_json(&json!({ "code": "abcd" })).is_err());
}

/// A pattern must match the whole anchored expression.
#[test]
fn test_string_pattern() {
    let schema = Schema::object().field(
        "slug",
        Schema::string().pattern(regex::Regex::new("^[a-z]+$").unwrap()),
    );

    assert!(schema.parse_json(&json!({ "slug": "abc" })).is_ok());

    let error = schema.parse_json(&json!({ "slug": "Abc" })).unwrap_err();
    assert_eq!(error.issues()[0].code, IssueCode::PatternMismatch);
}

// =============================================================================
// Number Refinement Tests
// =============================================================================

/// Range bounds are inclusive on both ends.
#[test]
fn test_number_range_bounds() {
    let schema = Schema::object().field("score", Schema::number().min(0.0).max(10.0));

    assert!(schema.parse_json(&json!({ "score": 0 })).is_ok());
    assert!(schema.parse_json(&json!({ "score": 10 })).is_ok());

    let low = schema.parse_json(&json!({ "score": -1 })).unwrap_err();
    assert_eq!(low.issues()[0].code, IssueCode::ValueOutOfRange);

    let high = schema.parse_json(&json!({ "score": 11 })).unwrap_err();
    assert_eq!(high.issues()[0].code, IssueCode::ValueOutOfRange);
}

/// Numbers and bigints are distinct kinds in both directions.
#[test]
fn test_number_and_bigint_do_not_mix() {
    let number = Schema::object().field("n", Schema::number());
    let bigint = Schema::object().field("n", Schema::bigint());

    let error = number
        .parse_json(&json!({ "n": { "$bigint": "7" } }))
        .unwrap_err();
    assert_eq!(error.issues()[0].message, "expected number, got bigint");

    let error = bigint.parse_json(&json!({ "n": 7 })).unwrap_err();
    assert_eq!(error.issues()[0].message, "expected bigint, got number");
}

// =============================================================================
// Date Tests
// =============================================================================

/// A date field takes the tagged date form, not a bare timestamp string.
#[test]
fn test_date_rejects_plain_string() {
    let schema = Schema::object().field("when", Schema::date());

    assert!(schema
        .parse_json(&json!({ "when": { "$date": "2024-06-01T12:00:00Z" } }))
        .is_ok());

    let error = schema
        .parse_json(&json!({ "when": "2024-06-01T12:00:00Z" }))
        .unwrap_err();
    assert_eq!(error.issues()[0].message, "expected date, got string");
}

// =============================================================================
// Field Modifier Tests
// =============================================================================

/// A nullable field accepts null and keeps it in the output.
#[test]
fn test_nullable_field_accepts_null() {
    let schema = Schema::object().field("nickname", Schema::string().nullable());
    let output = schema.parse_json(&json!({ "nickname": null })).unwrap();

    assert_eq!(
        output.as_object().unwrap().get("nickname"),
        Some(&Value::Null)
    );
}

/// A default never replaces an explicit null.
#[test]
fn test_default_does_not_replace_explicit_null() {
    let schema = Schema::object().field(
        "nickname",
        Schema::string().default_value("anon").nullable(),
    );

    let output = schema.parse_json(&json!({ "nickname": null })).unwrap();
    assert_eq!(
        output.as_object().unwrap().get("nickname"),
        Some(&Value::Null)
    );

    let output = schema.parse_json(&json!({})).unwrap();
    assert_eq!(output, Value::from(json!({ "nickname": "anon" })));
}

/// Explicit null on a non-nullable field is a type mismatch.
#[test]
fn test_null_on_non_nullable_field() {
    let schema = Schema::object().field("name", Schema::string());
    let error = schema.parse_json(&json!({ "name": null })).unwrap_err();

    assert_eq!(error.issues()[0].code, IssueCode::TypeMismatch);
    assert_eq!(error.issues()[0].message, "expected string, got null");
}

/// An optional field may be absent, but is validated when present.
#[test]
fn test_optional_field() {
    let schema = Schema::object().field("age", Schema::number().optional());

    let output = schema.parse_json(&json!({})).unwrap();
    assert!(!output.as_object().unwrap().contains_key("age"));

    let output = schema.parse_json(&json!({ "age": 30 })).unwrap();
    assert_eq!(output.as_object().unwrap().get("age"), Some(&Value::Number(30.0)));

    let error = schema.parse_json(&json!({ "age": "old" })).unwrap_err();
    assert_eq!(error.issues()[0].code, IssueCode::TypeMismatch);
}

/// An optional field keeps an explicit undefined.
#[test]
fn test_optional_field_keeps_explicit_undefined() {
    let schema = Schema::object().field("age", Schema::number().optional());
    let output = schema
        .parse_json(&json!({ "age": { "$undefined": true } }))
        .unwrap();

    assert_eq!(output.as_object().unwrap().get("age"), Some(&Value::Undefined));
}

/// Absence and explicit undefined are reported differently on a required
/// field.
#[test]
fn test_missing_versus_explicit_undefined() {
    let schema = Schema::object().field("name", Schema::string());

    let absent = schema.parse_json(&json!({})).unwrap_err();
    assert_eq!(absent.issues()[0].code, IssueCode::MissingRequiredField);
    assert_eq!(
        absent.issues()[0].message,
        "required field of type string is missing"
    );

    let explicit = schema
        .parse_json(&json!({ "name": { "$undefined": true } }))
        .unwrap_err();
    assert_eq!(explicit.issues()[0].code, IssueCode::TypeMismatch);
    assert_eq!(
        explicit.issues()[0].message,
        "expected string, got undefined"
    );
}
