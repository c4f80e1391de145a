//! Combinator Transform Tests
//!
//! Object schemas derive new schemas without mutating the original:
//! - partial/required flip optionality across every field
//! - pick/omit select fields by name
//! - extend adds or overrides single fields
//! - merge unions two field sets; on collision the receiver wins

use conform::schema::{IssueCode, ObjectSchema, Schema, UnknownKeyPolicy};
use conform::value::Value;
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn abc_schema() -> ObjectSchema {
    Schema::object()
        .field("a", Schema::string())
        .field("b", Schema::string())
        .field("c", Schema::string())
}

// =============================================================================
// Partial / Required Tests
// =============================================================================

/// After partial, an empty document passes.
#[test]
fn test_partial_allows_empty_document() {
    let schema = abc_schema().partial();

    let output = schema.parse_json(&json!({})).unwrap();
    assert_eq!(output, Value::from(json!({})));
}

/// Partial fields are still validated when present.
#[test]
fn test_partial_still_checks_present_fields() {
    let schema = abc_schema().partial();
    let error = schema.parse_json(&json!({ "a": 1 })).unwrap_err();

    assert_eq!(error.issues()[0].code, IssueCode::TypeMismatch);
}

/// Applying partial twice is the same as applying it once.
#[test]
fn test_partial_is_idempotent() {
    let once = abc_schema().partial();
    let twice = once.partial();

    assert_eq!(once, twice);
    assert!(twice.parse_json(&json!({})).is_ok());
}

/// Required undoes partial.
#[test]
fn test_required_undoes_partial() {
    let schema = abc_schema().partial().required();
    let error = schema.parse_json(&json!({})).unwrap_err();

    assert_eq!(error.issue_count(), 3);
    assert!(error.has_code(IssueCode::MissingRequiredField));
}

// =============================================================================
// Pick / Omit Tests
// =============================================================================

/// Pick keeps only the named fields.
#[test]
fn test_pick_keeps_named_fields() {
    let schema = abc_schema().pick(["a", "b"]);

    assert_eq!(schema.field_names(), vec!["a", "b"]);
    assert!(schema.parse_json(&json!({ "a": "1", "b": "2" })).is_ok());
    assert!(schema.parse_json(&json!({ "a": "1" })).is_err());
}

/// Omit drops the named fields.
#[test]
fn test_omit_drops_named_fields() {
    let schema = abc_schema().omit(["c"]);

    assert_eq!(schema.field_names(), vec!["a", "b"]);
}

/// Pick and omit chain; dropped fields are stripped from input like any
/// other unknown key.
#[test]
fn test_pick_then_omit() {
    let schema = abc_schema().pick(["a", "b"]).omit(["a"]);

    assert_eq!(schema.field_names(), vec!["b"]);

    let output = schema
        .parse_json(&json!({ "a": "1", "b": "2", "c": "3" }))
        .unwrap();
    assert_eq!(output, Value::from(json!({ "b": "2" })));
}

// =============================================================================
// Extend Tests
// =============================================================================

/// Extend adds a new required field.
#[test]
fn test_extend_adds_field() {
    let schema = abc_schema().extend([("d", Schema::number())]);

    let output = schema
        .parse_json(&json!({ "a": "1", "b": "2", "c": "3", "d": 4 }))
        .unwrap();
    assert_eq!(
        output,
        Value::from(json!({ "a": "1", "b": "2", "c": "3", "d": 4 }))
    );

    let error = schema
        .parse_json(&json!({ "a": "1", "b": "2", "c": "3" }))
        .unwrap_err();
    assert_eq!(error.issues()[0].path.to_string(), "d");
}

/// Extend replaces an existing field of the same name.
#[test]
fn test_extend_overrides_existing_field() {
    let schema = abc_schema().extend([("a", Schema::number())]);

    assert!(schema
        .parse_json(&json!({ "a": 1, "b": "2", "c": "3" }))
        .is_ok());
    assert!(schema
        .parse_json(&json!({ "a": "1", "b": "2", "c": "3" }))
        .is_err());
}

// =============================================================================
// Merge Tests
// =============================================================================

/// Merge unions disjoint field sets.
#[test]
fn test_merge_unions_fields() {
    let de = Schema::object()
        .field("d", Schema::string())
        .field("e", Schema::string());
    let schema = de.merge(&abc_schema());

    assert_eq!(schema.field_names(), vec!["a", "b", "c", "d", "e"]);
    assert!(schema
        .parse_json(&json!({ "a": "1", "b": "2", "c": "3", "d": "4", "e": "5" }))
        .is_ok());
}

/// On a field collision the receiver's definition wins, in both orderings.
#[test]
fn test_merge_receiver_wins_in_both_orderings() {
    let as_string = Schema::object().field("dup", Schema::string());
    let as_number = Schema::object().field("dup", Schema::number());

    let string_wins = as_string.merge(&as_number);
    assert!(string_wins.parse_json(&json!({ "dup": "x" })).is_ok());
    assert!(string_wins.parse_json(&json!({ "dup": 1 })).is_err());

    let number_wins = as_number.merge(&as_string);
    assert!(number_wins.parse_json(&json!({ "dup": 1 })).is_ok());
    assert!(number_wins.parse_json(&json!({ "dup": "x" })).is_err());
}

/// Merge keeps the receiver's unknown-key policy.
#[test]
fn test_merge_keeps_receiver_policy() {
    let strict = abc_schema().strict();
    let loose = Schema::object()
        .field("d", Schema::string())
        .passthrough();

    let merged = strict.merge(&loose);
    assert_eq!(merged.unknown_keys, UnknownKeyPolicy::Strict);

    let error = merged
        .parse_json(&json!({ "a": "1", "b": "2", "c": "3", "d": "4", "extra": true }))
        .unwrap_err();
    assert_eq!(error.issues()[0].code, IssueCode::UnrecognizedKey);
}

// =============================================================================
// Purity Tests
// =============================================================================

/// No combinator changes the schema it was called on.
#[test]
fn test_combinators_leave_the_receiver_unchanged() {
    let original = abc_schema();
    let snapshot = original.clone();

    let _ = original.partial();
    let _ = original.pick(["a"]);
    let _ = original.omit(["a"]);
    let _ = original.extend([("d", Schema::number())]);
    let _ = original.merge(&Schema::object().field("z", Schema::string()));
    let _ = original.strict();

    assert_eq!(original, snapshot);
    assert!(original.parse_json(&json!({})).is_err());
}
