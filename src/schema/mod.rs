//! Schema subsystem: the immutable schema model and its operations
//!
//! # Design Principles
//!
//! - Schemas are values; every transform returns a new schema
//! - Parsing is all-or-nothing and collects every issue, not just the first
//! - No implicit coercion between kinds
//! - Deterministic: same schema and input, same outcome
//!
//! The pieces:
//!
//! - `types`: the schema tree, fields and modifiers, unknown-key policies
//! - `combinators`: pure object-schema transforms (partial, pick, merge, ...)
//! - `parse`: the validation walk behind `parse` and `safe_parse`
//! - `errors`: issues, issue paths and the aggregate `ValidationError`

mod combinators;
mod errors;
mod parse;
mod types;

pub use errors::{Issue, IssueCode, IssuePath, PathSegment, ValidationError};
pub use parse::ParseOutcome;
pub use types::{
    ArraySchema, EnumSchema, Field, NumberSchema, ObjectSchema, Schema, StringPattern,
    StringSchema, UnknownKeyPolicy,
};
