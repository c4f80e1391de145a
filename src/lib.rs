//! conform - a strict, composable runtime schema validator
//!
//! Schemas are immutable values describing the shape of dynamic data.
//! `parse` validates an input against a schema all-or-nothing, collecting
//! every issue instead of stopping at the first, and returns a canonical
//! output with defaults substituted and unknown keys handled per policy.

pub mod cli;
pub mod registry;
pub mod schema;
pub mod value;
