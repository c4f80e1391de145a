//! Validation error taxonomy
//!
//! A failed parse produces a single `ValidationError` carrying every issue
//! found in the input, in a deterministic order. Each issue pins down one
//! violation: a machine-readable code, the path of the offending location
//! and a human-readable message.

use std::fmt;

// ============================================================
// Issue Paths
// ============================================================

/// One step from a value to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object entry, by key
    Key(String),
    /// Array element, by zero-based index
    Index(usize),
}

/// Location of an issue inside the input value.
///
/// Displays as dotted keys with bracketed indices (`user.tags[2]`). The
/// empty path displays as `$root` and means the input value itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IssuePath {
    segments: Vec<PathSegment>,
}

impl IssuePath {
    /// The empty path, pointing at the input value itself.
    pub fn root() -> Self {
        IssuePath { segments: Vec::new() }
    }

    /// True when the path points at the input value itself.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The individual steps, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl From<Vec<PathSegment>> for IssuePath {
    fn from(segments: Vec<PathSegment>) -> Self {
        IssuePath { segments }
    }
}

impl From<&[PathSegment]> for IssuePath {
    fn from(segments: &[PathSegment]) -> Self {
        IssuePath { segments: segments.to_vec() }
    }
}

impl fmt::Display for IssuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "$root");
        }
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if position > 0 {
                        write!(f, ".{}", key)?;
                    } else {
                        write!(f, "{}", key)?;
                    }
                }
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

// ============================================================
// Issue Codes
// ============================================================

/// Machine-readable classification of a single validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCode {
    /// Value kind differs from the declared kind
    TypeMismatch,
    /// String length or array length outside the declared bounds
    SizeOutOfBounds,
    /// Required object field absent from the input
    MissingRequiredField,
    /// Key present in the input but not declared, under the strict policy
    UnrecognizedKey,
    /// String is not one of the declared enum members
    EnumMismatch,
    /// String does not match the declared pattern
    PatternMismatch,
    /// Number outside the declared numeric bounds
    ValueOutOfRange,
}

impl IssueCode {
    /// Returns the stable code string for programmatic matching.
    pub fn code(&self) -> &'static str {
        match self {
            IssueCode::TypeMismatch => "TYPE_MISMATCH",
            IssueCode::SizeOutOfBounds => "SIZE_OUT_OF_BOUNDS",
            IssueCode::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            IssueCode::UnrecognizedKey => "UNRECOGNIZED_KEY",
            IssueCode::EnumMismatch => "ENUM_MISMATCH",
            IssueCode::PatternMismatch => "PATTERN_MISMATCH",
            IssueCode::ValueOutOfRange => "VALUE_OUT_OF_RANGE",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================
// Issues
// ============================================================

/// A single violation found while parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// Where in the input the violation occurred
    pub path: IssuePath,
    /// What kind of violation it is
    pub code: IssueCode,
    /// Human-readable description
    pub message: String,
}

impl Issue {
    /// Creates an issue with a pre-composed message.
    pub fn new(path: impl Into<IssuePath>, code: IssueCode, message: impl Into<String>) -> Self {
        Issue {
            path: path.into(),
            code,
            message: message.into(),
        }
    }

    /// The input value has a different kind than the schema declares.
    pub fn type_mismatch(path: impl Into<IssuePath>, expected: &str, actual: &str) -> Self {
        Issue::new(
            path,
            IssueCode::TypeMismatch,
            format!("expected {}, got {}", expected, actual),
        )
    }

    /// A required field is absent from the input object.
    pub fn missing_required(path: impl Into<IssuePath>, expected: &str) -> Self {
        Issue::new(
            path,
            IssueCode::MissingRequiredField,
            format!("required field of type {} is missing", expected),
        )
    }

    /// A key is present in the input but not declared, under `strict`.
    pub fn unrecognized_key(path: impl Into<IssuePath>) -> Self {
        Issue::new(
            path,
            IssueCode::UnrecognizedKey,
            "key is not declared in the schema",
        )
    }

    /// A string is not a member of the declared enum.
    pub fn enum_mismatch(path: impl Into<IssuePath>, allowed: &[String], actual: &str) -> Self {
        let members: Vec<String> = allowed.iter().map(|m| format!("\"{}\"", m)).collect();
        Issue::new(
            path,
            IssueCode::EnumMismatch,
            format!("expected one of [{}], got \"{}\"", members.join(", "), actual),
        )
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

// ============================================================
// Validation Errors
// ============================================================

/// The aggregate outcome of a failed parse.
///
/// Holds every issue found, in input-walk order: for each object the
/// declared fields in key order first, then unrecognized keys in key order;
/// array elements in index order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    issues: Vec<Issue>,
}

impl ValidationError {
    pub fn new(issues: Vec<Issue>) -> Self {
        ValidationError { issues }
    }

    /// All issues, in deterministic order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Number of issues found.
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// The first issue in walk order, if any.
    pub fn first(&self) -> Option<&Issue> {
        self.issues.first()
    }

    /// True when an issue with the given code is present.
    pub fn has_code(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.issues.len() == 1 { "issue" } else { "issues" };
        write!(f, "validation failed with {} {}", self.issues.len(), noun)?;
        for issue in &self.issues {
            write!(f, "\n  {}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
