//! Pure object-schema transforms
//!
//! Every combinator borrows its receiver and returns a new schema; the
//! receiver is never changed. Field schemas are behind `Arc`, so the copies
//! share their subtrees instead of duplicating them.

use std::collections::HashSet;

use super::types::{Field, ObjectSchema, UnknownKeyPolicy};

impl ObjectSchema {
    /// A copy with every field optional.
    ///
    /// Already-optional fields stay optional, so applying this twice gives
    /// the same schema as applying it once.
    pub fn partial(&self) -> ObjectSchema {
        let mut fields = self.fields.clone();
        for field in fields.values_mut() {
            field.optional = true;
        }
        ObjectSchema {
            fields,
            unknown_keys: self.unknown_keys,
        }
    }

    /// A copy with every field required; the inverse of `partial`.
    pub fn required(&self) -> ObjectSchema {
        let mut fields = self.fields.clone();
        for field in fields.values_mut() {
            field.optional = false;
        }
        ObjectSchema {
            fields,
            unknown_keys: self.unknown_keys,
        }
    }

    /// A copy keeping only the named fields. Names that are not declared
    /// are ignored.
    pub fn pick<I, S>(&self, names: I) -> ObjectSchema
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keep: HashSet<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        let fields = self
            .fields
            .iter()
            .filter(|(name, _)| keep.contains(name.as_str()))
            .map(|(name, field)| (name.clone(), field.clone()))
            .collect();
        ObjectSchema {
            fields,
            unknown_keys: self.unknown_keys,
        }
    }

    /// A copy without the named fields. Names that are not declared are
    /// ignored.
    pub fn omit<I, S>(&self, names: I) -> ObjectSchema
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let drop: HashSet<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        let fields = self
            .fields
            .iter()
            .filter(|(name, _)| !drop.contains(name.as_str()))
            .map(|(name, field)| (name.clone(), field.clone()))
            .collect();
        ObjectSchema {
            fields,
            unknown_keys: self.unknown_keys,
        }
    }

    /// A copy with the given fields added. An addition with an existing
    /// name replaces that field.
    pub fn extend<I, N, F>(&self, additions: I) -> ObjectSchema
    where
        I: IntoIterator<Item = (N, F)>,
        N: Into<String>,
        F: Into<Field>,
    {
        let mut fields = self.fields.clone();
        for (name, field) in additions {
            fields.insert(name.into(), field.into());
        }
        ObjectSchema {
            fields,
            unknown_keys: self.unknown_keys,
        }
    }

    /// A copy holding the union of both schemas' fields.
    ///
    /// On a name collision the receiver's field wins, so `a.merge(&b)` and
    /// `b.merge(&a)` differ whenever the shared names disagree. The
    /// receiver's unknown-key policy carries over unchanged.
    pub fn merge(&self, other: &ObjectSchema) -> ObjectSchema {
        let mut fields = other.fields.clone();
        for (name, field) in &self.fields {
            fields.insert(name.clone(), field.clone());
        }
        ObjectSchema {
            fields,
            unknown_keys: self.unknown_keys,
        }
    }

    /// A copy that drops unknown keys from the output.
    pub fn strip(&self) -> ObjectSchema {
        self.with_policy(UnknownKeyPolicy::Strip)
    }

    /// A copy that keeps unknown keys in the output unvalidated.
    pub fn passthrough(&self) -> ObjectSchema {
        self.with_policy(UnknownKeyPolicy::Passthrough)
    }

    /// A copy that rejects inputs carrying unknown keys.
    pub fn strict(&self) -> ObjectSchema {
        self.with_policy(UnknownKeyPolicy::Strict)
    }

    fn with_policy(&self, policy: UnknownKeyPolicy) -> ObjectSchema {
        ObjectSchema {
            fields: self.fields.clone(),
            unknown_keys: policy,
        }
    }
}
