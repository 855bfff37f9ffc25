//! Field-name validation.
//!
//! Every builder runs each field name through [`check_key`] before using it:
//! the name must be an identifier and must not shadow a reserved member or a
//! member the enum already has.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use enumforge_foundation::{Error, Result};

/// Member names every enum already carries.
pub const RESERVED: &[&str] = &[
    "values",
    "keys",
    "entries",
    "match",
    "size",
    "metadata",
    "schema",
    "constructor",
    "prototype",
    "toString",
    "valueOf",
    "hasOwnProperty",
    "__proto__",
];

/// Names already defined on the enum under construction.
#[derive(Clone, Debug, Default)]
pub struct KeyScope {
    taken: HashSet<Arc<str>>,
}

impl KeyScope {
    /// Creates an empty scope (only reserved names are taken).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the name is reserved or already defined.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        RESERVED.contains(&key) || self.taken.contains(key)
    }

    /// Records a newly defined member.
    pub fn insert(&mut self, key: Arc<str>) {
        self.taken.insert(key);
    }
}

/// Returns true if `key` matches `[A-Za-z_$][A-Za-z0-9_$]*`.
#[must_use]
pub fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Validates a field name against identifier syntax and the scope.
///
/// `position` is echoed in the error to locate the field: the field index
/// for enum fields, depth and name for nested payload keys.
///
/// # Errors
/// Returns `InvalidKey` for malformed names and `ReservedKey` for names that
/// would shadow an existing member.
pub fn check_key(key: &str, position: impl fmt::Display, scope: &KeyScope) -> Result<()> {
    if !is_identifier(key) {
        return Err(Error::invalid_key(key, position));
    }
    if scope.contains(key) {
        return Err(Error::reserved_key(key, position));
    }
    Ok(())
}

/// Non-raising form of [`check_key`].
#[must_use]
pub fn is_valid_key(key: &str, scope: &KeyScope) -> bool {
    is_identifier(key) && !scope.contains(key)
}
