//! Bitmask queries over integer masks.

use std::fmt;

use enumforge_foundation::Value;

use crate::flags::{Flag, MAX_FLAGS};

/// Outcome of a bitmask query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query<T> {
    /// At least one known bit was set.
    Found(Flagged<T>),
    /// No known bit was set; holds what the fallback returned.
    Fallback(Value),
}

impl<T> Query<T> {
    /// Returns true if any known bit was set.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns the matches, if any.
    #[must_use]
    pub const fn found(&self) -> Option<&Flagged<T>> {
        match self {
            Self::Found(items) => Some(items),
            Self::Fallback(_) => None,
        }
    }

    /// Returns the fallback result, if the fallback ran.
    #[must_use]
    pub const fn fallback(&self) -> Option<&Value> {
        match self {
            Self::Found(_) => None,
            Self::Fallback(value) => Some(value),
        }
    }

    /// Consumes the query, returning the matches.
    #[must_use]
    pub fn into_found(self) -> Option<Flagged<T>> {
        match self {
            Self::Found(items) => Some(items),
            Self::Fallback(_) => None,
        }
    }

    /// Maps every match, leaving a fallback result untouched.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Query<U> {
        match self {
            Self::Found(items) => Query::Found(items.map(f)),
            Self::Fallback(value) => Query::Fallback(value),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(items) => write!(f, "{items}"),
            Self::Fallback(value) => write!(f, "{value}"),
        }
    }
}

/// Matches of a bitmask query in ascending bit order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flagged<T> {
    items: Vec<T>,
}

impl<T> Flagged<T> {
    /// Returns the number of matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the matches as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterates the matches.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Consumes the view, returning the matches.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    fn map<U>(self, f: impl FnMut(T) -> U) -> Flagged<U> {
        Flagged {
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

impl<T: fmt::Display> Flagged<T> {
    /// Joins the matches with `", "`.
    #[must_use]
    pub fn print(&self) -> String {
        self.to_string()
    }
}

impl<T: fmt::Display> fmt::Display for Flagged<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

impl<'a, T> IntoIterator for &'a Flagged<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> From<Vec<T>> for Flagged<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

/// Returns true if every bit of `bit` is set in `mask`.
#[must_use]
pub fn has_bit(mask: i64, bit: u32) -> bool {
    let bit = i64::from(bit);
    mask | bit == mask
}

/// Tests the 32 single bits of `mask` in ascending order, collecting the
/// flags `lookup` knows.
pub fn scan_bits<F>(mask: i64, lookup: F) -> Vec<Flag>
where
    F: Fn(u32) -> Option<Flag>,
{
    (0..MAX_FLAGS)
        .map(|shift| 1u32 << shift)
        .filter(|&bit| has_bit(mask, bit))
        .filter_map(lookup)
        .collect()
}
