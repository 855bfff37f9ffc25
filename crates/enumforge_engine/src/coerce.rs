//! The coercion ontology: the fixed set of conversions a schema leaf can name.

use std::fmt;
use std::sync::Arc;

use enumforge_foundation::cast;
use enumforge_foundation::{Boxed, Value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named conversion applied to a payload leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Coercion {
    /// String cast.
    Str,
    /// Boxed string.
    String,
    /// First character of the string cast.
    Char,
    /// Number cast.
    Float,
    /// Boxed number.
    Num,
    /// Floor of the number cast.
    Int,
    /// Base-2 digits.
    Bin,
    /// Base-16 digits.
    Hex,
    /// Base-8 digits.
    Oct,
    /// Truthiness.
    Bool,
    /// Boxed truthiness.
    Boolean,
}

impl Coercion {
    /// The whole ontology.
    pub const ALL: [Coercion; 11] = [
        Coercion::Str,
        Coercion::String,
        Coercion::Char,
        Coercion::Float,
        Coercion::Num,
        Coercion::Int,
        Coercion::Bin,
        Coercion::Hex,
        Coercion::Oct,
        Coercion::Bool,
        Coercion::Boolean,
    ];

    /// Returns the tag naming this coercion in an example payload.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::String => "string",
            Self::Char => "char",
            Self::Float => "float",
            Self::Num => "num",
            Self::Int => "int",
            Self::Bin => "bin",
            Self::Hex => "hex",
            Self::Oct => "oct",
            Self::Bool => "bool",
            Self::Boolean => "boolean",
        }
    }

    /// Looks up a coercion by tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag() == tag)
    }

    /// Picks the coercion an example leaf names, defaulting to [`Coercion::Str`].
    ///
    /// Only strings (bare or boxed) can name a coercion; every other leaf
    /// falls back to the string cast.
    #[must_use]
    pub fn resolve_or_str(example: &Value) -> Self {
        match example {
            Value::String(tag) | Value::Boxed(Boxed::String(tag)) => {
                Self::from_tag(tag).unwrap_or(Self::Str)
            }
            _ => Self::Str,
        }
    }

    /// Applies the coercion. Total: every input yields a value.
    #[must_use]
    pub fn apply(self, input: &Value) -> Value {
        match self {
            Self::Str => Value::String(Arc::from(cast::to_string(input))),
            Self::String => Value::Boxed(Boxed::String(Arc::from(cast::to_string(input)))),
            Self::Char => cast::to_string(input)
                .chars()
                .next()
                .map_or(Value::Undefined, |c| Value::String(Arc::from(c.to_string()))),
            Self::Float => Value::Float(cast::to_number(input)),
            Self::Num => Value::Boxed(Boxed::Number(cast::to_number(input))),
            Self::Int => floor(cast::to_number(input)),
            Self::Bin => radix(input, 2),
            Self::Hex => radix(input, 16),
            Self::Oct => radix(input, 8),
            Self::Bool => Value::Bool(cast::to_boolean(input)),
            Self::Boolean => Value::Boxed(Boxed::Bool(cast::to_boolean(input))),
        }
    }
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Applies the coercion named by `tag`, or `None` for an unknown tag.
#[must_use]
pub fn coerce(tag: &str, input: &Value) -> Option<Value> {
    Coercion::from_tag(tag).map(|c| c.apply(input))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn floor(n: f64) -> Value {
    let floored = n.floor();
    if floored.is_finite() && floored >= i64::MIN as f64 && floored < i64::MAX as f64 {
        Value::Int(floored as i64)
    } else {
        Value::Float(floored)
    }
}

// Numbers print in the radix; strings are already digits and pass through.
fn radix(input: &Value, base: u32) -> Value {
    let digits = match input {
        Value::Int(n) => cast::int_to_radix(*n, base),
        Value::Float(n) | Value::Boxed(Boxed::Number(n)) => cast::number_to_radix(*n, base),
        Value::String(s) | Value::Boxed(Boxed::String(s)) => return Value::String(s.clone()),
        other => cast::to_string(other),
    };
    Value::String(Arc::from(digits))
}
