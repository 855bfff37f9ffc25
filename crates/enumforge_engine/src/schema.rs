//! Payload schemas: derivation from an example and application to input.
//!
//! A symbolic variant declared with a compound example (`{x: 'int', y:
//! 'int'}`) gets a [`Schema`] of the same shape whose leaves name coercions.
//! Constructing the variant walks the schema alongside the input, requiring
//! every schema field and coercing every leaf.

use std::fmt;
use std::sync::Arc;

use enumforge_foundation::{EnumConfig, Error, LtMap, Result, Value};
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::coerce::Coercion;
use crate::keys::{KeyScope, check_key};

/// Recursive description of a variant payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Schema {
    /// A single coerced value.
    Leaf(Coercion),
    /// Named fields, in declaration order.
    Record(Vec<(Arc<str>, Schema)>),
    /// Positional fields.
    List(Vec<Schema>),
}

impl Schema {
    /// Creates a record schema with one field per pair.
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<Arc<str>>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        Self::Record(fields.into_iter().map(|(k, s)| (k.into(), s)).collect())
    }

    /// Creates the `{value: coercion}` schema used by primitive payloads.
    #[must_use]
    pub fn single(coercion: Coercion) -> Self {
        Self::record([("value", Self::Leaf(coercion))])
    }

    /// Returns the coercion of a leaf.
    #[must_use]
    pub const fn coercion(&self) -> Option<Coercion> {
        match self {
            Self::Leaf(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns the sub-schema for a record field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Schema> {
        match self {
            Self::Record(fields) => fields
                .iter()
                .find(|(key, _)| &**key == name)
                .map(|(_, schema)| schema),
            Self::List(items) => name.parse::<usize>().ok().and_then(|i| items.get(i)),
            Self::Leaf(_) => None,
        }
    }

    /// Returns the nesting depth (a leaf is depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Record(fields) => 1 + fields.iter().map(|(_, s)| s.depth()).max().unwrap_or(0),
            Self::List(items) => 1 + items.iter().map(Schema::depth).max().unwrap_or(0),
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(c) => write!(f, "'{c}'"),
            Self::Record(fields) => {
                write!(f, "{{")?;
                for (i, (key, schema)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {key}: {schema}")?;
                }
                if fields.is_empty() {
                    write!(f, "}}")
                } else {
                    write!(f, " }}")
                }
            }
            Self::List(items) => {
                write!(f, "[")?;
                for (i, schema) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{schema}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Derives a schema from an example payload.
///
/// Objects become records and arrays become lists. Leaves that are strings
/// naming a coercion keep it; every other leaf (numbers, booleans, null,
/// markers, boxed numbers) becomes [`Coercion::Str`]. Object keys are
/// validated against `scope`, the members of the enum being built.
///
/// # Errors
/// Returns a key error for an invalid or reserved payload key, or
/// `SchemaTooDeep` when the example nests beyond the configured limit.
pub fn derive_schema(example: &Value, scope: &KeyScope, config: &EnumConfig) -> Result<Schema> {
    let schema = derive_at(example, scope, config, 0)?;
    trace!(schema = %schema, "derived payload schema");
    Ok(schema)
}

fn derive_at(example: &Value, scope: &KeyScope, config: &EnumConfig, depth: usize) -> Result<Schema> {
    if depth > config.max_schema_depth {
        return Err(Error::schema_too_deep(config.max_schema_depth));
    }
    match example {
        Value::Object(fields) => {
            let mut derived = Vec::with_capacity(fields.len());
            for (key, value) in fields.iter() {
                check_key(key, format_args!("{depth} {key}"), scope)?;
                derived.push((key.clone(), derive_at(value, scope, config, depth + 1)?));
            }
            Ok(Schema::Record(derived))
        }
        Value::Array(items) => items
            .iter()
            .map(|item| derive_at(item, scope, config, depth + 1))
            .collect::<Result<Vec<_>>>()
            .map(Schema::List),
        leaf => Ok(Schema::Leaf(Coercion::resolve_or_str(leaf))),
    }
}

/// Coerces `input` against `schema`, producing a tree of the schema's shape.
///
/// Fields the schema does not mention are dropped.
///
/// # Errors
/// Returns `MissingField` (naming the variant, field, and depth) when the
/// input lacks a schema field, and `ExpectedObject` when a nested schema
/// meets a primitive.
pub fn apply_schema(input: &Value, schema: &Schema, variant: &str) -> Result<Value> {
    apply_at(input, schema, variant, 0)
}

fn apply_at(input: &Value, schema: &Schema, variant: &str, depth: usize) -> Result<Value> {
    match schema {
        Schema::Leaf(coercion) => Ok(coercion.apply(input)),
        Schema::Record(fields) => {
            let mut out = LtMap::new();
            for (key, sub) in fields {
                let value = input
                    .field(key)
                    .ok_or_else(|| Error::missing_field(variant, key.to_string(), depth))?;
                out = out.insert(key.clone(), apply_field(value, sub, variant, key, depth)?);
            }
            Ok(Value::Object(out))
        }
        Schema::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, sub) in items.iter().enumerate() {
                let key = index.to_string();
                let value = input
                    .field(&key)
                    .ok_or_else(|| Error::missing_field(variant, key.as_str(), depth))?;
                out.push(apply_field(value, sub, variant, &key, depth)?);
            }
            Ok(Value::array(out))
        }
    }
}

fn apply_field(value: &Value, schema: &Schema, variant: &str, key: &str, depth: usize) -> Result<Value> {
    match schema {
        Schema::Leaf(coercion) => Ok(coercion.apply(value)),
        nested if value.is_compound() => apply_at(value, nested, variant, depth + 1),
        _ => Err(Error::expected_object(variant, key)),
    }
}
