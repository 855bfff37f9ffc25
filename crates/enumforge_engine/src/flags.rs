//! Bitmask enums.
//!
//! Each field other than `0` is assigned the next power of two in
//! declaration order. The `0` field, when present, must be a function and
//! receives masks in which no known bit is set.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use enumforge_foundation::{Error, LtMap, NativeFn, Result, Value};

use crate::keys::{KeyScope, check_key};

/// Number of bits available to flags.
pub const MAX_FLAGS: usize = 32;

/// Field name of the fallback handler.
pub const FALLBACK_FIELD: &str = "0";

/// A member of a flags enum: a name bound to one bit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Flag {
    name: Arc<str>,
    bit: u32,
}

impl Flag {
    /// Creates a flag.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, bit: u32) -> Self {
        Self {
            name: name.into(),
            bit,
        }
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the shared field name.
    #[must_use]
    pub fn name_arc(&self) -> Arc<str> {
        self.name.clone()
    }

    /// Returns the bit value.
    #[must_use]
    pub const fn bit(&self) -> u32 {
        self.bit
    }
}

/// Prints as `name(bit)`.
impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.bit)
    }
}

/// Forward and reverse lookups of a built flags enum.
#[derive(Clone, Debug)]
pub struct FlagsTable {
    flags: Vec<Flag>,
    by_name: HashMap<Arc<str>, usize>,
    by_bit: HashMap<u32, usize>,
    fallback: NativeFn,
}

impl FlagsTable {
    /// Builds the table from an ordered field mapping.
    ///
    /// # Errors
    /// Returns `TooManyFlags` when there are more fields than bits, a key
    /// error for an invalid field name, and `FallbackNotCallable` when the
    /// `0` field is not a function.
    pub fn build(title: &str, fields: &LtMap<Value>) -> Result<Self> {
        let fallback_field = fields.get(FALLBACK_FIELD);
        let limit = MAX_FLAGS + usize::from(fallback_field.is_some());
        if fields.len() > limit {
            return Err(Error::too_many_flags(fields.len()));
        }

        let mut scope = KeyScope::new();
        let mut flags = Vec::with_capacity(fields.len());
        for (index, name) in fields.keys().enumerate() {
            if &**name == FALLBACK_FIELD {
                continue;
            }
            check_key(name, index, &scope)?;
            scope.insert(name.clone());
            flags.push(Flag::new(name.clone(), 1u32 << flags.len()));
        }

        let fallback = match fallback_field {
            Some(Value::Fn(f)) => f.clone(),
            Some(_) => return Err(Error::fallback_not_callable(title)),
            None => noop(),
        };

        let by_name = flags
            .iter()
            .enumerate()
            .map(|(i, flag)| (flag.name.clone(), i))
            .collect();
        let by_bit = flags.iter().enumerate().map(|(i, flag)| (flag.bit, i)).collect();

        Ok(Self {
            flags,
            by_name,
            by_bit,
            fallback,
        })
    }

    /// Returns the number of flags (the fallback is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns true if the enum has no flags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Returns the flags in declaration (and bit) order.
    #[must_use]
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// Looks up a flag by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Flag> {
        self.by_name.get(name).and_then(|&i| self.flags.get(i))
    }

    /// Looks up the flag bound to a bit.
    #[must_use]
    pub fn flag_at(&self, bit: u32) -> Option<Flag> {
        self.by_bit.get(&bit).and_then(|&i| self.flags.get(i)).cloned()
    }

    /// Returns the fallback handler.
    #[must_use]
    pub fn fallback(&self) -> &NativeFn {
        &self.fallback
    }
}

fn noop() -> NativeFn {
    NativeFn::new("noop", |_| Ok(Value::Undefined))
}
