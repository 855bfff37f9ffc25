//! Exhaustive pattern matching over symbolic variants.
//!
//! A [`MatchForm`] maps every variant name of an enum to a handler. Forms
//! are validated as a whole: every missing variant is reported together,
//! and a present entry that is not a function fails on the spot.

use std::collections::HashMap;
use std::sync::Arc;

use enumforge_foundation::{Error, ErrorContext, ErrorKind, LtMap, NativeFn, Result, Value};
use tracing::trace;

use crate::enum_value::Member;
use crate::symbolic::SymbolicTable;
use crate::variant::VariantInstance;

// =============================================================================
// Match forms
// =============================================================================

/// A variant name to handler mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchForm(LtMap<Value>);

impl MatchForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler receiving the variant's unwrapped payload.
    #[must_use]
    pub fn arm<F>(self, name: &str, handler: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        let func = NativeFn::new(name, move |args: &[Value]| {
            handler(args.first().unwrap_or(&Value::Undefined))
        });
        self.entry(name, Value::Fn(func))
    }

    /// Adds a raw entry. Entries that are not functions fail validation.
    #[must_use]
    pub fn entry(self, name: &str, value: impl Into<Value>) -> Self {
        Self(self.0.insert(name, value.into()))
    }

    /// Returns the entry for a variant.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the form has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<LtMap<Value>> for MatchForm {
    fn from(entries: LtMap<Value>) -> Self {
        Self(entries)
    }
}

// =============================================================================
// Match tables
// =============================================================================

/// Resolved handlers of one enum, keyed by variant name.
#[derive(Clone, Debug, Default)]
pub(crate) struct MatchTable {
    handlers: HashMap<Arc<str>, NativeFn>,
}

impl MatchTable {
    /// Resolves a form against the variants of an enum.
    pub(crate) fn resolve(form: &MatchForm, variants: &SymbolicTable) -> Result<Self> {
        let mut handlers = HashMap::with_capacity(variants.len());
        let mut missing = Vec::new();

        for spec in variants.variants() {
            match form.get(spec.name()) {
                None => missing.push(spec.name().to_string()),
                Some(Value::Fn(handler)) => {
                    handlers.insert(spec.name_arc(), handler.clone());
                }
                Some(_) => return Err(Error::handler_not_callable(spec.name())),
            }
        }

        if missing.is_empty() {
            Ok(Self { handlers })
        } else {
            Err(Error::incomplete_match(missing))
        }
    }

    pub(crate) fn insert(&mut self, name: Arc<str>, handler: NativeFn) {
        self.handlers.insert(name, handler);
    }

    pub(crate) fn get(&self, name: &str) -> Option<&NativeFn> {
        self.handlers.get(name)
    }

    /// Lists the variants without a handler, in declaration order.
    pub(crate) fn missing(&self, variants: &SymbolicTable) -> Vec<String> {
        variants
            .variants()
            .iter()
            .filter(|spec| !self.handlers.contains_key(spec.name()))
            .map(|spec| spec.name().to_string())
            .collect()
    }
}

/// Extracts a callable handler from a registration value.
pub(crate) fn expect_handler(name: &str, value: Value) -> Result<NativeFn> {
    match value {
        Value::Fn(handler) => Ok(handler),
        _ => Err(Error::handler_not_callable(name)),
    }
}

/// Runs a handler on a variant's unwrapped payload.
pub(crate) fn invoke(handler: &NativeFn, variant: &VariantInstance) -> Result<Value> {
    trace!(
        title = variant.parent().title(),
        variant = variant.name(),
        handler = handler.name(),
        "dispatching variant"
    );
    handler
        .call(&[variant.unwrapped()])
        .map_err(|e| e.with_context(ErrorContext::new().with_frame(format!("match {}", variant.name()))))
}

// =============================================================================
// Library-level matching
// =============================================================================

/// Matches a variant against a form without registering it.
///
/// The form must cover every variant of the instance's enum.
///
/// # Errors
/// Returns `IncompleteMatch` or `HandlerNotCallable` for a bad form, and
/// whatever the selected handler raises.
pub fn match_variant(form: &MatchForm, variant: &VariantInstance) -> Result<Value> {
    let parent = variant.parent();
    let context = || ErrorContext::new().with_title(parent.title());
    let variants = parent.symbolic_table().map_err(|e| e.with_context(context()))?;
    let table = MatchTable::resolve(form, variants).map_err(|e| e.with_context(context()))?;
    let handler = table
        .get(variant.name())
        .ok_or_else(|| Error::incomplete_match(vec![variant.name().to_string()]))?;
    invoke(handler, variant)
}

/// Matches any enum member against a form.
///
/// # Errors
/// Returns `NotAVariant` for tags, flags, and unapplied constructors, and
/// otherwise whatever [`match_variant`] returns.
pub fn match_member(form: &MatchForm, member: &Member) -> Result<Value> {
    match member {
        Member::Variant(variant) => match_variant(form, variant),
        other => Err(Error::new(ErrorKind::NotAVariant {
            found: other.describe(),
        })),
    }
}
