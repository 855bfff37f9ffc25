//! Variant constructors and instances of symbolic enums.

use std::fmt;
use std::sync::Arc;

use enumforge_foundation::{ErrorContext, Marker, Result, Value};

use crate::enum_value::{EnumValue, Metadata};
use crate::kind::Kind;
use crate::matcher::{MatchForm, expect_handler, match_variant};
use crate::schema::{Schema, apply_schema};

/// Field holding a primitive payload or a sentinel's marker.
pub const VALUE_FIELD: &str = "value";

/// Callable that builds instances of one payload variant.
#[derive(Clone)]
pub struct VariantConstructor {
    parent: EnumValue,
    name: Arc<str>,
    schema: Arc<Schema>,
}

impl VariantConstructor {
    pub(crate) fn new(parent: EnumValue, name: Arc<str>, schema: Arc<Schema>) -> Self {
        Self {
            parent,
            name,
            schema,
        }
    }

    /// Returns the variant name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the payload schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the enum this variant belongs to.
    #[must_use]
    pub const fn parent(&self) -> &EnumValue {
        &self.parent
    }

    /// Returns `{title: variant name, kind: symbolic}`.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        Metadata::new(self.name.clone(), Kind::Symbolic)
    }

    /// Builds an instance from `input`.
    ///
    /// A primitive input is wrapped as `{value: input}` first unless the
    /// parent's configuration turns wrapping off.
    ///
    /// # Errors
    /// Returns `MissingField` or `ExpectedObject` when the input does not fit
    /// the schema.
    pub fn construct(&self, input: &Value) -> Result<VariantInstance> {
        let wrapped;
        let input = if !input.is_compound() && self.parent.config().wrap_primitive_input {
            wrapped = Value::object([(VALUE_FIELD, input.clone())]);
            &wrapped
        } else {
            input
        };

        let payload = apply_schema(input, &self.schema, &self.name).map_err(|e| {
            e.with_context(
                ErrorContext::new()
                    .with_title(self.parent.title())
                    .with_frame(format!("construct {}", self.name)),
            )
        })?;
        Ok(VariantInstance::new(self.parent.clone(), self.name.clone(), payload))
    }

    /// Stores `handler` as this variant's entry in the parent's match table.
    ///
    /// The parent owns the handler, so a handler should reach the parent
    /// through [`EnumValue::downgrade`] rather than a captured clone.
    ///
    /// # Errors
    /// Returns `HandlerNotCallable` if `handler` is not a function.
    pub fn register_handler(&self, handler: impl Into<Value>) -> Result<()> {
        let handler = expect_handler(&self.name, handler.into())?;
        self.parent.set_handler(self.name.clone(), handler);
        Ok(())
    }
}

impl PartialEq for VariantConstructor {
    fn eq(&self, other: &Self) -> bool {
        self.parent.ptr_eq(&other.parent) && self.name == other.name
    }
}

impl Eq for VariantConstructor {}

impl fmt::Debug for VariantConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantConstructor")
            .field("parent", &self.parent.title())
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish()
    }
}

impl fmt::Display for VariantConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.schema)
    }
}

/// An immutable value of a symbolic enum.
#[derive(Clone)]
pub struct VariantInstance {
    parent: EnumValue,
    name: Arc<str>,
    payload: Value,
}

impl VariantInstance {
    pub(crate) fn new(parent: EnumValue, name: Arc<str>, payload: Value) -> Self {
        Self {
            parent,
            name,
            payload,
        }
    }

    pub(crate) fn sentinel(parent: EnumValue, name: Arc<str>, marker: &Marker) -> Self {
        let payload = Value::object([(VALUE_FIELD, Value::Marker(marker.clone()))]);
        Self::new(parent, name, payload)
    }

    /// Returns the variant name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the coerced payload (`{value: marker}` for sentinels).
    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.payload
    }

    /// Returns the enum this instance belongs to.
    #[must_use]
    pub const fn parent(&self) -> &EnumValue {
        &self.parent
    }

    /// Returns `{title: variant name, kind: symbolic}`.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        Metadata::new(self.name.clone(), Kind::Symbolic)
    }

    /// Looks up a payload field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.payload.field(key)
    }

    /// Returns the marker of a sentinel instance.
    #[must_use]
    pub fn marker(&self) -> Option<&Marker> {
        self.field(VALUE_FIELD).and_then(Value::as_marker)
    }

    /// Returns true for payload-less instances.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.marker().is_some()
    }

    /// Returns what a handler receives: the `value` field of a single-field
    /// payload, otherwise the payload itself.
    #[must_use]
    pub fn unwrapped(&self) -> Value {
        match self.payload.as_object() {
            Some(fields) if fields.len() == 1 => fields
                .get(VALUE_FIELD)
                .cloned()
                .unwrap_or_else(|| self.payload.clone()),
            _ => self.payload.clone(),
        }
    }

    /// Stores `handler` as this variant's entry in the parent's match table.
    ///
    /// The parent owns the handler, so a handler should reach the parent
    /// through [`EnumValue::downgrade`] rather than a captured clone.
    ///
    /// # Errors
    /// Returns `HandlerNotCallable` if `handler` is not a function.
    pub fn register_handler(&self, handler: impl Into<Value>) -> Result<()> {
        let handler = expect_handler(&self.name, handler.into())?;
        self.parent.set_handler(self.name.clone(), handler);
        Ok(())
    }

    /// Runs the handler the parent has registered for this variant.
    ///
    /// # Errors
    /// See [`EnumValue::dispatch`].
    pub fn dispatch(&self) -> Result<Value> {
        self.parent.dispatch(self)
    }

    /// Matches this instance against a form.
    ///
    /// # Errors
    /// See [`match_variant`].
    pub fn matches(&self, form: &MatchForm) -> Result<Value> {
        match_variant(form, self)
    }
}

impl PartialEq for VariantInstance {
    fn eq(&self, other: &Self) -> bool {
        self.parent.ptr_eq(&other.parent) && self.name == other.name && self.payload == other.payload
    }
}

impl Eq for VariantInstance {}

impl fmt::Debug for VariantInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantInstance")
            .field("parent", &self.parent.title())
            .field("name", &self.name)
            .field("payload", &self.payload)
            .finish()
    }
}

/// Sentinels print their name; payload variants print `Name { .. }`.
impl fmt::Display for VariantInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.name, self.payload)
        }
    }
}
