//! Tagged-union enums.
//!
//! Each field becomes a variant. Fields whose example describes a payload
//! (an object, an array, a coercion tag, or a boxed primitive) get a
//! constructor with a derived [`Schema`]; every other field becomes a
//! sentinel identified by a [`Marker`].

use std::collections::HashMap;
use std::sync::Arc;

use enumforge_foundation::{EnumConfig, LtMap, Marker, Result, Value};

use crate::coerce::Coercion;
use crate::keys::{KeyScope, check_key};
use crate::schema::{Schema, derive_schema};

/// What a variant carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VariantShape {
    /// Payload-less variant identified by its marker.
    Sentinel(Marker),
    /// Variant built by a constructor from input shaped by the schema.
    Payload(Arc<Schema>),
}

/// A declared variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantSpec {
    name: Arc<str>,
    shape: VariantShape,
}

impl VariantSpec {
    /// Returns the variant name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the shared variant name.
    #[must_use]
    pub fn name_arc(&self) -> Arc<str> {
        self.name.clone()
    }

    /// Returns what the variant carries.
    #[must_use]
    pub const fn shape(&self) -> &VariantShape {
        &self.shape
    }

    /// Returns the marker of a sentinel variant.
    #[must_use]
    pub const fn marker(&self) -> Option<&Marker> {
        match &self.shape {
            VariantShape::Sentinel(marker) => Some(marker),
            VariantShape::Payload(_) => None,
        }
    }

    /// Returns the schema of a payload variant.
    #[must_use]
    pub fn schema(&self) -> Option<&Arc<Schema>> {
        match &self.shape {
            VariantShape::Sentinel(_) => None,
            VariantShape::Payload(schema) => Some(schema),
        }
    }

    /// Returns true for sentinel variants.
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        matches!(self.shape, VariantShape::Sentinel(_))
    }
}

/// The variants of a built symbolic enum.
#[derive(Clone, Debug, Default)]
pub struct SymbolicTable {
    variants: Vec<VariantSpec>,
    by_name: HashMap<Arc<str>, usize>,
}

impl SymbolicTable {
    /// Builds the table from an ordered field mapping.
    ///
    /// Payload keys are validated against the variants declared before them.
    ///
    /// # Errors
    /// Returns a key error for an invalid field or payload key, and
    /// `SchemaTooDeep` for an example nested beyond the configured limit.
    pub fn build(fields: &LtMap<Value>, config: &EnumConfig) -> Result<Self> {
        let mut scope = KeyScope::new();
        let mut variants = Vec::with_capacity(fields.len());

        for (index, (name, example)) in fields.iter().enumerate() {
            check_key(name, index, &scope)?;
            let shape = shape_of(name, example, &scope, config)?;
            scope.insert(name.clone());
            variants.push(VariantSpec {
                name: name.clone(),
                shape,
            });
        }

        let by_name = variants
            .iter()
            .enumerate()
            .map(|(i, v)| (v.name.clone(), i))
            .collect();
        Ok(Self { variants, by_name })
    }

    /// Returns the number of variants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Returns true if the enum has no variants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Returns the variants in declaration order.
    #[must_use]
    pub fn variants(&self) -> &[VariantSpec] {
        &self.variants
    }

    /// Returns the declaration index of a variant.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Looks up a variant by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&VariantSpec> {
        self.index_of(name).and_then(|i| self.variants.get(i))
    }

    /// Looks up a variant by declaration index.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&VariantSpec> {
        self.variants.get(index)
    }
}

fn shape_of(name: &str, example: &Value, scope: &KeyScope, config: &EnumConfig) -> Result<VariantShape> {
    let shape = match example {
        Value::Marker(marker) => VariantShape::Sentinel(marker.clone()),
        Value::Object(_) | Value::Array(_) => {
            VariantShape::Payload(Arc::new(derive_schema(example, scope, config)?))
        }
        Value::Boxed(_) => {
            VariantShape::Payload(Arc::new(Schema::single(Coercion::resolve_or_str(example))))
        }
        Value::String(tag) => match Coercion::from_tag(tag) {
            Some(coercion) => VariantShape::Payload(Arc::new(Schema::single(coercion))),
            None => VariantShape::Sentinel(Marker::new(name)),
        },
        Value::Null
        | Value::Undefined
        | Value::Bool(_)
        | Value::Int(_)
        | Value::Float(_)
        | Value::Fn(_) => VariantShape::Sentinel(Marker::new(name)),
    };
    Ok(shape)
}
