//! Enum construction entry points.
//!
//! Selects a builder from the kind, runs it over the field mapping, and
//! wraps the result in an [`EnumValue`]. Definition errors carry the enum
//! title in their context.

use enumforge_foundation::{EnumConfig, ErrorContext, LtMap, Result, Value};
use tracing::debug;

use crate::enum_value::{Body, EnumValue, Metadata};
use crate::flags::FlagsTable;
use crate::kind::Kind;
use crate::simple::SimpleTable;
use crate::symbolic::SymbolicTable;

/// Builds an enum with the default configuration.
///
/// # Errors
/// Returns a definition error (invalid or reserved field name, too many
/// flags, non-callable fallback, schema too deep).
pub fn make_enum(title: &str, fields: &LtMap<Value>, kind: Kind) -> Result<EnumValue> {
    make_enum_with(&EnumConfig::default(), title, fields, kind)
}

/// Builds an enum with an explicit configuration.
///
/// # Errors
/// See [`make_enum`].
pub fn make_enum_with(
    config: &EnumConfig,
    title: &str,
    fields: &LtMap<Value>,
    kind: Kind,
) -> Result<EnumValue> {
    let body = build_body(config, title, fields, kind)
        .map_err(|e| e.with_context(ErrorContext::new().with_title(title)))?;
    let value = EnumValue::new(Metadata::new(title, kind), body, config.clone());
    debug!(title, kind = %kind, size = value.size(), "built enum");
    Ok(value)
}

/// Builds an enum from an optional control tag; no tag means a simple enum.
///
/// # Errors
/// Returns `InvalidKind` listing the accepted tags for an unknown tag, and
/// otherwise see [`make_enum`].
pub fn make_enum_tagged(title: &str, fields: &LtMap<Value>, tag: Option<&str>) -> Result<EnumValue> {
    let kind = tag
        .map(str::parse::<Kind>)
        .transpose()
        .map_err(|e| e.with_context(ErrorContext::new().with_title(title)))?
        .unwrap_or_default();
    make_enum(title, fields, kind)
}

fn build_body(config: &EnumConfig, title: &str, fields: &LtMap<Value>, kind: Kind) -> Result<Body> {
    Ok(match kind {
        Kind::Simple => Body::Simple(SimpleTable::build(fields)?),
        Kind::Flags => Body::Flags(FlagsTable::build(title, fields)?),
        Kind::Symbolic => Body::Symbolic(SymbolicTable::build(fields, config)?),
    })
}
