//! Enum builders, schema engine, bitmask queries, and pattern matching for enumforge.
//!
//! This crate provides:
//! - [`make_enum`] - Builds simple, flags, or symbolic enums from a field mapping
//! - [`EnumValue`] - Immutable built enums with lookups and bitmask queries
//! - [`Schema`] - Payload schemas derived from examples and applied to input
//! - [`MatchForm`] - Exhaustive variant-to-handler mappings
//! - [`check_key`] - Field-name validation shared by every builder

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod coerce;
pub mod dispatch;
pub mod enum_value;
pub mod flags;
pub mod keys;
pub mod kind;
pub mod matcher;
pub mod query;
pub mod schema;
pub mod simple;
pub mod symbolic;
pub mod variant;

pub use coerce::{Coercion, coerce};
pub use dispatch::{make_enum, make_enum_tagged, make_enum_with};
pub use enum_value::{EnumValue, Member, Members, Metadata, WeakEnum};
pub use flags::{FALLBACK_FIELD, Flag, FlagsTable, MAX_FLAGS};
pub use keys::{KeyScope, RESERVED, check_key, is_identifier, is_valid_key};
pub use kind::Kind;
pub use matcher::{MatchForm, match_member, match_variant};
pub use query::{Flagged, Query, has_bit, scan_bits};
pub use schema::{Schema, apply_schema, derive_schema};
pub use simple::{SimpleTable, SlotAllocator, Tag};
pub use symbolic::{SymbolicTable, VariantShape, VariantSpec};
pub use variant::{VALUE_FIELD, VariantConstructor, VariantInstance};
