//! enumforge - Simple, flags, and symbolic enums for a dynamically typed value model
//!
//! This crate re-exports all layers of the enumforge system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: enumforge_engine     - Builders, schemas, bitmask queries, matching
//! Layer 0: enumforge_foundation - Core types (Value, Marker, Error, EnumConfig)
//! ```
//!
//! # Example
//!
//! ```
//! use enumforge::engine::{Kind, make_enum};
//! use enumforge::foundation::{LtMap, Value};
//!
//! let fields: LtMap<Value> = [("Read", Value::Int(1)), ("Write", Value::Int(4))]
//!     .into_iter()
//!     .collect();
//! let perm = make_enum("Perm", &fields, Kind::Simple).unwrap();
//! assert_eq!(perm.name_of(4), Some("Write"));
//! ```

pub use enumforge_engine as engine;
pub use enumforge_foundation as foundation;
