//! Host value model, persistent collections, errors, and configuration for enumforge.
//!
//! This crate provides:
//! - [`Value`] - The dynamically typed value every enum is built from
//! - [`Marker`] - Unique opaque tokens compared by identity
//! - [`NativeFn`] - Host-callable functions (fallbacks and match handlers)
//! - [`Error`] - Rich error types with kind, class, and phase
//! - [`EnumConfig`] - Construction and rendering options
//! - Persistent collections ([`LtVec`], [`LtMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cast;
pub mod collections;
pub mod config;
pub mod error;
pub mod marker;
pub mod value;

pub use collections::{LtMap, LtVec};
pub use config::EnumConfig;
pub use error::{Error, ErrorClass, ErrorContext, ErrorKind, ErrorPhase, Result};
pub use marker::Marker;
pub use value::{Boxed, NativeFn, Value};
