//! Integration tests for Layer 1: Engine
//!
//! Tests for the enum builders, schemas, bitmask queries, and matching.

mod flags;
mod matching;
