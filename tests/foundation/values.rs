//! Integration tests for Value types
//!
//! Tests Value variants, equality, hashing, display, and field access.

use enumforge_foundation::{Boxed, LtMap, Marker, NativeFn, Value};
use std::collections::HashSet;

// =============================================================================
// Value Construction
// =============================================================================

#[test]
fn value_undefined_and_null_are_falsy() {
    assert!(!Value::Undefined.is_truthy());
    assert!(!Value::Null.is_truthy());
    assert!(Value::Undefined.is_undefined());
    assert!(!Value::Null.is_undefined());
}

#[test]
fn value_numbers() {
    assert_eq!(Value::Int(42).as_int(), Some(42));
    assert_eq!(Value::Int(42).as_number(), Some(42.0));
    assert_eq!(Value::Float(1.5).as_float(), Some(1.5));
    assert_eq!(Value::Float(1.5).as_int(), None);
    assert_eq!(Value::Int(3).type_name(), "number");
    assert_eq!(Value::Float(3.5).type_name(), "number");
}

#[test]
fn value_bools_are_not_truthiness() {
    assert_eq!(Value::Bool(false).as_bool(), Some(false));
    assert_eq!(Value::Int(1).as_bool(), None);
    assert!(Value::Int(1).is_truthy());
}

#[test]
fn value_whole_numbers() {
    assert_eq!(Value::Int(-3).as_whole_number(), Some(-3));
    assert_eq!(Value::Float(7.0).as_whole_number(), Some(7));
    assert_eq!(Value::Float(7.5).as_whole_number(), None);
    assert_eq!(Value::Float(f64::NAN).as_whole_number(), None);
    assert_eq!(Value::Float(f64::INFINITY).as_whole_number(), None);
    assert_eq!(Value::from("7").as_whole_number(), None);
}

#[test]
fn value_empty_string_is_falsy() {
    assert!(!Value::from("").is_truthy());
    assert!(Value::from("0").is_truthy());
}

#[test]
fn value_boxed_is_judged_by_contents() {
    assert!(!Value::Boxed(Boxed::Bool(false)).is_truthy());
    assert!(Value::Boxed(Boxed::Number(2.0)).is_truthy());
    assert_eq!(Value::Boxed(Boxed::String("x".into())).type_name(), "object");
}

#[test]
fn value_compound() {
    let obj = Value::object([("a", Value::Int(1))]);
    let arr = Value::array([Value::Int(1)]);
    assert!(obj.is_compound());
    assert!(arr.is_compound());
    assert!(!Value::from("a").is_compound());
    assert_eq!(arr.type_name(), "array");
}

#[test]
fn value_from_option() {
    assert_eq!(Value::from(None::<i64>), Value::Undefined);
    assert_eq!(Value::from(Some(5i64)), Value::Int(5));
}

#[test]
fn value_from_vec() {
    let v = Value::from(vec![1i64, 2, 3]);
    assert_eq!(v.as_array().map(|a| a.len()), Some(3));
}

// =============================================================================
// Field Access
// =============================================================================

#[test]
fn field_on_object() {
    let obj = Value::object([("x", Value::Int(1)), ("y", Value::Int(2))]);
    assert_eq!(obj.field("y"), Some(&Value::Int(2)));
    assert_eq!(obj.field("z"), None);
}

#[test]
fn field_on_array_uses_index() {
    let arr = Value::array([Value::from("a"), Value::from("b")]);
    assert_eq!(arr.field("1"), Some(&Value::from("b")));
    assert_eq!(arr.field("2"), None);
    assert_eq!(arr.field("x"), None);
}

#[test]
fn field_on_primitive_is_none() {
    assert_eq!(Value::Int(1).field("value"), None);
    assert_eq!(Value::Undefined.field("0"), None);
}

// =============================================================================
// Equality and Hashing
// =============================================================================

#[test]
fn markers_compare_by_identity() {
    let a = Marker::new("load");
    let b = Marker::new("load");
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
    assert_eq!(Value::Marker(a.clone()), Value::Marker(a));
}

#[test]
fn functions_compare_by_identity() {
    let f = NativeFn::new("f", |_| Ok(Value::Null));
    let g = NativeFn::new("f", |_| Ok(Value::Null));
    assert_eq!(Value::Fn(f.clone()), Value::Fn(f));
    assert_ne!(
        Value::Fn(g),
        Value::Fn(NativeFn::new("f", |_| Ok(Value::Null)))
    );
}

#[test]
fn nan_equals_itself() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
}

#[test]
fn values_hash_consistently() {
    let mut set = HashSet::new();
    set.insert(Value::Int(1));
    set.insert(Value::Int(1));
    set.insert(Value::from("1"));
    set.insert(Value::object([("a", Value::Int(1)), ("b", Value::Int(2))]));
    set.insert(Value::object([("b", Value::Int(2)), ("a", Value::Int(1))]));
    assert_eq!(set.len(), 3);
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn display_primitives() {
    assert_eq!(Value::Undefined.to_string(), "undefined");
    assert_eq!(Value::Int(59).to_string(), "59");
    assert_eq!(Value::Float(77.1).to_string(), "77.1");
    assert_eq!(Value::from("hi").to_string(), "\"hi\"");
    assert_eq!(Value::Boxed(Boxed::Number(3.0)).to_string(), "[Number: 3]");
    assert_eq!(Value::Boxed(Boxed::Bool(true)).to_string(), "[Boolean: true]");
}

#[test]
fn display_compounds() {
    let obj = Value::object([("x", Value::Int(59)), ("y", Value::from("a"))]);
    assert_eq!(obj.to_string(), "{ x: 59, y: \"a\" }");
    assert_eq!(Value::Object(LtMap::new()).to_string(), "{}");
    assert_eq!(Value::array([Value::Int(1), Value::Bool(true)]).to_string(), "[1, true]");
}

#[test]
fn display_function() {
    let f = NativeFn::new("noop", |_| Ok(Value::Undefined));
    assert_eq!(Value::Fn(f).to_string(), "[Function: noop]");
}
