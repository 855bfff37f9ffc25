//! Core value type of the host that enums are built from and into.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::cast;
use crate::collections::{LtMap, LtVec};
use crate::marker::Marker;

/// A dynamically typed host value.
///
/// Values are immutable and cheaply cloneable. Arrays and objects use
/// persistent collections, so a value handed out by an enum can never be
/// changed behind its back.
#[derive(Clone)]
pub enum Value {
    /// The undefined value (absent).
    Undefined,
    /// The null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(Arc<str>),
    /// Boxed primitive (object wrapper around a bool, number, or string).
    Boxed(Boxed),
    /// Unique opaque marker.
    Marker(Marker),
    /// Persistent array.
    Array(LtVec<Value>),
    /// Persistent insertion-ordered object.
    Object(LtMap<Value>),
    /// Host-callable function.
    Fn(NativeFn),
}

/// A boxed primitive.
///
/// Boxed values are distinguished from bare primitives only by the schema
/// engine: they derive different coercion tags and some coercions produce
/// them.
#[derive(Clone, Debug)]
pub enum Boxed {
    /// Boxed boolean.
    Bool(bool),
    /// Boxed number.
    Number(f64),
    /// Boxed string.
    String(Arc<str>),
}

/// Signature shared by every native function.
pub type NativeFnBody = dyn Fn(&[Value]) -> crate::Result<Value> + Send + Sync;

/// Function callable from the host.
///
/// Used for flag fallbacks and match handlers. Equality is identity of the
/// underlying closure.
#[derive(Clone)]
pub struct NativeFn {
    name: Arc<str>,
    func: Arc<NativeFnBody>,
}

impl NativeFn {
    /// Wraps a closure as a named native function.
    pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&[Value]) -> crate::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Returns the function name used for debugging.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calls the function.
    ///
    /// # Errors
    /// Returns whatever error the function body raises.
    pub fn call(&self, args: &[Value]) -> crate::Result<Value> {
        (self.func)(args)
    }
}

impl Value {
    /// Builds an object from key-value pairs, keeping their order.
    pub fn object<K, I>(pairs: I) -> Self
    where
        K: Into<Arc<str>>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Object(pairs.into_iter().collect())
    }

    /// Builds an array from values.
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::Array(items.into_iter().collect())
    }

    /// Returns the host type name of this value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::Float(_) => "number",
            Self::String(_) => "string",
            Self::Boxed(_) | Self::Object(_) => "object",
            Self::Marker(_) => "symbol",
            Self::Array(_) => "array",
            Self::Fn(_) => "function",
        }
    }

    /// Returns true if this value is undefined.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns true for arrays and objects (values with addressable fields).
    #[must_use]
    pub const fn is_compound(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }

    /// Returns true if this value is truthy.
    ///
    /// `undefined`, `null`, `false`, `0`, `NaN`, and the empty string are
    /// falsy. Boxed primitives are judged by their contents.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        cast::to_boolean(self)
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a float value.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a number as f64 (converts int to float).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as an integer if it is a finite whole number.
    ///
    /// Used to decide whether a field explicitly requests an integer slot.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn as_whole_number(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Float(n)
                if n.is_finite()
                    && n.fract() == 0.0
                    && *n >= i64::MIN as f64
                    && *n < i64::MAX as f64 =>
            {
                Some(*n as i64)
            }
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a marker.
    #[must_use]
    pub const fn as_marker(&self) -> Option<&Marker> {
        match self {
            Self::Marker(m) => Some(m),
            _ => None,
        }
    }

    /// Attempts to extract an array reference.
    #[must_use]
    pub const fn as_array(&self) -> Option<&LtVec<Value>> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Attempts to extract an object reference.
    #[must_use]
    pub const fn as_object(&self) -> Option<&LtMap<Value>> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Attempts to extract a function.
    #[must_use]
    pub const fn as_fn(&self) -> Option<&NativeFn> {
        match self {
            Self::Fn(f) => Some(f),
            _ => None,
        }
    }

    /// Looks up a field by key.
    ///
    /// Objects are keyed by name; arrays by decimal index.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(m) => m.get(key),
            Self::Array(v) => key.parse::<usize>().ok().and_then(|i| v.get(i)),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Boxed(a), Self::Boxed(b)) => a == b,
            (Self::Marker(a), Self::Marker(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Fn(a), Self::Fn(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Undefined | Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(n) => n.hash(state),
            Self::Float(n) => n.to_bits().hash(state),
            Self::String(s) => s.hash(state),
            Self::Boxed(b) => b.hash(state),
            Self::Marker(m) => m.hash(state),
            Self::Array(v) => v.hash(state),
            Self::Object(m) => m.hash(state),
            Self::Fn(f) => f.hash(state),
        }
    }
}

impl PartialEq for Boxed {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Boxed {}

impl Hash for Boxed {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Bool(b) => b.hash(state),
            Self::Number(n) => n.to_bits().hash(state),
            Self::String(s) => s.hash(state),
        }
    }
}

impl PartialEq for NativeFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl Eq for NativeFn {}

impl Hash for NativeFn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.func).cast::<()>().hash(state);
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{}", cast::number_to_string(*n)),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Boxed(b) => write!(f, "{b:?}"),
            Self::Marker(m) => write!(f, "{m:?}"),
            Self::Array(v) => write!(f, "{v:?}"),
            Self::Object(m) => write!(f, "{m:?}"),
            Self::Fn(func) => write!(f, "{func:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Boxed(Boxed::String(s)) => write!(f, "[String: {s:?}]"),
            Self::Boxed(Boxed::Number(n)) => write!(f, "[Number: {}]", cast::number_to_string(*n)),
            Self::Boxed(Boxed::Bool(b)) => write!(f, "[Boolean: {b}]"),
            Self::Array(v) => {
                write!(f, "[")?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Object(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {k}: {v}")?;
                }
                if m.is_empty() {
                    write!(f, "}}")
                } else {
                    write!(f, " }}")
                }
            }
            Self::Fn(func) => write!(f, "[Function: {}]", func.name()),
            other => write!(f, "{}", cast::to_string(other)),
        }
    }
}

// Convenience From implementations

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

impl From<Boxed> for Value {
    fn from(b: Boxed) -> Self {
        Self::Boxed(b)
    }
}

impl From<Marker> for Value {
    fn from(m: Marker) -> Self {
        Self::Marker(m)
    }
}

impl From<NativeFn> for Value {
    fn from(f: NativeFn) -> Self {
        Self::Fn(f)
    }
}

impl From<LtMap<Value>> for Value {
    fn from(m: LtMap<Value>) -> Self {
        Self::Object(m)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Undefined, Into::into)
    }
}
