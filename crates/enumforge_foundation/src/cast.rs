//! Host conversions: string, number, and boolean casts.
//!
//! These follow the host language's `ToString`, `ToNumber`, and `ToBoolean`
//! rules for the value model, with two deliberate differences: boxed
//! primitives are unwrapped before casting, and markers cast to `NaN`
//! instead of raising, so every cast is total.

use crate::value::{Boxed, Value};

/// Casts a value to its host string form.
#[must_use]
pub fn to_string(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) | Value::Boxed(Boxed::Bool(b)) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(n) | Value::Boxed(Boxed::Number(n)) => number_to_string(*n),
        Value::String(s) | Value::Boxed(Boxed::String(s)) => s.to_string(),
        Value::Marker(m) => m.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Undefined | Value::Null => String::new(),
                other => to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
        Value::Fn(f) => format!("function {}() {{ [native code] }}", f.name()),
    }
}

/// Casts a value to a host number.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) | Value::Boxed(Boxed::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Int(n) => *n as f64,
        Value::Float(n) | Value::Boxed(Boxed::Number(n)) => *n,
        Value::String(s) | Value::Boxed(Boxed::String(s)) => parse_number(s),
        Value::Array(items) => match items.len() {
            0 => 0.0,
            1 => items.get(0).map_or(f64::NAN, to_number),
            _ => f64::NAN,
        },
        Value::Undefined | Value::Marker(_) | Value::Object(_) | Value::Fn(_) => f64::NAN,
    }
}

/// Casts a value to a host boolean.
#[must_use]
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) | Value::Boxed(Boxed::Bool(b)) => *b,
        Value::Int(n) => *n != 0,
        Value::Float(n) | Value::Boxed(Boxed::Number(n)) => !(n.is_nan() || *n == 0.0),
        Value::String(s) | Value::Boxed(Boxed::String(s)) => !s.is_empty(),
        Value::Marker(_) | Value::Array(_) | Value::Object(_) | Value::Fn(_) => true,
    }
}

/// Parses a string the way the host number cast does.
///
/// Surrounding whitespace is ignored, the empty string is `0`, `0x`/`0o`/`0b`
/// prefixes select a radix, and anything unparseable is `NaN`.
#[must_use]
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let prefixed = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)];
    for (prefix, radix) in prefixed {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return parse_radix_integer(digits, radix);
        }
    }

    let well_formed = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !well_formed {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[allow(clippy::cast_precision_loss)]
fn parse_radix_integer(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut total = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => total = total * f64::from(radix) + f64::from(d),
            None => return f64::NAN,
        }
    }
    total
}

/// Formats a number the way the host prints it.
///
/// Whole numbers print without a fraction, very large and very small
/// magnitudes use exponent notation with an explicit sign.
#[must_use]
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let formatted = format!("{n:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        };
    }
    if n.fract() == 0.0 {
        return format!("{n:.0}");
    }
    format!("{n}")
}

/// Formats a number in the given radix (2 to 36).
///
/// The fractional part, if any, is expanded until it terminates or 52 digits
/// have been produced.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn number_to_radix(n: f64, radix: u32) -> String {
    debug_assert!((2..=36).contains(&radix), "radix out of range: {radix}");
    if !n.is_finite() {
        return number_to_string(n);
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let base = f64::from(radix);
    let magnitude = n.abs();
    let mut whole = magnitude.trunc();
    let mut fraction = magnitude - whole;

    let mut digits = Vec::new();
    while whole >= 1.0 {
        let d = (whole % base) as u32;
        digits.push(char::from_digit(d, radix).unwrap_or('0'));
        whole = (whole / base).trunc();
    }
    if digits.is_empty() {
        digits.push('0');
    }
    digits.reverse();

    let mut out = String::with_capacity(digits.len() + 1);
    if n < 0.0 {
        out.push('-');
    }
    out.extend(digits);

    if fraction > 0.0 {
        out.push('.');
        for _ in 0..52 {
            fraction *= base;
            let d = fraction.trunc();
            out.push(char::from_digit(d as u32, radix).unwrap_or('0'));
            fraction -= d;
            if fraction == 0.0 {
                break;
            }
        }
    }
    out
}

/// Formats an integer in the given radix (2 to 36).
#[must_use]
pub fn int_to_radix(n: i64, radix: u32) -> String {
    debug_assert!((2..=36).contains(&radix), "radix out of range: {radix}");
    if n == 0 {
        return "0".to_string();
    }
    let mut magnitude = n.unsigned_abs();
    let mut digits = Vec::new();
    while magnitude > 0 {
        let d = u32::try_from(magnitude % u64::from(radix)).unwrap_or(0);
        digits.push(char::from_digit(d, radix).unwrap_or('0'));
        magnitude /= u64::from(radix);
    }
    if n < 0 {
        digits.push('-');
    }
    digits.iter().rev().collect()
}
