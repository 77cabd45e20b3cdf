//! # Field Probes
//!
//! Upstream analytics payloads drift: the same logical field shows up as
//! `country`, `country_code`, `label` or `name`; numbers arrive as JSON
//! numbers or as strings. Each logical field is read through an ordered list
//! of candidate keys and the first usable hit wins. Nothing here panics or
//! errors on an unexpected shape; an ungraspable field reads as `None`.

use serde_json::{Map, Value};

/// Walk an object path. Returns `None` as soon as a segment is missing or
/// the current value is not an object.
pub fn path<'a>(value: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(value, |current, segment| current.as_object()?.get(*segment))
}

/// Interpret a JSON value as a finite number.
///
/// Strings are parsed by their leading numeric prefix, so `"25"`, `" 25.5"`
/// and `"25%"` all read as numbers while `"abc"` does not.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    }
}

/// Read a number stored directly under `key`. Zero is a valid reading.
pub fn number_at(obj: &Value, key: &str) -> Option<f64> {
    obj.as_object()?.get(key).and_then(as_number)
}

/// First candidate key holding a usable, non-zero number.
///
/// A zero reading is treated like an absent field so a later alias still
/// gets its chance; callers that need a default use `unwrap_or(0.0)`.
pub fn probe_number(obj: &Map<String, Value>, probes: &[&str]) -> Option<f64> {
    probes
        .iter()
        .filter_map(|key| obj.get(*key))
        .filter_map(as_number)
        .find(|n| *n != 0.0)
}

/// First candidate key holding a non-empty label.
///
/// Numeric labels (an age bucket sent as `18`) are rendered as text.
pub fn probe_label(obj: &Map<String, Value>, probes: &[&str]) -> Option<String> {
    probes.iter().filter_map(|key| obj.get(*key)).find_map(|v| match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Read a parameter as text. Parameters are nominally strings but numbers
/// and booleans are accepted and rendered.
pub fn param_text(params: &Map<String, Value>, key: &str) -> Option<String> {
    match params.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse the longest leading decimal number in `s`, after leading
/// whitespace. Returns `None` when no digits are found.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Parse the leading base-10 integer in `s` (after leading whitespace).
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}
