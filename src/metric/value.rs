//! Coercion of raw SQL cells into typed field values.
//!
//! Every cell arrives as text from the server. The rules below decide how
//! that text becomes an integer, a float or a string. The order matters:
//! `"10"` is an integer, never a string, and `"ON"`/`"OFF"` never reach the
//! numeric parsers.

use std::fmt;

use serde::Serialize;

/// A typed metric field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Get type name for debugging/error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Text(_) => "string",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Coerce a raw cell into a field value.
///
/// `YES`/`NO` match in any case, `ON`/`OFF` only in upper case. Returns
/// `None` for an empty cell (which is also how SQL NULL arrives).
pub fn coerce(raw: &[u8]) -> Option<FieldValue> {
    if raw.eq_ignore_ascii_case(b"YES") || raw == b"ON" {
        return Some(FieldValue::Integer(1));
    }
    if raw.eq_ignore_ascii_case(b"NO") || raw == b"OFF" {
        return Some(FieldValue::Integer(0));
    }

    if raw.is_empty() {
        return None;
    }

    let text = String::from_utf8_lossy(raw);
    if let Ok(i) = text.parse::<i64>() {
        return Some(FieldValue::Integer(i));
    }
    if let Ok(f) = text.parse::<f64>() {
        // Overflow to infinity is a range error, not a float.
        if f.is_finite() || is_non_finite_literal(&text) {
            return Some(FieldValue::Float(f));
        }
    }

    Some(FieldValue::Text(text.into_owned()))
}

/// `inf`, `infinity` or `nan` in any case, optionally signed.
fn is_non_finite_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    ["inf", "infinity", "nan"]
        .iter()
        .any(|literal| unsigned.eq_ignore_ascii_case(literal))
}
