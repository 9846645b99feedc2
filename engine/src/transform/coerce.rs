//! Best-effort value coercion.
//!
//! Nothing in here fails: unparseable input yields a deterministic fallback.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::UNKNOWN;

/// Accepted input date formats, tried in order.
pub const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];

/// Canonical output date format.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// What to emit when no date format matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFallback {
    /// Keep the original text unchanged
    #[default]
    KeepOriginal,
    /// Replace it with the `UNKNOWN` sentinel
    Sentinel,
}

/// Parse a value as a finite float.
///
/// JSON numbers and booleans convert directly; strings are trimmed first.
/// `NaN` and infinities are treated as unparseable.
pub fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Parse a value as a float, falling back to `default`.
pub fn coerce_number(value: &Value, default: f64) -> f64 {
    parse_number(value).unwrap_or(default)
}

/// Same as [`coerce_number`] for an optional value (absent field).
pub fn coerce_field(value: Option<&Value>, default: f64) -> f64 {
    value.map_or(default, |v| coerce_number(v, default))
}

/// Parse a date in any accepted format and emit it as `YYYY-MM-DD`.
///
/// The year must be exactly four digits; chrono's `%Y` alone would read
/// `24` as year 24.
pub fn parse_date(text: &str) -> Option<String> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .filter(|fmt| matches_shape(text, fmt))
        .find_map(|fmt| {
            NaiveDate::parse_from_str(text, fmt)
                .ok()
                .map(|d| d.format(CANONICAL_DATE_FORMAT).to_string())
        })
}

/// Digit groups of `text` line up with `fmt`: a four-digit year and one or
/// two digits for day and month.
fn matches_shape(text: &str, fmt: &str) -> bool {
    let Some(sep) = fmt.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '%') else {
        return false;
    };
    let parts: Vec<&str> = text.split(sep).collect();
    let slots: Vec<&str> = fmt.split(sep).collect();
    parts.len() == slots.len()
        && parts.iter().zip(&slots).all(|(part, slot)| {
            let width_ok = if *slot == "%Y" { part.len() == 4 } else { (1..=2).contains(&part.len()) };
            width_ok && part.bytes().all(|b| b.is_ascii_digit())
        })
}

/// Canonicalize a date string, keeping the original text when unparseable.
pub fn coerce_date(text: &str) -> String {
    coerce_date_with(text, DateFallback::KeepOriginal)
}

/// Canonicalize a date string with an explicit fallback policy.
pub fn coerce_date_with(text: &str, fallback: DateFallback) -> String {
    parse_date(text).unwrap_or_else(|| match fallback {
        DateFallback::KeepOriginal => text.to_string(),
        DateFallback::Sentinel => UNKNOWN.to_string(),
    })
}

/// Date coercion over a field value. Non-text values pass through.
pub fn coerce_date_value(value: &Value, fallback: DateFallback) -> Value {
    match value {
        Value::String(s) => Value::String(coerce_date_with(s, fallback)),
        other => other.clone(),
    }
}

/// Round half away from zero to `digits` decimal places.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

/// Wrap a float as a JSON value (non-finite floats become `null`).
pub fn number_value(value: f64) -> Value {
    Value::from(value)
}
