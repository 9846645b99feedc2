//! Domain models shared by the pipeline stages.
//!
//! - [`Record`] - one input row (ordered field → value mapping)
//! - [`AggregateEntry`] - one group total
//! - [`StatisticsSummary`] - descriptive statistics for one column

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of tabular input.
///
/// Field order follows insertion order (`serde_json` is built with
/// `preserve_order`), so the first record's keys double as the output header.
pub type Record = Map<String, Value>;

/// Key used when a record has no value for the grouping field.
pub const UNKNOWN: &str = "UNKNOWN";

/// A value is missing when it is `null` or the empty string.
pub fn is_missing_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// A field is missing when it is absent or holds a missing value.
pub fn is_missing(record: &Record, field: &str) -> bool {
    record.get(field).map_or(true, is_missing_value)
}

/// Render a field value as plain text (strings verbatim, `null` empty).
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// One (group key, summed value) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub key: String,
    pub total: f64,
}

impl AggregateEntry {
    pub fn new(key: impl Into<String>, total: f64) -> Self {
        Self { key: key.into(), total }
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Moments of a non-empty numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub mean: f64,
    pub median: f64,
    /// Population variance (divisor N)
    pub variance: f64,
    pub min: f64,
    pub max: f64,
}

/// Statistics for one analyzed column.
///
/// Serializes as `{"count": 0}` when the column had no valid values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub count: usize,
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<DescriptiveStats>,
}

impl StatisticsSummary {
    pub fn empty() -> Self {
        Self { count: 0, stats: None }
    }

    /// Ordered (name, value) lines for the text report.
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        let mut lines = vec![("count", self.count.to_string())];
        if let Some(s) = &self.stats {
            lines.push(("mean", format_float(s.mean)));
            lines.push(("median", format_float(s.median)));
            lines.push(("variance", format_float(s.variance)));
            lines.push(("min", format_float(s.min)));
            lines.push(("max", format_float(s.max)));
        }
        lines
    }
}

/// Shortest round-trip text of a float, as written to report and table files.
///
/// Whole numbers keep their decimal point (`1.0`). Magnitudes from `1e16` up
/// or below `1e-4` use a signed, two-digit exponent (`1e+16`, `2.5e-05`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}
