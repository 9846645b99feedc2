//! Chart inputs extracted from pipeline results.
//!
//! Missing or malformed values plot as `0.0`, so every series keeps one
//! point per record.

use crate::models::{value_to_text, AggregateEntry, Record};
use crate::transform::coerce::coerce_field;
use crate::transform::config::ChartConfig;

/// Everything the renderer needs, already in plotting order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    /// (time label, value) in source order
    pub over_time: Vec<(String, f64)>,
    /// (group label, total) in aggregate order
    pub by_group: Vec<(String, f64)>,
    /// Flat value list for the histogram
    pub distribution: Vec<f64>,
    /// Same-length x/y lists for the scatter plot
    pub scatter: (Vec<f64>, Vec<f64>),
}

impl ChartSeries {
    pub fn extract(records: &[Record], aggregates: &[AggregateEntry], config: &ChartConfig) -> Self {
        Self {
            over_time: time_series(records, &config.time_field, &config.value_field),
            by_group: labelled_totals(aggregates),
            distribution: numeric_values(records, &config.value_field),
            scatter: paired_values(records, &config.value_field, &config.scatter_field),
        }
    }
}

/// (label, value) pairs in record order.
pub fn time_series(records: &[Record], time_field: &str, value_field: &str) -> Vec<(String, f64)> {
    records
        .iter()
        .map(|r| {
            let label = r.get(time_field).map(value_to_text).unwrap_or_default();
            (label, coerce_field(r.get(value_field), 0.0))
        })
        .collect()
}

/// (key, total) pairs in aggregate order.
pub fn labelled_totals(entries: &[AggregateEntry]) -> Vec<(String, f64)> {
    entries.iter().map(|e| (e.key.clone(), e.total)).collect()
}

/// One value per record.
pub fn numeric_values(records: &[Record], field: &str) -> Vec<f64> {
    records.iter().map(|r| coerce_field(r.get(field), 0.0)).collect()
}

/// Two value lists, one entry per record each.
pub fn paired_values(records: &[Record], x_field: &str, y_field: &str) -> (Vec<f64>, Vec<f64>) {
    records
        .iter()
        .map(|r| (coerce_field(r.get(x_field), 0.0), coerce_field(r.get(y_field), 0.0)))
        .unzip()
}
