//! Descriptive statistics over numeric columns.
//!
//! Unlike aggregation, values that are missing or fail to parse are
//! excluded from the sample rather than counted as zero.

use indexmap::IndexMap;

use crate::models::{DescriptiveStats, Record, StatisticsSummary};
use crate::transform::coerce::parse_number;

/// Collect the parseable values of `column`, in record order.
pub fn numeric_column(records: &[Record], column: &str) -> Vec<f64> {
    records
        .iter()
        .filter_map(|r| r.get(column).and_then(parse_number))
        .collect()
}

/// Count, mean, median, population variance, min and max of `values`.
pub fn summarize(values: &[f64]) -> StatisticsSummary {
    let n = values.len();
    if n == 0 {
        return StatisticsSummary::empty();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mean = values.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    let variance = if n > 1 {
        values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64
    } else {
        0.0
    };

    StatisticsSummary {
        count: n,
        stats: Some(DescriptiveStats {
            mean,
            median,
            variance,
            min: sorted[0],
            max: sorted[n - 1],
        }),
    }
}

/// Summarize each column, keyed by column name in the order given.
pub fn analyze(records: &[Record], columns: &[String]) -> IndexMap<String, StatisticsSummary> {
    columns
        .iter()
        .map(|column| (column.clone(), summarize(&numeric_column(records, column))))
        .collect()
}
