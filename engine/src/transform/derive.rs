//! Derived columns.

use serde::{Deserialize, Serialize};

use super::coerce::{coerce_field, number_value, round_to};
use crate::models::Record;

/// Decimal digits kept on growth ratios.
pub const GROWTH_PRECISION: u32 = 4;

/// Which fields feed the growth ratio and where it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthConfig {
    pub current_field: String,
    pub previous_field: String,
    pub new_field: String,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            current_field: "Sales".to_string(),
            previous_field: "PreviousSales".to_string(),
            new_field: "SalesGrowth".to_string(),
        }
    }
}

/// `(current - previous) / previous`, rounded; `0.0` when previous is zero.
pub fn growth_ratio(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        round_to((current - previous) / previous, GROWTH_PRECISION)
    }
}

/// Add (or overwrite) `new_field` with the growth ratio on every record.
///
/// Missing or malformed inputs count as `0.0`.
pub fn compute_growth(
    records: Vec<Record>,
    current_field: &str,
    previous_field: &str,
    new_field: &str,
) -> Vec<Record> {
    records
        .into_iter()
        .map(|mut record| {
            let current = coerce_field(record.get(current_field), 0.0);
            let previous = coerce_field(record.get(previous_field), 0.0);
            record.insert(new_field.to_string(), number_value(growth_ratio(current, previous)));
            record
        })
        .collect()
}
