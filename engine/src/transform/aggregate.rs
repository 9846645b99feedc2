//! Group records by a key field and sum a numeric field per group.
//!
//! ```text
//! Records                              →  Aggregate entries
//! ┌────────────────────────────┐       ┌──────────────────┐
//! │ Region: East, Sales: 500   │       │ East   1200.0    │
//! │ Region: East, Sales: 700   │  →    │ West    300.0    │
//! │ Region: West, Sales: 300   │       └──────────────────┘
//! └────────────────────────────┘
//! ```
//!
//! Groups come out in order of first appearance; chart labels rely on it.

use indexmap::IndexMap;

use super::coerce::{coerce_field, round_to};
use crate::models::{is_missing_value, value_to_text, AggregateEntry, Record, UNKNOWN};

/// Decimal digits kept on group totals.
pub const TOTAL_PRECISION: u32 = 2;

/// Sum `sum_field` per distinct value of `key_field`.
///
/// Missing keys group under `UNKNOWN`; malformed or missing sums count as `0.0`.
pub fn sum_by_key(records: &[Record], key_field: &str, sum_field: &str) -> Vec<AggregateEntry> {
    let totals = records.iter().fold(IndexMap::<String, f64>::new(), |mut acc, record| {
        *acc.entry(group_key(record, key_field)).or_insert(0.0) += coerce_field(record.get(sum_field), 0.0);
        acc
    });

    totals
        .into_iter()
        .map(|(key, total)| AggregateEntry::new(key, round_to(total, TOTAL_PRECISION)))
        .collect()
}

fn group_key(record: &Record, key_field: &str) -> String {
    match record.get(key_field) {
        Some(value) if !is_missing_value(value) => value_to_text(value),
        _ => UNKNOWN.to_string(),
    }
}
