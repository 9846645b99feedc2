//! Field normalization: canonical dates and fixed-precision numbers.

use super::coerce::{coerce_date_value, coerce_number, number_value, round_to, DateFallback};
use crate::models::Record;

/// Rewrite each named date field to `YYYY-MM-DD` where it parses.
///
/// Fields absent from a record are left absent.
pub fn normalize_dates(
    records: Vec<Record>,
    date_fields: &[String],
    fallback: DateFallback,
) -> Vec<Record> {
    records
        .into_iter()
        .map(|mut record| {
            for field in date_fields {
                if let Some(value) = record.get_mut(field) {
                    *value = coerce_date_value(value, fallback);
                }
            }
            record
        })
        .collect()
}

/// Coerce each named field to a number rounded to `precision` digits.
///
/// Unparseable values become `0.0`. Fields absent from a record are left absent.
pub fn normalize_numbers(records: Vec<Record>, numeric_fields: &[String], precision: u32) -> Vec<Record> {
    records
        .into_iter()
        .map(|mut record| {
            for field in numeric_fields {
                if let Some(value) = record.get_mut(field) {
                    *value = number_value(round_to(coerce_number(value, 0.0), precision));
                }
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn records(v: Value) -> Vec<Record> {
        v.as_array()
            .unwrap()
            .iter()
            .map(|r| r.as_object().cloned().unwrap())
            .collect()
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_dates() {
        let rows = records(json!([
            {"Date": "01/03/2024"},
            {"Date": "garbage"},
            {"Other": "x"}
        ]));

        let out = normalize_dates(rows, &fields(&["Date"]), DateFallback::KeepOriginal);

        assert_eq!(out[0]["Date"], "2024-03-01");
        assert_eq!(out[1]["Date"], "garbage");
        assert!(!out[2].contains_key("Date"));
    }

    #[test]
    fn test_normalize_dates_sentinel() {
        let rows = records(json!([{"Date": "garbage"}]));
        let out = normalize_dates(rows, &fields(&["Date"]), DateFallback::Sentinel);
        assert_eq!(out[0]["Date"], "UNKNOWN");
    }

    #[test]
    fn test_normalize_numbers() {
        let rows = records(json!([
            {"Sales": "1234.567", "PreviousSales": "abc", "Region": "East"},
            {"Sales": 10}
        ]));

        let out = normalize_numbers(rows, &fields(&["Sales", "PreviousSales"]), 2);

        assert_eq!(out[0]["Sales"], json!(1234.57));
        assert_eq!(out[0]["PreviousSales"], json!(0.0));
        assert_eq!(out[0]["Region"], "East");
        assert_eq!(out[1]["Sales"], json!(10.0));
        assert!(!out[1].contains_key("PreviousSales"));
    }

    #[test]
    fn test_normalize_numbers_idempotent() {
        let rows = records(json!([
            {"Sales": "999.995"},
            {"Sales": "-0.005"},
            {"Sales": "1000.01"},
            {"Sales": "n/a"}
        ]));
        let numeric = fields(&["Sales"]);

        let once = normalize_numbers(rows, &numeric, 2);
        let twice = normalize_numbers(once.clone(), &numeric, 2);

        assert_eq!(once, twice);
    }
}
