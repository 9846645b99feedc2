//! Row filtering.
//!
//! [`filter_rows`] takes any closure. [`RowPredicate`] is the declarative
//! form used by the pipeline configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::{coerce_field, parse_number};
use crate::models::{is_missing, value_to_text, Record};

/// Keep the records matching `predicate`, preserving their order.
pub fn filter_rows<P>(records: Vec<Record>, predicate: P) -> Vec<Record>
where
    P: Fn(&Record) -> bool,
{
    records.into_iter().filter(|r| predicate(r)).collect()
}

/// Declarative row predicate.
///
/// Numeric comparisons coerce the field with a `0.0` fallback, so a missing
/// or malformed value compares as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowPredicate {
    /// Keep every row
    Always,

    /// `field > value`
    GreaterThan { field: String, value: f64 },

    /// `field >= value`
    GreaterOrEqual { field: String, value: f64 },

    /// `field < value`
    LessThan { field: String, value: f64 },

    /// `field <= value`
    LessOrEqual { field: String, value: f64 },

    /// Field equals a value (numerically when both sides are numbers)
    Equals { field: String, value: Value },

    /// Field is present and not empty
    NotMissing { field: String },

    /// Every nested predicate matches
    All { predicates: Vec<RowPredicate> },

    /// At least one nested predicate matches
    Any { predicates: Vec<RowPredicate> },

    /// Nested predicate does not match
    Not { predicate: Box<RowPredicate> },
}

impl RowPredicate {
    pub fn greater_than(field: impl Into<String>, value: f64) -> Self {
        RowPredicate::GreaterThan { field: field.into(), value }
    }

    /// Evaluate this predicate against a record
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            RowPredicate::Always => true,
            RowPredicate::GreaterThan { field, value } => Self::number(record, field) > *value,
            RowPredicate::GreaterOrEqual { field, value } => Self::number(record, field) >= *value,
            RowPredicate::LessThan { field, value } => Self::number(record, field) < *value,
            RowPredicate::LessOrEqual { field, value } => Self::number(record, field) <= *value,
            RowPredicate::Equals { field, value } => Self::equals(record.get(field), value),
            RowPredicate::NotMissing { field } => !is_missing(record, field),
            RowPredicate::All { predicates } => predicates.iter().all(|p| p.matches(record)),
            RowPredicate::Any { predicates } => predicates.iter().any(|p| p.matches(record)),
            RowPredicate::Not { predicate } => !predicate.matches(record),
        }
    }

    fn number(record: &Record, field: &str) -> f64 {
        coerce_field(record.get(field), 0.0)
    }

    fn equals(actual: Option<&Value>, expected: &Value) -> bool {
        let Some(actual) = actual else {
            return expected.is_null();
        };
        match (parse_number(actual), parse_number(expected)) {
            (Some(a), Some(b)) => a == b,
            _ => value_to_text(actual) == value_to_text(expected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(v: Value) -> Vec<Record> {
        v.as_array()
            .unwrap()
            .iter()
            .map(|r| r.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_filter_is_ordered_subset() {
        let rows = records(json!([
            {"Sales": 1500.0, "id": 1},
            {"Sales": 999.99, "id": 2},
            {"Sales": 1000.01, "id": 3},
            {"Sales": 1000.0, "id": 4}
        ]));
        let predicate = RowPredicate::greater_than("Sales", 1000.0);

        let kept = filter_rows(rows.clone(), |r| predicate.matches(r));
        let ids: Vec<i64> = kept.iter().map(|r| r["id"].as_i64().unwrap()).collect();

        assert_eq!(ids, vec![1, 3]);
        assert!(kept.iter().all(|r| rows.contains(r)));
    }

    #[test]
    fn test_always_true_is_identity() {
        let rows = records(json!([{"a": 1}, {"b": ""}, {}]));
        assert_eq!(filter_rows(rows.clone(), |_| true), rows);
        assert_eq!(filter_rows(rows.clone(), |r| RowPredicate::Always.matches(r)), rows);
    }

    #[test]
    fn test_missing_compares_as_zero() {
        let rows = records(json!([{"Sales": "oops"}, {}]));
        let predicate = RowPredicate::LessOrEqual { field: "Sales".into(), value: 0.0 };
        assert_eq!(filter_rows(rows, |r| predicate.matches(r)).len(), 2);
    }

    #[test]
    fn test_equals_and_combinators() {
        let rows = records(json!([
            {"Region": "East", "Sales": 1200.0},
            {"Region": "West", "Sales": "1200"},
            {"Region": "East", "Sales": 10.0}
        ]));
        let east_big = RowPredicate::All {
            predicates: vec![
                RowPredicate::Equals { field: "Region".into(), value: json!("East") },
                RowPredicate::Equals { field: "Sales".into(), value: json!(1200) },
            ],
        };
        let not_east = RowPredicate::Not {
            predicate: Box::new(RowPredicate::Equals { field: "Region".into(), value: json!("East") }),
        };

        assert_eq!(filter_rows(rows.clone(), |r| east_big.matches(r)).len(), 1);
        assert_eq!(filter_rows(rows, |r| not_east.matches(r))[0]["Region"], "West");
    }

    #[test]
    fn test_predicate_from_json() {
        let predicate: RowPredicate =
            serde_json::from_str(r#"{"type": "greater_than", "field": "Sales", "value": 1000}"#).unwrap();
        assert_eq!(predicate, RowPredicate::greater_than("Sales", 1000.0));

        let nested: RowPredicate = serde_json::from_str(
            r#"{"type": "any", "predicates": [{"type": "not_missing", "field": "Region"}, {"type": "always"}]}"#,
        )
        .unwrap();
        assert!(nested.matches(&Record::new()));
    }
}
