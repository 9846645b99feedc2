//! Missing-value resolution.
//!
//! A [`MissingPolicy`] names fields to fill with defaults and fields whose
//! absence removes the record. Everything else passes through untouched.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::models::{is_missing, Record};

/// Declarative fill/remove policy for missing fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingPolicy {
    /// Field → default used when the field is absent, `null` or `""`
    #[serde(default)]
    pub fill: IndexMap<String, Value>,

    /// Records missing any of these fields are dropped
    #[serde(default)]
    pub required: Vec<String>,
}

impl MissingPolicy {
    /// Fill-only policy
    pub fn fill<K, I>(defaults: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self {
            fill: defaults.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            required: Vec::new(),
        }
    }

    /// Remove-only policy
    pub fn remove<K: Into<String>>(required: impl IntoIterator<Item = K>) -> Self {
        Self {
            fill: IndexMap::new(),
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    /// A field may be filled or required, not both.
    pub fn validate(&self) -> ConfigResult<()> {
        match self.required.iter().find(|f| self.fill.contains_key(*f)) {
            Some(field) => Err(ConfigError::ConflictingPolicy(field.clone())),
            None => Ok(()),
        }
    }

    fn keeps(&self, record: &Record) -> bool {
        self.required.iter().all(|f| !is_missing(record, f))
    }

    fn fill_record(&self, mut record: Record) -> Record {
        for (field, default) in &self.fill {
            if is_missing(&record, field) {
                record.insert(field.clone(), default.clone());
            }
        }
        record
    }
}

/// Apply a missing-value policy to every record.
pub fn clean(records: Vec<Record>, policy: &MissingPolicy) -> Vec<Record> {
    records
        .into_iter()
        .filter(|r| policy.keeps(r))
        .map(|r| policy.fill_record(r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> Record {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_fill_missing_and_empty() {
        let policy = MissingPolicy::fill([("Region", json!("UNKNOWN")), ("Sales", json!(0.0))]);
        let rows = vec![
            record(json!({"Region": "", "Sales": "10"})),
            record(json!({"Sales": null})),
        ];

        let cleaned = clean(rows, &policy);

        assert_eq!(cleaned[0]["Region"], "UNKNOWN");
        assert_eq!(cleaned[0]["Sales"], "10");
        assert_eq!(cleaned[1]["Region"], "UNKNOWN");
        assert_eq!(cleaned[1]["Sales"], json!(0.0));
    }

    #[test]
    fn test_unlisted_fields_pass_through() {
        let policy = MissingPolicy::fill([("Region", json!("UNKNOWN"))]);
        let rows = vec![record(json!({"Note": "", "Region": "East"}))];

        let cleaned = clean(rows, &policy);

        assert_eq!(cleaned[0]["Note"], "");
        assert_eq!(cleaned[0]["Region"], "East");
    }

    #[test]
    fn test_appended_fields_keep_existing_order() {
        let policy = MissingPolicy::fill([("Product", json!("UNKNOWN"))]);
        let rows = vec![record(json!({"Date": "2024-01-01", "Sales": "5"}))];

        let cleaned = clean(rows, &policy);
        let keys: Vec<&String> = cleaned[0].keys().collect();

        assert_eq!(keys, vec!["Date", "Sales", "Product"]);
    }

    #[test]
    fn test_remove_mode_drops_incomplete_rows() {
        let policy = MissingPolicy::remove(["Sales", "Region"]);
        let rows = vec![
            record(json!({"Region": "East", "Sales": "1"})),
            record(json!({"Region": "", "Sales": "2"})),
            record(json!({"Sales": "3"})),
            record(json!({"Region": "West", "Sales": "4"})),
        ];

        let cleaned = clean(rows, &policy);

        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0]["Sales"], "1");
        assert_eq!(cleaned[1]["Sales"], "4");
    }

    #[test]
    fn test_conflicting_policy_rejected() {
        let mut policy = MissingPolicy::fill([("Sales", json!(0.0))]);
        policy.required.push("Sales".into());
        assert!(matches!(policy.validate(), Err(ConfigError::ConflictingPolicy(f)) if f == "Sales"));
    }
}
