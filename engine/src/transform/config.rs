//! Pipeline configuration.
//!
//! Every policy and constant of a run lives in one [`PipelineConfig`] that can
//! be loaded from JSON. Missing keys take the defaults below, which reproduce
//! the standard sales run.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;

use super::clean::MissingPolicy;
use super::coerce::DateFallback;
use super::derive::GrowthConfig;
use super::filter::RowPredicate;
use crate::error::{ConfigError, ConfigResult};

/// Largest accepted rounding precision.
pub const MAX_PRECISION: u32 = 12;

/// Complete description of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Missing-value policy
    pub missing: MissingPolicy,

    /// Fields rewritten to `YYYY-MM-DD`
    pub date_fields: Vec<String>,

    /// What to emit for unparseable dates
    pub date_fallback: DateFallback,

    /// Fields coerced to numbers
    pub numeric_fields: Vec<String>,

    /// Decimal digits kept on numeric fields
    pub precision: u32,

    /// Rows to keep
    pub filter: RowPredicate,

    /// Growth ratio column
    pub growth: GrowthConfig,

    /// Grouping field for the aggregate table
    pub group_by: String,

    /// Field summed per group
    pub sum_field: String,

    /// Columns summarized in the statistics report
    pub analyze_columns: Vec<String>,

    /// Chart fields
    pub charts: ChartConfig,
}

/// Fields used by the chart collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// X axis of the line chart (source order is taken as time order)
    pub time_field: String,

    /// Plotted value for the line chart and histogram, X axis of the scatter
    pub value_field: String,

    /// Y axis of the scatter plot
    pub scatter_field: String,

    /// Histogram bin count
    pub histogram_bins: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            time_field: "Date".to_string(),
            value_field: "Sales".to_string(),
            scatter_field: "SalesGrowth".to_string(),
            histogram_bins: 10,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            missing: MissingPolicy::fill([
                ("Date", json!("UNKNOWN")),
                ("Region", json!("UNKNOWN")),
                ("Sales", json!(0.0)),
                ("PreviousSales", json!(0.0)),
                ("Product", json!("UNKNOWN")),
                ("SalesGrowth", json!(0.0)),
            ]),
            date_fields: vec!["Date".to_string()],
            date_fallback: DateFallback::KeepOriginal,
            numeric_fields: vec!["Sales".to_string(), "PreviousSales".to_string()],
            precision: 2,
            filter: RowPredicate::greater_than("Sales", 1000.0),
            growth: GrowthConfig::default(),
            group_by: "Region".to_string(),
            sum_field: "Sales".to_string(),
            analyze_columns: vec!["Sales".to_string(), "SalesGrowth".to_string()],
            charts: ChartConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a config from a JSON string
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject inconsistent settings before any record is touched
    pub fn validate(&self) -> ConfigResult<()> {
        self.missing.validate()?;

        if self.precision > MAX_PRECISION {
            return Err(invalid("precision", format!("must be at most {}", MAX_PRECISION)));
        }
        if self.group_by.trim().is_empty() {
            return Err(invalid("group_by", "must name a field"));
        }
        if self.sum_field.trim().is_empty() {
            return Err(invalid("sum_field", "must name a field"));
        }
        if self.growth.new_field.trim().is_empty() {
            return Err(invalid("growth.new_field", "must name a field"));
        }
        if self.charts.histogram_bins == 0 {
            return Err(invalid("charts.histogram_bins", "must be greater than zero"));
        }
        Ok(())
    }

    /// Output file name of the aggregate table, e.g. `agg_by_region.csv`
    pub fn aggregate_file_name(&self) -> String {
        format!("agg_by_{}.csv", file_slug(&self.group_by))
    }
}

/// Lowercase a field name for use in file names
pub fn file_slug(field: &str) -> String {
    field
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.into(),
    }
}
