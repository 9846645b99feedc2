//! High-level pipeline API for sales runs.
//!
//! Combines every stage in a fixed order:
//! load, clean, normalize dates, normalize numbers, filter, derive growth,
//! aggregate, analyze, write outputs, render charts.
//!
//! # Example
//!
//! ```rust,ignore
//! use salesflow::{run_file, RunOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let outcome = run_file(&RunOptions::new("sales.csv", "Output"))?;
//!     println!("Kept {} rows", outcome.report.kept);
//!     Ok(())
//! }
//! ```

use indexmap::IndexMap;
use std::path::PathBuf;
use tracing::debug;

use super::aggregate::sum_by_key;
use super::clean::clean;
use super::config::PipelineConfig;
use super::derive::compute_growth;
use super::filter::filter_rows;
use super::normalize::{normalize_dates, normalize_numbers};
use crate::analysis::analyze;
use crate::charts::render_charts;
use crate::error::PipelineResult;
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{AggregateEntry, Record, StatisticsSummary};
use crate::output::{
    write_aggregates_csv, write_records_csv, write_summary_report, OutputLayout, CLEAN_DATA_FILE,
    SUMMARY_FILE,
};
use crate::parser::{load_records, SourceFormat};

/// In-memory result of the record stages
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Records after filtering and growth derivation
    pub records: Vec<Record>,

    /// Per-group totals in first-appearance order
    pub aggregates: Vec<AggregateEntry>,

    /// Summary per analyzed column
    pub statistics: IndexMap<String, StatisticsSummary>,

    /// Records given to the pipeline
    pub loaded: usize,

    /// Records left after the missing-value policy
    pub cleaned: usize,

    /// Records that passed the filter
    pub kept: usize,
}

/// Options for a file-to-directory run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Input file (`.json` or delimited text)
    pub input: PathBuf,

    /// Directory receiving all result files
    pub output_dir: PathBuf,

    /// Stage settings
    pub config: PipelineConfig,

    /// Render charts after writing the tables
    pub charts: bool,
}

impl RunOptions {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            config: PipelineConfig::default(),
            charts: true,
        }
    }
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Record stage results
    pub report: PipelineReport,

    /// Cleaned table, absent when no record survived
    pub clean_data: Option<PathBuf>,

    /// Aggregate table
    pub aggregates: PathBuf,

    /// Statistics report
    pub summary: PathBuf,

    /// Rendered charts
    pub charts: Vec<PathBuf>,
}

/// Run the record stages on already-loaded records.
///
/// Never fails: malformed values degrade to defaults inside each stage.
pub fn run_stages(records: Vec<Record>, config: &PipelineConfig) -> PipelineReport {
    let loaded = records.len();

    let records = clean(records, &config.missing);
    let cleaned = records.len();
    debug!(loaded, cleaned, "missing-value policy applied");
    log_success("Handled missing values");

    let records = normalize_dates(records, &config.date_fields, config.date_fallback);
    debug!(fields = ?config.date_fields, "dates normalized");
    log_success("Normalized dates");

    let records = normalize_numbers(records, &config.numeric_fields, config.precision);
    debug!(fields = ?config.numeric_fields, precision = config.precision, "numbers normalized");
    log_success("Normalized numeric fields");

    let records = filter_rows(records, |r| config.filter.matches(r));
    let kept = records.len();
    debug!(kept, dropped = cleaned - kept, "rows filtered");
    log_success(format!("Filtered rows: kept {} of {}", kept, cleaned));

    let growth = &config.growth;
    let records = compute_growth(records, &growth.current_field, &growth.previous_field, &growth.new_field);
    debug!(field = %growth.new_field, "growth column derived");
    log_success(format!("Computed {}", growth.new_field));

    let aggregates = sum_by_key(&records, &config.group_by, &config.sum_field);
    debug!(groups = aggregates.len(), "aggregated");
    log_success(format!(
        "Aggregated {} by {} ({} groups)",
        config.sum_field,
        config.group_by,
        aggregates.len()
    ));

    let statistics = analyze(&records, &config.analyze_columns);
    debug!(columns = statistics.len(), "statistics computed");
    log_success("Computed statistics");

    PipelineReport {
        records,
        aggregates,
        statistics,
        loaded,
        cleaned,
        kept,
    }
}

/// Load a file, run every stage and write all results.
///
/// Configuration is validated before the input is read. Any load or write
/// failure aborts the run.
pub fn run_file(options: &RunOptions) -> PipelineResult<PipelineOutcome> {
    let config = &options.config;
    config.validate()?;

    log_info(format!("Reading {}", options.input.display()));
    let parsed = load_records(&options.input)?;
    if let SourceFormat::Delimited { delimiter } = parsed.format {
        log_info_indent(format!("Encoding: {}", parsed.encoding), 1);
        log_info_indent(format!("Delimiter: '{}'", format_delimiter(delimiter)), 1);
    }
    log_success(format!("Loaded {} rows", parsed.records.len()));

    let report = run_stages(parsed.records, config);

    let layout = OutputLayout::new(&options.output_dir);
    layout.create(options.charts)?;

    let clean_data = write_clean_data(&layout, &report.records)?;

    let aggregates = layout.file(&config.aggregate_file_name());
    write_aggregates_csv(&aggregates, &report.aggregates, &config.sum_field)?;
    log_success(format!("Saved aggregated data to {}", aggregates.display()));

    let summary = layout.file(SUMMARY_FILE);
    write_summary_report(&summary, &report.statistics)?;
    log_success(format!("Saved analysis summary to {}", summary.display()));

    let charts = if options.charts {
        let paths = render_charts(&report.records, &report.aggregates, config, &layout)?;
        log_success(format!("Saved {} charts to {}", paths.len(), layout.visuals.display()));
        paths
    } else {
        Vec::new()
    };

    Ok(PipelineOutcome {
        report,
        clean_data,
        aggregates,
        summary,
        charts,
    })
}

fn write_clean_data(layout: &OutputLayout, records: &[Record]) -> PipelineResult<Option<PathBuf>> {
    if records.is_empty() {
        log_warning("No records left, skipping cleaned data file");
        return Ok(None);
    }
    let path = layout.file(CLEAN_DATA_FILE);
    write_records_csv(&path, records)?;
    log_success(format!("Saved cleaned data to {}", path.display()));
    Ok(Some(path))
}

/// Printable delimiter, tab shown as `\t`
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LoadError, PipelineError};
    use crate::transform::filter::RowPredicate;
    use serde_json::{json, Value};

    fn records(v: Value) -> Vec<Record> {
        v.as_array()
            .unwrap()
            .iter()
            .map(|r| r.as_object().cloned().unwrap())
            .collect()
    }

    fn quiet() {
        crate::logs::PROGRESS_LOG.set_quiet(true);
    }

    #[test]
    fn test_run_stages_default_config() {
        quiet();
        let rows = records(json!([
            {"Date": "01/03/2024", "Region": "East", "Sales": "1500", "PreviousSales": "1000"},
            {"Date": "2024-03-02", "Region": "West", "Sales": "999.99", "PreviousSales": "500"},
            {"Date": "bad", "Region": "", "Sales": "2000.456", "PreviousSales": ""},
            {"Date": "2024-03-04", "Region": "East", "Sales": "abc", "PreviousSales": "10"}
        ]));

        let report = run_stages(rows, &PipelineConfig::default());

        assert_eq!(report.loaded, 4);
        assert_eq!(report.cleaned, 4);
        assert_eq!(report.kept, 2);

        let first = &report.records[0];
        assert_eq!(first["Date"], "2024-03-01");
        assert_eq!(first["Sales"], json!(1500.0));
        assert_eq!(first["SalesGrowth"], json!(0.5));

        let second = &report.records[1];
        assert_eq!(second["Date"], "bad");
        assert_eq!(second["Region"], "UNKNOWN");
        assert_eq!(second["Sales"], json!(2000.46));
        assert_eq!(second["SalesGrowth"], json!(0.0));

        assert_eq!(
            report.aggregates,
            vec![AggregateEntry::new("East", 1500.0), AggregateEntry::new("UNKNOWN", 2000.46)]
        );
        assert_eq!(report.statistics["Sales"].count, 2);
        assert_eq!(report.statistics["SalesGrowth"].count, 2);
    }

    #[test]
    fn test_run_stages_with_removal_and_identity_filter() {
        quiet();
        let config = PipelineConfig {
            missing: crate::transform::clean::MissingPolicy::remove(["Region"]),
            filter: RowPredicate::Always,
            ..Default::default()
        };
        let rows = records(json!([
            {"Region": "East", "Sales": 10},
            {"Region": null, "Sales": 20},
            {"Sales": 30}
        ]));

        let report = run_stages(rows, &config);

        assert_eq!(report.cleaned, 1);
        assert_eq!(report.kept, 1);
        assert_eq!(report.aggregates, vec![AggregateEntry::new("East", 10.0)]);
    }

    #[test]
    fn test_run_file_end_to_end() {
        quiet();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sales.csv");
        std::fs::write(
            &input,
            "Date,Region,Product,Sales,PreviousSales\n\
             2024-01-01,East,Widget,999.99,900\n\
             02/01/2024,West,Gadget,1000.01,1000.01\n\
             2024-01-03,East,Widget,1500,0\n",
        )
        .unwrap();

        let out = dir.path().join("Output");
        let mut options = RunOptions::new(&input, &out);
        options.charts = false;

        let outcome = run_file(&options).unwrap();

        assert_eq!(outcome.report.kept, 2);
        let clean = std::fs::read_to_string(outcome.clean_data.unwrap()).unwrap();
        assert_eq!(
            clean,
            "Date,Region,Product,Sales,PreviousSales,SalesGrowth\n\
             2024-01-02,West,Gadget,1000.01,1000.01,0.0\n\
             2024-01-03,East,Widget,1500.0,0.0,0.0\n"
        );
        assert!(!clean.contains("999.99"));

        assert_eq!(outcome.aggregates, out.join("agg_by_region.csv"));
        let agg = std::fs::read_to_string(&outcome.aggregates).unwrap();
        assert_eq!(agg, "key,Sales\nWest,1000.01\nEast,1500.0\n");

        let summary = std::fs::read_to_string(&outcome.summary).unwrap();
        assert!(summary.starts_with("Column: Sales\n  count: 2\n"));
        assert!(summary.contains("Column: SalesGrowth\n"));

        assert!(outcome.charts.is_empty());
        assert!(!out.join("Visuals").exists());
    }

    #[test]
    fn test_run_file_with_charts() {
        quiet();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sales.json");
        std::fs::write(
            &input,
            r#"[{"Date": "2024-01-01", "Region": "East", "Sales": 1200, "PreviousSales": 1000}]"#,
        )
        .unwrap();

        let outcome = run_file(&RunOptions::new(&input, dir.path().join("out"))).unwrap();

        assert_eq!(outcome.charts.len(), 4);
        assert!(outcome.charts.iter().all(|p| p.is_file()));
    }

    #[test]
    fn test_run_file_everything_filtered() {
        quiet();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sales.csv");
        std::fs::write(&input, "Region,Sales\nEast,10\n").unwrap();

        let outcome = run_file(&RunOptions::new(&input, dir.path().join("out"))).unwrap();

        assert!(outcome.clean_data.is_none());
        assert_eq!(outcome.charts.len(), 4);
        assert!(outcome.charts.iter().all(|p| p.is_file()));
        assert_eq!(std::fs::read_to_string(&outcome.aggregates).unwrap(), "key,Sales\n");
        let summary = std::fs::read_to_string(&outcome.summary).unwrap();
        assert_eq!(summary, "Column: Sales\n  count: 0\n\nColumn: SalesGrowth\n  count: 0\n\n");
    }

    #[test]
    fn test_run_file_errors() {
        quiet();
        let dir = tempfile::tempdir().unwrap();

        let missing = RunOptions::new(dir.path().join("nope.csv"), dir.path().join("out"));
        assert!(matches!(run_file(&missing), Err(PipelineError::Load(LoadError::Io { .. }))));

        let mut invalid = RunOptions::new(dir.path().join("nope.csv"), dir.path().join("out"));
        invalid.config.precision = 99;
        assert!(matches!(run_file(&invalid), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_format_delimiter() {
        assert_eq!(format_delimiter('\t'), "\\t");
        assert_eq!(format_delimiter(';'), ";");
    }
}
