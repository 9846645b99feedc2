//! Result files: cleaned table, aggregate table and statistics report.

use indexmap::IndexMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{OutputError, OutputResult};
use crate::models::{format_float, value_to_text, AggregateEntry, Record, StatisticsSummary};

/// Cleaned/derived record table
pub const CLEAN_DATA_FILE: &str = "clean_data.csv";

/// Statistics report
pub const SUMMARY_FILE: &str = "analysis_summary.txt";

/// Chart sub-directory of the output directory
pub const VISUALS_DIR: &str = "Visuals";

/// Output directory layout of one run.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub visuals: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let visuals = root.join(VISUALS_DIR);
        Self { root, visuals }
    }

    /// Create the output and chart directories if needed
    pub fn create(&self, with_visuals: bool) -> OutputResult<()> {
        create_dir(&self.root)?;
        if with_visuals {
            create_dir(&self.visuals)?;
        }
        Ok(())
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn chart(&self, name: &str) -> PathBuf {
        self.visuals.join(name)
    }
}

fn create_dir(path: &Path) -> OutputResult<()> {
    fs::create_dir_all(path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> OutputError {
    OutputError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn csv_writer(path: &Path) -> OutputResult<csv::Writer<File>> {
    let file = File::create(path).map_err(|source| io_error(path, source))?;
    Ok(csv::Writer::from_writer(file))
}

/// Header of the cleaned table: keys of the first record.
pub fn table_header(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|r| r.keys().cloned().collect())
        .unwrap_or_default()
}

/// Write records as CSV using the first record's keys as header.
///
/// Later records are written against that header: absent fields become
/// empty cells, fields outside the header are not written.
pub fn write_records_csv(path: &Path, records: &[Record]) -> OutputResult<usize> {
    let header = table_header(records);
    let mut writer = csv_writer(path)?;
    writer.write_record(&header)?;

    for record in records {
        let row = header
            .iter()
            .map(|field| record.get(field).map(value_to_text).unwrap_or_default());
        writer.write_record(row)?;
    }

    writer.flush().map_err(|source| io_error(path, source))?;
    Ok(records.len())
}

/// Write group totals with header `key,<sum_field>`.
pub fn write_aggregates_csv(path: &Path, entries: &[AggregateEntry], sum_field: &str) -> OutputResult<usize> {
    let mut writer = csv_writer(path)?;
    writer.write_record(["key", sum_field])?;

    for entry in entries {
        let total = format_float(entry.total);
        writer.write_record([entry.key.as_str(), total.as_str()])?;
    }

    writer.flush().map_err(|source| io_error(path, source))?;
    Ok(entries.len())
}

/// Render the statistics report.
///
/// ```text
/// Column: Sales
///   count: 4
///   mean: 2.5
/// ```
pub fn render_summary_report(summary: &IndexMap<String, StatisticsSummary>) -> String {
    let mut out = String::new();
    for (column, stats) in summary {
        out.push_str(&format!("Column: {}\n", column));
        for (name, value) in stats.lines() {
            out.push_str(&format!("  {}: {}\n", name, value));
        }
        out.push('\n');
    }
    out
}

/// Write the statistics report to `path`.
pub fn write_summary_report(path: &Path, summary: &IndexMap<String, StatisticsSummary>) -> OutputResult<()> {
    let mut file = File::create(path).map_err(|source| io_error(path, source))?;
    file.write_all(render_summary_report(summary).as_bytes())
        .map_err(|source| io_error(path, source))
}
