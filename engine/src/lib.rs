//! # SalesFlow - sales record cleaning, aggregation and reporting
//!
//! SalesFlow loads tabular sales records (CSV or JSON), repairs and
//! normalizes them, keeps the rows that matter, derives a growth column,
//! totals them per group and summarizes the numeric columns. Results are
//! written as CSV tables, a text report and SVG charts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ CSV / JSON  │────▶│   Parser    │────▶│  Transform  │────▶│   Output    │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (8 stages)  │     │ CSV/TXT/SVG │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use salesflow::{run_file, RunOptions};
//!
//! fn main() {
//!     let outcome = run_file(&RunOptions::new("sales.csv", "Output")).unwrap();
//!     println!("Kept {} of {} rows", outcome.report.kept, outcome.report.loaded);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`logs`] - Progress log sink
//! - [`models`] - Records, aggregate entries, statistics summaries
//! - [`parser`] - CSV/JSON loading with auto-detection
//! - [`transform`] - Stages, configuration and pipeline
//! - [`analysis`] - Descriptive statistics
//! - [`output`] - Result files
//! - [`charts`] - SVG charts

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Loading
pub mod parser;

// Transformation
pub mod transform;

// Statistics
pub mod analysis;

// Results
pub mod output;
pub mod charts;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ChartError,
    ConfigError,
    LoadError,
    OutputError,
    PipelineError,
    PipelineResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    AggregateEntry,
    DescriptiveStats,
    Record,
    StatisticsSummary,
    UNKNOWN,
};

// =============================================================================
// Re-exports - Loading
// =============================================================================

pub use parser::{
    load_records,
    parse_bytes_auto,
    parse_json_bytes,
    detect_encoding,
    detect_delimiter,
    decode_content,
    ParseResult,
    SourceFormat,
};

// =============================================================================
// Re-exports - Stages
// =============================================================================

pub use transform::{
    clean,
    coerce_date,
    coerce_number,
    compute_growth,
    filter_rows,
    normalize_dates,
    normalize_numbers,
    sum_by_key,
    DateFallback,
    MissingPolicy,
    RowPredicate,
};

pub use analysis::analyze;

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use transform::config::{ChartConfig, PipelineConfig};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    run_file,
    run_stages,
    PipelineOutcome,
    PipelineReport,
    RunOptions,
};
