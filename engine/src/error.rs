//! Error types for the SalesFlow pipeline.
//!
//! Only I/O and configuration problems are errors here. Malformed field
//! values never surface as errors: they degrade to defaults inside the
//! transform stages.
//!
//! - [`LoadError`] - reading and decoding input files
//! - [`ConfigError`] - invalid pipeline configuration
//! - [`OutputError`] - writing result files
//! - [`ChartError`] - chart rendering
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Loading Errors
// =============================================================================

/// Errors while loading input records.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read file.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid delimited content.
    #[error("Invalid CSV format: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid JSON content.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parsed, but it does not hold records.
    #[error("Malformed input: {0}")]
    Malformed(String),

    /// Empty file or no header row.
    #[error("Input file is empty")]
    EmptyFile,
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors in the pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value is out of range or inconsistent.
    #[error("Invalid configuration value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// A field is both filled with a default and required.
    #[error("Field '{0}' cannot be both filled and required")]
    ConflictingPolicy(String),

    /// Config file could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for the config schema.
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while writing result files.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Failed to create or write a path.
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV writer failure.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Chart Errors
// =============================================================================

/// Errors from the chart renderer.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The drawing backend failed.
    #[error("Failed to render chart {path}: {message}")]
    Render { path: PathBuf, message: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::run_file`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input loading error.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Output writing error.
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Chart rendering error.
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type for chart operations.
pub type ChartResult<T> = Result<T, ChartError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
