//! Transformation module.
//!
//! Record-level stages of a sales run:
//! - Coerce: number/date parsing shared by every stage
//! - Clean: missing-value fill/remove policy
//! - Normalize: canonical dates and rounded numbers
//! - Filter: declarative row predicates
//! - Derive: growth ratio column
//! - Aggregate: per-group totals
//! - Config: all run settings
//! - Pipeline: fixed-order orchestration

pub mod aggregate;
pub mod clean;
pub mod coerce;
pub mod config;
pub mod derive;
pub mod filter;
pub mod normalize;
pub mod pipeline;

pub use aggregate::sum_by_key;
pub use clean::{clean, MissingPolicy};
pub use coerce::*;
pub use config::{file_slug, ChartConfig, PipelineConfig};
pub use derive::{compute_growth, growth_ratio, GrowthConfig};
pub use filter::{filter_rows, RowPredicate};
pub use normalize::{normalize_dates, normalize_numbers};
pub use pipeline::*;
