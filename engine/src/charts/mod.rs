//! Chart rendering.
//!
//! - [`series`] - pull plottable pairs and lists out of records
//! - [`render`] - draw them as SVG files

pub mod render;
pub mod series;

pub use render::{histogram_bins, ChartLabels, ChartRenderer, HistogramBin};
pub use series::{labelled_totals, numeric_values, paired_values, time_series, ChartSeries};

use std::path::PathBuf;

use crate::error::ChartResult;
use crate::models::{AggregateEntry, Record};
use crate::output::OutputLayout;
use crate::transform::config::{file_slug, PipelineConfig};

/// Draw the four standard charts into the layout's chart directory.
///
/// Returns the written paths in drawing order.
pub fn render_charts(
    records: &[Record],
    aggregates: &[AggregateEntry],
    config: &PipelineConfig,
    layout: &OutputLayout,
) -> ChartResult<Vec<PathBuf>> {
    let charts = &config.charts;
    let series = ChartSeries::extract(records, aggregates, charts);
    let renderer = ChartRenderer::default();

    let value = &charts.value_field;
    let slug = file_slug(value);

    let over_time = layout.chart(&format!("{}_over_time.svg", slug));
    renderer.line(
        &over_time,
        &series.over_time,
        &ChartLabels::new(format!("{} Over Time", value), &charts.time_field, value),
    )?;

    let by_group = layout.chart(&format!("{}_by_{}.svg", file_slug(&config.sum_field), file_slug(&config.group_by)));
    renderer.bars(
        &by_group,
        &series.by_group,
        &ChartLabels::new(
            format!("{} by {}", config.sum_field, config.group_by),
            &config.group_by,
            format!("Total {}", config.sum_field),
        ),
    )?;

    let histogram = layout.chart(&format!("{}_histogram.svg", slug));
    renderer.histogram(
        &histogram,
        &series.distribution,
        charts.histogram_bins,
        &ChartLabels::new(format!("{} Distribution", value), value, "Frequency"),
    )?;

    let scatter = layout.chart(&format!("{}_vs_{}.svg", slug, file_slug(&charts.scatter_field)));
    renderer.scatter(
        &scatter,
        &series.scatter.0,
        &series.scatter.1,
        &ChartLabels::new(
            format!("{} vs {}", value, charts.scatter_field),
            value,
            &charts.scatter_field,
        ),
    )?;

    Ok(vec![over_time, by_group, histogram, scatter])
}
