//! SVG chart rendering with plotters.
//!
//! Charts:
//! 1. Line chart of a value over time (source order)
//! 2. Bar chart of group totals (aggregate order)
//! 3. Histogram of a value's distribution
//! 4. Scatter plot of two values

use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

use crate::error::{ChartError, ChartResult};

type DrawResult = Result<(), Box<dyn Error>>;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);

/// Axis titles and caption of one chart.
#[derive(Debug, Clone)]
pub struct ChartLabels {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
}

impl ChartLabels {
    pub fn new(title: impl Into<String>, x_desc: impl Into<String>, y_desc: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_desc: x_desc.into(),
            y_desc: y_desc.into(),
        }
    }
}

/// One histogram bin, `[start, end)` (the last bin is closed).
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: u32,
}

/// Split `values` into `bins` equal-width bins over `[min, max]`.
///
/// A constant sample is spread over `[v - 0.5, v + 0.5]`.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut lo, mut hi) = value_range(values);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0u32; bins];
    for v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            count,
        })
        .collect()
}

fn value_range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)))
}

/// Padded axis range; falls back to `0..1` for empty input.
fn padded_range(values: &[f64], include_zero: bool) -> std::ops::Range<f64> {
    if values.is_empty() {
        return 0.0..1.0;
    }
    let (mut lo, mut hi) = value_range(values);
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    let pad = if hi > lo { (hi - lo) * 0.1 } else { 1.0 };
    let lo = if include_zero && lo == 0.0 { 0.0 } else { lo - pad };
    (lo)..(hi + pad)
}

/// Draws the four pipeline charts as SVG files.
#[derive(Debug, Clone, Copy)]
pub struct ChartRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self { width: 1000, height: 500 }
    }
}

impl ChartRenderer {
    /// Line chart of labelled points in their given order.
    pub fn line(&self, path: &Path, points: &[(String, f64)], labels: &ChartLabels) -> ChartResult<()> {
        self.draw_line(path, points, labels).map_err(|e| render_error(path, e))
    }

    /// Bar chart of labelled totals in their given order.
    pub fn bars(&self, path: &Path, bars: &[(String, f64)], labels: &ChartLabels) -> ChartResult<()> {
        self.draw_bars(path, bars, labels).map_err(|e| render_error(path, e))
    }

    /// Histogram of `values` over `bins` equal-width bins.
    pub fn histogram(&self, path: &Path, values: &[f64], bins: usize, labels: &ChartLabels) -> ChartResult<()> {
        self.draw_histogram(path, &histogram_bins(values, bins), labels)
            .map_err(|e| render_error(path, e))
    }

    /// Scatter plot of `xs` against `ys`.
    pub fn scatter(&self, path: &Path, xs: &[f64], ys: &[f64], labels: &ChartLabels) -> ChartResult<()> {
        self.draw_scatter(path, xs, ys, labels).map_err(|e| render_error(path, e))
    }

    fn draw_line(&self, path: &Path, points: &[(String, f64)], labels: &ChartLabels) -> DrawResult {
        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = points.len().max(1) as u32;
        let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(&labels.title, CAPTION_FONT)
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d((0u32..n).into_segmented(), padded_range(&values, false))?;

        chart
            .configure_mesh()
            .x_desc(&labels.x_desc)
            .y_desc(&labels.y_desc)
            .x_labels(points.len().clamp(1, 12))
            .x_label_formatter(&|x| segment_label(x, points))
            .draw()?;

        let coords = || {
            points
                .iter()
                .enumerate()
                .map(|(i, (_, v))| (SegmentValue::CenterOf(i as u32), *v))
        };
        chart.draw_series(LineSeries::new(coords(), &BLUE))?;
        chart.draw_series(coords().map(|p| Circle::new(p, 3, BLUE.filled())))?;

        root.present()?;
        Ok(())
    }

    fn draw_bars(&self, path: &Path, bars: &[(String, f64)], labels: &ChartLabels) -> DrawResult {
        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = bars.len().max(1) as u32;
        let values: Vec<f64> = bars.iter().map(|(_, v)| *v).collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(&labels.title, CAPTION_FONT)
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d((0u32..n).into_segmented(), padded_range(&values, true))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(&labels.x_desc)
            .y_desc(&labels.y_desc)
            .x_labels(bars.len().max(1))
            .x_label_formatter(&|x| segment_label(x, bars))
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.mix(0.7).filled())
                .margin(10)
                .data(bars.iter().enumerate().map(|(i, (_, v))| (i as u32, *v))),
        )?;

        root.present()?;
        Ok(())
    }

    fn draw_histogram(&self, path: &Path, bins: &[HistogramBin], labels: &ChartLabels) -> DrawResult {
        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = bins.len().max(1) as u32;
        let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0);

        let mut chart = ChartBuilder::on(&root)
            .caption(&labels.title, CAPTION_FONT)
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d((0u32..n).into_segmented(), 0u32..max_count + 1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(&labels.x_desc)
            .y_desc(&labels.y_desc)
            .x_labels(bins.len().max(1))
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(i) => bins
                    .get(*i as usize)
                    .map(|b| format!("{:.1}", b.start))
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.mix(0.7).filled())
                .margin(1)
                .data(bins.iter().enumerate().map(|(i, b)| (i as u32, b.count))),
        )?;

        root.present()?;
        Ok(())
    }

    fn draw_scatter(&self, path: &Path, xs: &[f64], ys: &[f64], labels: &ChartLabels) -> DrawResult {
        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&labels.title, CAPTION_FONT)
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d(padded_range(xs, false), padded_range(ys, false))?;

        chart
            .configure_mesh()
            .x_desc(&labels.x_desc)
            .y_desc(&labels.y_desc)
            .draw()?;

        chart.draw_series(
            xs.iter()
                .zip(ys)
                .map(|(x, y)| Circle::new((*x, *y), 4, BLUE.mix(0.8).filled())),
        )?;

        root.present()?;
        Ok(())
    }
}

fn segment_label(x: &SegmentValue<u32>, points: &[(String, f64)]) -> String {
    match x {
        SegmentValue::CenterOf(i) => points
            .get(*i as usize)
            .map(|(label, _)| label.clone())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn render_error(path: &Path, err: Box<dyn Error>) -> ChartError {
    ChartError::Render {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
