//! Chart rendering module.
//!
//! Every chart is written as an SVG file into the configured charts
//! directory. The module separates data preparation (plain functions over
//! column values, unit tested) from drawing (plotters, one file per chart
//! kind).

mod bars;
mod boxplot;
mod heatmap;
mod histogram;

use crate::config::EdaConfig;
use crate::error::{EdaError, Result};
use crate::types::{AgeGroup, CorrelationMatrix, columns};
use crate::utils::{f64_values, slugify, string_values, value_counts};
use bars::{BarChart, BarFill};
use plotters::style::RGBColor;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub use heatmap::coolwarm;
pub use histogram::{HistogramBin, histogram_bins};

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

type ChartJob<'a> = Box<dyn Fn() -> Result<Option<PathBuf>> + 'a>;

/// Number of bins of every distribution histogram.
pub const HISTOGRAM_BINS: usize = 50;

/// Columns drawn as distribution histograms.
pub const DISTRIBUTION_COLUMNS: [&str; 3] = [
    columns::AGE,
    columns::STAY_DURATION,
    columns::BILLING_AMOUNT,
];

/// Columns drawn as value-count bar charts.
pub const COUNT_COLUMNS: [&str; 3] = [
    columns::BLOOD_TYPE,
    columns::TEST_RESULTS,
    columns::AGE_GROUP,
];

/// Bar charts of a mean per group: file name, title, group column, value column.
const GROUP_MEAN_CHARTS: [(&str, &str, &str, &str); 4] = [
    (
        "age_by_age_group.svg",
        "Average Age by Age Group",
        columns::AGE_GROUP,
        columns::AGE,
    ),
    (
        "billing_by_insurance_provider.svg",
        "Average Billing Amount by Insurance Provider",
        columns::INSURANCE_PROVIDER,
        columns::BILLING_AMOUNT,
    ),
    (
        "admission_month_by_year.svg",
        "Average Admission Month by Year",
        columns::ADMISSION_YEAR,
        columns::ADMISSION_MONTH,
    ),
    (
        "stay_duration_by_age_group.svg",
        "Hospital Stay Duration by Age Group",
        columns::AGE_GROUP,
        columns::STAY_DURATION,
    ),
];

const COUNT_BLUE: RGBColor = RGBColor(31, 119, 180);

// ============================================================================
// Data preparation
// ============================================================================

/// Mean of `values` per key, ordered by key. Rows missing either side are
/// skipped.
pub fn mean_by_group(keys: &[Option<String>], values: &[Option<f64>]) -> Vec<(String, f64)> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for (key, value) in keys.iter().zip(values) {
        if let (Some(key), Some(value)) = (key, value) {
            let entry = sums.entry(key.as_str()).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(key, (sum, count))| (key.to_string(), sum / count as f64))
        .collect()
}

/// All values per key, ordered by key.
pub fn values_by_group(keys: &[Option<String>], values: &[Option<f64>]) -> Vec<(String, Vec<f64>)> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (key, value) in keys.iter().zip(values) {
        if let (Some(key), Some(value)) = (key, value) {
            groups.entry(key.as_str()).or_default().push(*value);
        }
    }

    groups
        .into_iter()
        .map(|(key, values)| (key.to_string(), values))
        .collect()
}

/// Reorder age-group labelled entries from youngest to oldest bucket.
pub fn in_age_order<T>(mut entries: Vec<(String, T)>) -> Vec<(String, T)> {
    entries.sort_by_key(|(label, _)| AgeGroup::rank_of(label).unwrap_or(usize::MAX));
    entries
}

// ============================================================================
// Renderer
// ============================================================================

/// Renders the fixed chart set of an analysis run.
pub struct ChartRenderer {
    dir: PathBuf,
    size: (u32, u32),
}

impl ChartRenderer {
    pub fn new(config: &EdaConfig) -> Self {
        Self {
            dir: config.charts_dir.clone(),
            size: (config.chart_width, config.chart_height),
        }
    }

    /// Render every chart. Returns the paths written, in render order.
    ///
    /// A chart whose input has no values is skipped with a warning.
    pub fn render_all(&self, df: &DataFrame, correlation: &CorrelationMatrix) -> Result<Vec<PathBuf>> {
        self.render_all_with_progress(df, correlation, |_, _, _| {})
    }

    /// [`Self::render_all`], calling `on_chart(current, total, title)` before
    /// each chart is drawn.
    pub fn render_all_with_progress<F>(
        &self,
        df: &DataFrame,
        correlation: &CorrelationMatrix,
        mut on_chart: F,
    ) -> Result<Vec<PathBuf>>
    where
        F: FnMut(usize, usize, &str),
    {
        fs::create_dir_all(&self.dir)?;

        let jobs = self.jobs(df, correlation);
        let total = jobs.len();
        let mut written = Vec::new();
        for (index, (title, job)) in jobs.into_iter().enumerate() {
            on_chart(index + 1, total, &title);
            written.extend(job()?);
        }

        info!("Rendered {} charts into {}", written.len(), self.dir.display());
        Ok(written)
    }

    fn jobs<'a>(
        &'a self,
        df: &'a DataFrame,
        correlation: &'a CorrelationMatrix,
    ) -> Vec<(String, ChartJob<'a>)> {
        let mut jobs: Vec<(String, ChartJob<'a>)> = Vec::new();

        for name in DISTRIBUTION_COLUMNS {
            jobs.push((
                format!("Distribution of {}", name),
                Box::new(move || self.distribution(df, name)),
            ));
        }
        for name in COUNT_COLUMNS {
            jobs.push((
                format!("Counts of {}", name),
                Box::new(move || self.value_counts(df, name)),
            ));
        }
        for (file_name, title, key, value) in GROUP_MEAN_CHARTS {
            jobs.push((
                title.to_string(),
                Box::new(move || self.group_means(df, file_name, title, key, value)),
            ));
        }
        jobs.push((
            "Age by Medical Condition".to_string(),
            Box::new(move || self.age_by_condition(df)),
        ));
        jobs.push((
            "Correlation Matrix".to_string(),
            Box::new(move || self.correlation(correlation)),
        ));

        jobs
    }

    fn render<F>(&self, file_name: &str, draw: F) -> Result<PathBuf>
    where
        F: FnOnce(&Path, (u32, u32)) -> DrawResult,
    {
        let path = self.dir.join(file_name);
        draw(&path, self.size).map_err(|e| EdaError::ChartRenderFailed {
            chart: file_name.to_string(),
            reason: e.to_string(),
        })?;

        debug!("Wrote {}", path.display());
        Ok(path)
    }

    fn skip(file_name: &str) -> Result<Option<PathBuf>> {
        warn!("Skipping {}: no values to plot", file_name);
        Ok(None)
    }

    fn distribution(&self, df: &DataFrame, column: &str) -> Result<Option<PathBuf>> {
        let file_name = format!("distribution_{}.svg", slugify(column));
        let values: Vec<f64> = f64_values(df, column)?.into_iter().flatten().collect();
        let bins = histogram_bins(&values, HISTOGRAM_BINS);
        if bins.is_empty() {
            return Self::skip(&file_name);
        }

        let title = format!("Distribution of {}", column);
        self.render(&file_name, |path, size| {
            histogram::draw(path, size, &title, column, &bins)
        })
        .map(Some)
    }

    fn value_counts(&self, df: &DataFrame, column: &str) -> Result<Option<PathBuf>> {
        let file_name = format!("counts_{}.svg", slugify(column));
        let bars: Vec<(String, f64)> = value_counts(&string_values(df, column)?)
            .into_iter()
            .map(|(label, count)| (label, count as f64))
            .collect();
        if bars.is_empty() {
            return Self::skip(&file_name);
        }

        let title = format!("Distribution of {}", column);
        self.render(&file_name, |path, size| {
            bars::draw(
                path,
                size,
                &BarChart {
                    title: &title,
                    x_desc: column,
                    y_desc: "Count",
                    bars: &bars,
                    fill: BarFill::Solid(COUNT_BLUE),
                },
            )
        })
        .map(Some)
    }

    fn group_means(
        &self,
        df: &DataFrame,
        file_name: &str,
        title: &str,
        key: &str,
        value: &str,
    ) -> Result<Option<PathBuf>> {
        let mut bars = mean_by_group(&string_values(df, key)?, &f64_values(df, value)?);
        if key == columns::AGE_GROUP {
            bars = in_age_order(bars);
        }
        if bars.is_empty() {
            return Self::skip(file_name);
        }

        self.render(file_name, |path, size| {
            bars::draw(
                path,
                size,
                &BarChart {
                    title,
                    x_desc: key,
                    y_desc: value,
                    bars: &bars,
                    fill: BarFill::Palette,
                },
            )
        })
        .map(Some)
    }

    fn age_by_condition(&self, df: &DataFrame) -> Result<Option<PathBuf>> {
        let file_name = "age_by_medical_condition.svg";
        let groups = values_by_group(
            &string_values(df, columns::MEDICAL_CONDITION)?,
            &f64_values(df, columns::AGE)?,
        );
        if groups.is_empty() {
            return Self::skip(file_name);
        }

        self.render(file_name, |path, size| {
            boxplot::draw(path, size, "Age by Medical Condition", columns::AGE, &groups)
        })
        .map(Some)
    }

    fn correlation(&self, matrix: &CorrelationMatrix) -> Result<Option<PathBuf>> {
        let file_name = "correlation_matrix.svg";
        if matrix.columns.is_empty() {
            return Self::skip(file_name);
        }

        self.render(file_name, |path, size| {
            heatmap::draw(path, size, "Correlation Matrix", matrix)
        })
        .map(Some)
    }
}
