//! Main analysis pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the load, clean, derive, report, chart and save sequence.

use crate::aggregations::Aggregator;
use crate::charts::ChartRenderer;
use crate::cleaner::DataCleaner;
use crate::config::{ConfigValidationError, EdaConfig};
use crate::error::{Result, ResultExt};
use crate::features::FeatureEngineer;
use crate::imputers::StatisticalImputer;
use crate::loader;
use crate::pipeline::progress::{
    ClosureProgressReporter, EdaStage, ProgressReporter, ProgressUpdate,
};
use crate::profiler::{DataProfiler, correlation_matrix};
use crate::types::{EdaResult, EdaSummary, columns};
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Columns of the correlation matrix, in display order.
pub const CORRELATION_COLUMNS: [&str; 3] = [
    columns::BILLING_AMOUNT,
    columns::AGE,
    columns::STAY_DURATION,
];

/// The analysis pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use healthcare_eda::{EdaConfig, Pipeline};
///
/// let config = EdaConfig::builder()
///     .input_path("healthcare_dataset.csv")
///     .render_charts(false)
///     .build()?;
///
/// let result = Pipeline::builder()
///     .config(config)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .run()?;
///
/// println!("{} rows written", result.summary.rows_after);
/// ```
pub struct Pipeline {
    config: EdaConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &EdaConfig {
        &self.config
    }

    /// Load the configured input and run every stage on it.
    pub fn run(&self) -> Result<EdaResult> {
        let start_time = Instant::now();

        self.report_progress(ProgressUpdate::new(
            EdaStage::Loading,
            0.0,
            format!("Loading {}", self.config.input_path.display()),
        ));

        let loaded = loader::load_csv(&self.config.input_path)
            .context(format!("Loading {}", self.config.input_path.display()));

        let result = loaded.and_then(|df| self.process(df, start_time));
        match result {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Analysis completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    /// Run the stages after loading on an in-memory table.
    pub fn process(&self, df: DataFrame, start_time: Instant) -> Result<EdaResult> {
        let mut summary = EdaSummary {
            rows_before: df.height(),
            columns_before: df.width(),
            ..Default::default()
        };
        info!("Dataset loaded: {} rows x {} columns", df.height(), df.width());

        // Step 1: Duplicates
        self.report_progress(ProgressUpdate::new(
            EdaStage::Cleaning,
            0.0,
            "Removing duplicate rows...",
        ));
        let df = if self.config.remove_duplicates {
            let (df, removed) = DataCleaner::remove_duplicates(df)?;
            summary.duplicates_removed = removed;
            info!("Step 1: Removed {} duplicate rows", removed);
            df
        } else {
            info!("Step 1: Skipping duplicate removal (disabled)");
            df
        };

        // Step 2: Overview, before any value is filled in
        self.report_progress(ProgressUpdate::new(
            EdaStage::Overview,
            0.0,
            "Profiling dataset...",
        ));
        let overview = DataProfiler::overview(&df).context("Profiling dataset")?;
        info!(
            "Step 2: Profiled {} columns, {} missing values",
            overview.columns,
            overview.total_nulls()
        );

        // Step 3: Imputation
        self.report_progress(ProgressUpdate::new(
            EdaStage::Imputation,
            0.0,
            "Imputing missing values...",
        ));
        let mut df = df;
        let imputation = StatisticalImputer::impute_all_with_progress(&mut df, |current, total, column| {
            self.report_progress(ProgressUpdate::with_items(
                EdaStage::Imputation,
                format!("Column: {}", column),
                current,
                total,
                format!("Imputing '{}'", column),
            ));
        })
        .context("Imputing missing values")?;
        info!(
            "Step 3: Applied {} imputations ({} warnings)",
            imputation.steps.len(),
            imputation.warnings.len()
        );
        summary.imputation_steps = imputation.steps;
        summary.warnings.extend(imputation.warnings);

        // Step 4: Feature engineering
        self.report_progress(ProgressUpdate::new(
            EdaStage::FeatureEngineering,
            0.0,
            "Deriving features...",
        ));
        let features = FeatureEngineer::derive(df)?;
        summary.invalid_date_rows_dropped = features.invalid_date_rows;
        if features.invalid_date_rows > 0 {
            summary.warnings.push(format!(
                "Dropped {} rows with unparseable dates",
                features.invalid_date_rows
            ));
        }
        let mut df = features.df;
        info!("Step 4: Derived features, {} rows remain", df.height());

        // Step 5: Aggregations and correlation
        self.report_progress(ProgressUpdate::new(
            EdaStage::Aggregation,
            0.0,
            "Aggregating...",
        ));
        let aggregations =
            Aggregator::summarize(&df, &features.hospital_totals).context("Aggregating")?;
        let correlation =
            correlation_matrix(&df, &CORRELATION_COLUMNS).context("Computing correlation")?;
        info!("Step 5: Computed group summaries and correlation matrix");

        // Step 6: Charts
        let chart_files = if self.config.render_charts {
            self.report_progress(ProgressUpdate::new(
                EdaStage::Visualization,
                0.0,
                format!("Rendering charts into {}", self.config.charts_dir.display()),
            ));
            let files = ChartRenderer::new(&self.config).render_all_with_progress(
                &df,
                &correlation,
                |current, total, title| {
                    self.report_progress(ProgressUpdate::with_items(
                        EdaStage::Visualization,
                        title,
                        current,
                        total,
                        format!("Rendering chart {}/{}", current, total),
                    ));
                },
            )?;
            info!("Step 6: Rendered {} charts", files.len());
            files
        } else {
            info!("Step 6: Skipping charts (disabled)");
            Vec::new()
        };

        // Step 7: Save
        self.report_progress(ProgressUpdate::new(
            EdaStage::Saving,
            0.0,
            format!("Writing {}", self.config.output_path.display()),
        ));
        loader::write_csv(&mut df, &self.config.output_path)
            .context(format!("Writing {}", self.config.output_path.display()))?;
        info!("Step 7: Dataset saved: {}", self.config.output_path.display());

        summary.rows_after = df.height();
        summary.columns_after = df.width();
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        Ok(EdaResult {
            data: df,
            overview,
            aggregations,
            hospital_tiers: features.hospital_tiers,
            correlation,
            chart_files,
            summary,
        })
    }
}

/// Builder for creating a [`Pipeline`] with custom configuration.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<EdaConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: EdaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during a run.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}
