//! Progress reporting for the analysis pipeline.
//!
//! The pipeline emits a [`ProgressUpdate`] at every stage boundary, once per
//! imputed column and once per chart. Reporters run synchronously on the
//! pipeline thread.
//!
//! # Example
//!
//! ```rust,ignore
//! use healthcare_eda::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the analysis pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdaStage {
    /// Reading the input CSV
    Loading,
    /// Removing duplicate rows
    Cleaning,
    /// Taking the dataset overview
    Overview,
    /// Filling missing values
    Imputation,
    /// Parsing dates and deriving feature columns
    FeatureEngineering,
    /// Group-by summaries and correlation
    Aggregation,
    /// Rendering charts
    Visualization,
    /// Writing the cleaned CSV
    Saving,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl EdaStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Data",
            Self::Cleaning => "Removing Duplicates",
            Self::Overview => "Profiling Dataset",
            Self::Imputation => "Imputing Values",
            Self::FeatureEngineering => "Deriving Features",
            Self::Aggregation => "Aggregating",
            Self::Visualization => "Rendering Charts",
            Self::Saving => "Saving Output",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the overall run taken by this stage (0.0 - 1.0).
    ///
    /// Weights of the working stages sum to 1.0.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.10,
            Self::Cleaning => 0.05,
            Self::Overview => 0.10,
            Self::Imputation => 0.15,
            Self::FeatureEngineering => 0.20,
            Self::Aggregation => 0.05,
            Self::Visualization => 0.25,
            Self::Saving => 0.10,
            Self::Complete => 0.0,
            Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading => 0.0,
            Self::Cleaning => 0.10,
            Self::Overview => 0.15,
            Self::Imputation => 0.25,
            Self::FeatureEngineering => 0.40,
            Self::Aggregation => 0.60,
            Self::Visualization => 0.65,
            Self::Saving => 0.90,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// Progress update emitted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: EdaStage,

    /// Optional sub-stage description (e.g., "Column: Age")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_stage: Option<String>,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    /// Human-readable message describing current activity
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_processed: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_total: Option<usize>,
}

impl ProgressUpdate {
    /// Creates a new progress update for a stage without sub-stage info.
    pub fn new(stage: EdaStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            sub_stage: None,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
            items_processed: None,
            items_total: None,
        }
    }

    /// Creates a new progress update with item counts.
    pub fn with_items(
        stage: EdaStage,
        sub_stage: impl Into<String>,
        current: usize,
        total: usize,
        message: impl Into<String>,
    ) -> Self {
        let stage_progress = if total > 0 {
            current as f32 / total as f32
        } else {
            0.0
        };
        Self {
            sub_stage: Some(sub_stage.into()),
            items_processed: Some(current),
            items_total: Some(total),
            ..Self::new(stage, stage_progress, message)
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(EdaStage::Complete, 1.0, message)
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(EdaStage::Failed, 0.0, message)
    }
}

/// Trait for receiving progress updates during a pipeline run.
///
/// # Example
///
/// ```rust,ignore
/// use healthcare_eda::{ProgressReporter, ProgressUpdate};
///
/// struct LogReporter;
///
/// impl ProgressReporter for LogReporter {
///     fn report(&self, update: ProgressUpdate) {
///         tracing::info!("{}", update.message);
///     }
/// }
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Called when progress is made. Keep it cheap: it runs inline.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
static_assertions::assert_impl_all!(EdaStage: Send, Sync, Copy);
