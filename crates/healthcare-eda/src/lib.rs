//! Healthcare EDA Library
//!
//! Exploratory data analysis over tabular healthcare encounter data, built
//! with Rust and Polars.
//!
//! # Overview
//!
//! One run walks a fixed sequence of stages:
//!
//! - **Loading**: CSV ingestion with fallback strategies for messy quoting
//! - **Cleaning**: Exact-duplicate removal, first occurrence kept
//! - **Overview**: Column info, descriptive statistics, missing and distinct counts
//! - **Imputation**: Mean for numeric columns, mode for text columns
//! - **Feature Engineering**: Day-first date parsing, stay duration, age
//!   buckets, admission calendar fields, hospital billing tiers
//! - **Aggregation**: Group-by summaries and a correlation matrix
//! - **Visualization**: A fixed set of SVG charts
//! - **Saving**: The cleaned, feature-augmented table as CSV
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use healthcare_eda::{EdaConfig, Pipeline};
//!
//! let config = EdaConfig::builder()
//!     .input_path("healthcare_dataset.csv")
//!     .output_path("cleaned_healthcare_data.csv")
//!     .charts_dir("charts")
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//!
//! println!("{} rows written", result.summary.rows_after);
//! ```
//!
//! # Stages as functions
//!
//! Every stage is also usable on its own:
//!
//! ```rust,ignore
//! use healthcare_eda::{DataCleaner, FeatureEngineer, StatisticalImputer, loader};
//!
//! let df = loader::load_csv("healthcare_dataset.csv".as_ref())?;
//! let (mut df, removed) = DataCleaner::remove_duplicates(df)?;
//! StatisticalImputer::impute_all(&mut df)?;
//! let features = FeatureEngineer::derive(df)?;
//! ```

pub mod aggregations;
pub mod charts;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod features;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use aggregations::Aggregator;
pub use charts::ChartRenderer;
pub use cleaner::DataCleaner;
pub use config::{ConfigValidationError, EdaConfig, EdaConfigBuilder};
pub use error::{EdaError, ResultExt};
pub use features::{FeatureEngineer, FeatureOutcome};
pub use imputers::{ImputationOutcome, StatisticalImputer};
pub use pipeline::{
    ClosureProgressReporter, EdaStage, Pipeline, PipelineBuilder, ProgressReporter,
    ProgressUpdate,
};
pub use profiler::DataProfiler;
pub use reporting::{EdaReport, ProcessingSummaryReport, ReportGenerator};
pub use types::{
    AgeGroup, BillingTier, ColumnInfo, CorrelationMatrix, DatasetOverview, EdaResult, EdaSummary,
    GroupSummaries, GroupValue, NumericSummary,
};
pub use utils::{DtypeCategory, get_dtype_category, is_numeric_dtype};
