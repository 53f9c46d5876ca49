//! Pipeline module.
//!
//! This module provides the analysis pipeline and its progress reporting.

mod builder;
pub mod progress;

pub use builder::{CORRELATION_COLUMNS, Pipeline, PipelineBuilder};
pub use progress::{ClosureProgressReporter, EdaStage, ProgressReporter, ProgressUpdate};
