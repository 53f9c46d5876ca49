//! Custom error types for the EDA pipeline.
//!
//! This module provides the error hierarchy using `thiserror` so every stage
//! can report what failed and on which column.
//!
//! Errors serialize as `{code, message}`; the binary prints them that way
//! when a `--json` run fails.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the EDA pipeline.
#[derive(Error, Debug)]
pub enum EdaError {
    /// A required column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No valid values found in a column for computation.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// A column has a type the stage cannot work with.
    #[error("Column '{column}' has unsupported type {dtype} for {operation}")]
    UnsupportedColumnType {
        column: String,
        dtype: String,
        operation: String,
    },

    /// Feature derivation failed.
    #[error("Failed to derive feature '{feature}': {reason}")]
    FeatureDerivationFailed { feature: String, reason: String },

    /// Chart rendering failed.
    #[error("Failed to render chart '{chart}': {reason}")]
    ChartRenderFailed { chart: String, reason: String },

    /// Report generation failed.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EdaError>,
    },
}

impl EdaError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EdaError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::UnsupportedColumnType { .. } => "UNSUPPORTED_COLUMN_TYPE",
            Self::FeatureDerivationFailed { .. } => "FEATURE_DERIVATION_FAILED",
            Self::ChartRenderFailed { .. } => "CHART_RENDER_FAILED",
            Self::ReportGenerationFailed(_) => "REPORT_GENERATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for EdaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EdaError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for EDA operations.
pub type Result<T> = std::result::Result<T, EdaError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EdaError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EdaError::Io(e).with_context(context))
    }
}
