//! Configuration types for the EDA pipeline.
//!
//! This module provides configuration options using the builder pattern.
//! Every field defaults to the fixed behavior of the analysis, so
//! `EdaConfig::default()` reproduces a plain run over
//! `healthcare_dataset.csv`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default input file name.
pub const DEFAULT_INPUT: &str = "healthcare_dataset.csv";

/// Default output file name for the cleaned dataset.
pub const DEFAULT_OUTPUT: &str = "cleaned_healthcare_data.csv";

/// Default directory for rendered charts.
pub const DEFAULT_CHARTS_DIR: &str = "charts";

/// Configuration for the EDA pipeline.
///
/// Use [`EdaConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use healthcare_eda::config::EdaConfig;
///
/// let config = EdaConfig::builder()
///     .input_path("data/encounters.csv")
///     .render_charts(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaConfig {
    /// Path of the CSV file to analyze.
    /// Default: "healthcare_dataset.csv"
    pub input_path: PathBuf,

    /// Path the cleaned, feature-augmented CSV is written to.
    /// Default: "cleaned_healthcare_data.csv"
    pub output_path: PathBuf,

    /// Directory that receives the rendered SVG charts.
    /// Default: "charts"
    pub charts_dir: PathBuf,

    /// Whether to render charts at all.
    /// Default: true
    pub render_charts: bool,

    /// Whether to remove exact-duplicate rows.
    /// Default: true
    pub remove_duplicates: bool,

    /// Chart canvas width in pixels.
    /// Default: 800
    pub chart_width: u32,

    /// Chart canvas height in pixels.
    /// Default: 480
    pub chart_height: u32,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            charts_dir: PathBuf::from(DEFAULT_CHARTS_DIR),
            render_charts: true,
            remove_duplicates: true,
            chart_width: 800,
            chart_height: 480,
        }
    }
}

impl EdaConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EdaConfigBuilder {
        EdaConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.input_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyPath("input_path".to_string()));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyPath("output_path".to_string()));
        }

        if self.input_path == self.output_path {
            return Err(ConfigValidationError::OutputOverwritesInput(
                self.output_path.display().to_string(),
            ));
        }

        if self.render_charts && self.charts_dir.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyPath("charts_dir".to_string()));
        }

        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(ConfigValidationError::InvalidChartSize {
                width: self.chart_width,
                height: self.chart_height,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Path for '{0}' must not be empty")]
    EmptyPath(String),

    #[error("Output path '{0}' would overwrite the input file")]
    OutputOverwritesInput(String),

    #[error("Invalid chart size {width}x{height} (both dimensions must be at least 1)")]
    InvalidChartSize { width: u32, height: u32 },
}

impl From<ConfigValidationError> for crate::error::EdaError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::EdaError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`EdaConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EdaConfigBuilder {
    input_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    charts_dir: Option<PathBuf>,
    render_charts: Option<bool>,
    remove_duplicates: Option<bool>,
    chart_width: Option<u32>,
    chart_height: Option<u32>,
}

impl EdaConfigBuilder {
    /// Set the CSV file to analyze.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set where the cleaned dataset is written.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Set the directory for rendered charts.
    pub fn charts_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.charts_dir = Some(path.into());
        self
    }

    /// Enable or disable chart rendering.
    pub fn render_charts(mut self, render: bool) -> Self {
        self.render_charts = Some(render);
        self
    }

    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = Some(remove);
        self
    }

    /// Set the chart canvas size in pixels.
    pub fn chart_size(mut self, width: u32, height: u32) -> Self {
        self.chart_width = Some(width);
        self.chart_height = Some(height);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `EdaConfig` or an error if validation fails.
    pub fn build(self) -> Result<EdaConfig, ConfigValidationError> {
        let defaults = EdaConfig::default();
        let config = EdaConfig {
            input_path: self.input_path.unwrap_or(defaults.input_path),
            output_path: self.output_path.unwrap_or(defaults.output_path),
            charts_dir: self.charts_dir.unwrap_or(defaults.charts_dir),
            render_charts: self.render_charts.unwrap_or(defaults.render_charts),
            remove_duplicates: self.remove_duplicates.unwrap_or(defaults.remove_duplicates),
            chart_width: self.chart_width.unwrap_or(defaults.chart_width),
            chart_height: self.chart_height.unwrap_or(defaults.chart_height),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EdaConfig::default();
        assert_eq!(config.input_path, PathBuf::from("healthcare_dataset.csv"));
        assert_eq!(
            config.output_path,
            PathBuf::from("cleaned_healthcare_data.csv")
        );
        assert_eq!(config.charts_dir, PathBuf::from("charts"));
        assert!(config.render_charts);
        assert!(config.remove_duplicates);
    }

    #[test]
    fn test_builder_defaults() {
        let config = EdaConfig::builder().build().unwrap();
        assert_eq!(config.input_path, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(config.chart_width, 800);
        assert_eq!(config.chart_height, 480);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = EdaConfig::builder()
            .input_path("in.csv")
            .output_path("out/clean.csv")
            .charts_dir("out/charts")
            .render_charts(false)
            .remove_duplicates(false)
            .chart_size(1024, 768)
            .build()
            .unwrap();

        assert_eq!(config.input_path, PathBuf::from("in.csv"));
        assert_eq!(config.output_path, PathBuf::from("out/clean.csv"));
        assert_eq!(config.charts_dir, PathBuf::from("out/charts"));
        assert!(!config.render_charts);
        assert!(!config.remove_duplicates);
        assert_eq!((config.chart_width, config.chart_height), (1024, 768));
    }

    #[test]
    fn test_validation_output_overwrites_input() {
        let result = EdaConfig::builder()
            .input_path("data.csv")
            .output_path("data.csv")
            .build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::OutputOverwritesInput(_)
        ));
    }

    #[test]
    fn test_validation_empty_input() {
        let result = EdaConfig::builder().input_path("").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyPath(field) if field == "input_path"
        ));
    }

    #[test]
    fn test_validation_invalid_chart_size() {
        let result = EdaConfig::builder().chart_size(0, 400).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidChartSize { width: 0, height: 400 }
        ));
    }

    #[test]
    fn test_empty_charts_dir_allowed_when_charts_disabled() {
        let config = EdaConfig::builder()
            .charts_dir("")
            .render_charts(false)
            .build();
        assert!(config.is_ok());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "input_path": "encounters.csv",
            "output_path": "encounters_clean.csv",
            "charts_dir": "plots",
            "render_charts": false,
            "remove_duplicates": true,
            "chart_width": 640,
            "chart_height": 360
        }"#;

        let config: EdaConfig = serde_json::from_str(json).expect("Should deserialize config");
        assert_eq!(config.input_path, PathBuf::from("encounters.csv"));
        assert_eq!(config.charts_dir, PathBuf::from("plots"));
        assert!(!config.render_charts);
        assert_eq!(config.chart_width, 640);
        assert!(config.validate().is_ok());
    }
}
