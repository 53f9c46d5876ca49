use crate::error::{EdaError, Result};
use crate::types::{CorrelationMatrix, DatasetOverview, EdaResult, GroupSummaries};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Report Types
// ============================================================================

/// Machine-readable report of one analysis run.
///
/// Used for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub input_file: String,
    pub output_file: String,

    pub processing_summary: ProcessingSummaryReport,

    /// Overview taken after duplicate removal, before imputation
    pub overview: DatasetOverview,
    pub aggregations: GroupSummaries,
    /// Billing tier of each hospital
    pub hospital_tiers: BTreeMap<String, String>,
    pub correlation: CorrelationMatrix,

    /// Chart files written, in render order
    pub chart_files: Vec<String>,
}

/// Row and column bookkeeping for the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingSummaryReport {
    /// Total execution time in milliseconds
    pub duration_ms: u64,
    pub rows_before: usize,
    pub rows_after: usize,
    pub rows_removed: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    pub duplicates_removed: usize,
    pub invalid_date_rows_dropped: usize,
    pub imputation_steps: Vec<String>,
    pub warnings: Vec<String>,
}

pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Build the report of a finished run.
    pub fn build_report(input_file: &Path, output_file: &Path, result: &EdaResult) -> EdaReport {
        let summary = &result.summary;

        let processing_summary = ProcessingSummaryReport {
            duration_ms: summary.duration_ms,
            rows_before: summary.rows_before,
            rows_after: summary.rows_after,
            rows_removed: summary.rows_removed(),
            columns_before: summary.columns_before,
            columns_after: summary.columns_after,
            duplicates_removed: summary.duplicates_removed,
            invalid_date_rows_dropped: summary.invalid_date_rows_dropped,
            imputation_steps: summary.imputation_steps.clone(),
            warnings: summary.warnings.clone(),
        };

        EdaReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.display().to_string(),
            output_file: output_file.display().to_string(),
            processing_summary,
            overview: result.overview.clone(),
            aggregations: result.aggregations.clone(),
            hospital_tiers: result
                .hospital_tiers
                .iter()
                .map(|(hospital, tier)| (hospital.clone(), tier.label().to_string()))
                .collect(),
            correlation: result.correlation.clone(),
            chart_files: result
                .chart_files
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        }
    }

    /// JSON printed in place of a report when a `--json` run fails.
    pub fn failure_json(err: &EdaError) -> Result<String> {
        let payload = json!({ "error": err });
        Ok(serde_json::to_string_pretty(&payload)?)
    }

    /// Write a report to `<output_dir>/<report_base_name>_report.json`.
    pub fn write_report_to_file(&self, report: &EdaReport, report_base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| EdaError::ReportGenerationFailed(e.to_string()))?;
        let mut file = File::create(&report_path)?;
        file.write_all(json.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
