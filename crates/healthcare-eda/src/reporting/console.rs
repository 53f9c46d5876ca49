//! Plain-text renderings of the analysis for the terminal.
//!
//! Each section is a [`fmt::Display`] value; the `render_*` functions return
//! it as a `String` and the binary decides whether to print it.

use crate::types::{CorrelationMatrix, DatasetOverview, EdaSummary, GroupSummaries, GroupValue};
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

const RULE_WIDTH: usize = 80;

fn banner(f: &mut impl Write, title: &str) -> fmt::Result {
    writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", "=".repeat(RULE_WIDTH))
}

fn heading(f: &mut impl Write, title: &str) -> fmt::Result {
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", "-".repeat(40))
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "NaN".to_string(), |v| format!("{:.2}", v))
}

/// Truncate a string to max length with ellipsis.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

// ============================================================================
// Overview
// ============================================================================

struct OverviewSection<'a>(&'a DatasetOverview);

impl fmt::Display for OverviewSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let overview = self.0;
        banner(f, "DATASET OVERVIEW")?;
        writeln!(f, "  Rows: {}", overview.rows)?;
        writeln!(f, "  Columns: {}", overview.columns)?;
        writeln!(f)?;

        heading(f, "COLUMN INFO")?;
        writeln!(
            f,
            "{:<24} {:<12} {:>10} {:>8} {:>8}",
            "Column", "Type", "Non-Null", "Nulls", "Unique"
        )?;
        for info in &overview.column_info {
            writeln!(
                f,
                "{:<24} {:<12} {:>10} {:>8} {:>8}",
                truncate_str(&info.name, 23),
                truncate_str(&info.dtype, 11),
                info.non_null_count,
                info.null_count,
                info.unique_count
            )?;
        }
        writeln!(f)?;

        heading(f, "NUMERIC SUMMARY")?;
        writeln!(
            f,
            "{:<24} {:>7} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "Column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        )?;
        for s in &overview.numeric_summaries {
            writeln!(
                f,
                "{:<24} {:>7} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
                truncate_str(&s.name, 23),
                s.count,
                fmt_opt(s.mean),
                fmt_opt(s.std),
                fmt_opt(s.min),
                fmt_opt(s.q25),
                fmt_opt(s.median),
                fmt_opt(s.q75),
                fmt_opt(s.max)
            )?;
        }
        writeln!(f)?;

        heading(f, "MISSING VALUES")?;
        writeln!(f, "  Total: {}", overview.total_nulls())?;
        for info in overview.column_info.iter().filter(|c| c.null_count > 0) {
            writeln!(f, "  {:<24} {}", info.name, info.null_count)?;
        }
        writeln!(f)?;

        writeln!(f, "Duplicate rows: {}", overview.duplicate_rows)
    }
}

/// Info, describe, null counts, unique counts and duplicates.
pub fn render_overview(overview: &DatasetOverview) -> String {
    OverviewSection(overview).to_string()
}

// ============================================================================
// Aggregations
// ============================================================================

fn group_values(
    f: &mut impl Write,
    title: &str,
    values: &[GroupValue],
    precision: usize,
) -> fmt::Result {
    heading(f, title)?;
    if values.is_empty() {
        writeln!(f, "  (no groups)")?;
    }
    for gv in values {
        writeln!(
            f,
            "  {:<40} {:>16.*}",
            truncate_str(&gv.group, 39),
            precision,
            gv.value
        )?;
    }
    writeln!(f)
}

struct AggregationSection<'a> {
    summaries: &'a GroupSummaries,
    correlation: &'a CorrelationMatrix,
}

impl fmt::Display for AggregationSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (summaries, correlation) = (self.summaries, self.correlation);
        banner(f, "AGGREGATIONS")?;

        group_values(
            f,
            "TOTAL BILLING BY HOSPITAL",
            &summaries.total_billing_by_hospital,
            2,
        )?;
        group_values(
            f,
            "AVERAGE STAY (DAYS) BY MEDICAL CONDITION",
            &summaries.avg_stay_by_condition,
            2,
        )?;
        group_values(
            f,
            "AGE GROUPS BY MEDICAL CONDITION",
            &summaries.age_groups_by_condition,
            0,
        )?;

        heading(f, "CORRELATION MATRIX")?;
        write!(f, "{:<24}", "")?;
        for name in &correlation.columns {
            write!(f, " {:>24}", truncate_str(name, 24))?;
        }
        writeln!(f)?;
        for (row, name) in correlation.columns.iter().enumerate() {
            write!(f, "{:<24}", truncate_str(name, 23))?;
            for col in 0..correlation.columns.len() {
                write!(f, " {:>24}", fmt_opt(correlation.get(row, col)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Group-by summaries and the correlation matrix.
pub fn render_aggregations(summaries: &GroupSummaries, correlation: &CorrelationMatrix) -> String {
    AggregationSection {
        summaries,
        correlation,
    }
    .to_string()
}

// ============================================================================
// Summary
// ============================================================================

struct SummarySection<'a> {
    summary: &'a EdaSummary,
    input: &'a Path,
    output: &'a Path,
    chart_files: &'a [PathBuf],
}

impl fmt::Display for SummarySection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary;
        writeln!(f)?;
        banner(f, "ANALYSIS COMPLETE")?;
        writeln!(f)?;

        writeln!(
            f,
            "Input:  {} ({} rows x {} columns)",
            self.input.display(),
            summary.rows_before,
            summary.columns_before
        )?;
        writeln!(
            f,
            "Output: {} ({} rows x {} columns)",
            self.output.display(),
            summary.rows_after,
            summary.columns_after
        )?;
        writeln!(f)?;

        writeln!(f, "Processing Summary:")?;
        writeln!(f, "  Duration: {}ms", summary.duration_ms)?;
        writeln!(
            f,
            "  Rows: {} -> {} ({} removed)",
            summary.rows_before,
            summary.rows_after,
            summary.rows_removed()
        )?;
        writeln!(f, "  Duplicates removed: {}", summary.duplicates_removed)?;
        writeln!(
            f,
            "  Rows with invalid dates dropped: {}",
            summary.invalid_date_rows_dropped
        )?;
        writeln!(f, "  Charts written: {}", self.chart_files.len())?;
        writeln!(f)?;

        if !summary.imputation_steps.is_empty() {
            writeln!(f, "Imputation:")?;
            for step in &summary.imputation_steps {
                writeln!(f, "  - {}", step)?;
            }
            writeln!(f)?;
        }

        if !summary.warnings.is_empty() {
            writeln!(f, "Warnings:")?;
            for warning in &summary.warnings {
                writeln!(f, "  ! {}", warning)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Use --json for machine-readable output")?;
        writeln!(f, "Use --emit-report to save detailed JSON report")?;
        write!(f, "{}", "=".repeat(RULE_WIDTH))
    }
}

/// Closing summary of a run.
pub fn render_summary(
    summary: &EdaSummary,
    input: &Path,
    output: &Path,
    chart_files: &[PathBuf],
) -> String {
    SummarySection {
        summary,
        input,
        output,
        chart_files,
    }
    .to_string()
}
