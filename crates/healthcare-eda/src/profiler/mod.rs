//! Data profiling module for dataset analysis.
//!
//! This module provides functionality for profiling datasets, including:
//! - Per-column dtype, non-null, null and distinct counts
//! - Descriptive statistics of numeric columns
//! - Duplicate detection
//! - Pairwise correlation of numeric columns

mod statistics;

use crate::cleaner::DataCleaner;
use crate::error::Result;
use crate::types::{ColumnInfo, DatasetOverview};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use tracing::debug;

pub use statistics::correlation_matrix;

/// Data profiler for analyzing dataset structure and characteristics.
pub struct DataProfiler;

impl DataProfiler {
    /// Take an overview of the dataset as it currently stands.
    ///
    /// Covers the shape, one [`ColumnInfo`] per column, descriptive
    /// statistics for every numeric column and the number of exact
    /// duplicate rows.
    pub fn overview(df: &DataFrame) -> Result<DatasetOverview> {
        let mut column_info = Vec::with_capacity(df.width());
        let mut numeric_summaries = Vec::new();

        for col in df.get_columns() {
            let series = col.as_materialized_series();
            column_info.push(Self::column_info(series)?);

            if is_numeric_dtype(series.dtype()) {
                numeric_summaries.push(statistics::describe_numeric(series)?);
            }
        }

        let duplicate_rows = DataCleaner::count_duplicates(df)?;

        debug!(
            "Profiled {} columns ({} numeric), {} duplicate rows",
            column_info.len(),
            numeric_summaries.len(),
            duplicate_rows
        );

        Ok(DatasetOverview {
            rows: df.height(),
            columns: df.width(),
            column_info,
            numeric_summaries,
            duplicate_rows,
        })
    }

    fn column_info(series: &Series) -> Result<ColumnInfo> {
        let null_count = series.null_count();
        Ok(ColumnInfo {
            name: series.name().to_string(),
            dtype: series.dtype().to_string(),
            non_null_count: series.len() - null_count,
            null_count,
            unique_count: series.drop_nulls().n_unique()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        df![
            "Name" => [Some("Ann"), Some("Bob"), Some("Ann"), None],
            "Age" => [Some(30i64), Some(45), Some(30), Some(60)],
            "Billing Amount" => [Some(100.0), None, Some(100.0), Some(300.0)],
        ]
        .unwrap()
    }

    #[test]
    fn test_overview_shape() {
        let overview = DataProfiler::overview(&sample_frame()).unwrap();
        assert_eq!(overview.rows, 4);
        assert_eq!(overview.columns, 3);
        assert_eq!(overview.column_info.len(), 3);
        assert_eq!(overview.duplicate_rows, 1);
    }

    #[test]
    fn test_overview_column_info() {
        let overview = DataProfiler::overview(&sample_frame()).unwrap();

        let name = &overview.column_info[0];
        assert_eq!(name.name, "Name");
        assert_eq!(name.null_count, 1);
        assert_eq!(name.non_null_count, 3);
        assert_eq!(name.unique_count, 2);

        let billing = &overview.column_info[2];
        assert_eq!(billing.null_count, 1);
        assert_eq!(billing.unique_count, 2);

        assert_eq!(overview.total_nulls(), 2);
    }

    #[test]
    fn test_overview_describes_numeric_only() {
        let overview = DataProfiler::overview(&sample_frame()).unwrap();
        let names: Vec<&str> = overview
            .numeric_summaries
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Age", "Billing Amount"]);

        let billing = &overview.numeric_summaries[1];
        assert_eq!(billing.count, 3);
        assert_eq!(billing.max, Some(300.0));
    }

    #[test]
    fn test_overview_empty_frame() {
        let df = DataFrame::empty();
        let overview = DataProfiler::overview(&df).unwrap();
        assert_eq!(overview.rows, 0);
        assert!(overview.column_info.is_empty());
        assert_eq!(overview.duplicate_rows, 0);
    }
}
