//! Data cleaning module.
//!
//! This module provides functionality for:
//! - Counting and removing exact-duplicate rows
//! - Dropping rows whose required columns are null

use crate::error::{EdaError, Result};
use polars::prelude::*;
use tracing::debug;

/// Data cleaner for row-level cleaning operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Distinct rows, first occurrence kept, original order preserved.
    fn distinct_rows(df: &DataFrame) -> Result<DataFrame> {
        if df.height() == 0 || df.width() == 0 {
            return Ok(df.clone());
        }
        Ok(df
            .clone()
            .lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()?)
    }

    /// Count rows that exactly duplicate an earlier row.
    pub fn count_duplicates(df: &DataFrame) -> Result<usize> {
        Ok(df.height() - Self::distinct_rows(df)?.height())
    }

    /// Remove exact-duplicate rows.
    ///
    /// Returns the deduplicated frame and the number of rows removed.
    pub fn remove_duplicates(df: DataFrame) -> Result<(DataFrame, usize)> {
        let before = df.height();
        let df = Self::distinct_rows(&df)?;
        let removed = before - df.height();

        if removed > 0 {
            debug!("Removed {} duplicate rows", removed);
        } else {
            debug!("No duplicate rows found");
        }

        Ok((df, removed))
    }

    /// Drop rows that have a null in any of the given columns.
    ///
    /// Returns the filtered frame and the number of rows dropped.
    pub fn drop_null_rows(df: DataFrame, columns: &[&str]) -> Result<(DataFrame, usize)> {
        let before = df.height();
        let mut keep = BooleanChunked::full("keep".into(), true, before);

        for name in columns {
            let col = df
                .column(name)
                .map_err(|_| EdaError::ColumnNotFound(name.to_string()))?;
            keep = &keep & &col.as_materialized_series().is_not_null();
        }

        let df = df.filter(&keep)?;
        let dropped = before - df.height();
        if dropped > 0 {
            debug!("Dropped {} rows with nulls in {:?}", dropped, columns);
        }

        Ok((df, dropped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_duplicates_keeps_first_in_order() {
        let df = df![
            "Name" => ["c", "a", "c", "b", "a"],
            "Age" => [30i64, 40, 30, 50, 40],
        ]
        .unwrap();

        let (df, removed) = DataCleaner::remove_duplicates(df).unwrap();
        assert_eq!(removed, 2);
        let names: Vec<Option<&str>> = df
            .column("Name")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(names, vec![Some("c"), Some("a"), Some("b")]);
    }

    #[test]
    fn test_remove_duplicates_partial_match_kept() {
        let df = df![
            "Name" => ["a", "a"],
            "Age" => [30i64, 31],
        ]
        .unwrap();

        let (df, removed) = DataCleaner::remove_duplicates(df).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_remove_duplicates_treats_nulls_as_equal() {
        let df = df![
            "Name" => [Some("a"), Some("a")],
            "Age" => [Option::<i64>::None, None],
        ]
        .unwrap();

        let (df, removed) = DataCleaner::remove_duplicates(df).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn test_count_duplicates() {
        let df = df!["x" => [1i64, 1, 1, 2]].unwrap();
        assert_eq!(DataCleaner::count_duplicates(&df).unwrap(), 2);
    }

    #[test]
    fn test_drop_null_rows() {
        let df = df![
            "a" => [Some(1i64), None, Some(3), Some(4)],
            "b" => [Some("x"), Some("y"), None, Some("z")],
            "c" => [Option::<i64>::None, None, None, None],
        ]
        .unwrap();

        let (df, dropped) = DataCleaner::drop_null_rows(df, &["a", "b"]).unwrap();
        assert_eq!(dropped, 2);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_drop_null_rows_missing_column() {
        let df = df!["a" => [1i64]].unwrap();
        let err = DataCleaner::drop_null_rows(df, &["missing"]).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }
}
