//! Shared utilities for the EDA pipeline.
//!
//! This module contains common helper functions used across multiple modules
//! to reduce code duplication and ensure consistency.

use crate::error::{EdaError, Result};
use polars::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for imputation and reporting purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Column Access
// =============================================================================

/// Fetch a column as a Series, failing with `ColumnNotFound` when absent.
pub fn require_series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|col| col.as_materialized_series())
        .map_err(|_| EdaError::ColumnNotFound(name.to_string()))
}

/// Read a numeric column as `f64` values, keeping nulls.
pub fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = require_series(df, name)?;
    if !is_numeric_dtype(series.dtype()) {
        return Err(EdaError::UnsupportedColumnType {
            column: name.to_string(),
            dtype: series.dtype().to_string(),
            operation: "numeric aggregation".to_string(),
        });
    }
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats.f64()?.into_iter().collect())
}

/// Read any column as string values, keeping nulls.
pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = require_series(df, name)?;
    let strings = series.cast(&DataType::String)?;
    Ok(strings
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Calculate the mode (most frequent value) of a string Series.
///
/// Ties resolve to the lexicographically smallest value so repeated runs
/// fill identically.
pub fn string_mode(series: &Series) -> Option<String> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return None;
    }

    let str_series = non_null.cast(&DataType::String).ok()?;
    let str_chunked = str_series.str().ok()?;

    let mut value_counts: HashMap<&str, usize> = HashMap::new();
    for val in str_chunked.into_iter().flatten() {
        *value_counts.entry(val).or_insert(0) += 1;
    }

    value_counts
        .into_iter()
        .max_by(|(a_val, a_count), (b_val, b_count)| {
            a_count.cmp(b_count).then_with(|| b_val.cmp(a_val))
        })
        .map(|(val, _)| val.to_string())
}

/// Count occurrences of each non-null value, ordered by count descending
/// and then by value.
pub fn value_counts(values: &[Option<String>]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for val in values.iter().flatten() {
        *counts.entry(val.as_str()).or_insert(0) += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(val, count)| (val.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always Float64.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let floats = series.cast(&DataType::Float64)?;
    let filled: Float64Chunked = floats
        .f64()?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value)))
        .collect();

    Ok(filled.with_name(series.name().clone()).into_series())
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let strings = series.cast(&DataType::String)?;
    let filled: StringChunked = strings
        .str()?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value)))
        .collect();

    Ok(filled.with_name(series.name().clone()).into_series())
}

/// Turn a column name into a file-name friendly slug.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    slug.trim_end_matches('_').to_string()
}

// =============================================================================
// Tests
// =============================================================================
