//! Statistical imputation methods.
//!
//! Numeric columns are filled with their mean, text columns with their mode.

use crate::error::Result;
use crate::utils::{DtypeCategory, fill_numeric_nulls, fill_string_nulls, get_dtype_category, string_mode};
use polars::prelude::*;
use tracing::{debug, warn};

/// What an imputation pass did.
#[derive(Debug, Default, Clone)]
pub struct ImputationOutcome {
    /// One entry per filled column.
    pub steps: Vec<String>,
    /// Columns whose fill value was undefined.
    pub warnings: Vec<String>,
}

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill every column that has nulls.
    ///
    /// Numeric columns get the mean of their non-null values, text columns the
    /// most frequent value. A column with no non-null values is left as is and
    /// reported in the outcome's warnings. Columns without nulls are untouched
    /// and keep their dtype.
    pub fn impute_all(df: &mut DataFrame) -> Result<ImputationOutcome> {
        Self::impute_all_with_progress(df, |_, _, _| {})
    }

    /// [`Self::impute_all`], calling `on_column(current, total, name)` as each
    /// column with nulls is reached.
    pub fn impute_all_with_progress<F>(df: &mut DataFrame, mut on_column: F) -> Result<ImputationOutcome>
    where
        F: FnMut(usize, usize, &str),
    {
        let mut outcome = ImputationOutcome::default();

        let targets: Vec<(String, DataType, usize)> = df
            .get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .map(|col| (col.name().to_string(), col.dtype().clone(), col.null_count()))
            .collect();

        let total = targets.len();
        for (index, (name, dtype, nulls)) in targets.into_iter().enumerate() {
            on_column(index + 1, total, &name);

            let filled = match get_dtype_category(&dtype) {
                DtypeCategory::Numeric => Self::apply_numeric_mean(df, &name, &mut outcome.steps)?,
                DtypeCategory::String | DtypeCategory::Boolean => {
                    Self::apply_mode_imputation(df, &name, &mut outcome.steps)?
                }
                DtypeCategory::Datetime | DtypeCategory::Other => {
                    debug!("Skipping '{}' ({}) during imputation", name, dtype);
                    continue;
                }
            };

            if !filled {
                let message = format!(
                    "Column '{}' has no non-null values; {} missing values left in place",
                    name, nulls
                );
                warn!("{}", message);
                outcome.warnings.push(message);
            }
        }

        Ok(outcome)
    }

    /// Apply mean imputation for a numeric column.
    ///
    /// Returns `false` when the mean is undefined (no non-null values).
    pub fn apply_numeric_mean(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<bool> {
        let Ok(col) = df.column(col_name) else {
            return Ok(false);
        };
        let series = col.as_materialized_series();
        let nulls = series.null_count();

        let Some(mean_val) = series.mean() else {
            return Ok(false);
        };

        let filled = fill_numeric_nulls(series, mean_val)?;
        df.replace(col_name, filled)?;

        processing_steps.push(format!(
            "Filled {} missing values in '{}' with mean: {:.2}",
            nulls, col_name, mean_val
        ));
        debug!("Filled '{}' with mean {:.4}", col_name, mean_val);

        Ok(true)
    }

    /// Apply mode imputation for a text column.
    ///
    /// Returns `false` when the mode is undefined (no non-null values).
    pub fn apply_mode_imputation(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<bool> {
        let Ok(col) = df.column(col_name) else {
            return Ok(false);
        };
        let series = col.as_materialized_series();
        let nulls = series.null_count();

        let Some(mode_val) = string_mode(series) else {
            return Ok(false);
        };

        let filled = fill_string_nulls(series, &mode_val)?;
        df.replace(col_name, filled)?;

        processing_steps.push(format!(
            "Filled {} missing values in '{}' with mode: '{}'",
            nulls, col_name, mode_val
        ));
        debug!("Filled '{}' with mode '{}'", col_name, mode_val);

        Ok(true)
    }
}
