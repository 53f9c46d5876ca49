//! Feature engineering module.
//!
//! This module derives the analysis features from the cleaned table:
//! - Day-first parsing of the admission and discharge dates
//! - Dropping rows whose dates cannot be parsed
//! - Stay duration, age bucket, admission year / month / weekday
//! - Hospital billing tier via quartile binning of per-hospital totals

pub mod binning;
pub mod dates;

use crate::cleaner::DataCleaner;
use crate::error::{EdaError, Result, ResultExt};
use crate::types::{BillingTier, columns};
use crate::utils::{f64_values, string_values};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub use binning::QuartileEdges;
pub use dates::parse_date;

/// Output of [`FeatureEngineer::derive`].
#[derive(Debug, Clone)]
pub struct FeatureOutcome {
    /// The table with date columns parsed and derived columns appended.
    pub df: DataFrame,
    /// Rows dropped because a date column could not be parsed.
    pub invalid_date_rows: usize,
    /// Total billing per hospital, the input of the tiering.
    pub hospital_totals: BTreeMap<String, f64>,
    /// Tier assigned to each hospital.
    pub hospital_tiers: BTreeMap<String, BillingTier>,
}

/// Derives features from a cleaned, imputed table.
pub struct FeatureEngineer;

impl FeatureEngineer {
    /// Run every derivation step in order.
    pub fn derive(df: DataFrame) -> Result<FeatureOutcome> {
        let df = Self::parse_date_columns(df).context("Parsing date columns")?;
        let (mut df, invalid_date_rows) = DataCleaner::drop_null_rows(df, &columns::DATE_COLUMNS)?;

        if invalid_date_rows > 0 {
            warn!(
                "Dropped {} rows with unparseable dates",
                invalid_date_rows
            );
        }

        Self::add_stay_duration(&mut df).context("Deriving stay duration")?;
        Self::add_age_group(&mut df).context("Deriving age groups")?;
        Self::add_admission_calendar(&mut df).context("Deriving admission calendar")?;
        let (hospital_totals, hospital_tiers) =
            Self::add_hospital_category(&mut df).context("Deriving hospital categories")?;

        info!(
            "Derived {} feature columns over {} rows",
            columns::DERIVED_COLUMNS.len(),
            df.height()
        );

        Ok(FeatureOutcome {
            df,
            invalid_date_rows,
            hospital_totals,
            hospital_tiers,
        })
    }

    /// Replace each date column with a polars `Date` column; unparseable
    /// values become null.
    pub fn parse_date_columns(mut df: DataFrame) -> Result<DataFrame> {
        for name in columns::DATE_COLUMNS {
            let parsed = dates::column_dates(&df, name)?;
            let failures = parsed.iter().filter(|d| d.is_none()).count();
            debug!("Parsed '{}' ({} unparseable)", name, failures);

            df.replace(name, dates::date_series(name, &parsed)?)?;
        }
        Ok(df)
    }

    /// Append whole days between admission and discharge.
    ///
    /// Expects both date columns to be free of nulls.
    pub fn add_stay_duration(df: &mut DataFrame) -> Result<()> {
        let admissions = Self::non_null_dates(df, columns::ADMISSION_DATE)?;
        let discharges = Self::non_null_dates(df, columns::DISCHARGE_DATE)?;

        let stay: Vec<i64> = admissions
            .iter()
            .zip(&discharges)
            .map(|(admitted, discharged)| (*discharged - *admitted).num_days())
            .collect();

        df.with_column(Series::new(columns::STAY_DURATION.into(), stay))?;
        Ok(())
    }

    /// Append admission year, month (1-12) and weekday (Monday = 0).
    pub fn add_admission_calendar(df: &mut DataFrame) -> Result<()> {
        let admissions = Self::non_null_dates(df, columns::ADMISSION_DATE)?;

        let years: Vec<i32> = admissions.iter().map(|d| d.year()).collect();
        let months: Vec<u32> = admissions.iter().map(|d| d.month()).collect();
        let weekdays: Vec<u32> = admissions.iter().map(|d| dates::weekday_index(*d)).collect();

        df.with_column(Series::new(columns::ADMISSION_YEAR.into(), years))?;
        df.with_column(Series::new(columns::ADMISSION_MONTH.into(), months))?;
        df.with_column(Series::new(columns::ADMISSION_WEEKDAY.into(), weekdays))?;
        Ok(())
    }

    fn non_null_dates(df: &DataFrame, name: &str) -> Result<Vec<NaiveDate>> {
        dates::column_dates(df, name)?
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| EdaError::FeatureDerivationFailed {
                feature: name.to_string(),
                reason: "null dates remain after filtering".to_string(),
            })
    }

    /// Append the `age_group` column.
    pub fn add_age_group(df: &mut DataFrame) -> Result<()> {
        let ages = f64_values(df, columns::AGE)?;
        let groups: Vec<&str> = binning::age_groups(&ages)?
            .iter()
            .map(|g| g.label())
            .collect();

        df.with_column(Series::new(columns::AGE_GROUP.into(), groups))?;
        Ok(())
    }

    /// Append the `hospital_category` column.
    ///
    /// Returns the per-hospital totals and the tier of each hospital.
    pub fn add_hospital_category(
        df: &mut DataFrame,
    ) -> Result<(BTreeMap<String, f64>, BTreeMap<String, BillingTier>)> {
        let hospitals = string_values(df, columns::HOSPITAL)?;
        let amounts = f64_values(df, columns::BILLING_AMOUNT)?;

        let totals = binning::total_by_group(&hospitals, &amounts);
        let tiers = binning::tiers_by_group(&totals)?;

        let categories: Vec<&str> = hospitals
            .iter()
            .enumerate()
            .map(|(row, hospital)| {
                hospital
                    .as_ref()
                    .and_then(|h| tiers.get(h))
                    .map(|tier| tier.label())
                    .ok_or_else(|| EdaError::FeatureDerivationFailed {
                        feature: columns::HOSPITAL_CATEGORY.to_string(),
                        reason: format!("row {} has no hospital or billing total", row),
                    })
            })
            .collect::<Result<_>>()?;

        df.with_column(Series::new(columns::HOSPITAL_CATEGORY.into(), categories))?;
        debug!("Assigned billing tiers to {} hospitals", tiers.len());

        Ok((totals, tiers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        df![
            "Name" => ["Ann", "Bob", "Cid", "Dee", "Eve"],
            "Age" => [Some(25.0), Some(45.0), Some(55.0), Some(70.0), Some(33.0)],
            "Hospital" => ["North", "South", "North", "East", "West"],
            "Billing Amount" => [1000.0, 2000.0, 500.0, 4000.0, 3000.0],
            "Date of Admission" => [Some("2024-01-01"), Some("2024-02-10"), Some("bad"), Some("15/03/2023"), None],
            "Discharge Date" => [Some("2024-01-11"), Some("2024-02-12"), Some("2024-03-01"), Some("20/03/2023"), Some("2024-05-01")],
        ]
        .unwrap()
    }

    #[test]
    fn test_derive_drops_invalid_dates() {
        let outcome = FeatureEngineer::derive(sample_frame()).unwrap();
        assert_eq!(outcome.invalid_date_rows, 2);
        assert_eq!(outcome.df.height(), 3);
    }

    #[test]
    fn test_derive_appends_columns_in_order() {
        let outcome = FeatureEngineer::derive(sample_frame()).unwrap();
        let names: Vec<String> = outcome
            .df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(&names[names.len() - 6..], &columns::DERIVED_COLUMNS.map(String::from));

        for name in columns::DERIVED_COLUMNS {
            assert_eq!(outcome.df.column(name).unwrap().null_count(), 0, "{}", name);
        }
    }

    #[test]
    fn test_derive_values() {
        let df = FeatureEngineer::derive(sample_frame()).unwrap().df;

        let stay: Vec<Option<i64>> = df
            .column(columns::STAY_DURATION)
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(stay, vec![Some(10), Some(2), Some(5)]);

        let groups: Vec<Option<&str>> = df
            .column(columns::AGE_GROUP)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(groups, vec![Some("Child"), Some("Adult"), Some("Senior")]);

        let years = df.column(columns::ADMISSION_YEAR).unwrap();
        assert_eq!(years.get(2).unwrap().try_extract::<i32>().unwrap(), 2023);

        let months = df.column(columns::ADMISSION_MONTH).unwrap();
        assert_eq!(months.get(1).unwrap().try_extract::<u32>().unwrap(), 2);

        // 2024-01-01 was a Monday, 2023-03-15 a Wednesday
        let weekdays = df.column(columns::ADMISSION_WEEKDAY).unwrap();
        assert_eq!(weekdays.get(0).unwrap().try_extract::<u32>().unwrap(), 0);
        assert_eq!(weekdays.get(2).unwrap().try_extract::<u32>().unwrap(), 2);

        assert_eq!(
            df.column(columns::ADMISSION_DATE).unwrap().dtype(),
            &DataType::Date
        );
    }

    #[test]
    fn test_hospital_category_uses_filtered_rows() {
        let outcome = FeatureEngineer::derive(sample_frame()).unwrap();
        // rows left: North 1000, South 2000, East 4000
        assert_eq!(outcome.hospital_totals.len(), 3);
        assert_eq!(outcome.hospital_totals["North"], 1000.0);
        assert_eq!(outcome.hospital_tiers["North"], BillingTier::Low);
        assert_eq!(outcome.hospital_tiers["South"], BillingTier::Medium);
        assert_eq!(outcome.hospital_tiers["East"], BillingTier::VeryHigh);
    }

    #[test]
    fn test_senior_scenario() {
        let mut df = df!["Age" => [70i64]].unwrap();
        FeatureEngineer::add_age_group(&mut df).unwrap();
        let group = df.column(columns::AGE_GROUP).unwrap().get(0).unwrap();
        assert_eq!(group.get_str(), Some("Senior"));
    }

    #[test]
    fn test_missing_hospital_column() {
        let mut df = df![
            "Billing Amount" => [1.0],
        ]
        .unwrap();
        let err = FeatureEngineer::add_hospital_category(&mut df).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }
}
