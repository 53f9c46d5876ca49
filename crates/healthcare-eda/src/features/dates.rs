//! Day-first date parsing and calendar features.

use crate::error::{EdaError, Result};
use crate::utils::require_series;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Date-only formats, ISO first, then day-first variants.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Formats carrying a time of day; the time is discarded.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Parse a date string, day-first. Returns `None` when no format matches.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|dt| dt.date())
        })
}

fn unix_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Days since the Unix epoch, the physical representation of polars `Date`.
pub fn to_epoch_days(date: NaiveDate) -> i32 {
    (date - unix_epoch()).num_days() as i32
}

pub fn from_epoch_days(days: i32) -> NaiveDate {
    unix_epoch() + chrono::Duration::days(days as i64)
}

/// Read a column as calendar dates.
///
/// Text columns are parsed with [`parse_date`], unparseable values become
/// `None`. `Date` and `Datetime` columns are converted directly.
pub fn column_dates(df: &DataFrame, name: &str) -> Result<Vec<Option<NaiveDate>>> {
    let series = require_series(df, name)?;

    match series.dtype() {
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_date))
            .collect()),
        DataType::Date | DataType::Datetime(_, _) => {
            let days = series.cast(&DataType::Date)?.cast(&DataType::Int32)?;
            Ok(days
                .i32()?
                .into_iter()
                .map(|v| v.map(from_epoch_days))
                .collect())
        }
        other => Err(EdaError::UnsupportedColumnType {
            column: name.to_string(),
            dtype: other.to_string(),
            operation: "date parsing".to_string(),
        }),
    }
}

/// Build a polars `Date` series from parsed dates.
pub fn date_series(name: &str, dates: &[Option<NaiveDate>]) -> Result<Series> {
    let days: Vec<Option<i32>> = dates.iter().map(|d| d.map(to_epoch_days)).collect();
    Ok(Series::new(name.into(), days).cast(&DataType::Date)?)
}

/// Weekday with Monday = 0 .. Sunday = 6.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!(parse_date("2024-01-31"), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_date(" 2023/12/05 "), Some(ymd(2023, 12, 5)));
    }

    #[test]
    fn test_parse_day_first() {
        assert_eq!(parse_date("01/02/2024"), Some(ymd(2024, 2, 1)));
        assert_eq!(parse_date("13-06-2022"), Some(ymd(2022, 6, 13)));
        assert_eq!(parse_date("31.12.2020"), Some(ymd(2020, 12, 31)));
    }

    #[test]
    fn test_parse_with_time() {
        assert_eq!(parse_date("2024-03-10 14:30:00"), Some(ymd(2024, 3, 10)));
        assert_eq!(parse_date("10/03/2024 09:15"), Some(ymd(2024, 3, 10)));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("31/31/2024"), None);
    }

    #[test]
    fn test_epoch_days_round_trip() {
        let date = ymd(2019, 5, 14);
        assert_eq!(to_epoch_days(ymd(1970, 1, 2)), 1);
        assert_eq!(from_epoch_days(to_epoch_days(date)), date);
    }

    #[test]
    fn test_weekday_index() {
        // 2024-01-01 was a Monday
        assert_eq!(weekday_index(ymd(2024, 1, 1)), 0);
        assert_eq!(weekday_index(ymd(2024, 1, 7)), 6);
    }

    #[test]
    fn test_column_dates_from_strings() {
        let df = df![
            "Date of Admission" => [Some("2024-01-31"), Some("garbage"), None, Some("05/02/2024")],
        ]
        .unwrap();

        let dates = column_dates(&df, "Date of Admission").unwrap();
        assert_eq!(
            dates,
            vec![Some(ymd(2024, 1, 31)), None, None, Some(ymd(2024, 2, 5))]
        );
    }

    #[test]
    fn test_column_dates_from_date_column() {
        let dates = vec![Some(ymd(2022, 7, 4)), None];
        let series = date_series("Discharge Date", &dates).unwrap();
        assert_eq!(series.dtype(), &DataType::Date);

        let df = DataFrame::new(vec![series.into()]).unwrap();
        assert_eq!(column_dates(&df, "Discharge Date").unwrap(), dates);
    }

    #[test]
    fn test_column_dates_rejects_numbers() {
        let df = df!["Date of Admission" => [20240101i64]].unwrap();
        let err = column_dates(&df, "Date of Admission").unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_COLUMN_TYPE");
    }
}
