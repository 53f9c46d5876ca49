//! Statistical helpers for the dataset overview.

use crate::error::Result;
use crate::types::{CorrelationMatrix, NumericSummary};
use crate::utils::f64_values;
use anofox_statistics::correlation::pearson;
use polars::prelude::*;

/// Describe a numeric series: count, mean, sample std, min, quartiles, max.
///
/// Nulls are ignored. Quartiles use linear interpolation.
pub(crate) fn describe_numeric(series: &Series) -> Result<NumericSummary> {
    let floats = series.cast(&DataType::Float64)?;
    let ca = floats.f64()?;

    Ok(NumericSummary {
        name: series.name().to_string(),
        count: ca.len() - ca.null_count(),
        mean: ca.mean(),
        std: ca.std(1),
        min: ca.min(),
        q25: ca.quantile(0.25, QuantileMethod::Linear)?,
        median: ca.quantile(0.5, QuantileMethod::Linear)?,
        q75: ca.quantile(0.75, QuantileMethod::Linear)?,
        max: ca.max(),
    })
}

/// Pearson correlation over pairs where both values are present.
///
/// Returns `None` with fewer than three pairs or when either side is constant.
pub(crate) fn pairwise_pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let mut x = Vec::new();
    let mut y = Vec::new();
    for (a, b) in xs.iter().zip(ys) {
        if let (Some(a), Some(b)) = (a, b) {
            x.push(*a);
            y.push(*b);
        }
    }

    pearson(&x, &y, None)
        .ok()
        .map(|result| result.estimate)
        .filter(|r| r.is_finite())
}

/// Pairwise Pearson correlation between the given numeric columns.
pub fn correlation_matrix(df: &DataFrame, names: &[&str]) -> Result<CorrelationMatrix> {
    let columns: Vec<Vec<Option<f64>>> = names
        .iter()
        .map(|name| f64_values(df, name))
        .collect::<Result<_>>()?;

    let size = columns.len();
    let mut values = vec![vec![None; size]; size];
    for i in 0..size {
        for j in i..size {
            let r = pairwise_pearson(&columns[i], &columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: names.iter().map(|s| s.to_string()).collect(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== describe_numeric tests ====================

    #[test]
    fn test_describe_basic() {
        let series = Series::new("Age".into(), &[1.0f64, 2.0, 3.0, 4.0, 5.0]);
        let summary = describe_numeric(&series).unwrap();

        assert_eq!(summary.name, "Age");
        assert_eq!(summary.count, 5);
        assert_eq!(summary.mean, Some(3.0));
        // sample variance = 10 / 4
        assert!((summary.std.unwrap() - 2.5f64.sqrt()).abs() < 1e-9);
        assert_eq!(summary.min, Some(1.0));
        assert_eq!(summary.q25, Some(2.0));
        assert_eq!(summary.median, Some(3.0));
        assert_eq!(summary.q75, Some(4.0));
        assert_eq!(summary.max, Some(5.0));
    }

    #[test]
    fn test_describe_ignores_nulls() {
        let series = Series::new("x".into(), &[Some(2i64), None, Some(4)]);
        let summary = describe_numeric(&series).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean, Some(3.0));
    }

    #[test]
    fn test_describe_all_null() {
        let series = Series::new("x".into(), &[Option::<f64>::None, None]);
        let summary = describe_numeric(&series).unwrap();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.min, None);
    }

    // ==================== pairwise_pearson tests ====================

    #[test]
    fn test_pearson_perfect() {
        let xs = [Some(1.0), Some(2.0), Some(3.0)];
        let ys = [Some(2.0), Some(4.0), Some(6.0)];
        assert!((pairwise_pearson(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);

        let inverse = [Some(3.0), Some(2.0), Some(1.0)];
        assert!((pairwise_pearson(&xs, &inverse).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_known_value() {
        // sum dx*dy = 6, sum dx^2 = 10, sum dy^2 = 6
        let xs = [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)];
        let ys = [Some(2.0), Some(4.0), Some(5.0), Some(4.0), Some(5.0)];
        let r = pairwise_pearson(&xs, &ys).unwrap();
        assert!((r - 6.0 / 60.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_skips_missing_pairs() {
        let xs = [Some(1.0), None, Some(2.0), Some(3.0)];
        let ys = [Some(1.0), Some(100.0), Some(2.0), Some(3.0)];
        assert!((pairwise_pearson(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_is_undefined() {
        let xs = [Some(1.0), Some(1.0), Some(1.0)];
        let ys = [Some(1.0), Some(2.0), Some(3.0)];
        assert_eq!(pairwise_pearson(&xs, &ys), None);
    }

    #[test]
    fn test_pearson_needs_three_pairs() {
        let xs = [Some(1.0), Some(2.0), None];
        let ys = [Some(3.0), Some(5.0), Some(7.0)];
        assert_eq!(pairwise_pearson(&xs, &ys), None);
        assert_eq!(pairwise_pearson(&[], &[]), None);
    }

    #[test]
    fn test_correlation_matrix_symmetric() {
        let df = df![
            "Billing Amount" => [100.0, 250.0, 80.0, 400.0],
            "Age" => [30i64, 60, 25, 70],
            "hospital_stay_duration" => [3i64, 10, 2, 5],
        ]
        .unwrap();

        let matrix =
            correlation_matrix(&df, &["Billing Amount", "Age", "hospital_stay_duration"]).unwrap();

        assert_eq!(matrix.columns.len(), 3);
        for i in 0..3 {
            assert!((matrix.get(i, i).unwrap() - 1.0).abs() < 1e-12);
            for j in 0..3 {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
    }
}
