//! Discretization of continuous values into labelled buckets.

use crate::error::{EdaError, Result};
use crate::types::{AgeGroup, BillingTier};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Quartile edges (25th, 50th, 75th percentile) used for tiering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuartileEdges {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

impl QuartileEdges {
    /// Compute linear-interpolated quartiles of a set of values.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(EdaError::NoValidValues("quartile input".to_string()));
        }

        let series = Series::new("values".into(), values);
        let ca = series.f64()?;
        let quantile = |q: f64| -> Result<f64> {
            ca.quantile(q, QuantileMethod::Linear)?
                .ok_or_else(|| EdaError::NoValidValues("quartile input".to_string()))
        };

        Ok(Self {
            q1: quantile(0.25)?,
            q2: quantile(0.5)?,
            q3: quantile(0.75)?,
        })
    }

    /// Right-closed quartile bucket; the lowest value falls into `Low`.
    pub fn tier(&self, value: f64) -> BillingTier {
        if value <= self.q1 {
            BillingTier::Low
        } else if value <= self.q2 {
            BillingTier::Medium
        } else if value <= self.q3 {
            BillingTier::High
        } else {
            BillingTier::VeryHigh
        }
    }
}

/// Bucket ages; a null age is an error because every row needs a bucket.
pub fn age_groups(ages: &[Option<f64>]) -> Result<Vec<AgeGroup>> {
    ages.iter()
        .enumerate()
        .map(|(row, age)| match age {
            Some(age) if age.is_finite() => Ok(AgeGroup::from_age(*age)),
            _ => Err(EdaError::FeatureDerivationFailed {
                feature: "age_group".to_string(),
                reason: format!("row {} has no usable age", row),
            }),
        })
        .collect()
}

/// Sum billing per hospital. Rows missing either value do not contribute.
pub fn total_by_group(groups: &[Option<String>], amounts: &[Option<f64>]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for (group, amount) in groups.iter().zip(amounts) {
        if let (Some(group), Some(amount)) = (group, amount) {
            *totals.entry(group.clone()).or_insert(0.0) += amount;
        }
    }
    totals
}

/// Assign a quartile tier to every group from its total.
pub fn tiers_by_group(totals: &BTreeMap<String, f64>) -> Result<BTreeMap<String, BillingTier>> {
    let values: Vec<f64> = totals.values().copied().collect();
    let edges = QuartileEdges::from_values(&values)?;

    Ok(totals
        .iter()
        .map(|(group, total)| (group.clone(), edges.tier(*total)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quartiles_linear() {
        let edges = QuartileEdges::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(edges, QuartileEdges { q1: 2.0, q2: 3.0, q3: 4.0 });

        let edges = QuartileEdges::from_values(&[10.0, 20.0, 30.0, 40.0]).unwrap();
        assert!((edges.q1 - 17.5).abs() < 1e-9);
        assert!((edges.q2 - 25.0).abs() < 1e-9);
        assert!((edges.q3 - 32.5).abs() < 1e-9);
    }

    #[test]
    fn test_quartiles_empty() {
        assert!(QuartileEdges::from_values(&[]).is_err());
    }

    #[test]
    fn test_tier_boundaries() {
        let edges = QuartileEdges { q1: 2.0, q2: 3.0, q3: 4.0 };
        assert_eq!(edges.tier(1.0), BillingTier::Low);
        assert_eq!(edges.tier(2.0), BillingTier::Low);
        assert_eq!(edges.tier(2.5), BillingTier::Medium);
        assert_eq!(edges.tier(3.0), BillingTier::Medium);
        assert_eq!(edges.tier(4.0), BillingTier::High);
        assert_eq!(edges.tier(4.1), BillingTier::VeryHigh);
    }

    #[test]
    fn test_tiers_by_group_equal_frequency() {
        let totals: BTreeMap<String, f64> = [
            ("A", 100.0),
            ("B", 200.0),
            ("C", 300.0),
            ("D", 400.0),
            ("E", 500.0),
            ("F", 600.0),
            ("G", 700.0),
            ("H", 800.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let tiers = tiers_by_group(&totals).unwrap();
        let count = |tier: BillingTier| tiers.values().filter(|t| **t == tier).count();
        assert_eq!(count(BillingTier::Low), 2);
        assert_eq!(count(BillingTier::Medium), 2);
        assert_eq!(count(BillingTier::High), 2);
        assert_eq!(count(BillingTier::VeryHigh), 2);
        assert_eq!(tiers["A"], BillingTier::Low);
        assert_eq!(tiers["H"], BillingTier::VeryHigh);
    }

    #[test]
    fn test_single_group_is_low() {
        let totals: BTreeMap<String, f64> = [("Only".to_string(), 42.0)].into_iter().collect();
        let tiers = tiers_by_group(&totals).unwrap();
        assert_eq!(tiers["Only"], BillingTier::Low);
    }

    #[test]
    fn test_total_by_group_skips_nulls() {
        let groups = vec![
            Some("X".to_string()),
            Some("Y".to_string()),
            Some("X".to_string()),
            None,
        ];
        let amounts = vec![Some(10.0), None, Some(5.5), Some(99.0)];
        let totals = total_by_group(&groups, &amounts);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals["X"], 15.5);
    }

    #[test]
    fn test_age_groups() {
        let groups = age_groups(&[Some(25.0), Some(45.0), Some(55.0), Some(70.0)]).unwrap();
        assert_eq!(
            groups,
            vec![
                AgeGroup::Child,
                AgeGroup::Adult,
                AgeGroup::MiddleAge,
                AgeGroup::Senior
            ]
        );
    }

    #[test]
    fn test_age_groups_rejects_missing() {
        let err = age_groups(&[Some(25.0), None]).unwrap_err();
        assert_eq!(err.error_code(), "FEATURE_DERIVATION_FAILED");
        assert!(err.to_string().contains("row 1"));
    }
}
