//! Group-by summaries over the feature-augmented table.

use crate::error::Result;
use crate::types::{GroupSummaries, GroupValue, columns};
use crate::utils::{f64_values, string_values};
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Computes the group-by summaries printed and reported after derivation.
pub struct Aggregator;

impl Aggregator {
    /// Run all three summaries.
    ///
    /// `hospital_totals` is the per-hospital billing already computed for
    /// the billing tiers; it is reused rather than summed again.
    pub fn summarize(
        df: &DataFrame,
        hospital_totals: &BTreeMap<String, f64>,
    ) -> Result<GroupSummaries> {
        let summaries = GroupSummaries {
            total_billing_by_hospital: Self::total_billing_by_hospital(hospital_totals),
            avg_stay_by_condition: Self::avg_stay_by_condition(df)?,
            age_groups_by_condition: Self::age_groups_by_condition(df)?,
        };

        debug!(
            "Aggregated {} hospitals, {} conditions",
            summaries.total_billing_by_hospital.len(),
            summaries.avg_stay_by_condition.len()
        );

        Ok(summaries)
    }

    /// Sum of billing per hospital, ordered by hospital name.
    pub fn total_billing_by_hospital(totals: &BTreeMap<String, f64>) -> Vec<GroupValue> {
        totals
            .iter()
            .map(|(group, value)| GroupValue {
                group: group.clone(),
                value: *value,
            })
            .collect()
    }

    /// Mean stay duration per medical condition, highest first.
    pub fn avg_stay_by_condition(df: &DataFrame) -> Result<Vec<GroupValue>> {
        let conditions = string_values(df, columns::MEDICAL_CONDITION)?;
        let stays = f64_values(df, columns::STAY_DURATION)?;

        let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for (condition, stay) in conditions.iter().zip(&stays) {
            if let (Some(condition), Some(stay)) = (condition, stay) {
                let entry = sums.entry(condition.as_str()).or_insert((0.0, 0));
                entry.0 += stay;
                entry.1 += 1;
            }
        }

        let values = sums
            .into_iter()
            .map(|(group, (sum, count))| GroupValue {
                group: group.to_string(),
                value: sum / count as f64,
            })
            .collect();

        Ok(sort_descending(values))
    }

    /// Number of distinct age groups per medical condition, highest first.
    pub fn age_groups_by_condition(df: &DataFrame) -> Result<Vec<GroupValue>> {
        let conditions = string_values(df, columns::MEDICAL_CONDITION)?;
        let groups = string_values(df, columns::AGE_GROUP)?;

        let mut distinct: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (condition, group) in conditions.iter().zip(&groups) {
            if let (Some(condition), Some(group)) = (condition, group) {
                distinct
                    .entry(condition.as_str())
                    .or_default()
                    .insert(group.as_str());
            }
        }

        let values = distinct
            .into_iter()
            .map(|(group, set)| GroupValue {
                group: group.to_string(),
                value: set.len() as f64,
            })
            .collect();

        Ok(sort_descending(values))
    }
}

/// Sort by value descending, ties by group name.
fn sort_descending(mut values: Vec<GroupValue>) -> Vec<GroupValue> {
    values.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.group.cmp(&b.group))
    });
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gv(group: &str, value: f64) -> GroupValue {
        GroupValue {
            group: group.to_string(),
            value,
        }
    }

    fn sample_frame() -> DataFrame {
        df![
            "Medical Condition" => ["Asthma", "Cancer", "Asthma", "Obesity", "Cancer", "Obesity"],
            "hospital_stay_duration" => [4i64, 10, 6, 5, 20, 5],
            "age_group" => ["Child", "Senior", "Adult", "Child", "Senior", "Child"],
        ]
        .unwrap()
    }

    #[test]
    fn test_avg_stay_by_condition_descending() {
        let values = Aggregator::avg_stay_by_condition(&sample_frame()).unwrap();
        assert_eq!(
            values,
            vec![gv("Cancer", 15.0), gv("Asthma", 5.0), gv("Obesity", 5.0)]
        );
    }

    #[test]
    fn test_age_groups_by_condition() {
        let values = Aggregator::age_groups_by_condition(&sample_frame()).unwrap();
        assert_eq!(
            values,
            vec![gv("Asthma", 2.0), gv("Cancer", 1.0), gv("Obesity", 1.0)]
        );
    }

    #[test]
    fn test_total_billing_ordered_by_name() {
        let totals: BTreeMap<String, f64> = [("Zeta", 1.0), ("Alpha", 2.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(
            Aggregator::total_billing_by_hospital(&totals),
            vec![gv("Alpha", 2.0), gv("Zeta", 1.0)]
        );
    }

    #[test]
    fn test_summarize_requires_condition_column() {
        let df = df!["hospital_stay_duration" => [1i64]].unwrap();
        let err = Aggregator::summarize(&df, &BTreeMap::new()).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }
}
