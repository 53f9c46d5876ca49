use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Column names of the source dataset and of the derived features.
pub mod columns {
    pub const ADMISSION_DATE: &str = "Date of Admission";
    pub const DISCHARGE_DATE: &str = "Discharge Date";
    pub const AGE: &str = "Age";
    pub const BILLING_AMOUNT: &str = "Billing Amount";
    pub const HOSPITAL: &str = "Hospital";
    pub const MEDICAL_CONDITION: &str = "Medical Condition";
    pub const INSURANCE_PROVIDER: &str = "Insurance Provider";
    pub const BLOOD_TYPE: &str = "Blood Type";
    pub const TEST_RESULTS: &str = "Test Results";

    pub const STAY_DURATION: &str = "hospital_stay_duration";
    pub const AGE_GROUP: &str = "age_group";
    pub const ADMISSION_YEAR: &str = "admission_year";
    pub const ADMISSION_MONTH: &str = "admission_month";
    pub const ADMISSION_WEEKDAY: &str = "admission_weekday";
    pub const HOSPITAL_CATEGORY: &str = "hospital_category";

    /// Date columns parsed during feature engineering.
    pub const DATE_COLUMNS: [&str; 2] = [ADMISSION_DATE, DISCHARGE_DATE];

    /// Derived columns, in the order they are appended.
    pub const DERIVED_COLUMNS: [&str; 6] = [
        STAY_DURATION,
        AGE_GROUP,
        ADMISSION_YEAR,
        ADMISSION_MONTH,
        ADMISSION_WEEKDAY,
        HOSPITAL_CATEGORY,
    ];
}

/// Discretized age range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Child,
    Adult,
    MiddleAge,
    Senior,
}

impl AgeGroup {
    /// Upper (inclusive) bin edges; the lower edge of the first bin is 10.
    pub const UPPER_EDGES: [f64; 4] = [40.0, 50.0, 60.0, 100.0];

    pub const ALL: [AgeGroup; 4] = [Self::Child, Self::Adult, Self::MiddleAge, Self::Senior];

    /// Bucket an age into right-closed bins 10/40/50/60/100.
    ///
    /// Ages at or below the first edge land in `Child` and ages above the
    /// last edge land in `Senior`, so every finite age gets a bucket.
    pub fn from_age(age: f64) -> Self {
        Self::ALL
            .iter()
            .zip(Self::UPPER_EDGES)
            .find(|(_, upper)| age <= *upper)
            .map(|(group, _)| *group)
            .unwrap_or(Self::Senior)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Child => "Child",
            Self::Adult => "Adult",
            Self::MiddleAge => "Middle Age",
            Self::Senior => "Senior",
        }
    }

    /// Position of a label in bucket order, for sorting chart axes.
    pub fn rank_of(label: &str) -> Option<usize> {
        Self::ALL.iter().position(|g| g.label() == label)
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Quartile bucket of total billing per hospital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BillingTier {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl BillingTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for BillingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Overview (info / describe / nulls / uniques)
// ============================================================================

/// One line of the `info` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null_count: usize,
    pub null_count: usize,
    pub unique_count: usize,
}

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Dataset overview taken after duplicate removal and before imputation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    pub column_info: Vec<ColumnInfo>,
    pub numeric_summaries: Vec<NumericSummary>,
    pub duplicate_rows: usize,
}

impl DatasetOverview {
    pub fn total_nulls(&self) -> usize {
        self.column_info.iter().map(|c| c.null_count).sum()
    }
}

// ============================================================================
// Aggregations
// ============================================================================

/// A labelled numeric value from a group-by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupValue {
    pub group: String,
    pub value: f64,
}

/// Results of the three group-by summaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupSummaries {
    /// Sum of billing per hospital, ordered by hospital name.
    pub total_billing_by_hospital: Vec<GroupValue>,
    /// Mean stay per medical condition, descending.
    pub avg_stay_by_condition: Vec<GroupValue>,
    /// Distinct age groups per medical condition, descending.
    pub age_groups_by_condition: Vec<GroupValue>,
}

/// Symmetric correlation matrix over a fixed set of columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major values; `None` where a coefficient is undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(col)).copied().flatten()
    }
}

// ============================================================================
// Pipeline outcome
// ============================================================================

/// Summary of what the pipeline did to the table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdaSummary {
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    pub duplicates_removed: usize,
    pub invalid_date_rows_dropped: usize,
    pub duration_ms: u64,
    /// Human-readable record of every imputation applied.
    pub imputation_steps: Vec<String>,
    pub warnings: Vec<String>,
}

impl EdaSummary {
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }
}

/// Everything a pipeline run produces.
#[derive(Debug, Clone)]
pub struct EdaResult {
    /// The cleaned, feature-augmented table as written to disk.
    pub data: DataFrame,
    pub overview: DatasetOverview,
    pub aggregations: GroupSummaries,
    pub hospital_tiers: BTreeMap<String, BillingTier>,
    pub correlation: CorrelationMatrix,
    /// Chart files in render order; empty when rendering is off.
    pub chart_files: Vec<PathBuf>,
    pub summary: EdaSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_group_bins() {
        assert_eq!(AgeGroup::from_age(25.0), AgeGroup::Child);
        assert_eq!(AgeGroup::from_age(40.0), AgeGroup::Child);
        assert_eq!(AgeGroup::from_age(40.5), AgeGroup::Adult);
        assert_eq!(AgeGroup::from_age(50.0), AgeGroup::Adult);
        assert_eq!(AgeGroup::from_age(55.0), AgeGroup::MiddleAge);
        assert_eq!(AgeGroup::from_age(60.0), AgeGroup::MiddleAge);
        assert_eq!(AgeGroup::from_age(70.0), AgeGroup::Senior);
        assert_eq!(AgeGroup::from_age(100.0), AgeGroup::Senior);
    }

    #[test]
    fn test_age_group_out_of_range() {
        assert_eq!(AgeGroup::from_age(5.0), AgeGroup::Child);
        assert_eq!(AgeGroup::from_age(10.0), AgeGroup::Child);
        assert_eq!(AgeGroup::from_age(104.0), AgeGroup::Senior);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AgeGroup::MiddleAge.to_string(), "Middle Age");
        assert_eq!(BillingTier::VeryHigh.to_string(), "Very High");
        assert_eq!(AgeGroup::rank_of("Senior"), Some(3));
        assert_eq!(AgeGroup::rank_of("Toddler"), None);
    }

    #[test]
    fn test_correlation_matrix_get() {
        let matrix = CorrelationMatrix {
            columns: vec!["a".to_string(), "b".to_string()],
            values: vec![vec![Some(1.0), None], vec![None, Some(1.0)]],
        };
        assert_eq!(matrix.get(0, 0), Some(1.0));
        assert_eq!(matrix.get(0, 1), None);
        assert_eq!(matrix.get(5, 0), None);
    }
}
