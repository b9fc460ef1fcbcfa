use crate::utils::{percentage_of, round_to_2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A sentinel value identifying one customer class in the class column.
///
/// Integer sentinels compare against the column cast to `Int64` (or as
/// floats when the column is a float column), text sentinels against the
/// column cast to `String`. Values that fail the cast belong to neither class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassValue {
    Int(i64),
    Text(String),
}

impl fmt::Display for ClassValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassValue::Int(v) => write!(f, "{}", v),
            ClassValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for ClassValue {
    fn from(value: i64) -> Self {
        ClassValue::Int(value)
    }
}

impl From<&str> for ClassValue {
    fn from(value: &str) -> Self {
        ClassValue::Text(value.to_string())
    }
}

impl From<String> for ClassValue {
    fn from(value: String) -> Self {
        ClassValue::Text(value)
    }
}

/// Missing-value statistics for a single column.
///
/// Only produced for columns with at least one missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingReportEntry {
    pub column_name: String,
    pub missing_count: usize,
    /// `round(100 * missing_count / total_rows, 2)`, in `[0, 100]`.
    pub missing_percentage: f64,
}

/// Row counts per customer class at one point of the analysis.
///
/// Rows whose class value matches neither sentinel count toward
/// `total_rows` only, so `compliant_count + delinquent_count <= total_rows`.
/// A snapshot is never built for an empty table, which keeps the
/// percentage accessors free of division by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassProportionSnapshot {
    pub total_rows: usize,
    pub compliant_count: usize,
    pub delinquent_count: usize,
}

impl ClassProportionSnapshot {
    /// Percentage of compliant rows, rounded to two decimals.
    pub fn compliant_percentage(&self) -> f64 {
        percentage_of(self.compliant_count, self.total_rows)
    }

    /// Percentage of delinquent rows, rounded to two decimals.
    pub fn delinquent_percentage(&self) -> f64 {
        percentage_of(self.delinquent_count, self.total_rows)
    }

    /// Rows that belong to neither class.
    pub fn unclassified_count(&self) -> usize {
        self.total_rows
            .saturating_sub(self.compliant_count)
            .saturating_sub(self.delinquent_count)
    }
}

/// Explicit before/after comparison of two proportion snapshots.
///
/// Both snapshots are captured by the caller around the cleaning step; the
/// comparison never looks at any table itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProportionComparison {
    pub before: ClassProportionSnapshot,
    pub after: ClassProportionSnapshot,
}

impl ProportionComparison {
    pub fn new(before: ClassProportionSnapshot, after: ClassProportionSnapshot) -> Self {
        Self { before, after }
    }

    /// Rows removed between the two snapshots (zero if rows were added).
    pub fn rows_removed(&self) -> usize {
        self.before.total_rows.saturating_sub(self.after.total_rows)
    }

    /// Change of the compliant share, in percentage points.
    pub fn compliant_drift(&self) -> f64 {
        round_to_2(self.after.compliant_percentage() - self.before.compliant_percentage())
    }

    /// Change of the delinquent share, in percentage points.
    pub fn delinquent_drift(&self) -> f64 {
        round_to_2(self.after.delinquent_percentage() - self.before.delinquent_percentage())
    }
}

/// Number of occurrences of one value in a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
}

/// Frequency tables for one column across the three class segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentedFrequencies {
    pub column: String,
    pub all: Vec<FrequencyEntry>,
    pub compliant: Vec<FrequencyEntry>,
    pub delinquent: Vec<FrequencyEntry>,
}

impl SegmentedFrequencies {
    /// Highest single count across all three segments.
    ///
    /// Used to give side-by-side charts a common y-axis limit.
    pub fn max_count(&self) -> usize {
        self.all
            .iter()
            .chain(&self.compliant)
            .chain(&self.delinquent)
            .map(|entry| entry.count)
            .max()
            .unwrap_or(0)
    }
}

/// Binned counts of one numeric column across the three class segments.
///
/// All segments share `edges`, so bin `i` covers `[edges[i], edges[i + 1])`
/// in every segment; the last bin also includes its upper edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentedHistogram {
    pub column: String,
    pub edges: Vec<f64>,
    pub all: Vec<usize>,
    pub compliant: Vec<usize>,
    pub delinquent: Vec<usize>,
}

impl SegmentedHistogram {
    pub fn bin_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// Highest single bin across all three segments.
    pub fn max_count(&self) -> usize {
        self.all
            .iter()
            .chain(&self.compliant)
            .chain(&self.delinquent)
            .copied()
            .max()
            .unwrap_or(0)
    }
}

/// One row of a two-column relation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// Paired values of two numeric columns, grouped by class.
///
/// Rows with a missing coordinate are left out; rows of neither class appear
/// only in the `unclassified` count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScatter {
    pub x_column: String,
    pub y_column: String,
    pub compliant: Vec<ScatterPoint>,
    pub delinquent: Vec<ScatterPoint>,
    pub unclassified: usize,
}

impl ClassScatter {
    pub fn point_count(&self) -> usize {
        self.compliant.len() + self.delinquent.len()
    }
}
