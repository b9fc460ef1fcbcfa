//! Class segmentation and per-segment frequency tables.
//!
//! The presentation layer draws the same column three times side by side:
//! for every customer, for compliant customers and for delinquent ones.
//! This module produces the counts behind those charts. Numeric columns are
//! binned on shared edges; [`ClassScatter`] pairs two of them per class.

use crate::error::{AnalysisError, Result};
use crate::types::{
    ClassScatter, ClassValue, FrequencyEntry, ScatterPoint, SegmentedFrequencies,
    SegmentedHistogram,
};
use crate::utils::{class_mask, has_column, is_numeric_dtype};
use polars::prelude::*;
use tracing::debug;

/// A table split by customer class.
#[derive(Debug, Clone)]
pub struct ClassSegments {
    pub all: DataFrame,
    pub compliant: DataFrame,
    pub delinquent: DataFrame,
}

impl ClassSegments {
    /// Split a table into all / compliant / delinquent rows.
    ///
    /// Rows matching neither sentinel appear only in `all`.
    pub fn split(
        df: &DataFrame,
        class_column: &str,
        compliant_value: &ClassValue,
        delinquent_value: &ClassValue,
    ) -> Result<Self> {
        if !has_column(df, class_column) {
            return Err(AnalysisError::ColumnNotFound(class_column.to_string()));
        }

        let series = df.column(class_column)?.as_materialized_series();
        let compliant = df.filter(&class_mask(series, compliant_value)?)?;
        let delinquent = df.filter(&class_mask(series, delinquent_value)?)?;

        Ok(Self {
            all: df.clone(),
            compliant,
            delinquent,
        })
    }
}

/// Count the non-null values of a column, sorted ascending by value.
///
/// Sorting happens in the column's own dtype, so numeric columns come out in
/// numeric order (`2` before `10`). Values are rendered as text afterwards.
pub fn frequency_table(df: &DataFrame, column: &str) -> Result<Vec<FrequencyEntry>> {
    if !has_column(df, column) {
        return Err(AnalysisError::ColumnNotFound(column.to_string()));
    }

    let sorted = df
        .column(column)?
        .as_materialized_series()
        .drop_nulls()
        .sort(SortOptions::default())?;
    let as_text = sorted.cast(&DataType::String)?;

    // equal values are adjacent after sorting
    let mut table: Vec<FrequencyEntry> = Vec::new();
    for val in as_text.str()?.into_iter().flatten() {
        match table.last_mut() {
            Some(last) if last.value == val => last.count += 1,
            _ => table.push(FrequencyEntry {
                value: val.to_string(),
                count: 1,
            }),
        }
    }

    Ok(table)
}

impl SegmentedFrequencies {
    /// Frequency tables for `column` in each segment.
    pub fn compute(segments: &ClassSegments, column: &str) -> Result<Self> {
        Ok(Self {
            column: column.to_string(),
            all: frequency_table(&segments.all, column)?,
            compliant: frequency_table(&segments.compliant, column)?,
            delinquent: frequency_table(&segments.delinquent, column)?,
        })
    }
}

// =============================================================================
// Numeric Segments
// =============================================================================

/// A numeric column cast to `Float64`, nulls kept in place.
fn numeric_column(df: &DataFrame, column: &str) -> Result<Series> {
    if !has_column(df, column) {
        return Err(AnalysisError::ColumnNotFound(column.to_string()));
    }

    let series = df.column(column)?.as_materialized_series();
    if !is_numeric_dtype(series.dtype()) {
        return Err(AnalysisError::InvalidConfig(format!(
            "Column '{}' has type {} and cannot be binned",
            column,
            series.dtype()
        )));
    }

    Ok(series.cast(&DataType::Float64)?)
}

/// Finite, non-null values of a numeric column.
fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    let series = numeric_column(df, column)?;
    Ok(series
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect())
}

/// Bin count from Sturges' rule: `ceil(log2(n)) + 1`.
pub fn sturges_bins(n: usize) -> usize {
    if n <= 1 {
        1
    } else {
        (n as f64).log2().ceil() as usize + 1
    }
}

/// Equal-width edges spanning `values`.
///
/// A constant column gets a unit-wide range centred on its value. Empty input
/// yields no edges.
pub fn bin_edges(values: &[f64], bins: usize) -> Vec<f64> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let (min, max) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };

    let width = (max - min) / bins as f64;
    (0..=bins)
        .map(|i| if i == bins { max } else { min + width * i as f64 })
        .collect()
}

/// Count `values` into the bins described by `edges`.
///
/// Values outside the edges are ignored; the last bin is closed on the right.
fn bin_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
    let bins = edges.len().saturating_sub(1);
    let mut counts = vec![0; bins];
    if bins == 0 {
        return counts;
    }

    let (min, max) = (edges[0], edges[bins]);
    let width = (max - min) / bins as f64;
    for &v in values {
        if v < min || v > max {
            continue;
        }
        let index = (((v - min) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }
    counts
}

impl SegmentedHistogram {
    /// Binned counts for `column` in each segment.
    ///
    /// Edges are computed once from the `all` segment and reused for the
    /// class segments. `bins` defaults to Sturges' rule on the non-null
    /// values of `all`.
    pub fn compute(segments: &ClassSegments, column: &str, bins: Option<usize>) -> Result<Self> {
        let all = numeric_values(&segments.all, column)?;
        let compliant = numeric_values(&segments.compliant, column)?;
        let delinquent = numeric_values(&segments.delinquent, column)?;

        let bins = bins.unwrap_or_else(|| sturges_bins(all.len()));
        let edges = bin_edges(&all, bins);
        debug!("Histogram of '{}': {} bins over {} values", column, bins, all.len());

        Ok(Self {
            column: column.to_string(),
            all: bin_counts(&all, &edges),
            compliant: bin_counts(&compliant, &edges),
            delinquent: bin_counts(&delinquent, &edges),
            edges,
        })
    }
}

/// Rows where both columns hold a finite value, as points.
fn paired_values(df: &DataFrame, x_column: &str, y_column: &str) -> Result<Vec<ScatterPoint>> {
    let xs = numeric_column(df, x_column)?;
    let ys = numeric_column(df, y_column)?;

    Ok(xs
        .f64()?
        .into_iter()
        .zip(ys.f64()?.into_iter())
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(ScatterPoint { x, y }),
            _ => None,
        })
        .collect())
}

impl ClassScatter {
    /// Paired `(x, y)` values per class.
    pub fn compute(segments: &ClassSegments, x_column: &str, y_column: &str) -> Result<Self> {
        let all = paired_values(&segments.all, x_column, y_column)?;
        let compliant = paired_values(&segments.compliant, x_column, y_column)?;
        let delinquent = paired_values(&segments.delinquent, x_column, y_column)?;

        let unclassified = all
            .len()
            .saturating_sub(compliant.len())
            .saturating_sub(delinquent.len());

        Ok(Self {
            x_column: x_column.to_string(),
            y_column: y_column.to_string(),
            compliant,
            delinquent,
            unclassified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DataFrame {
        df![
            "default" => [Some(0), Some(1), Some(0), Some(1), Some(0), None],
            "escolaridade" => [
                Some("mestrado"),
                Some("ensino medio"),
                Some("mestrado"),
                None,
                Some("doutorado"),
                Some("mestrado"),
            ],
        ]
        .unwrap()
    }

    fn entry(value: &str, count: usize) -> FrequencyEntry {
        FrequencyEntry {
            value: value.to_string(),
            count,
        }
    }

    #[test]
    fn test_split_segments() {
        let segments =
            ClassSegments::split(&sample(), "default", &ClassValue::Int(0), &ClassValue::Int(1))
                .unwrap();

        assert_eq!(segments.all.height(), 6);
        assert_eq!(segments.compliant.height(), 3);
        assert_eq!(segments.delinquent.height(), 2);
    }

    #[test]
    fn test_split_missing_class_column() {
        let result =
            ClassSegments::split(&sample(), "inadimplente", &ClassValue::Int(0), &ClassValue::Int(1));

        assert!(matches!(result, Err(AnalysisError::ColumnNotFound(_))));
    }

    #[test]
    fn test_frequency_table_sorted_without_nulls() {
        let table = frequency_table(&sample(), "escolaridade").unwrap();

        assert_eq!(
            table,
            vec![
                entry("doutorado", 1),
                entry("ensino medio", 1),
                entry("mestrado", 3),
            ]
        );
    }

    #[test]
    fn test_frequency_table_numeric_column() {
        let df = df!["dependentes" => [3, 1, 3, 0]].unwrap();

        let table = frequency_table(&df, "dependentes").unwrap();

        assert_eq!(table, vec![entry("0", 1), entry("1", 1), entry("3", 2)]);
    }

    #[test]
    fn test_frequency_table_multi_digit_values_in_numeric_order() {
        let df = df!["dependentes" => [2, 10, 3, 1, 10]].unwrap();

        let table = frequency_table(&df, "dependentes").unwrap();

        let values: Vec<&str> = table.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["1", "2", "3", "10"]);
        assert_eq!(table[3], entry("10", 2));
    }

    fn numeric_sample() -> DataFrame {
        df![
            "default" => [0, 0, 0, 1, 1],
            "qtd_transacoes_12m" => [10, 20, 30, 40, 50],
        ]
        .unwrap()
    }

    #[test]
    fn test_sturges_bins() {
        assert_eq!(sturges_bins(0), 1);
        assert_eq!(sturges_bins(1), 1);
        assert_eq!(sturges_bins(5), 4);
        assert_eq!(sturges_bins(10127), 15);
    }

    #[test]
    fn test_bin_edges_constant_values() {
        assert_eq!(bin_edges(&[7.0, 7.0], 1), vec![6.5, 7.5]);
        assert!(bin_edges(&[], 3).is_empty());
    }

    #[test]
    fn test_segmented_histogram_shares_edges() {
        let segments = ClassSegments::split(
            &numeric_sample(),
            "default",
            &ClassValue::Int(0),
            &ClassValue::Int(1),
        )
        .unwrap();

        let histogram =
            SegmentedHistogram::compute(&segments, "qtd_transacoes_12m", Some(4)).unwrap();

        assert_eq!(histogram.edges, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
        // the maximum lands in the last, right-closed bin
        assert_eq!(histogram.all, vec![1, 1, 1, 2]);
        assert_eq!(histogram.compliant, vec![1, 1, 1, 0]);
        assert_eq!(histogram.delinquent, vec![0, 0, 0, 2]);
        assert_eq!(histogram.max_count(), 2);
    }

    #[test]
    fn test_segmented_histogram_default_bins() {
        let segments = ClassSegments::split(
            &numeric_sample(),
            "default",
            &ClassValue::Int(0),
            &ClassValue::Int(1),
        )
        .unwrap();

        let histogram = SegmentedHistogram::compute(&segments, "qtd_transacoes_12m", None).unwrap();

        assert_eq!(histogram.bin_count(), 4);
        assert_eq!(histogram.all.iter().sum::<usize>(), 5);
    }

    #[test]
    fn test_segmented_histogram_rejects_text_column() {
        let segments =
            ClassSegments::split(&sample(), "default", &ClassValue::Int(0), &ClassValue::Int(1))
                .unwrap();

        let result = SegmentedHistogram::compute(&segments, "escolaridade", None);

        assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn test_class_scatter_pairs_by_class() {
        let df = df![
            "default" => [0, 1, 0, 2],
            "valor_transacoes_12m" => [Some(1.5), Some(2.5), None, Some(4.0)],
            "qtd_transacoes_12m" => [10, 20, 30, 40],
        ]
        .unwrap();
        let segments =
            ClassSegments::split(&df, "default", &ClassValue::Int(0), &ClassValue::Int(1))
                .unwrap();

        let scatter =
            ClassScatter::compute(&segments, "valor_transacoes_12m", "qtd_transacoes_12m")
                .unwrap();

        assert_eq!(scatter.compliant, vec![ScatterPoint { x: 1.5, y: 10.0 }]);
        assert_eq!(scatter.delinquent, vec![ScatterPoint { x: 2.5, y: 20.0 }]);
        assert_eq!(scatter.unclassified, 1);
        assert_eq!(scatter.point_count(), 2);
    }

    #[test]
    fn test_segmented_frequencies() {
        let segments =
            ClassSegments::split(&sample(), "default", &ClassValue::Int(0), &ClassValue::Int(1))
                .unwrap();

        let frequencies = SegmentedFrequencies::compute(&segments, "escolaridade").unwrap();

        assert_eq!(frequencies.column, "escolaridade");
        assert_eq!(
            frequencies.compliant,
            vec![entry("doutorado", 1), entry("mestrado", 2)]
        );
        assert_eq!(frequencies.delinquent, vec![entry("ensino medio", 1)]);
        assert_eq!(frequencies.max_count(), 3);
    }
}
