//! Shared utilities for the analysis.
//!
//! This module contains helpers used by the auditor, the cleaner and the
//! segmentation code.

use crate::types::ClassValue;
use polars::prelude::*;

// =============================================================================
// Numeric Utilities
// =============================================================================

/// Round a value to two decimal places.
#[inline]
pub fn round_to_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of `count` in `total`, rounded to two decimals.
///
/// Returns 0.0 when `total` is zero; callers that must treat an empty
/// denominator as an error check for it before calling.
pub fn percentage_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_to_2(100.0 * count as f64 / total as f64)
    }
}

// =============================================================================
// Data Type Utilities
// =============================================================================

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

// =============================================================================
// Column Utilities
// =============================================================================

/// Check whether a column with this exact name exists.
#[inline]
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Build a row mask that is true where `series` equals the class sentinel.
///
/// Missing values and values that cannot be cast to the sentinel's type
/// produce `false`. Float columns are compared as floats, so `0.5` never
/// matches an integer sentinel.
pub fn class_mask(series: &Series, value: &ClassValue) -> PolarsResult<BooleanChunked> {
    match value {
        ClassValue::Int(expected) if series.dtype().is_float() => {
            let cast = series.cast(&DataType::Float64)?;
            let values = cast.f64()?;
            let expected = *expected as f64;
            Ok(values
                .into_iter()
                .map(|v| v == Some(expected))
                .collect())
        }
        ClassValue::Int(expected) => {
            let cast = series.cast(&DataType::Int64)?;
            let values = cast.i64()?;
            Ok(values
                .into_iter()
                .map(|v| v == Some(*expected))
                .collect())
        }
        ClassValue::Text(expected) => {
            let cast = series.cast(&DataType::String)?;
            let values = cast.str()?;
            Ok(values
                .into_iter()
                .map(|v| v == Some(expected.as_str()))
                .collect())
        }
    }
}

/// Count the `true` entries of a mask.
pub fn count_true(mask: &BooleanChunked) -> usize {
    mask.into_iter().filter(|v| *v == Some(true)).count()
}

// =============================================================================
// Tests
// =============================================================================
