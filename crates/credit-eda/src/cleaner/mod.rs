//! Data cleaning step run between the two audits.
//!
//! This module provides functionality for:
//! - Parsing locale-formatted numeric strings into floats
//! - Removing rows that contain missing values
//!
//! Column names and order are never changed, so an audit after cleaning is
//! comparable to the audit before it.

mod converters;

pub use converters::parse_locale_number;

use crate::config::NumberFormat;
use crate::error::{AnalysisError, Result, ResultExt};
use crate::utils::{has_column, is_numeric_dtype};
use converters::locale_strings_to_f64;
use polars::prelude::*;
use tracing::{debug, info};

/// Data cleaner for the credit dataset.
pub struct DataCleaner {
    number_format: NumberFormat,
}

impl DataCleaner {
    pub fn new(number_format: NumberFormat) -> Self {
        Self { number_format }
    }

    /// Rewrite each named column as Float64.
    ///
    /// String columns are parsed with the cleaner's [`NumberFormat`]; columns
    /// that are already numeric are cast. Returns the cleaned frame and a
    /// description of each action taken.
    pub fn parse_locale_numeric_columns(
        &self,
        df: DataFrame,
        columns: &[String],
    ) -> Result<(DataFrame, Vec<String>)> {
        let mut df = df;
        let mut cleaning_actions = Vec::new();

        for col_name in columns {
            if !has_column(&df, col_name) {
                return Err(AnalysisError::ColumnNotFound(col_name.clone()));
            }

            let series = df.column(col_name)?.as_materialized_series().clone();
            let converted = match series.dtype() {
                DataType::String => {
                    debug!("Parsing locale-formatted numbers in '{}'", col_name);
                    let converted = locale_strings_to_f64(&series, &self.number_format)?;
                    cleaning_actions.push(format!(
                        "Parsed locale-formatted numbers in '{}' as Float64",
                        col_name
                    ));
                    converted
                }
                DataType::Float64 => {
                    cleaning_actions.push(format!("Column '{}' is already Float64", col_name));
                    continue;
                }
                dtype if is_numeric_dtype(dtype) => {
                    cleaning_actions.push(format!(
                        "Cast numeric column '{}' from {} to Float64",
                        col_name, dtype
                    ));
                    series
                        .cast(&DataType::Float64)
                        .context(format!("Casting '{}' to Float64", col_name))?
                }
                dtype => {
                    return Err(AnalysisError::InvalidConfig(format!(
                        "Column '{}' has type {} and cannot hold numbers",
                        col_name, dtype
                    )));
                }
            };

            df.replace(col_name, converted)
                .context(format!("Replacing column '{}'", col_name))?;
        }

        Ok((df, cleaning_actions))
    }

    /// Remove every row that has a missing value in any column.
    pub fn drop_missing_rows(&self, df: DataFrame) -> Result<(DataFrame, Vec<String>)> {
        let before_rows = df.height();
        let mut keep = BooleanChunked::full("keep".into(), true, before_rows);

        for col in df.get_columns() {
            if col.null_count() > 0 {
                let not_null = col.as_materialized_series().is_not_null();
                keep = &keep & &not_null;
            }
        }

        let df = df.filter(&keep).context("Dropping rows with missing values")?;
        let rows_removed = before_rows - df.height();

        let action = if rows_removed > 0 {
            let pct = (rows_removed as f64 / before_rows as f64) * 100.0;
            info!("Removed {} rows with missing values", rows_removed);
            format!(
                "Removed {} rows with missing values ({:.1}%)",
                rows_removed, pct
            )
        } else {
            debug!("No rows with missing values found");
            "No rows with missing values found".to_string()
        };

        Ok((df, vec![action]))
    }
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new(NumberFormat::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_columns_rewrites_strings() {
        let df = df![
            "default" => [0, 1],
            "limite_credito" => ["12.691,51", "8.256,96"],
            "valor_transacoes_12m" => ["1.144,90", "1.291,45"],
        ]
        .unwrap();

        let (df, actions) = DataCleaner::default()
            .parse_locale_numeric_columns(
                df,
                &columns(&["valor_transacoes_12m", "limite_credito"]),
            )
            .unwrap();

        assert_eq!(df.column("limite_credito").unwrap().dtype(), &DataType::Float64);
        assert_eq!(
            df.column("valor_transacoes_12m").unwrap().dtype(),
            &DataType::Float64
        );
        assert_eq!(actions.len(), 2);

        let limits = df
            .column("limite_credito")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .clone();
        assert_eq!(limits.get(1), Some(8256.96));
    }

    #[test]
    fn test_parse_columns_preserves_order() {
        let df = df![
            "a" => ["1,5"],
            "b" => [2],
            "c" => ["3,5"],
        ]
        .unwrap();

        let (df, _) = DataCleaner::default()
            .parse_locale_numeric_columns(df, &columns(&["c", "a"]))
            .unwrap();

        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_columns_casts_integer_columns() {
        let df = df!["limite_credito" => [1000i64, 2000]].unwrap();

        let (df, actions) = DataCleaner::default()
            .parse_locale_numeric_columns(df, &columns(&["limite_credito"]))
            .unwrap();

        assert_eq!(df.column("limite_credito").unwrap().dtype(), &DataType::Float64);
        assert!(actions[0].contains("Cast"));
    }

    #[test]
    fn test_parse_columns_missing_column() {
        let df = df!["default" => [0, 1]].unwrap();

        let result =
            DataCleaner::default().parse_locale_numeric_columns(df, &columns(&["limite_credito"]));

        assert!(matches!(result, Err(AnalysisError::ColumnNotFound(_))));
    }

    #[test]
    fn test_parse_columns_rejects_boolean_column() {
        let df = df!["flag" => [true, false]].unwrap();

        let result = DataCleaner::default().parse_locale_numeric_columns(df, &columns(&["flag"]));

        assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn test_drop_missing_rows() {
        let df = df![
            "default" => [Some(0), Some(1), Some(0), Some(0)],
            "escolaridade" => [Some("mestrado"), None, Some("doutorado"), Some("graduacao")],
            "salario_anual" => [Some("$60K - $80K"), Some("menos que $40K"), None, Some("$120K +")],
        ]
        .unwrap();

        let (df, actions) = DataCleaner::default().drop_missing_rows(df).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        assert!(actions[0].contains("Removed 2 rows"));
    }

    #[test]
    fn test_drop_missing_rows_noop() {
        let df = df!["default" => [0, 1, 0]].unwrap();

        let (df, actions) = DataCleaner::default().drop_missing_rows(df).unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(actions, vec!["No rows with missing values found".to_string()]);
    }
}
