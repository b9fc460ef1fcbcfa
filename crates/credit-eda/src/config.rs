//! Configuration types for the credit dataset analysis.
//!
//! This module provides configuration options using the builder pattern.
//! Defaults describe the public bank-card customer dataset: a `default`
//! class column with `0`/`1` sentinels, `na` as missing marker and two
//! money columns written with pt-BR number formatting.

use crate::types::ClassValue;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Public CSV of bank-card customers used when no source is given.
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/andre-marcos-perez/ebac-course-utils/develop/dataset/credito.csv";

/// Separators used by locale-formatted numeric strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    /// Digit grouping character, removed before parsing.
    pub thousands_separator: char,
    /// Character separating the fractional part.
    pub decimal_separator: char,
}

impl Default for NumberFormat {
    /// pt-BR formatting: `12.691,51`.
    fn default() -> Self {
        Self {
            thousands_separator: '.',
            decimal_separator: ',',
        }
    }
}

/// Configuration for an analysis session.
///
/// Use [`AnalysisConfig::builder()`] to create a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use credit_eda::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .class_column("default")
///     .drop_missing_rows(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Name of the binary class column.
    /// Default: "default"
    pub class_column: String,

    /// Sentinel marking compliant (current) accounts.
    /// Default: 0
    pub compliant_value: ClassValue,

    /// Sentinel marking delinquent (defaulted) accounts.
    /// Default: 1
    pub delinquent_value: ClassValue,

    /// Text that the loader maps to a missing value.
    /// Default: "na"
    pub null_marker: String,

    /// Columns holding locale-formatted numbers to parse into floats.
    /// Default: ["valor_transacoes_12m", "limite_credito"]
    pub numeric_columns: Vec<String>,

    /// Separators used by `numeric_columns`.
    pub number_format: NumberFormat,

    /// Whether the cleaning step drops rows with any missing value.
    /// Default: true
    pub drop_missing_rows: bool,

    /// Columns summarized as per-class frequency tables.
    /// Default: ["escolaridade", "salario_anual"]
    pub frequency_columns: Vec<String>,

    /// Numeric columns summarized as per-class histograms.
    /// Default: ["qtd_transacoes_12m", "valor_transacoes_12m"]
    pub histogram_columns: Vec<String>,

    /// Bins per histogram; `None` picks a count from the data (Sturges' rule).
    /// Default: None
    pub histogram_bins: Option<usize>,

    /// `(x, y)` columns of the per-class scatter relation, if any.
    /// Default: ("valor_transacoes_12m", "qtd_transacoes_12m")
    pub scatter_columns: Option<(String, String)>,

    /// Output directory for written reports.
    /// Default: "output"
    pub output_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            class_column: "default".to_string(),
            compliant_value: ClassValue::Int(0),
            delinquent_value: ClassValue::Int(1),
            null_marker: "na".to_string(),
            numeric_columns: vec![
                "valor_transacoes_12m".to_string(),
                "limite_credito".to_string(),
            ],
            number_format: NumberFormat::default(),
            drop_missing_rows: true,
            frequency_columns: vec!["escolaridade".to_string(), "salario_anual".to_string()],
            histogram_columns: vec![
                "qtd_transacoes_12m".to_string(),
                "valor_transacoes_12m".to_string(),
            ],
            histogram_bins: None,
            scatter_columns: Some((
                "valor_transacoes_12m".to_string(),
                "qtd_transacoes_12m".to_string(),
            )),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.class_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyClassColumn);
        }

        if self.compliant_value == self.delinquent_value {
            return Err(ConfigValidationError::IdenticalClassValues(
                self.compliant_value.to_string(),
            ));
        }

        if self.null_marker.is_empty() {
            return Err(ConfigValidationError::EmptyNullMarker);
        }

        if self.number_format.thousands_separator == self.number_format.decimal_separator {
            return Err(ConfigValidationError::IdenticalSeparators(
                self.number_format.decimal_separator,
            ));
        }

        if self.histogram_bins == Some(0) {
            return Err(ConfigValidationError::ZeroHistogramBins);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Class column name must not be empty")]
    EmptyClassColumn,

    #[error("Compliant and delinquent sentinels are both '{0}'")]
    IdenticalClassValues(String),

    #[error("Null marker must not be empty")]
    EmptyNullMarker,

    #[error("Thousands and decimal separators are both '{0}'")]
    IdenticalSeparators(char),

    #[error("Histogram bin count must be at least 1")]
    ZeroHistogramBins,
}

impl From<ConfigValidationError> for crate::error::AnalysisError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::AnalysisError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    class_column: Option<String>,
    compliant_value: Option<ClassValue>,
    delinquent_value: Option<ClassValue>,
    null_marker: Option<String>,
    numeric_columns: Option<Vec<String>>,
    number_format: Option<NumberFormat>,
    drop_missing_rows: Option<bool>,
    frequency_columns: Option<Vec<String>>,
    histogram_columns: Option<Vec<String>>,
    histogram_bins: Option<usize>,
    scatter_columns: Option<Option<(String, String)>>,
    output_dir: Option<PathBuf>,
}

impl AnalysisConfigBuilder {
    /// Set the name of the class column.
    pub fn class_column(mut self, column: impl Into<String>) -> Self {
        self.class_column = Some(column.into());
        self
    }

    /// Set the sentinels for compliant and delinquent rows.
    pub fn class_values(
        mut self,
        compliant: impl Into<ClassValue>,
        delinquent: impl Into<ClassValue>,
    ) -> Self {
        self.compliant_value = Some(compliant.into());
        self.delinquent_value = Some(delinquent.into());
        self
    }

    /// Set the text the loader treats as missing.
    pub fn null_marker(mut self, marker: impl Into<String>) -> Self {
        self.null_marker = Some(marker.into());
        self
    }

    /// Set the columns holding locale-formatted numbers.
    pub fn numeric_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the separators used by the locale-formatted columns.
    pub fn number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = Some(format);
        self
    }

    /// Enable or disable dropping rows that contain missing values.
    pub fn drop_missing_rows(mut self, drop: bool) -> Self {
        self.drop_missing_rows = Some(drop);
        self
    }

    /// Set the columns summarized as per-class frequency tables.
    pub fn frequency_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.frequency_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the numeric columns summarized as per-class histograms.
    pub fn histogram_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.histogram_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Use a fixed number of histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the `(x, y)` columns of the scatter relation.
    pub fn scatter_columns(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.scatter_columns = Some(Some((x.into(), y.into())));
        self
    }

    /// Skip the scatter relation.
    pub fn without_scatter(mut self) -> Self {
        self.scatter_columns = Some(None);
        self
    }

    /// Set the output directory for reports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Unset fields take the values of [`AnalysisConfig::default()`].
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            class_column: self.class_column.unwrap_or(defaults.class_column),
            compliant_value: self.compliant_value.unwrap_or(defaults.compliant_value),
            delinquent_value: self.delinquent_value.unwrap_or(defaults.delinquent_value),
            null_marker: self.null_marker.unwrap_or(defaults.null_marker),
            numeric_columns: self.numeric_columns.unwrap_or(defaults.numeric_columns),
            number_format: self.number_format.unwrap_or(defaults.number_format),
            drop_missing_rows: self.drop_missing_rows.unwrap_or(defaults.drop_missing_rows),
            frequency_columns: self.frequency_columns.unwrap_or(defaults.frequency_columns),
            histogram_columns: self.histogram_columns.unwrap_or(defaults.histogram_columns),
            histogram_bins: self.histogram_bins.or(defaults.histogram_bins),
            scatter_columns: self.scatter_columns.unwrap_or(defaults.scatter_columns),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
        };

        config.validate()?;
        Ok(config)
    }
}
