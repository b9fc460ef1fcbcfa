//! Error types for the credit dataset analysis.
//!
//! This module provides a single error hierarchy using `thiserror`. The first
//! three variants are the auditor's precondition failures; the rest cover the
//! loader, the cleaning step and the wrapped library errors.
//!
//! Errors are serializable as `{code, message}` so a report consumer can
//! display them without matching on the enum.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The table has no columns to audit.
    #[error("Table has no columns")]
    EmptyTable,

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// Proportions were requested against a table with zero rows.
    #[error("Table has zero rows; proportions are undefined")]
    ZeroRowTable,

    /// A locale-formatted numeric string could not be parsed.
    #[error("Failed to parse '{value}' in column '{column}' as a number")]
    NumericParseFailed { column: String, value: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The loader could not produce a table.
    #[error("Failed to load table: {0}")]
    Load(String),

    /// A URL source was given but remote loading is not compiled in.
    #[error("Remote loading is disabled; cannot fetch '{0}'")]
    RemoteDisabled(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error (only with the "remote" feature).
    #[cfg(feature = "remote")]
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for report consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyTable => "EMPTY_TABLE",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::ZeroRowTable => "ZERO_ROW_TABLE",
            Self::NumericParseFailed { .. } => "NUMERIC_PARSE_FAILED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Load(_) => "LOAD_FAILED",
            Self::RemoteDisabled(_) => "REMOTE_DISABLED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            #[cfg(feature = "remote")]
            Self::HttpRequest(_) => "HTTP_REQUEST_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is one of the auditor's local precondition failures.
    ///
    /// These are detected before any computation starts, so no partial
    /// result exists when one of them is returned.
    pub fn is_precondition(&self) -> bool {
        match self {
            Self::EmptyTable | Self::ColumnNotFound(_) | Self::ZeroRowTable => true,
            Self::WithContext { source, .. } => source.is_precondition(),
            _ => false,
        }
    }
}

impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(AnalysisError::EmptyTable.error_code(), "EMPTY_TABLE");
        assert_eq!(AnalysisError::ZeroRowTable.error_code(), "ZERO_ROW_TABLE");
        assert_eq!(
            AnalysisError::ColumnNotFound("default".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_is_precondition() {
        assert!(AnalysisError::EmptyTable.is_precondition());
        assert!(AnalysisError::ZeroRowTable.is_precondition());
        assert!(AnalysisError::ColumnNotFound("x".to_string()).is_precondition());
        assert!(!AnalysisError::Load("unreachable".to_string()).is_precondition());
    }

    #[test]
    fn test_polars_result_context() {
        let result: polars::prelude::PolarsResult<()> = Err(
            polars::error::PolarsError::ColumnNotFound("limite_credito".into()),
        );

        let err = result.context("Casting column").unwrap_err();

        assert_eq!(err.error_code(), "POLARS_ERROR");
        assert!(err.to_string().contains("Casting column"));
        assert!(matches!(
            err,
            AnalysisError::WithContext { ref source, .. } if matches!(**source, AnalysisError::Polars(_))
        ));
    }

    #[test]
    fn test_error_serialization() {
        let error = AnalysisError::ColumnNotFound("default".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("default"));
    }

    #[test]
    fn test_with_context() {
        let error = AnalysisError::ZeroRowTable.with_context("After cleaning");
        assert!(error.to_string().contains("After cleaning"));
        assert_eq!(error.error_code(), "ZERO_ROW_TABLE");
        assert!(error.is_precondition());
    }

    #[test]
    fn test_numeric_parse_message() {
        let error = AnalysisError::NumericParseFailed {
            column: "limite_credito".to_string(),
            value: "abc".to_string(),
        };
        assert!(error.to_string().contains("limite_credito"));
        assert!(error.to_string().contains("'abc'"));
    }
}
