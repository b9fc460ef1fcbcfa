//! Table loading from local files and remote URLs.
//!
//! The loader maps a single configured null marker (`na` for the credit
//! dataset) to the frame's missing value, so downstream code only ever sees
//! one representation of "missing".
//!
//! # Example
//!
//! ```rust,ignore
//! use credit_eda::loader::{DataSource, LoadOptions, TableLoader};
//!
//! let loader = TableLoader::new(LoadOptions::default());
//! let df = loader.load(&DataSource::parse("data/credito.csv"))?;
//! ```

use crate::error::{AnalysisError, Result, ResultExt};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use std::fmt;
use std::io::Cursor;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where the table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    /// Interpret a CLI or config string as a source.
    ///
    /// `http://` and `https://` prefixes select a URL; anything else is a path.
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::Path(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// CSV parsing options for the loader.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Cell text read as a missing value.
    pub null_marker: String,
    pub has_header: bool,
    pub separator: u8,
    /// Rows scanned to infer column types; `None` scans the whole file.
    pub infer_schema_length: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            null_marker: "na".to_string(),
            has_header: true,
            separator: b',',
            infer_schema_length: Some(1000),
        }
    }
}

/// Loads delimited text into a [`DataFrame`].
pub struct TableLoader {
    options: LoadOptions,
}

impl TableLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Load a table from a local path or URL.
    pub fn load(&self, source: &DataSource) -> Result<DataFrame> {
        info!("Loading table from: {}", source);

        let df = match source {
            DataSource::Path(path) => self.load_path(path)?,
            DataSource::Url(url) => {
                let bytes = fetch_remote(url)?;
                self.load_bytes(bytes)?
            }
        };

        info!("Table loaded: {} rows x {} columns", df.height(), df.width());
        Ok(df)
    }

    /// Parse CSV text that is already in memory.
    pub fn load_bytes(&self, bytes: impl Into<Vec<u8>>) -> Result<DataFrame> {
        let cursor = Cursor::new(bytes.into());
        let df = self
            .read_options()
            .into_reader_with_file_handle(cursor)
            .finish()
            .context("Parsing CSV text")?;
        Ok(df)
    }

    fn load_path(&self, path: &std::path::Path) -> Result<DataFrame> {
        if !path.exists() {
            return Err(AnalysisError::Load(format!(
                "Input file not found: {}",
                path.display()
            )));
        }

        let df = self
            .read_options()
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish())
            .context(format!("Reading CSV file {}", path.display()))?;
        Ok(df)
    }

    fn read_options(&self) -> CsvReadOptions {
        debug!(
            "CSV options: separator={:?}, null marker={:?}",
            self.options.separator as char, self.options.null_marker
        );

        let parse_options = CsvParseOptions::default()
            .with_separator(self.options.separator)
            .with_quote_char(Some(b'"'))
            .with_null_values(Some(NullValues::AllColumnsSingle(
                self.options.null_marker.as_str().into(),
            )));

        CsvReadOptions::default()
            .with_has_header(self.options.has_header)
            .with_infer_schema_length(self.options.infer_schema_length)
            .with_parse_options(parse_options)
    }
}

#[cfg(feature = "remote")]
fn fetch_remote(url: &str) -> Result<Vec<u8>> {
    debug!("Fetching {}", url);
    let response = reqwest::blocking::get(url)?;
    let status = response.status();
    if !status.is_success() {
        return Err(AnalysisError::Load(format!(
            "GET {} returned status {}",
            url, status
        )));
    }
    Ok(response.bytes()?.to_vec())
}

#[cfg(not(feature = "remote"))]
fn fetch_remote(url: &str) -> Result<Vec<u8>> {
    Err(AnalysisError::RemoteDisabled(url.to_string()))
}
