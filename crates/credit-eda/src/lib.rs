//! Credit Dataset Audit Library
//!
//! Exploratory analysis of bank-card customers split into compliant
//! (current) and delinquent (defaulted) accounts, built with Rust and Polars.
//!
//! # Overview
//!
//! - **Missing-Data Audit**: per-column missing counts and percentages
//! - **Class Proportions**: compliant / delinquent shares, before and after cleaning
//! - **Cleaning**: locale-formatted number parsing and missing-row removal
//! - **Segmentation**: per-class frequency tables, histograms and a scatter
//!   relation for side-by-side charts
//! - **Reporting**: a serializable report of the whole session
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use credit_eda::{AnalysisConfig, AnalysisPipeline, MissingDataAuditor, ClassValue};
//! use credit_eda::loader::DataSource;
//!
//! // Full session: load, audit, clean, re-audit
//! let pipeline = AnalysisPipeline::new(AnalysisConfig::default());
//! let report = pipeline.load_and_run(&DataSource::parse("data/credito.csv"))?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! // Or call the auditor directly on any frame
//! let missing = MissingDataAuditor::audit_missing_data(&df)?;
//! let snapshot = MissingDataAuditor::compute_class_proportions(
//!     &df,
//!     "default",
//!     &ClassValue::Int(0),
//!     &ClassValue::Int(1),
//! )?;
//! println!("{:.2}% delinquent", snapshot.delinquent_percentage());
//! ```

pub mod audit;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod reporting;
pub mod segments;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use audit::MissingDataAuditor;
pub use cleaner::{DataCleaner, parse_locale_number};
pub use config::{
    AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError, DEFAULT_DATASET_URL,
    NumberFormat,
};
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use loader::{DataSource, LoadOptions, TableLoader};
pub use pipeline::AnalysisPipeline;
pub use reporting::{AnalysisReport, ProportionSummary, ReportWriter};
pub use segments::{ClassSegments, bin_edges, frequency_table, sturges_bins};
pub use types::{
    ClassProportionSnapshot, ClassScatter, ClassValue, FrequencyEntry, MissingReportEntry,
    ProportionComparison, ScatterPoint, SegmentedFrequencies, SegmentedHistogram,
};
