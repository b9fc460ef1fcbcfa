//! Report generation module.
//!
//! [`AnalysisReport`] gathers the outputs of one session so they can be:
//! - printed as JSON to stdout (`--json` CLI flag)
//! - written to a JSON file (`--emit-report` CLI flag)
//! - consumed programmatically in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use credit_eda::reporting::ReportWriter;
//!
//! let report = pipeline.run(df)?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let writer = ReportWriter::new(PathBuf::from("output"));
//! writer.write_report_to_file(&report, "credito")?;
//! ```

mod generator;

pub use generator::{AnalysisReport, ProportionSummary, ReportWriter};
