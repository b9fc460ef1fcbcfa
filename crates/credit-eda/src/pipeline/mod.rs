//! Pipeline module.
//!
//! This module provides the analysis session runner.

mod executor;

pub use executor::AnalysisPipeline;
