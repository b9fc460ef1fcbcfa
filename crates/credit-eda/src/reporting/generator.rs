use crate::error::Result;
use crate::types::{
    ClassProportionSnapshot, ClassScatter, MissingReportEntry, ProportionComparison,
    SegmentedFrequencies, SegmentedHistogram,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

// ============================================================================
// Report Types
// ============================================================================

/// Everything one analysis session produced.
///
/// Serialized as-is for `--json` output and `--emit-report` files; the
/// human-readable summary is rendered from the same struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path or URL the table was loaded from
    pub source: String,

    // Shapes
    /// (rows, columns) before cleaning
    pub shape_before: (usize, usize),
    /// (rows, columns) after cleaning
    pub shape_after: (usize, usize),

    // Missing data
    /// Per-column missing values on the loaded table
    pub missing_before: Vec<MissingReportEntry>,
    /// Per-column missing values after cleaning
    pub missing_after: Vec<MissingReportEntry>,

    // Class proportions
    pub class_column: String,
    pub proportions: ProportionComparison,

    /// Actions performed by the cleaning step
    pub cleaning_actions: Vec<String>,

    /// Per-class frequency tables on the cleaned table
    pub frequencies: Vec<SegmentedFrequencies>,
    /// Per-class histograms of numeric columns on the cleaned table
    pub histograms: Vec<SegmentedHistogram>,
    /// Per-class value pairs of two numeric columns
    pub scatter: Option<ClassScatter>,
}

/// Percentages of one snapshot, for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProportionSummary {
    pub total_rows: usize,
    pub compliant_percentage: f64,
    pub delinquent_percentage: f64,
}

impl From<&ClassProportionSnapshot> for ProportionSummary {
    fn from(snapshot: &ClassProportionSnapshot) -> Self {
        Self {
            total_rows: snapshot.total_rows,
            compliant_percentage: snapshot.compliant_percentage(),
            delinquent_percentage: snapshot.delinquent_percentage(),
        }
    }
}

impl AnalysisReport {
    /// Timestamp format used in `generated_at`.
    pub fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn proportions_before(&self) -> ProportionSummary {
        ProportionSummary::from(&self.proportions.before)
    }

    pub fn proportions_after(&self) -> ProportionSummary {
        ProportionSummary::from(&self.proportions.after)
    }
}

// ============================================================================
// Report Writer
// ============================================================================

/// Writes reports under an output directory.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Write `<output_dir>/<report_base_name>_report.json`.
    ///
    /// Creates the output directory if needed and returns the written path.
    pub fn write_report_to_file(
        &self,
        report: &AnalysisReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
