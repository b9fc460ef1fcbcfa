//! Analysis executor module.
//!
//! Runs one analysis session end to end: audit, clean, audit again, compare
//! and summarize.

use crate::audit::MissingDataAuditor;
use crate::cleaner::DataCleaner;
use crate::config::AnalysisConfig;
use crate::error::{Result, ResultExt};
use crate::loader::{DataSource, LoadOptions, TableLoader};
use crate::reporting::AnalysisReport;
use crate::segments::ClassSegments;
use crate::types::{
    ClassScatter, ProportionComparison, SegmentedFrequencies, SegmentedHistogram,
};
use polars::prelude::*;
use tracing::{debug, info};

/// Runs the audit / clean / re-audit sequence over a table.
pub struct AnalysisPipeline {
    config: AnalysisConfig,
}

impl AnalysisPipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Load the table from `source` with the configured null marker, then run.
    pub fn load_and_run(&self, source: &DataSource) -> Result<AnalysisReport> {
        let loader = TableLoader::new(LoadOptions {
            null_marker: self.config.null_marker.clone(),
            ..LoadOptions::default()
        });
        let df = loader.load(source).context("Loading table")?;
        self.run(&source.to_string(), df)
    }

    /// Run the session over an already loaded table.
    ///
    /// Both proportion snapshots are taken here, around the cleaning step,
    /// so the comparison never depends on state from an earlier run.
    pub fn run(&self, source: &str, df: DataFrame) -> Result<AnalysisReport> {
        let config = &self.config;
        let shape_before = df.shape();

        info!("Step 1: Auditing missing data...");
        let missing_before = MissingDataAuditor::audit_missing_data(&df)?;
        info!("{} columns have missing values", missing_before.len());

        info!("Step 2: Computing class proportions before cleaning...");
        let before = MissingDataAuditor::compute_class_proportions(
            &df,
            &config.class_column,
            &config.compliant_value,
            &config.delinquent_value,
        )
        .context("Before cleaning")?;

        info!("Step 3: Cleaning...");
        let cleaner = DataCleaner::new(config.number_format);
        let (df, mut cleaning_actions) = cleaner
            .parse_locale_numeric_columns(df, &config.numeric_columns)
            .context("Parsing numeric columns")?;

        let df = if config.drop_missing_rows {
            let (df, actions) = cleaner.drop_missing_rows(df)?;
            cleaning_actions.extend(actions);
            df
        } else {
            debug!("Keeping rows with missing values");
            df
        };
        let shape_after = df.shape();

        info!("Step 4: Computing class proportions after cleaning...");
        let missing_after = MissingDataAuditor::audit_missing_data(&df)?;
        let after = MissingDataAuditor::compute_class_proportions(
            &df,
            &config.class_column,
            &config.compliant_value,
            &config.delinquent_value,
        )
        .context("After cleaning")?;
        let proportions = ProportionComparison::new(before, after);
        info!(
            "Compliant share {:.2}% -> {:.2}%, delinquent share {:.2}% -> {:.2}%",
            before.compliant_percentage(),
            after.compliant_percentage(),
            before.delinquent_percentage(),
            after.delinquent_percentage()
        );

        info!("Step 5: Summarizing frequencies per class...");
        let segments = ClassSegments::split(
            &df,
            &config.class_column,
            &config.compliant_value,
            &config.delinquent_value,
        )?;
        let frequencies = config
            .frequency_columns
            .iter()
            .map(|column| SegmentedFrequencies::compute(&segments, column))
            .collect::<Result<Vec<_>>>()?;

        info!("Step 6: Binning numeric columns per class...");
        let histograms = config
            .histogram_columns
            .iter()
            .map(|column| {
                SegmentedHistogram::compute(&segments, column, config.histogram_bins)
                    .context(format!("Histogram of '{}'", column))
            })
            .collect::<Result<Vec<_>>>()?;

        let scatter = match &config.scatter_columns {
            Some((x, y)) => {
                let scatter = ClassScatter::compute(&segments, x, y)?;
                debug!("Scatter of '{}' vs '{}': {} points", x, y, scatter.point_count());
                Some(scatter)
            }
            None => None,
        };

        Ok(AnalysisReport {
            generated_at: AnalysisReport::timestamp(),
            source: source.to_string(),
            shape_before,
            shape_after,
            missing_before,
            missing_after,
            class_column: config.class_column.clone(),
            proportions,
            cleaning_actions,
            frequencies,
            histograms,
            scatter,
        })
    }
}

static_assertions::assert_impl_all!(AnalysisPipeline: Send, Sync);
static_assertions::assert_impl_all!(AnalysisReport: Send, Sync);
