use crate::error::{AnalysisError, Result};
use crate::types::{ClassProportionSnapshot, ClassValue, MissingReportEntry};
use crate::utils::{class_mask, count_true, has_column, percentage_of};
use polars::prelude::*;
use tracing::debug;

pub struct MissingDataAuditor;

impl MissingDataAuditor {
    /// Report missing values per column, in column order.
    ///
    /// Columns without missing values are omitted, so an empty report means
    /// the table has no missing values at all.
    pub fn audit_missing_data(df: &DataFrame) -> Result<Vec<MissingReportEntry>> {
        if df.width() == 0 {
            return Err(AnalysisError::EmptyTable);
        }

        let total_rows = df.height();
        let mut report = Vec::new();

        for col in df.get_columns() {
            let missing_count = col.null_count();
            if missing_count == 0 {
                continue;
            }

            // missing_count > 0 implies total_rows > 0
            let entry = MissingReportEntry {
                column_name: col.name().to_string(),
                missing_count,
                missing_percentage: percentage_of(missing_count, total_rows),
            };
            debug!(
                "Column '{}' has {} missing values ({:.2}%)",
                entry.column_name, entry.missing_count, entry.missing_percentage
            );
            report.push(entry);
        }

        Ok(report)
    }

    /// Count rows per customer class.
    ///
    /// The column is checked before the row count, so a missing column is
    /// reported even on an empty table.
    pub fn compute_class_proportions(
        df: &DataFrame,
        class_column: &str,
        compliant_value: &ClassValue,
        delinquent_value: &ClassValue,
    ) -> Result<ClassProportionSnapshot> {
        if !has_column(df, class_column) {
            return Err(AnalysisError::ColumnNotFound(class_column.to_string()));
        }

        let total_rows = df.height();
        if total_rows == 0 {
            return Err(AnalysisError::ZeroRowTable);
        }

        let series = df.column(class_column)?.as_materialized_series();
        let compliant_count = count_true(&class_mask(series, compliant_value)?);
        let delinquent_count = count_true(&class_mask(series, delinquent_value)?);

        debug!(
            "Class proportions on '{}': {} rows, {} compliant, {} delinquent",
            class_column, total_rows, compliant_count, delinquent_count
        );

        Ok(ClassProportionSnapshot {
            total_rows,
            compliant_count,
            delinquent_count,
        })
    }
}
