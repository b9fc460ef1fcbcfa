//! CLI entry point for the credit dataset audit.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use credit_eda::{
    AnalysisConfig, AnalysisPipeline, AnalysisReport, ClassValue, DEFAULT_DATASET_URL,
    DataSource, ReportWriter, SegmentedFrequencies, SegmentedHistogram,
};
use dotenv::dotenv;
use std::env;
use std::path::Path;
use tracing::{error, info};

/// Environment variable consulted when `--input` is not given.
const SOURCE_ENV_VAR: &str = "CREDIT_EDA_SOURCE";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Missing-data and class-proportion audit for bank-card default datasets",
    long_about = "Loads a CSV of bank-card customers, audits missing values, parses \
                  locale-formatted money columns, drops incomplete rows and compares \
                  compliant/delinquent proportions before and after cleaning.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  CREDIT_EDA_SOURCE    Default path or URL when --input is omitted\n\n\
                  EXAMPLES:\n  \
                  # Audit the public dataset\n  \
                  credit-eda\n\n  \
                  # Audit a local copy and save a JSON report\n  \
                  credit-eda -i data/credito.csv -o results/ --emit-report\n\n  \
                  # Machine-readable output\n  \
                  credit-eda -i data/credito.csv --json"
)]
struct Args {
    /// Path or http(s) URL of the CSV file
    #[arg(short, long)]
    input: Option<String>,

    /// Output directory for written reports [default: output]
    #[arg(short, long)]
    output: Option<String>,

    /// Name of the class column
    #[arg(long, default_value = "default")]
    class_column: String,

    /// Class value marking compliant (current) accounts
    #[arg(long, default_value = "0")]
    compliant_value: String,

    /// Class value marking delinquent (defaulted) accounts
    #[arg(long, default_value = "1")]
    delinquent_value: String,

    /// Cell text treated as a missing value
    #[arg(long, default_value = "na")]
    null_marker: String,

    /// Columns holding locale-formatted numbers (comma separated)
    #[arg(long, value_delimiter = ',')]
    numeric_columns: Option<Vec<String>>,

    /// Columns summarized per class (comma separated)
    #[arg(long, value_delimiter = ',')]
    frequency_columns: Option<Vec<String>>,

    /// Numeric columns summarized as per-class histograms (comma separated)
    #[arg(long, value_delimiter = ',')]
    histogram_columns: Option<Vec<String>>,

    /// Fixed number of histogram bins (default: Sturges' rule)
    #[arg(long)]
    histogram_bins: Option<usize>,

    /// X and Y columns of the per-class scatter relation, as `x,y`
    #[arg(long, value_delimiter = ',', conflicts_with = "no_scatter")]
    scatter_columns: Option<Vec<String>>,

    /// Skip the scatter relation
    #[arg(long)]
    no_scatter: bool,

    /// Keep rows with missing values instead of dropping them
    #[arg(long)]
    keep_missing_rows: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the summary)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is not initialized so stdout only
/// carries the JSON report.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    // Load environment variables from .env file
    dotenv().ok();

    let source = DataSource::parse(&resolve_source(args.input.as_deref()));
    let config = build_config(&args)?;
    let pipeline = AnalysisPipeline::new(config);

    let report = match pipeline.load_and_run(&source) {
        Ok(report) => report,
        Err(e) => {
            error!("Analysis failed [{}]: {}", e.error_code(), e);
            return Err(anyhow!("Analysis failed: {}", e));
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let stem = extract_file_stem(&report.source);
        let writer = ReportWriter::new(pipeline.config().output_dir.clone());
        let path = writer.write_report_to_file(&report, &stem)?;
        info!("Report written to: {}", path.display());
    }

    print_human_readable_summary(&report);

    Ok(())
}

/// Pick the source: CLI flag, then environment, then the public dataset.
fn resolve_source(cli_input: Option<&str>) -> String {
    if let Some(input) = cli_input {
        return input.to_string();
    }
    env::var(SOURCE_ENV_VAR).unwrap_or_else(|_| DEFAULT_DATASET_URL.to_string())
}

fn build_config(args: &Args) -> Result<AnalysisConfig> {
    let mut builder = AnalysisConfig::builder()
        .class_column(&args.class_column)
        .class_values(
            parse_class_value(&args.compliant_value),
            parse_class_value(&args.delinquent_value),
        )
        .null_marker(&args.null_marker)
        .drop_missing_rows(!args.keep_missing_rows);

    if let Some(ref output) = args.output {
        builder = builder.output_dir(output);
    }

    if let Some(ref columns) = args.numeric_columns {
        builder = builder.numeric_columns(columns.iter().cloned());
    }

    if let Some(ref columns) = args.frequency_columns {
        builder = builder.frequency_columns(columns.iter().cloned());
    }

    if let Some(ref columns) = args.histogram_columns {
        builder = builder.histogram_columns(columns.iter().cloned());
    }

    if let Some(bins) = args.histogram_bins {
        builder = builder.histogram_bins(bins);
    }

    if args.no_scatter {
        builder = builder.without_scatter();
    } else if let Some(ref columns) = args.scatter_columns {
        match columns.as_slice() {
            [x, y] => builder = builder.scatter_columns(x, y),
            _ => bail!(
                "--scatter-columns takes exactly two columns, got {}",
                columns.len()
            ),
        }
    }

    Ok(builder.build()?)
}

/// Integers become integer sentinels; anything else is compared as text.
fn parse_class_value(raw: &str) -> ClassValue {
    match raw.trim().parse::<i64>() {
        Ok(v) => ClassValue::Int(v),
        Err(_) => ClassValue::Text(raw.to_string()),
    }
}

/// Extract the file stem (name without extension) from a path or URL.
fn extract_file_stem(source: &str) -> String {
    let last_segment = source.rsplit('/').next().unwrap_or(source);
    Path::new(last_segment)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("analysis")
        .to_string()
}

/// Print a human-readable summary of the session.
///
/// Uses `println!` on purpose: this is the command's output, not a log.
fn print_human_readable_summary(report: &AnalysisReport) {
    println!();
    println!("{}", "=".repeat(80));
    println!("CREDIT DATASET AUDIT");
    println!("{}", "=".repeat(80));
    println!();

    println!("Source: {}", report.source);
    println!(
        "Rows x columns: {} x {} -> {} x {}",
        report.shape_before.0, report.shape_before.1, report.shape_after.0, report.shape_after.1
    );
    println!();

    println!("MISSING DATA");
    println!("{}", "-".repeat(40));
    if report.missing_before.is_empty() {
        println!("  No missing values");
    } else {
        println!("  {:<28} {:>10} {:>10}", "Column", "Missing", "%");
        for entry in &report.missing_before {
            println!(
                "  {:<28} {:>10} {:>10.2}",
                entry.column_name, entry.missing_count, entry.missing_percentage
            );
        }
    }
    println!();

    if !report.cleaning_actions.is_empty() {
        println!("CLEANING");
        println!("{}", "-".repeat(40));
        for action in &report.cleaning_actions {
            println!("  - {}", action);
        }
        println!();
    }

    let before = report.proportions_before();
    let after = report.proportions_after();
    println!("CLASS PROPORTIONS ('{}')", report.class_column);
    println!("{}", "-".repeat(40));
    println!(
        "  Compliant:  {:>6.2}% -> {:>6.2}% ({:+.2} pp)",
        before.compliant_percentage,
        after.compliant_percentage,
        report.proportions.compliant_drift()
    );
    println!(
        "  Delinquent: {:>6.2}% -> {:>6.2}% ({:+.2} pp)",
        before.delinquent_percentage,
        after.delinquent_percentage,
        report.proportions.delinquent_drift()
    );
    println!("  Rows removed by cleaning: {}", report.proportions.rows_removed());
    println!();

    for frequencies in &report.frequencies {
        print_frequencies(frequencies);
    }

    for histogram in &report.histograms {
        print_histogram(histogram);
    }

    if let Some(ref scatter) = report.scatter {
        println!("SCATTER: {} vs {}", scatter.x_column, scatter.y_column);
        println!("{}", "-".repeat(40));
        println!(
            "  {} compliant points, {} delinquent points, {} unclassified",
            scatter.compliant.len(),
            scatter.delinquent.len(),
            scatter.unclassified
        );
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save a JSON report");
    println!("{}", "=".repeat(80));
}

fn print_frequencies(frequencies: &SegmentedFrequencies) {
    println!("FREQUENCIES: {}", frequencies.column);
    println!("{}", "-".repeat(40));
    println!(
        "  {:<28} {:>10} {:>10} {:>10}",
        "Value", "All", "Compliant", "Delinquent"
    );

    let count_in = |entries: &[credit_eda::FrequencyEntry], value: &str| {
        entries
            .iter()
            .find(|e| e.value == value)
            .map(|e| e.count)
            .unwrap_or(0)
    };

    for entry in &frequencies.all {
        println!(
            "  {:<28} {:>10} {:>10} {:>10}",
            truncate_str(&entry.value, 27),
            entry.count,
            count_in(&frequencies.compliant, &entry.value),
            count_in(&frequencies.delinquent, &entry.value)
        );
    }
    println!("  (shared axis limit: {})", frequencies.max_count());
    println!();
}

fn print_histogram(histogram: &SegmentedHistogram) {
    println!("HISTOGRAM: {}", histogram.column);
    println!("{}", "-".repeat(40));
    println!(
        "  {:<28} {:>10} {:>10} {:>10}",
        "Bin", "All", "Compliant", "Delinquent"
    );

    for (i, bounds) in histogram.edges.windows(2).enumerate() {
        let label = format!("{:.2} - {:.2}", bounds[0], bounds[1]);
        println!(
            "  {:<28} {:>10} {:>10} {:>10}",
            truncate_str(&label, 27),
            histogram.all[i],
            histogram.compliant[i],
            histogram.delinquent[i]
        );
    }
    println!("  (shared axis limit: {})", histogram.max_count());
    println!();
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn test_output_dir_defaults_to_config() {
        let config = build_config(&parse(&["credit-eda"])).unwrap();

        assert_eq!(config.output_dir, AnalysisConfig::default().output_dir);
        assert_eq!(config.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn test_output_flag_reaches_config() {
        let config = build_config(&parse(&["credit-eda", "-o", "results"])).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("results"));
    }

    #[test]
    fn test_scatter_flags() {
        let config = build_config(&parse(&[
            "credit-eda",
            "--scatter-columns",
            "limite_credito,valor_transacoes_12m",
        ]))
        .unwrap();
        assert_eq!(
            config.scatter_columns,
            Some((
                "limite_credito".to_string(),
                "valor_transacoes_12m".to_string()
            ))
        );

        let config = build_config(&parse(&["credit-eda", "--no-scatter"])).unwrap();
        assert!(config.scatter_columns.is_none());

        assert!(build_config(&parse(&["credit-eda", "--scatter-columns", "a"])).is_err());
    }

    #[test]
    fn test_parse_class_value() {
        assert_eq!(parse_class_value("1"), ClassValue::Int(1));
        assert_eq!(parse_class_value("sim"), ClassValue::Text("sim".to_string()));
    }

    #[test]
    fn test_extract_file_stem() {
        assert_eq!(extract_file_stem("data/credito.csv"), "credito");
        assert_eq!(
            extract_file_stem("https://example.com/dataset/credito.csv"),
            "credito"
        );
    }
}
