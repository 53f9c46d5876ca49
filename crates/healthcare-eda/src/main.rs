//! CLI entry point for the healthcare EDA pipeline.

use anyhow::{Result, anyhow};
use clap::Parser;
use healthcare_eda::config::{DEFAULT_CHARTS_DIR, DEFAULT_INPUT, DEFAULT_OUTPUT};
use healthcare_eda::reporting::console;
use healthcare_eda::{EdaConfig, EdaResult, Pipeline, ReportGenerator};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory data analysis of healthcare encounter data",
    long_about = "Loads a healthcare CSV, removes duplicates, fills missing values, \
                  derives stay duration, age buckets, admission calendar fields and \
                  hospital billing tiers, prints summaries, renders charts and writes \
                  the cleaned table.\n\n\
                  EXAMPLES:\n  \
                  # Defaults: healthcare_dataset.csv -> cleaned_healthcare_data.csv\n  \
                  healthcare-eda\n\n  \
                  # Custom paths, no charts\n  \
                  healthcare-eda -i data.csv -o out/clean.csv --no-charts\n\n  \
                  # Machine-readable output\n  \
                  healthcare-eda --json | jq .aggregations"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Path of the cleaned CSV to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Directory for the rendered SVG charts
    #[arg(long, default_value = DEFAULT_CHARTS_DIR)]
    charts_dir: PathBuf,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a JSON report next to the output file
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
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

    let config = EdaConfig::builder()
        .input_path(&args.input)
        .output_path(&args.output)
        .charts_dir(&args.charts_dir)
        .render_charts(!args.no_charts)
        .build()?;

    let pipeline = build_pipeline(&args, config)?;
    run_pipeline(&pipeline, &args)
}

fn build_pipeline(args: &Args, config: EdaConfig) -> Result<Pipeline> {
    let mut builder = Pipeline::builder().config(config);

    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    Ok(builder.build()?)
}

/// Run the pipeline and print results.
fn run_pipeline(pipeline: &Pipeline, args: &Args) -> Result<()> {
    info!("{}", "=".repeat(80));
    info!("Starting exploratory data analysis...");
    info!("{}", "=".repeat(80));

    match pipeline.run() {
        Ok(result) => handle_pipeline_output(&result, args),
        Err(e) => {
            if args.json {
                println!("{}", ReportGenerator::failure_json(&e)?);
            }
            error!("Pipeline failed: {}", e);
            Err(anyhow!("Pipeline failed: {}", e))
        }
    }
}

/// Handle pipeline output based on CLI flags.
///
/// Output behavior:
/// - Default: Print the text sections to stdout
/// - `--json`: Print JSON to stdout only (no logs); a failed run prints
///   `{"error": {code, message}}` instead
/// - `--emit-report`: Also write the JSON report to a file
fn handle_pipeline_output(result: &EdaResult, args: &Args) -> Result<()> {
    let report = ReportGenerator::build_report(&args.input, &args.output, result);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let generator = ReportGenerator::new(report_dir(&args.output));
        let report_path = generator.write_report_to_file(&report, &extract_file_stem(&args.input))?;
        info!("Report written to: {}", report_path.display());
    }

    println!("{}", console::render_overview(&result.overview));
    println!(
        "{}",
        console::render_aggregations(&result.aggregations, &result.correlation)
    );
    println!(
        "{}",
        console::render_summary(&result.summary, &args.input, &args.output, &result.chart_files)
    );

    Ok(())
}

/// Directory the output file lives in; the working directory for a bare
/// file name.
fn report_dir(output: &Path) -> PathBuf {
    output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}
