//! CLI entry point for the convoy rater.
//!
//! Cleans a vehicle spreadsheet, scores every vehicle, stages the result in
//! SQLite and exports high scorers to JSON and the rest to XML.

use anyhow::Result;
use clap::Parser;
use convoy_rater::input::InputFile;
use convoy_rater::pipeline;
use convoy_rater::prompt::ask_for_input;
use convoy_rater::scoring::ScoringConfig;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "convoy_rater")]
#[command(about = "Clean, score and export convoy vehicle records", long_about = None)]
struct Cli {
    /// CSV, XLSX/XLS or .s3db file; prompts for one when omitted
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// JSON file with score thresholds
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Average route length (default 450)
    #[arg(long)]
    average_route: Option<f64>,

    /// Fuel burned over the average route for full fuel points (default 230)
    #[arg(long)]
    burned_fuel: Option<f64>,

    /// Minimum maximum_load for capacity points (default 20)
    #[arg(long)]
    capacity: Option<i64>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/convoy_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("convoy_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => ScoringConfig::load(path)?,
        None => ScoringConfig::default(),
    };
    let thresholds = file_config
        .merge(ScoringConfig {
            average_route: cli.average_route,
            burned_fuel: cli.burned_fuel,
            capacity: cli.capacity,
        })
        .thresholds();
    info!(
        average_route = thresholds.average_route,
        burned_fuel = thresholds.burned_fuel,
        capacity = thresholds.capacity,
        "Score thresholds"
    );

    let path = match cli.input {
        Some(path) => path,
        None => ask_for_input(std::io::stdin().lock(), std::io::stdout())?,
    };
    let input = InputFile::parse(&path)?;

    let summary = pipeline::run(&input, &thresholds)?;

    for line in summary.status_lines() {
        println!("{line}");
    }

    Ok(())
}
