//! CLI entry point for the flight difficulty rater.
//!
//! Provides subcommands for running the full scoring pipeline over a data
//! directory and for dumping the intermediate feature table.

use anyhow::Result;
use clap::{Parser, Subcommand};
use flight_difficulty::{
    insights::generate_insights,
    loader::{load_airports, load_and_prepare_all_data},
    output::{write_feature_table, write_final_csv},
    pipeline::{features::build_features, scoring::calculate_daily_score},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "flight_difficulty")]
#[command(about = "Scores an airline's daily schedule by operational difficulty", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: load, build features, score, and report
    Score {
        /// Directory containing the raw input CSVs
        #[arg(short, long, default_value = "data")]
        data_dir: String,

        /// Directory for the scored CSV and insights summary
        #[arg(short = 'o', long, default_value = "output")]
        output_dir: String,

        /// Filename for the final scored CSV
        #[arg(short = 'f', long, default_value = "flight_difficulty_scores.csv")]
        filename: String,
    },
    /// Build features only and dump the full feature table
    Features {
        /// Directory containing the raw input CSVs
        #[arg(short, long, default_value = "data")]
        data_dir: String,

        /// Path for the feature table CSV
        #[arg(short = 'o', long, default_value = "output/feature_table.csv")]
        output: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/flight_difficulty.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("flight_difficulty.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            data_dir,
            output_dir,
            filename,
        } => {
            score(Path::new(&data_dir), Path::new(&output_dir), &filename)?;
        }
        Commands::Features { data_dir, output } => {
            features(Path::new(&data_dir), Path::new(&output))?;
        }
    }

    Ok(())
}

/// Runs the full pipeline over `data_dir`, writing the scored CSV and the
/// insights summary into `output_dir`.
#[tracing::instrument(skip_all, fields(data_dir = %data_dir.display()))]
fn score(data_dir: &Path, output_dir: &Path, filename: &str) -> Result<()> {
    let mut rows = load_and_prepare_all_data(data_dir)?;
    let airports = load_airports(data_dir)?;

    build_features(&mut rows, &airports);
    calculate_daily_score(&mut rows);

    generate_insights(&rows, output_dir)?;
    let path = write_final_csv(output_dir, filename, &rows)?;

    info!(path = %path.display(), "Pipeline finished");
    Ok(())
}

/// Runs the loader and feature builder only, dumping every column for
/// offline driver analysis.
#[tracing::instrument(skip_all, fields(data_dir = %data_dir.display()))]
fn features(data_dir: &Path, output: &Path) -> Result<()> {
    let mut rows = load_and_prepare_all_data(data_dir)?;
    let airports = load_airports(data_dir)?;

    build_features(&mut rows, &airports);
    write_feature_table(output, &rows)?;

    Ok(())
}
