//! Trends Collector CLI
//!
//! Reads `config.toml` (or `config.json`) from the working directory,
//! collects trending searches for every configured region and writes the raw
//! and simplified JSON files.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use trends_collector::{
    config,
    pipeline::{self, RunSummary},
    utils::log::{log_file_path, stderr_and_file},
};

/// Collect Google Trends trending searches per region via SerpAPI
#[derive(Parser, Debug)]
#[command(name = "trends-collector", version, about)]
struct Cli {}

/// Initialize logging with the configured default level, tee'd into
/// `log_file` when one is given.
fn init_logging(level: &str, log_file: Option<&Path>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    builder.format_timestamp_secs();

    let mut open_error = None;
    if let Some(path) = log_file {
        match stderr_and_file(path) {
            Ok(tee) => {
                builder.target(env_logger::Target::Pipe(Box::new(tee)));
            }
            Err(e) => open_error = Some((path, e)),
        }
    }
    builder.init();

    if let Some((path, e)) = open_error {
        log::warn!("Cannot open log file {}: {e}", path.display());
    }
}

fn log_summary(summary: &RunSummary) {
    log::info!("Run summary:");
    for (key, value) in summary.lines() {
        log::info!("    {key}: {value}");
    }
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _cli = Cli::parse();

    let dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            init_logging("info", None);
            log::error!("Cannot determine working directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = match config::load_config(&dir) {
        Ok(config) => {
            let log_file = log_file_path(&config.logging.file, &dir);
            init_logging(&config.logging.level, log_file.as_deref());
            config
        }
        Err(e) => {
            init_logging("info", None);
            log::error!("{e}");
            return ExitCode::from(pipeline::exit_code(&Err(e)));
        }
    };

    log::info!("Trends collector starting in {}", dir.display());

    let outcome = pipeline::run_with_config(&config, &dir).await;
    match &outcome {
        Ok(summary) => {
            log_summary(summary);
            match summary.ensure_any_success() {
                Ok(()) => log::info!("Collection complete!"),
                Err(e) => log::error!("{e}"),
            }
        }
        Err(e) => log::error!("{e}"),
    }

    ExitCode::from(pipeline::exit_code(&outcome))
}
