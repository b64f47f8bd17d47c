// src/pipeline/run.rs

//! One collection run: collect, simplify, write, summarize.
//!
//! [`run_from_dir`] is what the CLI executes; [`exit_code`] maps its outcome
//! to the process exit status.

use std::path::{Path, PathBuf};

use crate::config::load_config;
use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::{SerpApiClient, TrendsApi};
use crate::storage::{WrittenFiles, write_outputs};

use super::collect::collect;
use super::simplify::simplify;

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total_regions: usize,
    pub successful_regions: usize,
    pub failed_regions: Vec<String>,
    pub simplified_items: usize,
    pub requests_made: usize,
    pub files: WrittenFiles,
}

impl RunSummary {
    /// Fail when no region produced data. Output files are already written.
    pub fn ensure_any_success(&self) -> Result<()> {
        if self.total_regions > 0 && self.successful_regions == 0 {
            return Err(AppError::AllRegionsFailed {
                count: self.total_regions,
            });
        }
        Ok(())
    }

    /// Key/value lines for the end-of-run log.
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        let failed = if self.failed_regions.is_empty() {
            "none".to_string()
        } else {
            self.failed_regions.join(", ")
        };
        vec![
            ("Regions", self.total_regions.to_string()),
            ("Successful", self.successful_regions.to_string()),
            ("Failed", failed),
            ("Simplified items", self.simplified_items.to_string()),
            ("API requests used", self.requests_made.to_string()),
            ("Raw output", self.files.raw_path.display().to_string()),
            ("Simple output", self.files.simple_path.display().to_string()),
        ]
    }
}

/// Run collection, simplification and writing once.
///
/// A relative `output_file` is resolved against `base_dir`.
pub async fn run_pipeline(
    config: &Config,
    api: &dyn TrendsApi,
    base_dir: &Path,
) -> Result<RunSummary> {
    log::info!(
        "Collecting trends for {} regions ({} keywords)",
        config.regions.len(),
        config.keywords.len()
    );

    let result = collect(api, config).await;
    let simplified = simplify(&result);
    let files = write_outputs(&output_path(config, base_dir), &result, &simplified).await?;

    Ok(RunSummary {
        total_regions: result.len(),
        successful_regions: result.success_count(),
        failed_regions: result
            .regions
            .iter()
            .filter(|o| !o.is_success())
            .map(|o| o.region_code().to_string())
            .collect(),
        simplified_items: simplified.total_items,
        requests_made: result.metadata.requests_made,
        files,
    })
}

/// Load `config.toml`/`config.json` from `dir` and run against SerpAPI.
pub async fn run_from_dir(dir: &Path) -> Result<RunSummary> {
    let config = load_config(dir)?;
    run_with_config(&config, dir).await
}

/// Run against SerpAPI with an already loaded configuration.
pub async fn run_with_config(config: &Config, dir: &Path) -> Result<RunSummary> {
    let client = SerpApiClient::new(config)?;
    run_pipeline(config, &client, dir).await
}

/// Process exit status for a finished run.
///
/// 0 when the files were written and at least one region succeeded, 1 for
/// configuration, I/O or write errors and for a run where every region failed.
pub fn exit_code(outcome: &Result<RunSummary>) -> u8 {
    match outcome {
        Ok(summary) if summary.ensure_any_success().is_ok() => 0,
        _ => 1,
    }
}

fn output_path(config: &Config, base_dir: &Path) -> PathBuf {
    let path = PathBuf::from(&config.output_file);
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}
