//! `jar-manager download-jars`

use anyhow::{Context, Result};
use colored::*;

use crate::config::Config;
use crate::reconcile::{self, DownloadRequest, RunReport};
use crate::repository::HttpTransport;
use crate::ui;

/// Runs a download batch against the configured repository.
///
/// Returns the report so the caller can choose an exit status; only
/// structural problems come back as `Err`.
pub fn run_download(config: &Config, request: &DownloadRequest) -> Result<RunReport> {
    println!(
        "{} Downloading JARs listed in {}",
        "📦".blue(),
        request.spec_file.display().to_string().bold()
    );
    println!("   Repository: {}", config.base_url().cyan());
    if request.update_only_if_different {
        println!("   Mode: {}", "update only if different".yellow());
    }

    let transport = HttpTransport::new(config.api_key().map(str::to_string));
    let report = reconcile::download_artifacts(config, &transport, request)
        .context("Failed to download JARs")?;

    println!();
    report.print_summary();
    if report.has_failures() {
        ui::warn("Some artifacts could not be processed; details are in the log file");
    }
    if let Some(log) = &request.changes_log {
        println!("   Changes log: {}", log.display());
    }
    Ok(report)
}
