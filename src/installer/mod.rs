//! The version-gated install pipeline.
//!
//! This module strings the stages together in their fixed order: fetch
//! metadata, gate on the installed version, download, extract and locate,
//! integrate. Control flow is strictly sequential - no retries, no
//! parallelism, no feedback loops. Fatal stage errors propagate out as
//! `anyhow::Error` carrying an [`InstallerError`]; the integration stage
//! reports per-step outcomes instead and never fails the run on its own.
//!
//! [`InstallerError`]: crate::core::InstallerError

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use reqwest::Client;
use tracing::info;

use crate::config::InstallConfig;
use crate::constants::{BINARY_NAME, CONNECT_TIMEOUT, USER_AGENT};
use crate::core::InstallerError;
use crate::download;
use crate::extract;
use crate::integrate::{self, Elevation, IntegrationReport, SymlinkOutcome};
use crate::marker;
use crate::metadata;
use crate::progress::ProgressReporter;
use crate::version::ReleaseVersion;

/// Result of a completed pipeline run.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// `--check` mode: verdict reported, nothing touched.
    CheckedOnly {
        /// Latest version advertised by the release endpoint.
        latest: ReleaseVersion,
        /// Recorded installed version, if any.
        installed: Option<ReleaseVersion>,
    },
    /// The recorded version is already current; nothing was done.
    UpToDate {
        /// The version that is both installed and latest.
        version: ReleaseVersion,
    },
    /// A release was downloaded, extracted, and integrated.
    Installed {
        /// The newly installed version.
        version: ReleaseVersion,
        /// Path of the located executable.
        binary: PathBuf,
    },
}

/// Build the HTTP client shared by the metadata fetch and the download.
///
/// Only connection establishment is bounded; a total request timeout
/// would cut off large tarballs on slow links.
pub fn http_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .context("failed to build HTTP client")
}

/// Run the pipeline.
///
/// With `check_only` the run stops after the version gate and reports the
/// verdict without creating, modifying, or deleting any file.
pub async fn run(
    config: &InstallConfig,
    check_only: bool,
    progress: &dyn ProgressReporter,
    elevation: Elevation,
) -> Result<PipelineOutcome> {
    let client = http_client()?;

    println!("{}", "Fetching release metadata...".cyan());
    let latest = metadata::fetch_latest(&client, config.metadata_url()).await?;

    let decision = marker::should_install(&latest.version, &config.marker_path()).await?;

    println!("Latest version:    {}", latest.version.to_string().bold());
    match &decision.installed {
        Some(installed) => println!("Installed version: {}", installed.to_string().bold()),
        None => println!("Installed version: {}", "not installed".yellow()),
    }

    if check_only {
        if decision.proceed {
            println!("{}", "Update available. Run kiro-up to install it.".yellow());
        } else {
            println!("{}", "You have the latest version.".green());
        }
        return Ok(PipelineOutcome::CheckedOnly {
            latest: latest.version,
            installed: decision.installed,
        });
    }

    if !decision.proceed {
        println!(
            "{}",
            format!("Already up to date ({}).", latest.version).green()
        );
        return Ok(PipelineOutcome::UpToDate {
            version: latest.version,
        });
    }

    info!("installing version {}", latest.version);

    tokio::fs::create_dir_all(config.root())
        .await
        .map_err(|e| InstallerError::FileSystem {
            operation: "create install root".to_string(),
            path: config.root().display().to_string(),
            reason: e.to_string(),
        })?;

    let archive = config.archive_path(&latest.version);
    println!("{}", format!("Downloading {}...", latest.download_url).blue());
    download::download(&client, &latest.download_url, &archive, progress).await?;
    println!("{}", "✓ Download complete".green());

    println!("{}", "Extracting archive...".cyan());
    extract::extract_archive(&archive, config.root()).await?;
    println!("{}", "✓ Extraction complete".green());

    let binary = extract::locate_binary(config.root(), BINARY_NAME)?;
    extract::make_executable(&binary)?;
    println!("✓ Found binary: {}", binary.display().to_string().bold());

    println!("{}", "Setting up desktop integration...".cyan());
    let report = integrate::integrate(config, &latest.version, &binary, &archive, elevation).await;
    print_report(config, &report);

    println!(
        "{}",
        format!("✓ Successfully installed Kiro v{}", latest.version)
            .green()
            .bold()
    );
    println!("  Location: {}", config.root().display());

    Ok(PipelineOutcome::Installed {
        version: latest.version,
        binary,
    })
}

/// Present the per-step integration outcomes. Failures here are warnings:
/// the install itself already succeeded.
fn print_report(config: &InstallConfig, report: &IntegrationReport) {
    match &report.wrapper {
        Ok(path) => println!("✓ Launcher wrapper: {}", path.display()),
        Err(e) => println!("{} could not create launcher wrapper: {e:#}", "⚠".yellow()),
    }

    match &report.desktop_entry {
        Ok(path) => println!("✓ Desktop entry: {}", path.display()),
        Err(e) => println!("{} could not create desktop entry: {e:#}", "⚠".yellow()),
    }

    match &report.symlink {
        SymlinkOutcome::Created => {
            println!("✓ Symlink: {}", config.symlink_path().display());
        }
        SymlinkOutcome::Declined { reason } | SymlinkOutcome::Failed { reason } => {
            println!("{} symlink not created: {reason}", "⚠".yellow());
            println!(
                "  You can create it later with: {}",
                integrate::manual_command(&config.wrapper_path(), config.symlink_path()).cyan()
            );
        }
    }

    if let Err(e) = &report.marker {
        println!(
            "{} could not record the installed version: {e:#}",
            "⚠".yellow()
        );
    }

    if let Err(e) = &report.archive_removed {
        println!("{} could not remove the archive: {e:#}", "⚠".yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_client_builds() {
        http_client().unwrap();
    }
}
