//! Environment integration: wrapper, desktop entry, symlink, marker,
//! cleanup.
//!
//! The integrator runs after a release has been extracted and its binary
//! located. Unlike the earlier pipeline stages, its sub-steps are attempted
//! independently and in a fixed order - a failed wrapper write does not
//! prevent the desktop entry from being attempted, and a refused symlink
//! never prevents the version marker from being recorded. The per-step
//! results are collected into an [`IntegrationReport`] for the caller to
//! present.
//!
//! Ordering matters in one place: the marker is written only after the
//! wrapper, desktop entry, and symlink have each been attempted, so an
//! interrupted integration never records a version it did not try to wire
//! up.

pub mod desktop;
pub mod symlink;
pub mod wrapper;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::fs;
use tracing::debug;

use crate::config::InstallConfig;
use crate::core::InstallerError;
use crate::marker;
use crate::version::ReleaseVersion;

pub use symlink::{Elevation, SymlinkOutcome, manual_command};

/// Per-step outcomes of one integration pass.
#[derive(Debug)]
pub struct IntegrationReport {
    /// Wrapper script generation.
    pub wrapper: Result<PathBuf>,
    /// Desktop entry generation.
    pub desktop_entry: Result<PathBuf>,
    /// Privileged symlink creation (tri-state, never fatal).
    pub symlink: SymlinkOutcome,
    /// Version marker update.
    pub marker: Result<()>,
    /// Downloaded archive deletion.
    pub archive_removed: Result<()>,
}

/// Wire the extracted installation into the environment and record the
/// installed version.
///
/// Every sub-step is attempted regardless of the previous step's outcome.
pub async fn integrate(
    config: &InstallConfig,
    version: &ReleaseVersion,
    binary: &Path,
    archive: &Path,
    elevation: Elevation,
) -> IntegrationReport {
    let wrapper = wrapper::write_wrapper(config, binary).await;

    // The wrapper path is derived from config, so the desktop entry and
    // symlink can point at it even if writing the wrapper just failed -
    // they stay correct once the user fixes the underlying problem and
    // re-runs.
    let wrapper_path = config.wrapper_path();

    let desktop_entry = desktop::write_desktop_entry(config, &wrapper_path).await;

    let symlink = symlink::install_symlink(&wrapper_path, config.symlink_path(), elevation).await;

    let marker = marker::write_marker(&config.marker_path(), version).await;

    let archive_removed = remove_archive(archive).await;

    IntegrationReport {
        wrapper,
        desktop_entry,
        symlink,
        marker,
        archive_removed,
    }
}

async fn remove_archive(archive: &Path) -> Result<()> {
    fs::remove_file(archive)
        .await
        .map_err(|e| InstallerError::FileSystem {
            operation: "remove downloaded archive".to_string(),
            path: archive.display().to_string(),
            reason: e.to_string(),
        })?;
    debug!("removed downloaded archive {}", archive.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(temp: &TempDir) -> InstallConfig {
        let root = temp.path().join("root");
        std::fs::create_dir_all(&root).unwrap();
        InstallConfig::new(root)
            .unwrap()
            .with_applications_dir(temp.path().join("apps"))
            .with_symlink_path(temp.path().join("bin").join("kiro"))
    }

    fn v(s: &str) -> ReleaseVersion {
        s.parse().unwrap()
    }

    fn binary_in(config: &InstallConfig) -> PathBuf {
        config.root().join("Kiro").join("kiro")
    }

    #[tokio::test]
    async fn full_integration_wires_everything_up() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        std::fs::create_dir_all(temp.path().join("bin")).unwrap();
        let archive = config.archive_path(&v("0.7.34"));
        std::fs::write(&archive, "tarball").unwrap();

        let report =
            integrate(&config, &v("0.7.34"), &binary_in(&config), &archive, Elevation::Direct)
                .await;

        assert!(report.wrapper.is_ok());
        assert!(report.desktop_entry.is_ok());
        assert!(matches!(report.symlink, SymlinkOutcome::Created));
        assert!(report.marker.is_ok());
        assert!(report.archive_removed.is_ok());

        // Post-run invariants: marker recorded, archive gone, link live.
        let marker = std::fs::read_to_string(config.marker_path()).unwrap();
        assert_eq!(marker, "0.7.34");
        assert!(!archive.exists());
        assert_eq!(
            std::fs::read_link(config.symlink_path()).unwrap(),
            config.wrapper_path()
        );
    }

    #[tokio::test]
    async fn failed_symlink_does_not_block_the_marker() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        // Symlink parent is missing, so the direct link attempt fails.
        let archive = config.archive_path(&v("0.7.34"));
        std::fs::write(&archive, "tarball").unwrap();

        let report =
            integrate(&config, &v("0.7.34"), &binary_in(&config), &archive, Elevation::Direct)
                .await;

        assert!(matches!(report.symlink, SymlinkOutcome::Failed { .. }));
        assert!(report.marker.is_ok());
        assert!(config.marker_path().is_file());
        assert!(!archive.exists());
    }

    #[tokio::test]
    async fn missing_archive_is_reported_but_not_fatal() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        std::fs::create_dir_all(temp.path().join("bin")).unwrap();
        let archive = config.archive_path(&v("0.7.34"));

        let report =
            integrate(&config, &v("0.7.34"), &binary_in(&config), &archive, Elevation::Direct)
                .await;

        assert!(report.archive_removed.is_err());
        assert!(report.marker.is_ok());
    }

    #[tokio::test]
    async fn reintegration_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        std::fs::create_dir_all(temp.path().join("bin")).unwrap();

        for version in ["0.7.33", "0.7.34"] {
            let archive = config.archive_path(&v(version));
            std::fs::write(&archive, "tarball").unwrap();
            let report =
                integrate(&config, &v(version), &binary_in(&config), &archive, Elevation::Direct)
                    .await;
            assert!(report.wrapper.is_ok());
            assert!(matches!(report.symlink, SymlinkOutcome::Created));
        }

        let marker = std::fs::read_to_string(config.marker_path()).unwrap();
        assert_eq!(marker, "0.7.34");
    }
}
