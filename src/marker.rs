//! Installed-version marker and the update gate.
//!
//! The marker is a one-line file (`<root>/.kiro_version`) recording the
//! last successfully installed version. Absence means "never installed"
//! and is not an error. The gate proceeds when there is no marker or when
//! the latest release is strictly newer than the recorded one.
//!
//! Marker access is explicit and path-injected - [`read_marker`] /
//! [`write_marker`] take the path from [`InstallConfig`] rather than
//! reaching for ambient state.
//!
//! [`InstallConfig`]: crate::config::InstallConfig

use std::path::Path;

use anyhow::Result;
use tokio::fs;
use tracing::{debug, warn};

use crate::core::InstallerError;
use crate::version::ReleaseVersion;

/// Outcome of the version gate.
#[derive(Debug)]
pub struct InstallDecision {
    /// Whether the pipeline should proceed to download and install.
    pub proceed: bool,
    /// The recorded installed version, if any.
    pub installed: Option<ReleaseVersion>,
}

/// Read the installed-version marker.
///
/// Returns `None` when the file does not exist. A marker that exists but
/// does not parse as a dotted numeric version is treated as absent (with a
/// warning) so a corrupted marker can never block a reinstall.
pub async fn read_marker(path: &Path) -> Result<Option<ReleaseVersion>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(InstallerError::FileSystem {
                operation: "read version marker".to_string(),
                path: path.display().to_string(),
                reason: e.to_string(),
            }
            .into());
        }
    };

    match content.trim().parse::<ReleaseVersion>() {
        Ok(version) => Ok(Some(version)),
        Err(e) => {
            warn!("ignoring unreadable version marker at {}: {e}", path.display());
            Ok(None)
        }
    }
}

/// Overwrite the marker with `version`.
pub async fn write_marker(path: &Path, version: &ReleaseVersion) -> Result<()> {
    fs::write(path, version.to_string())
        .await
        .map_err(|e| InstallerError::FileSystem {
            operation: "write version marker".to_string(),
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    debug!("recorded installed version {version} at {}", path.display());
    Ok(())
}

/// Decide whether `latest` warrants an install.
///
/// Proceeds on a fresh install (no marker) or when `latest` is strictly
/// newer than the recorded version; an equal or older release stops the
/// pipeline with no side effects.
pub async fn should_install(latest: &ReleaseVersion, marker_path: &Path) -> Result<InstallDecision> {
    let installed = read_marker(marker_path).await?;

    let proceed = match &installed {
        None => true,
        Some(current) => latest > current,
    };

    Ok(InstallDecision { proceed, installed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn v(s: &str) -> ReleaseVersion {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn no_marker_means_proceed() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join(".kiro_version");

        let decision = should_install(&v("0.0.1"), &marker).await.unwrap();
        assert!(decision.proceed);
        assert!(decision.installed.is_none());
    }

    #[tokio::test]
    async fn equal_version_stops() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join(".kiro_version");
        write_marker(&marker, &v("0.7.34")).await.unwrap();

        let decision = should_install(&v("0.7.34"), &marker).await.unwrap();
        assert!(!decision.proceed);
        assert_eq!(decision.installed.unwrap().to_string(), "0.7.34");
    }

    #[tokio::test]
    async fn newer_version_proceeds() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join(".kiro_version");
        write_marker(&marker, &v("0.7.33")).await.unwrap();

        let decision = should_install(&v("0.7.34"), &marker).await.unwrap();
        assert!(decision.proceed);
    }

    #[tokio::test]
    async fn older_version_stops() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join(".kiro_version");
        write_marker(&marker, &v("0.8.0")).await.unwrap();

        let decision = should_install(&v("0.7.34"), &marker).await.unwrap();
        assert!(!decision.proceed);
    }

    #[tokio::test]
    async fn corrupted_marker_is_treated_as_fresh_install() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join(".kiro_version");
        tokio::fs::write(&marker, "not-a-version\n").await.unwrap();

        let decision = should_install(&v("0.7.34"), &marker).await.unwrap();
        assert!(decision.proceed);
        assert!(decision.installed.is_none());
    }

    #[tokio::test]
    async fn marker_round_trips_a_single_line() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join(".kiro_version");
        write_marker(&marker, &v("0.7.34")).await.unwrap();

        let raw = tokio::fs::read_to_string(&marker).await.unwrap();
        assert_eq!(raw, "0.7.34");
        let read = read_marker(&marker).await.unwrap().unwrap();
        assert_eq!(read, v("0.7.34"));
    }
}
