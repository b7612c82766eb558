//! Privileged system symlink creation.
//!
//! Placing `kiro` on the binary search path requires writing to
//! `/usr/local/bin`, which the installer usually cannot do unprivileged.
//! The step is capability-gated: [`Elevation`] decides how the link gets
//! created, and the outcome is the tri-state [`SymlinkOutcome`] - never a
//! fatal error. The symlink is a convenience; an install without it is
//! still a correct install, and the caller prints the manual command as a
//! fallback.

use std::path::Path;

use tokio::process::Command;
use tracing::{debug, warn};

/// How the symlink gets created.
#[derive(Debug, Clone, Copy)]
pub enum Elevation {
    /// Elevate through `sudo ln -sfn`. Used for the real
    /// `/usr/local/bin/kiro` link.
    Sudo,
    /// Create the link directly with filesystem calls. Used when the link
    /// location is user-writable (tests, custom prefixes).
    Direct,
}

/// Tri-state result of the privileged symlink step.
#[derive(Debug, Clone)]
pub enum SymlinkOutcome {
    /// The link now points at the target.
    Created,
    /// Elevation was unavailable or refused; nothing was changed.
    Declined {
        /// Why elevation did not happen.
        reason: String,
    },
    /// The operation was attempted and failed.
    Failed {
        /// The underlying failure.
        reason: String,
    },
}

/// Create (or replace) the symlink at `link` pointing at `target`.
pub async fn install_symlink(target: &Path, link: &Path, elevation: Elevation) -> SymlinkOutcome {
    let outcome = match elevation {
        Elevation::Sudo => sudo_symlink(target, link).await,
        Elevation::Direct => direct_symlink(target, link),
    };

    match &outcome {
        SymlinkOutcome::Created => {
            debug!("symlink {} -> {}", link.display(), target.display());
        }
        SymlinkOutcome::Declined { reason } => {
            warn!("symlink step declined: {reason}");
        }
        SymlinkOutcome::Failed { reason } => {
            warn!("symlink step failed: {reason}");
        }
    }
    outcome
}

/// The manual command a user can run later if the step was declined.
pub fn manual_command(target: &Path, link: &Path) -> String {
    format!("sudo ln -sfn {} {}", target.display(), link.display())
}

async fn sudo_symlink(target: &Path, link: &Path) -> SymlinkOutcome {
    if which::which("sudo").is_err() {
        return SymlinkOutcome::Declined {
            reason: "sudo is not available".to_string(),
        };
    }

    // -sfn replaces an existing link atomically enough for our purposes
    // and never follows a stale one.
    let result = Command::new("sudo")
        .arg("ln")
        .arg("-sfn")
        .arg(target)
        .arg(link)
        .output()
        .await;

    match result {
        Ok(output) if output.status.success() => SymlinkOutcome::Created,
        Ok(output) => SymlinkOutcome::Declined {
            reason: format!(
                "sudo exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        },
        Err(e) => SymlinkOutcome::Failed {
            reason: format!("could not run sudo: {e}"),
        },
    }
}

fn direct_symlink(target: &Path, link: &Path) -> SymlinkOutcome {
    if link.symlink_metadata().is_ok() {
        if let Err(e) = std::fs::remove_file(link) {
            return SymlinkOutcome::Failed {
                reason: format!("could not remove existing link: {e}"),
            };
        }
    }

    match std::os::unix::fs::symlink(target, link) {
        Ok(()) => SymlinkOutcome::Created,
        Err(e) => SymlinkOutcome::Failed {
            reason: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn direct_elevation_creates_the_link() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("kiro-launcher.sh");
        std::fs::write(&target, "#!/bin/bash\n").unwrap();
        let link = temp.path().join("bin").join("kiro");
        std::fs::create_dir_all(link.parent().unwrap()).unwrap();

        let outcome = install_symlink(&target, &link, Elevation::Direct).await;

        assert!(matches!(outcome, SymlinkOutcome::Created));
        assert_eq!(std::fs::read_link(&link).unwrap(), target);
    }

    #[tokio::test]
    async fn direct_elevation_replaces_an_existing_link() {
        let temp = TempDir::new().unwrap();
        let old_target = temp.path().join("old");
        let new_target = temp.path().join("new");
        std::fs::write(&old_target, "").unwrap();
        std::fs::write(&new_target, "").unwrap();
        let link = temp.path().join("kiro");
        std::os::unix::fs::symlink(&old_target, &link).unwrap();

        let outcome = install_symlink(&new_target, &link, Elevation::Direct).await;

        assert!(matches!(outcome, SymlinkOutcome::Created));
        assert_eq!(std::fs::read_link(&link).unwrap(), new_target);
    }

    #[tokio::test]
    async fn missing_link_parent_is_a_failure_not_a_panic() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target");
        std::fs::write(&target, "").unwrap();
        let link = temp.path().join("no-such-dir").join("kiro");

        let outcome = install_symlink(&target, &link, Elevation::Direct).await;

        assert!(matches!(outcome, SymlinkOutcome::Failed { .. }));
    }

    #[test]
    fn manual_command_names_both_paths() {
        let cmd = manual_command(
            Path::new("/opt/kiro/kiro-launcher.sh"),
            Path::new("/usr/local/bin/kiro"),
        );
        assert_eq!(
            cmd,
            "sudo ln -sfn /opt/kiro/kiro-launcher.sh /usr/local/bin/kiro"
        );
    }
}
