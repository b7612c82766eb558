//! Desktop entry generation.
//!
//! Writes a freedesktop "Desktop Entry" descriptor into the user's
//! application-launcher directory so Kiro shows up in graphical menus,
//! with `Exec=` pointing at the detached-launch wrapper. The parent
//! directory is created when missing.
//!
//! After writing, `update-desktop-database` is invoked so launchers pick
//! the entry up immediately. The refresh is best-effort: the tool may not
//! be installed at all, and the entry still works after the next login.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::InstallConfig;
use crate::core::InstallerError;

/// Icon shipped inside the extracted tree, relative to the app dir.
const ICON_RELATIVE_PATH: &str = "resources/app/extensions/theme-seti/icons/seti-circular-128x128.png";

/// Write the desktop entry pointing at `wrapper` and refresh the desktop
/// database. An existing entry is overwritten.
pub async fn write_desktop_entry(config: &InstallConfig, wrapper: &Path) -> Result<PathBuf> {
    let apps_dir = config.applications_dir();
    fs::create_dir_all(apps_dir)
        .await
        .map_err(|e| InstallerError::FileSystem {
            operation: "create applications directory".to_string(),
            path: apps_dir.display().to_string(),
            reason: e.to_string(),
        })?;

    let entry_path = config.desktop_entry_path();
    let content = desktop_entry(config, wrapper);

    fs::write(&entry_path, content)
        .await
        .map_err(|e| InstallerError::FileSystem {
            operation: "write desktop entry".to_string(),
            path: entry_path.display().to_string(),
            reason: e.to_string(),
        })?;

    debug!("wrote desktop entry at {}", entry_path.display());
    refresh_desktop_database(apps_dir).await;
    Ok(entry_path)
}

fn desktop_entry(config: &InstallConfig, wrapper: &Path) -> String {
    let icon = config.app_dir().join(ICON_RELATIVE_PATH);
    format!(
        "[Desktop Entry]\n\
         Version=1.0\n\
         Type=Application\n\
         Name=Kiro\n\
         Comment=Kiro IDE - AI-powered code editor\n\
         Exec={}\n\
         Icon={}\n\
         Terminal=false\n\
         Categories=Development;IDE;TextEditor;\n\
         StartupNotify=true\n\
         StartupWMClass=Kiro\n",
        wrapper.display(),
        icon.display()
    )
}

/// Ask the desktop environment to re-read the applications directory.
/// Missing tool or non-zero exit only gets a warning.
async fn refresh_desktop_database(apps_dir: &Path) {
    match Command::new("update-desktop-database")
        .arg(apps_dir)
        .output()
        .await
    {
        Ok(output) if output.status.success() => debug!("desktop database refreshed"),
        Ok(output) => warn!(
            "update-desktop-database exited with {}; launchers may refresh on next login",
            output.status
        ),
        Err(e) => debug!("update-desktop-database unavailable: {e}"),
    }
}
