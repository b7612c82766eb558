//! Detached-launch wrapper script generation.
//!
//! Kiro is a graphical application, but the symlink on the binary search
//! path makes it launchable from a terminal. Executing the binary directly
//! would tie it to that terminal; the generated wrapper launches it with
//! `nohup`, discards its standard streams, and `disown`s it so closing the
//! terminal never kills the IDE.
//!
//! One exception: `--locate-shell-integration-path` probes are `exec`'d
//! straight through, because the caller needs the real stdout and exit
//! status of the binary.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::fs;
use tracing::debug;

use crate::config::InstallConfig;
use crate::constants::{BINARY_NAME, PRODUCT_NAME};
use crate::core::InstallerError;

/// Write the wrapper script under the install root and mark it
/// executable. An existing wrapper is overwritten.
///
/// The script addresses the located `binary` relative to its own
/// directory where possible, so the install root can be moved without
/// breaking the wrapper.
pub async fn write_wrapper(config: &InstallConfig, binary: &Path) -> Result<PathBuf> {
    let wrapper_path = config.wrapper_path();

    // Located binary expressed relative to the script, falling back to
    // the absolute path when it lives outside the root.
    let binary_ref = match binary.strip_prefix(config.root()) {
        Ok(relative) => format!("$SCRIPT_DIR/{}", relative.display()),
        Err(_) => binary.display().to_string(),
    };
    let content = wrapper_script(&binary_ref);

    fs::write(&wrapper_path, content)
        .await
        .map_err(|e| InstallerError::FileSystem {
            operation: "write launcher wrapper".to_string(),
            path: wrapper_path.display().to_string(),
            reason: e.to_string(),
        })?;

    set_executable(&wrapper_path).await?;
    debug!("wrote launcher wrapper at {}", wrapper_path.display());
    Ok(wrapper_path)
}

async fn set_executable(path: &std::path::Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .map_err(|e| InstallerError::FileSystem {
            operation: "set wrapper permissions".to_string(),
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    Ok(())
}

/// The wrapper resolves its own real location at runtime (following the
/// `/usr/local/bin` symlink), so the script never embeds an absolute
/// install root and survives the root being moved.
fn wrapper_script(binary_ref: &str) -> String {
    format!(
        r#"#!/bin/bash
# {PRODUCT_NAME} launcher wrapper - runs {PRODUCT_NAME} detached from the terminal

# Resolve the real path of this script (follows symlinks)
SCRIPT_PATH="$(readlink -f "${{BASH_SOURCE[0]}}")"
SCRIPT_DIR="$(dirname "$SCRIPT_PATH")"
KIRO_BINARY="{binary_ref}"

if [ ! -f "$KIRO_BINARY" ]; then
    echo "Error: {BINARY_NAME} binary not found at $KIRO_BINARY"
    echo "Run kiro-up to install {PRODUCT_NAME} first"
    exit 1
fi

# Shell integration probes need the real stdout and exit status
if [[ "$*" == *"--locate-shell-integration-path"* ]]; then
    exec "$KIRO_BINARY" "$@"
fi

# Launch in the background, detached, with streams discarded
nohup "$KIRO_BINARY" "$@" > /dev/null 2>&1 &
disown

exit 0
"#
    )
}
