//! Install root and derived filesystem layout.
//!
//! [`InstallConfig`] owns every path the pipeline touches: the install
//! root, the marker file, the transient tarball, the extracted tree, the
//! wrapper script, the desktop entry, and the system symlink. It is built
//! once at the CLI boundary and passed by reference through the pipeline,
//! so nothing in the installer reads ambient global state. Tests point the
//! root, applications directory, and symlink path into a temp directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::constants::{
    self, DESKTOP_FILE_NAME, MARKER_FILE_NAME, METADATA_URL, PRODUCT_NAME, SYSTEM_LINK_PATH,
    WRAPPER_FILE_NAME,
};
use crate::version::ReleaseVersion;

/// Resolved configuration for one installer run.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    root: PathBuf,
    metadata_url: String,
    applications_dir: PathBuf,
    symlink_path: PathBuf,
}

impl InstallConfig {
    /// Build a configuration rooted at `root`.
    ///
    /// The applications directory defaults to
    /// `~/.local/share/applications` and the symlink to
    /// `/usr/local/bin/kiro`; both can be overridden with the builder
    /// methods.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let home = dirs::home_dir().context("could not determine home directory")?;

        Ok(Self {
            root: root.into(),
            metadata_url: METADATA_URL.to_string(),
            applications_dir: home.join(".local").join("share").join("applications"),
            symlink_path: PathBuf::from(SYSTEM_LINK_PATH),
        })
    }

    /// Build a configuration at the default install root,
    /// `~/.local/share/kiro`.
    pub fn with_default_root() -> Result<Self> {
        let home = dirs::home_dir().context("could not determine home directory")?;
        Self::new(home.join(".local").join("share").join("kiro"))
    }

    /// Override the metadata endpoint.
    #[must_use]
    pub fn with_metadata_url(mut self, url: impl Into<String>) -> Self {
        self.metadata_url = url.into();
        self
    }

    /// Override the desktop-entry directory.
    #[must_use]
    pub fn with_applications_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.applications_dir = dir.into();
        self
    }

    /// Override the system symlink location.
    #[must_use]
    pub fn with_symlink_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.symlink_path = path.into();
        self
    }

    /// The install root under which everything is stored.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The metadata endpoint to query for the latest release.
    pub fn metadata_url(&self) -> &str {
        &self.metadata_url
    }

    /// The one-line installed-version marker file.
    pub fn marker_path(&self) -> PathBuf {
        self.root.join(MARKER_FILE_NAME)
    }

    /// Destination of the transient tarball for `version`.
    pub fn archive_path(&self, version: &ReleaseVersion) -> PathBuf {
        self.root.join(constants::archive_file_name(version))
    }

    /// Root of the extracted release tree (`<root>/Kiro`).
    pub fn app_dir(&self) -> PathBuf {
        self.root.join(PRODUCT_NAME)
    }

    /// The generated detached-launch wrapper script.
    pub fn wrapper_path(&self) -> PathBuf {
        self.root.join(WRAPPER_FILE_NAME)
    }

    /// Directory that receives the desktop entry.
    pub fn applications_dir(&self) -> &Path {
        &self.applications_dir
    }

    /// The generated desktop entry file.
    pub fn desktop_entry_path(&self) -> PathBuf {
        self.applications_dir.join(DESKTOP_FILE_NAME)
    }

    /// The system-wide symlink on the binary search path.
    pub fn symlink_path(&self) -> &Path {
        &self.symlink_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_live_under_the_root() {
        let config = InstallConfig::new("/opt/kiro").unwrap();
        let version: ReleaseVersion = "0.7.34".parse().unwrap();

        assert_eq!(config.marker_path(), Path::new("/opt/kiro/.kiro_version"));
        assert_eq!(
            config.archive_path(&version),
            Path::new("/opt/kiro/kiro-ide-0.7.34-stable-linux-x64.tar.gz")
        );
        assert_eq!(config.app_dir(), Path::new("/opt/kiro/Kiro"));
        assert_eq!(
            config.wrapper_path(),
            Path::new("/opt/kiro/kiro-launcher.sh")
        );
    }

    #[test]
    fn overrides_replace_defaults() {
        let config = InstallConfig::new("/opt/kiro")
            .unwrap()
            .with_metadata_url("http://localhost:9/meta.json")
            .with_applications_dir("/tmp/apps")
            .with_symlink_path("/tmp/bin/kiro");

        assert_eq!(config.metadata_url(), "http://localhost:9/meta.json");
        assert_eq!(config.desktop_entry_path(), Path::new("/tmp/apps/kiro.desktop"));
        assert_eq!(config.symlink_path(), Path::new("/tmp/bin/kiro"));
    }
}
