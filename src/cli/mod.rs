//! Command-line interface for kiro-up.
//!
//! The surface is deliberately small: running `kiro-up` with no flags
//! executes the full install-or-update pipeline, and `--check` stops after
//! the version gate to report whether an update exists without touching
//! the filesystem. The remaining flags control output verbosity and where
//! the installation lives.
//!
//! # Examples
//!
//! ```bash
//! kiro-up                  # install or update Kiro
//! kiro-up --check          # report the verdict, change nothing
//! kiro-up --root ~/apps/kiro   # use a custom install root
//! kiro-up --verbose        # show debug-level logging
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::InstallConfig;
use crate::installer;
use crate::integrate::Elevation;
use crate::progress::TransferProgress;

/// Main CLI structure for the Kiro installer.
#[derive(Parser, Debug)]
#[command(
    name = "kiro-up",
    about = "Install or update the Kiro IDE on Linux x64",
    version,
    long_about = "kiro-up fetches the latest stable Kiro release, compares it against the \
                  locally installed version, and downloads and integrates it only when an \
                  update exists."
)]
pub struct Cli {
    /// Check for updates without downloading or installing.
    ///
    /// Fetches the release metadata, compares against the installed
    /// version, prints the verdict, and exits. Never creates, modifies,
    /// or deletes any file.
    #[arg(long)]
    check: bool,

    /// Install root directory.
    ///
    /// Holds the extracted release tree, the version marker, and the
    /// launcher wrapper. Defaults to `~/.local/share/kiro`.
    #[arg(long, env = "KIRO_UP_ROOT", value_name = "DIR")]
    root: Option<PathBuf>,

    /// Override the release metadata endpoint.
    #[arg(long, env = "KIRO_UP_METADATA_URL", value_name = "URL", hide = true)]
    metadata_url: Option<String>,

    /// Override the system symlink location.
    ///
    /// The default, `/usr/local/bin/kiro`, needs elevation; a custom
    /// location is assumed user-writable and linked directly.
    #[arg(long, env = "KIRO_UP_SYMLINK_PATH", value_name = "PATH", hide = true)]
    symlink_path: Option<PathBuf>,

    /// Enable verbose output for debugging.
    ///
    /// Equivalent to `RUST_LOG=debug`. Mutually exclusive with `--quiet`.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output except errors.
    #[arg(short, long)]
    quiet: bool,

    /// Disable the download progress bar.
    ///
    /// Useful for scripts and CI logs. Also honored via the
    /// `KIRO_UP_NO_PROGRESS` environment variable.
    #[arg(long)]
    no_progress: bool,
}

impl Cli {
    /// Execute the parsed command.
    ///
    /// Sets up logging and progress display, resolves the install
    /// configuration, and runs the pipeline. All pipeline outcomes
    /// (installed, already up to date, check verdict) map to a zero exit;
    /// fatal stage errors propagate to the caller.
    pub async fn execute(self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        if self.no_progress {
            // Still single-threaded here; nothing else reads the
            // environment concurrently.
            unsafe { std::env::set_var("KIRO_UP_NO_PROGRESS", "1") };
        }

        let mut config = match self.root {
            Some(root) => InstallConfig::new(root)?,
            None => InstallConfig::with_default_root()?,
        };
        if let Some(url) = self.metadata_url {
            config = config.with_metadata_url(url);
        }

        // The stock /usr/local/bin location needs elevation; a custom
        // link location is taken to be user-writable.
        let elevation = match self.symlink_path {
            Some(path) => {
                config = config.with_symlink_path(path);
                Elevation::Direct
            }
            None => Elevation::Sudo,
        };

        let progress = TransferProgress::new();

        // Every pipeline outcome (installed, already up to date, check
        // verdict) is a zero exit; fatal stage errors propagate.
        installer::run(&config, self.check, &progress, elevation).await?;
        Ok(())
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_check_flag() {
        let cli = Cli::try_parse_from(["kiro-up", "--check"]).unwrap();
        assert!(cli.check);
        assert!(cli.root.is_none());
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["kiro-up", "--verbose", "--quiet"]).is_err());
    }

    #[test]
    fn root_flag_overrides_the_default() {
        let cli = Cli::try_parse_from(["kiro-up", "--root", "/opt/kiro"]).unwrap();
        assert_eq!(cli.root.unwrap(), PathBuf::from("/opt/kiro"));
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["kiro-up", "--frobnicate"]).is_err());
    }
}
