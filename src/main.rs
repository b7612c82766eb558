//! kiro-up CLI entry point
//!
//! This is the main executable for the Kiro installer. It handles
//! command-line argument parsing, error display, and pipeline execution.
//!
//! The CLI supports two modes of operation:
//! - default - run the full install-or-update pipeline
//! - `--check` - compare the latest release against the installed version
//!   and report the verdict without touching the filesystem

use anyhow::Result;
use clap::Parser;
use kiro_up::cli;
use kiro_up::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    match cli.execute().await {
        Ok(_) => Ok(()),
        Err(e) => {
            // Convert to user-friendly error with context and suggestions
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
