//! Core types shared across the installer.
//!
//! This module hosts the error hierarchy: the [`InstallerError`] enum used
//! for typed failures throughout the pipeline, and the [`ErrorContext`]
//! wrapper that renders errors with actionable suggestions at the CLI
//! boundary.

pub mod error;

pub use error::{ErrorContext, InstallerError, user_friendly_error};
