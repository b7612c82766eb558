//! Error types and user-facing error rendering.
//!
//! Every fatal pipeline failure maps to one [`InstallerError`] variant.
//! Errors propagate through the pipeline as `anyhow::Error` with added
//! context; at the CLI boundary [`user_friendly_error`] downcasts back to
//! the typed variant and attaches a suggestion and details for display.
//!
//! Non-fatal conditions (a refused symlink elevation, a failed archive
//! deletion, a failed desktop database refresh) never surface here - they
//! are reported as warnings by the integration step and do not change the
//! overall outcome.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Typed errors for every fatal installer failure.
///
/// Variants mirror the pipeline stages: metadata fetching, version
/// handling, archive download, extraction, binary location, and the
/// filesystem operations backing them.
#[derive(Error, Debug, Clone)]
pub enum InstallerError {
    /// Network request failed before a usable response arrived.
    ///
    /// Covers connection failures, timeouts, and non-success HTTP status
    /// codes for the metadata endpoint.
    #[error("network request failed for {url}")]
    Network {
        /// URL that could not be fetched.
        url: String,
        /// Underlying transport or status failure.
        reason: String,
    },

    /// Release metadata was fetched but could not be understood.
    ///
    /// Raised when the JSON body is malformed, the `currentRelease` field
    /// is absent, or no release entry carries a `.tar.gz` download URL.
    #[error("invalid release metadata: {reason}")]
    MetadataParse {
        /// Why the metadata was rejected.
        reason: String,
    },

    /// A version string was not dotted-numeric.
    #[error("invalid version string '{input}'")]
    InvalidVersion {
        /// The string that failed to parse.
        input: String,
    },

    /// Archive download was interrupted or could not be written.
    ///
    /// The partial file has already been removed by the time this error
    /// propagates; a truncated tarball is never left behind.
    #[error("download failed for {url}")]
    Download {
        /// Download URL that failed.
        url: String,
        /// Underlying transport or I/O failure.
        reason: String,
    },

    /// Tarball could not be unpacked.
    #[error("failed to extract archive {archive}")]
    Extraction {
        /// Path of the archive that failed to unpack.
        archive: String,
        /// Underlying decompression or I/O failure.
        reason: String,
    },

    /// No executable with the expected name exists in the extracted tree.
    ///
    /// The extracted directory is deliberately left on disk so the user
    /// can inspect what the release actually contained.
    #[error("could not find the '{name}' executable under {dir}")]
    BinaryNotFound {
        /// Expected executable file name.
        name: String,
        /// Directory that was searched recursively.
        dir: String,
    },

    /// Filesystem operation failed.
    #[error("file system error during {operation}: {path}")]
    FileSystem {
        /// Operation being performed (e.g., "create directory").
        operation: String,
        /// Path involved in the failure.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },

    /// Operation was denied by the operating system.
    #[error("permission denied during {operation}: {path}")]
    PermissionDenied {
        /// Operation being performed.
        operation: String,
        /// Path involved in the failure.
        path: String,
    },
}

/// An error paired with user-facing guidance.
///
/// Wraps an [`InstallerError`] with an optional suggestion (an actionable
/// step, shown in green) and optional details (background on why the error
/// occurs, shown in yellow).
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying installer error.
    pub error: InstallerError,
    /// Optional suggestion for resolving the error.
    pub suggestion: Option<String>,
    /// Optional additional details about the error.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a bare error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: InstallerError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion for resolving the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add background details about the error.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details, and suggestion to stderr with color.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any pipeline error into a user-friendly [`ErrorContext`].
///
/// Downcasts to [`InstallerError`] when possible and attaches
/// variant-specific guidance; unknown errors fall back to a generic
/// filesystem context carrying the original message.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(installer_error) = error.downcast_ref::<InstallerError>() {
        return create_error_context(installer_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(InstallerError::PermissionDenied {
                operation: "file access".to_string(),
                path: "unknown".to_string(),
            })
            .with_suggestion("Check file ownership, or pick a writable install root with --root")
            .with_details(
                "kiro-up does not have permission to read or write files at this location",
            );
        }
    }

    ErrorContext::new(InstallerError::FileSystem {
        operation: "install".to_string(),
        path: String::new(),
        reason: format!("{error:#}"),
    })
}

fn create_error_context(error: InstallerError) -> ErrorContext {
    match &error {
        InstallerError::Network { .. } => ErrorContext::new(error)
            .with_suggestion("Check your internet connection and retry")
            .with_details("The Kiro release endpoint could not be reached"),

        InstallerError::MetadataParse { .. } => ErrorContext::new(error)
            .with_suggestion("Retry later; the release feed may be mid-publish")
            .with_details("The metadata endpoint responded, but not with the expected fields"),

        InstallerError::InvalidVersion { .. } => ErrorContext::new(error)
            .with_details("Version strings must be dotted numeric, e.g. 0.7.34"),

        InstallerError::Download { .. } => ErrorContext::new(error)
            .with_suggestion("Check your internet connection and retry")
            .with_details("The partial download has been removed; re-running is safe"),

        InstallerError::Extraction { .. } => ErrorContext::new(error)
            .with_suggestion("Delete the downloaded archive and re-run to fetch a fresh copy")
            .with_details("The tarball may be corrupted or in an unexpected format"),

        InstallerError::BinaryNotFound { dir, .. } => {
            let dir = dir.clone();
            ErrorContext::new(error)
                .with_suggestion(format!("Inspect {dir} to see what the release contained"))
                .with_details("The extracted tree was kept on disk for diagnosis")
        }

        InstallerError::FileSystem { .. } => ErrorContext::new(error)
            .with_suggestion("Check that the install root exists and is writable"),

        InstallerError::PermissionDenied { path, .. } => {
            let path = path.clone();
            ErrorContext::new(error).with_suggestion(format!(
                "Check the permissions on {path}, or pick a different install root with --root"
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_context_builder_attaches_guidance() {
        let ctx = ErrorContext::new(InstallerError::MetadataParse {
            reason: "no currentRelease".to_string(),
        })
        .with_suggestion("retry")
        .with_details("feed mid-publish");

        assert_eq!(ctx.suggestion.as_deref(), Some("retry"));
        assert_eq!(ctx.details.as_deref(), Some("feed mid-publish"));
        let rendered = ctx.to_string();
        assert!(rendered.contains("invalid release metadata"));
        assert!(rendered.contains("Suggestion: retry"));
    }

    #[test]
    fn user_friendly_error_downcasts_installer_errors() {
        let err = anyhow::Error::new(InstallerError::Download {
            url: "https://example.invalid/kiro.tar.gz".to_string(),
            reason: "connection reset".to_string(),
        });

        let ctx = user_friendly_error(err);
        assert!(matches!(ctx.error, InstallerError::Download { .. }));
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn user_friendly_error_wraps_unknown_errors() {
        let ctx = user_friendly_error(anyhow::anyhow!("something odd"));
        assert!(matches!(ctx.error, InstallerError::FileSystem { .. }));
        assert!(ctx.error.to_string().contains("file system error"));
    }
}
