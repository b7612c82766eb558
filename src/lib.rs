//! kiro-up - Version-aware installer and updater for the Kiro IDE
//!
//! `kiro-up` keeps a local Kiro IDE installation on Linux x64 in sync with
//! the latest stable release. It fetches the release metadata published by
//! the Kiro download service, compares the advertised version against a
//! locally recorded marker, and - only when a newer release exists -
//! downloads the tarball, unpacks it, and wires the extracted binary into
//! the host environment.
//!
//! # Pipeline Overview
//!
//! A single run is a strictly sequential pipeline:
//!
//! ```text
//! 1. Fetch metadata      -> latest version + tarball URL
//! 2. Version gate        -> compare against the .kiro_version marker
//! 3. Download            -> stream the tarball to disk with progress
//! 4. Extract & locate    -> unpack and find the kiro executable
//! 5. Integrate           -> wrapper script, desktop entry, symlink,
//!                           marker update, archive cleanup
//! ```
//!
//! Stages 1-4 are fatal on failure: the pipeline aborts with a descriptive
//! message and a non-zero exit code, with no retries. Stage 5 attempts each
//! sub-step independently; a refused `sudo` for the `/usr/local/bin/kiro`
//! symlink degrades to a warning with manual instructions rather than
//! failing the install.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface and argument handling
//! - [`config`] - Install root and derived filesystem layout
//! - [`core`] - Error types and user-facing error rendering
//! - [`metadata`] - Release metadata fetching and parsing
//! - [`version`] - Component-wise numeric version comparison
//! - [`marker`] - Installed-version marker and the update gate
//! - [`download`] - Streaming archive download with progress reporting
//! - [`extract`] - Tarball extraction and deterministic binary location
//! - [`integrate`] - Wrapper script, desktop entry, and symlink wiring
//! - [`installer`] - The pipeline orchestrating all of the above
//!
//! # Filesystem Layout
//!
//! Relative to the install root (default `~/.local/share/kiro`):
//!
//! ```text
//! .kiro_version                  installed-version marker (one line)
//! kiro-ide-<v>-stable-linux-x64.tar.gz   transient download
//! Kiro/                          extracted release tree
//! kiro-launcher.sh               detached-launch wrapper
//! ```
//!
//! plus `~/.local/share/applications/kiro.desktop` and the
//! `/usr/local/bin/kiro` symlink outside the root.

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod download;
pub mod extract;
pub mod installer;
pub mod integrate;
pub mod marker;
pub mod metadata;
pub mod progress;
pub mod version;
