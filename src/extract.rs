//! Tarball extraction and deterministic binary location.
//!
//! Extraction fully unpacks the gzipped tar archive into the install root,
//! overwriting whatever a previous install left there - re-installing is
//! idempotent. The work is synchronous `flate2` + `tar` I/O, so it runs on
//! the blocking thread pool.
//!
//! The locator searches the extracted tree recursively for a file with the
//! expected executable name. Enumeration order is explicitly defined -
//! shallowest directory depth first, then lexical path order - so "first
//! match wins" is reproducible rather than an accident of the filesystem.
//! Zero matches is fatal ([`InstallerError::BinaryNotFound`]) and leaves
//! the extracted tree on disk for inspection.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use flate2::read::GzDecoder;
use tar::Archive;
use tokio::task;
use tracing::debug;
use walkdir::WalkDir;

use crate::core::InstallerError;

/// Unpack the gzipped tarball at `archive` into `target`.
///
/// Existing files at the destination are overwritten.
pub async fn extract_archive(archive: &Path, target: &Path) -> Result<()> {
    debug!("extracting {} into {}", archive.display(), target.display());

    let archive_path = archive.to_path_buf();
    let target_dir = target.to_path_buf();

    task::spawn_blocking(move || unpack(&archive_path, &target_dir))
        .await
        .map_err(|e| InstallerError::Extraction {
            archive: archive.display().to_string(),
            reason: format!("extraction task panicked: {e}"),
        })??;

    debug!("extraction complete");
    Ok(())
}

fn unpack(archive_path: &Path, target_dir: &Path) -> Result<()> {
    let extraction_error = |reason: String| InstallerError::Extraction {
        archive: archive_path.display().to_string(),
        reason,
    };

    let file = File::open(archive_path)
        .map_err(|e| extraction_error(format!("cannot open archive: {e}")))?;

    let mut tar = Archive::new(GzDecoder::new(file));
    tar.unpack(target_dir)
        .map_err(|e| extraction_error(e.to_string()))?;

    Ok(())
}

/// Locate the executable named `name` under `root`.
///
/// Candidates are ordered by directory depth, then by lexical path, and
/// the first one wins. Returns [`InstallerError::BinaryNotFound`] when no
/// file with the expected name exists anywhere in the tree.
pub fn locate_binary(root: &Path, name: &str) -> Result<PathBuf> {
    let mut candidates: Vec<(usize, PathBuf)> = WalkDir::new(root)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == name)
        .map(|entry| (entry.depth(), entry.into_path()))
        .collect();

    candidates.sort();

    match candidates.into_iter().next() {
        Some((depth, path)) => {
            debug!("located {name} at {} (depth {depth})", path.display());
            Ok(path)
        }
        None => Err(InstallerError::BinaryNotFound {
            name: name.to_string(),
            dir: root.display().to_string(),
        }
        .into()),
    }
}

/// Force the executable bit on a located binary (mode 0755).
///
/// Tarballs usually preserve the bit, but the launcher depends on it, so
/// it is set unconditionally.
pub fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(|e| {
        InstallerError::FileSystem {
            operation: "set executable permissions".to_string(),
            path: path.display().to_string(),
            reason: e.to_string(),
        }
    })?;
    Ok(())
}
