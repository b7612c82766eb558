//! Streaming archive download.
//!
//! Release tarballs can be hundreds of megabytes, so the response body is
//! streamed to disk chunk by chunk instead of being buffered in memory.
//! Byte progress goes to an injected [`ProgressReporter`].
//!
//! A truncated tarball must never survive: on any interruption - transport
//! error mid-stream, disk write failure, non-success status - the partial
//! file is removed before the [`InstallerError::Download`] propagates, so
//! a later run can never mistake it for a valid archive.

use std::path::Path;

use anyhow::Result;
use futures::StreamExt;
use reqwest::Client;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::core::InstallerError;
use crate::progress::ProgressReporter;

/// Download `url` to `dest`, reporting byte progress to `progress`.
///
/// On failure the partial file at `dest` is removed before the error is
/// returned.
pub async fn download(
    client: &Client,
    url: &str,
    dest: &Path,
    progress: &dyn ProgressReporter,
) -> Result<()> {
    debug!("downloading {url} to {}", dest.display());

    match stream_to_disk(client, url, dest, progress).await {
        Ok(()) => Ok(()),
        Err(e) => {
            remove_partial(dest).await;
            Err(e)
        }
    }
}

async fn stream_to_disk(
    client: &Client,
    url: &str,
    dest: &Path,
    progress: &dyn ProgressReporter,
) -> Result<()> {
    let download_error = |reason: String| InstallerError::Download {
        url: url.to_string(),
        reason,
    };

    let response = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| download_error(e.to_string()))?;

    progress.begin(response.content_length());

    let mut file = fs::File::create(dest)
        .await
        .map_err(|e| download_error(format!("cannot create {}: {e}", dest.display())))?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| download_error(format!("interrupted mid-stream: {e}")))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| download_error(format!("cannot write to {}: {e}", dest.display())))?;
        progress.advance(chunk.len() as u64);
    }

    file.flush()
        .await
        .map_err(|e| download_error(format!("cannot flush {}: {e}", dest.display())))?;

    progress.finish();
    debug!("download complete: {}", dest.display());
    Ok(())
}

/// Best-effort removal of a partial download. The download error is the
/// one worth surfacing; a failed cleanup only gets a warning.
async fn remove_partial(dest: &Path) {
    match fs::remove_file(dest).await {
        Ok(()) => debug!("removed partial download {}", dest.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("could not remove partial download {}: {e}", dest.display()),
    }
}
