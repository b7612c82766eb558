//! Release metadata fetching and parsing.
//!
//! The Kiro download service publishes a JSON document per channel with a
//! `currentRelease` version string and a `releases` array whose entries
//! carry platform download URLs under `updateTo.url`. This module performs
//! the single metadata request and distills the document into a
//! [`VersionDescriptor`]: the latest version plus the `.tar.gz` URL for it.
//!
//! There is no retry logic. A failed request aborts the pipeline with
//! [`InstallerError::Network`]; a response missing the expected fields
//! aborts with [`InstallerError::MetadataParse`].

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::core::InstallerError;
use crate::version::ReleaseVersion;

/// Latest-release descriptor produced by the metadata fetch.
///
/// Immutable once constructed; lives for a single pipeline run.
#[derive(Debug, Clone)]
pub struct VersionDescriptor {
    /// Version advertised as the current release.
    pub version: ReleaseVersion,
    /// Download URL of the release tarball.
    pub download_url: String,
}

/// Wire format of the metadata document. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct ReleaseMetadata {
    #[serde(rename = "currentRelease")]
    current_release: Option<String>,
    #[serde(default)]
    releases: Vec<ReleaseEntry>,
}

#[derive(Debug, Deserialize)]
struct ReleaseEntry {
    #[serde(rename = "updateTo")]
    update_to: Option<UpdateTarget>,
}

#[derive(Debug, Deserialize)]
struct UpdateTarget {
    #[serde(default)]
    url: String,
}

/// Fetch the metadata document and extract the latest-release descriptor.
pub async fn fetch_latest(client: &Client, url: &str) -> Result<VersionDescriptor> {
    debug!("fetching release metadata from {url}");

    let response = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| InstallerError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let metadata: ReleaseMetadata =
        response
            .json()
            .await
            .map_err(|e| InstallerError::MetadataParse {
                reason: format!("malformed JSON body: {e}"),
            })?;

    let descriptor = descriptor_from(metadata)?;
    debug!(
        "latest release: {} ({})",
        descriptor.version, descriptor.download_url
    );
    Ok(descriptor)
}

/// Distill a parsed metadata document into a [`VersionDescriptor`].
///
/// The tarball URL is taken from the first release entry whose
/// `updateTo.url` ends in `.tar.gz`.
fn descriptor_from(metadata: ReleaseMetadata) -> Result<VersionDescriptor> {
    let version_str = metadata
        .current_release
        .ok_or_else(|| InstallerError::MetadataParse {
            reason: "no currentRelease field in metadata".to_string(),
        })?;

    let version: ReleaseVersion = version_str.parse()?;

    let download_url = metadata
        .releases
        .into_iter()
        .filter_map(|entry| entry.update_to)
        .map(|target| target.url)
        .find(|url| url.ends_with(".tar.gz"))
        .ok_or_else(|| InstallerError::MetadataParse {
            reason: "no .tar.gz download URL in releases".to_string(),
        })?;

    Ok(VersionDescriptor {
        version,
        download_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ReleaseMetadata {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn extracts_version_and_tarball_url() {
        let metadata = parse(
            r#"{
                "currentRelease": "0.7.34",
                "productVersion": "1.103.2",
                "releases": [
                    {"updateTo": {"url": "https://cdn.example/kiro-0.7.34.AppImage", "version": "0.7.34"}},
                    {"updateTo": {"url": "https://cdn.example/kiro-0.7.34.tar.gz", "version": "0.7.34"}}
                ]
            }"#,
        );

        let descriptor = descriptor_from(metadata).unwrap();
        assert_eq!(descriptor.version.to_string(), "0.7.34");
        assert_eq!(
            descriptor.download_url,
            "https://cdn.example/kiro-0.7.34.tar.gz"
        );
    }

    #[test]
    fn missing_current_release_is_a_parse_error() {
        let metadata = parse(r#"{"releases": []}"#);
        let err = descriptor_from(metadata).unwrap_err();
        let err = err.downcast_ref::<InstallerError>().unwrap();
        assert!(matches!(err, InstallerError::MetadataParse { .. }));
    }

    #[test]
    fn missing_tarball_is_a_parse_error() {
        let metadata = parse(
            r#"{
                "currentRelease": "0.7.34",
                "releases": [
                    {"updateTo": {"url": "https://cdn.example/kiro-0.7.34.zip"}},
                    {}
                ]
            }"#,
        );

        let err = descriptor_from(metadata).unwrap_err();
        let err = err.downcast_ref::<InstallerError>().unwrap();
        assert!(matches!(err, InstallerError::MetadataParse { .. }));
    }

    #[test]
    fn non_numeric_current_release_is_rejected() {
        let metadata = parse(
            r#"{
                "currentRelease": "latest",
                "releases": [{"updateTo": {"url": "https://cdn.example/kiro.tar.gz"}}]
            }"#,
        );

        let err = descriptor_from(metadata).unwrap_err();
        let err = err.downcast_ref::<InstallerError>().unwrap();
        assert!(matches!(err, InstallerError::InvalidVersion { .. }));
    }
}
