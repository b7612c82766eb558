//! Global constants used throughout the kiro-up codebase.
//!
//! This module contains the release endpoint, well-known file names, and
//! network parameters that are used across multiple modules. Defining them
//! centrally improves maintainability and makes magic values more
//! discoverable.

use std::time::Duration;

use crate::version::ReleaseVersion;

/// Metadata endpoint for the stable Linux x64 release channel.
///
/// The endpoint returns a JSON document with a `currentRelease` version
/// string and a `releases` array whose entries carry the download URLs.
pub const METADATA_URL: &str =
    "https://prod.download.desktop.kiro.dev/stable/metadata-linux-x64-stable.json";

/// Product name as it appears in the extracted tree and desktop entry.
pub const PRODUCT_NAME: &str = "Kiro";

/// Name of the executable to locate inside the extracted tree.
pub const BINARY_NAME: &str = "kiro";

/// One-line file under the install root recording the installed version.
pub const MARKER_FILE_NAME: &str = ".kiro_version";

/// Generated detached-launch wrapper script under the install root.
pub const WRAPPER_FILE_NAME: &str = "kiro-launcher.sh";

/// Desktop entry file name under the user's applications directory.
pub const DESKTOP_FILE_NAME: &str = "kiro.desktop";

/// System-wide symlink location on the binary search path.
pub const SYSTEM_LINK_PATH: &str = "/usr/local/bin/kiro";

/// Platform/channel suffix baked into the tarball file name.
pub const ARCHIVE_SUFFIX: &str = "stable-linux-x64";

/// User agent sent with metadata and download requests.
pub const USER_AGENT: &str = concat!("kiro-up/", env!("CARGO_PKG_VERSION"));

/// Connection timeout for HTTP requests (30 seconds).
///
/// Applies to connection establishment only. Downloads themselves are not
/// bounded by a total timeout since release tarballs can be hundreds of
/// megabytes on slow links.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tarball file name for a given release version, following the naming
/// convention used by the Kiro download service.
pub fn archive_file_name(version: &ReleaseVersion) -> String {
    format!("kiro-ide-{version}-{ARCHIVE_SUFFIX}.tar.gz")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_file_name_follows_convention() {
        let version: ReleaseVersion = "0.7.34".parse().unwrap();
        assert_eq!(
            archive_file_name(&version),
            "kiro-ide-0.7.34-stable-linux-x64.tar.gz"
        );
    }
}
