//! Source of published checksum manifests.

use std::future::Future;

use kensa_manifest::ChecksumManifest;

/// Supplies the checksum manifest of a package version.
///
/// `Ok(None)` means the source answered but has no manifest for the
/// version; `Err` carries a cause worth showing to the user.
pub trait ManifestProvider {
    type Error: std::error::Error;

    fn fetch(
        &self,
        name: &str,
        version: &str,
    ) -> impl Future<Output = Result<Option<ChecksumManifest>, Self::Error>> + Send;
}
