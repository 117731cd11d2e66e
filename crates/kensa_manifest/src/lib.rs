//! Checksum manifest types shared by the kensa crates.
//!
//! A manifest maps every file of a published package version to the hash
//! values that are accepted for it, per algorithm. Payloads are expected in
//! the shape served by the plugin checksum API:
//!
//! ```json
//! {
//!   "plugin_name": "akismet",
//!   "version": "5.3",
//!   "files": {
//!     "akismet.php": { "md5": "…", "sha256": ["…", "…"] }
//!   }
//! }
//! ```

pub mod integrity;

pub use integrity::{HashAlgorithm, UnknownAlgorithm};

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Error type for manifest operations.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to parse checksum payload: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// A single hash value or a list of them, as found on the wire.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accepted hash values for one file, keyed by algorithm name.
///
/// Values are stored as lowercase hex so they compare directly against
/// [`HashAlgorithm::digest_bytes`] output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, OneOrMany>")]
pub struct FileChecksums {
    hashes: BTreeMap<String, BTreeSet<String>>,
}

impl From<BTreeMap<String, OneOrMany>> for FileChecksums {
    fn from(raw: BTreeMap<String, OneOrMany>) -> Self {
        let mut checksums = FileChecksums::default();
        for (algorithm, values) in raw {
            let values = match values {
                OneOrMany::One(v) => vec![v],
                OneOrMany::Many(vs) => vs,
            };
            for value in values {
                checksums.insert(algorithm.clone(), value);
            }
        }
        checksums
    }
}

impl FileChecksums {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an accepted value for `algorithm`.
    pub fn insert(&mut self, algorithm: impl Into<String>, value: impl AsRef<str>) {
        self.hashes
            .entry(algorithm.into())
            .or_default()
            .insert(value.as_ref().to_ascii_lowercase());
    }

    /// Builder form of [`FileChecksums::insert`].
    pub fn with(mut self, algorithm: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.insert(algorithm, value);
        self
    }

    /// Accepted values for a supported algorithm, if the entry lists it.
    pub fn accepted(&self, algorithm: HashAlgorithm) -> Option<&BTreeSet<String>> {
        self.hashes.get(algorithm.name())
    }

    /// The strongest supported algorithm this entry offers, with its values.
    pub fn preferred(&self) -> Option<(HashAlgorithm, &BTreeSet<String>)> {
        HashAlgorithm::PREFERENCE
            .into_iter()
            .find_map(|algorithm| self.accepted(algorithm).map(|values| (algorithm, values)))
    }

    /// Algorithm names listed by this entry, supported or not.
    pub fn algorithms(&self) -> impl Iterator<Item = &str> {
        self.hashes.keys().map(String::as_str)
    }
}

/// Published checksums for one version of a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ChecksumManifest {
    files: BTreeMap<String, FileChecksums>,
}

impl ChecksumManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, checksums: FileChecksums) {
        self.files.insert(path.into(), checksums);
    }

    pub fn get(&self, path: &str) -> Option<&FileChecksums> {
        self.files.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileChecksums)> {
        self.files.iter().map(|(path, sums)| (path.as_str(), sums))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<P: Into<String>> FromIterator<(P, FileChecksums)> for ChecksumManifest {
    fn from_iter<I: IntoIterator<Item = (P, FileChecksums)>>(iter: I) -> Self {
        Self {
            files: iter
                .into_iter()
                .map(|(path, sums)| (path.into(), sums))
                .collect(),
        }
    }
}

/// Parses a checksum API payload.
///
/// Returns `Ok(None)` when the payload is valid JSON but carries no usable
/// `files` table; an empty JSON array counts as an empty manifest.
pub fn parse_payload(text: &str) -> Result<Option<ChecksumManifest>, ManifestError> {
    let value: Value = serde_json::from_str(text)?;

    let Some(files) = value.get("files") else {
        return Ok(None);
    };

    match files {
        Value::Object(_) => Ok(Some(ChecksumManifest::deserialize(files)?)),
        Value::Array(items) if items.is_empty() => Ok(Some(ChecksumManifest::new())),
        _ => Ok(None),
    }
}
