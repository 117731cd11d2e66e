//! Comparison of a local file set against a checksum manifest.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use kensa_manifest::{ChecksumManifest, FileChecksums, HashAlgorithm};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::walker::LocalFileSet;

/// File names that only count as changed in strict mode. Matched against the
/// base name, ignoring ASCII case.
pub const SOFT_CHANGE_FILES: &[&str] = &["readme.txt", "readme.md"];

/// Produces content digests for package-relative paths.
pub trait ContentHasher: Sync {
    fn digest(&self, path: &str, algorithm: HashAlgorithm) -> io::Result<String>;
}

/// Hashes files on disk below a package directory.
#[derive(Debug, Clone)]
pub struct DiskHasher {
    root: PathBuf,
}

impl DiskHasher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContentHasher for DiskHasher {
    fn digest(&self, path: &str, algorithm: HashAlgorithm) -> io::Result<String> {
        let mut file = File::open(self.root.join(path))?;
        algorithm.digest_reader(&mut file)
    }
}

/// Discrepancies between a manifest and a local file set, unsorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumDiff {
    /// Local files the manifest does not know about.
    pub added: Vec<String>,
    /// Manifest files absent locally.
    pub missing: Vec<String>,
    /// Files whose content matches none of the accepted hashes.
    pub mismatch: Vec<String>,
    /// Manifest entries offering no supported algorithm.
    pub noalgorithm: Vec<String>,
}

impl ChecksumDiff {
    pub fn is_clean(&self) -> bool {
        self.added.is_empty()
            && self.missing.is_empty()
            && self.mismatch.is_empty()
            && self.noalgorithm.is_empty()
    }
}

/// Outcome of checking a single file present in both sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCheck {
    Verified,
    Mismatch,
    NoAlgorithm,
}

pub fn is_soft_change_file(path: &str) -> bool {
    let base = path.rsplit('/').next().unwrap_or(path);
    SOFT_CHANGE_FILES
        .iter()
        .any(|name| base.eq_ignore_ascii_case(name))
}

/// Checks one file with the strongest algorithm its entry offers.
///
/// Exactly one algorithm is consulted. A file that cannot be read is a
/// mismatch.
pub fn check_file<H>(path: &str, checksums: &FileChecksums, hasher: &H) -> FileCheck
where
    H: ContentHasher + ?Sized,
{
    let Some((algorithm, accepted)) = checksums.preferred() else {
        return FileCheck::NoAlgorithm;
    };

    match hasher.digest(path, algorithm) {
        Ok(actual) if accepted.contains(&actual) => FileCheck::Verified,
        Ok(actual) => {
            debug!("{} {} does not match: {}", path, algorithm, actual);
            FileCheck::Mismatch
        }
        Err(e) => {
            warn!("Failed to read {} for hashing: {}", path, e);
            FileCheck::Mismatch
        }
    }
}

/// Diffs `local_files` against `manifest`.
///
/// Unless `strict` is set, soft-change files present in both sets are not
/// hashed and never reported.
pub fn verify<H>(
    manifest: &ChecksumManifest,
    local_files: &LocalFileSet,
    hasher: &H,
    strict: bool,
) -> ChecksumDiff
where
    H: ContentHasher + ?Sized,
{
    let mut diff = ChecksumDiff {
        missing: manifest
            .paths()
            .filter(|path| !local_files.contains(*path))
            .map(str::to_string)
            .collect(),
        ..ChecksumDiff::default()
    };

    let mut candidates = Vec::new();
    for path in local_files {
        match manifest.get(path) {
            None => diff.added.push(path.clone()),
            Some(_) if !strict && is_soft_change_file(path) => {
                debug!("Skipping soft change file {}", path);
            }
            Some(checksums) => candidates.push((path, checksums)),
        }
    }

    let checks: Vec<(&String, FileCheck)> = candidates
        .par_iter()
        .map(|(path, checksums)| (*path, check_file(path, checksums, hasher)))
        .collect();

    for (path, check) in checks {
        match check {
            FileCheck::Verified => {}
            FileCheck::Mismatch => diff.mismatch.push(path.clone()),
            FileCheck::NoAlgorithm => diff.noalgorithm.push(path.clone()),
        }
    }

    diff
}
