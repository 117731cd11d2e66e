//! Per-package verification results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::verifier::ChecksumDiff;

/// Maximum number of files reported per category.
pub const MAX_REPORTED_FILES: usize = 20;

/// Machine-readable cause of a package that could not be checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    PluginVersionNotFound,
    PluginChecksumNotFound,
}

impl FailureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureReason::PluginVersionNotFound => "plugin_version_not_found",
            FailureReason::PluginChecksumNotFound => "plugin_checksum_not_found",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulates findings for one package.
///
/// Any finding, reason or message marks the package as not verified.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    name: Option<String>,
    verified: bool,
    message: Option<String>,
    reason: Option<FailureReason>,
    added: Vec<String>,
    missing: Vec<String>,
    mismatch: Vec<String>,
    noalgorithm: Vec<String>,
}

impl Default for VerificationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationResult {
    pub fn new() -> Self {
        Self {
            name: None,
            verified: true,
            message: None,
            reason: None,
            added: Vec::new(),
            missing: Vec::new(),
            mismatch: Vec::new(),
            noalgorithm: Vec::new(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn set_reason(&mut self, reason: FailureReason) {
        self.verified = false;
        self.reason = Some(reason);
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.verified = false;
        self.message = Some(message.into());
    }

    pub fn add_missing_file(&mut self, file: impl Into<String>) {
        self.verified = false;
        self.missing.push(file.into());
    }

    pub fn add_added_file(&mut self, file: impl Into<String>) {
        self.verified = false;
        self.added.push(file.into());
    }

    pub fn add_mismatch_file(&mut self, file: impl Into<String>) {
        self.verified = false;
        self.mismatch.push(file.into());
    }

    pub fn add_noalgorithm_file(&mut self, file: impl Into<String>) {
        self.verified = false;
        self.noalgorithm.push(file.into());
    }

    /// Records every discrepancy of `diff`.
    pub fn record_diff(&mut self, diff: ChecksumDiff) {
        diff.missing
            .into_iter()
            .for_each(|file| self.add_missing_file(file));
        diff.added
            .into_iter()
            .for_each(|file| self.add_added_file(file));
        diff.mismatch
            .into_iter()
            .for_each(|file| self.add_mismatch_file(file));
        diff.noalgorithm
            .into_iter()
            .for_each(|file| self.add_noalgorithm_file(file));
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Finalizes the result: file lists are sorted and capped at
    /// [`MAX_REPORTED_FILES`].
    pub fn report(&self) -> VerificationReport {
        VerificationReport {
            name: self.name.clone(),
            verified: self.verified,
            message: self.message.clone(),
            reason: self.reason,
            added: capped(&self.added),
            mismatch: capped(&self.mismatch),
            missing: capped(&self.missing),
            noalgorithm: capped(&self.noalgorithm),
        }
    }
}

fn capped(files: &[String]) -> Vec<String> {
    let mut files = files.to_vec();
    files.sort();
    files.truncate(MAX_REPORTED_FILES);
    files
}

/// Serializable summary of one package. Empty fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mismatch: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub noalgorithm: Vec<String>,
}
