//! Verification error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a verification run.
///
/// Per-package failures such as a missing version or an unavailable
/// manifest are not errors; they are recorded on the package's result.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A package directory could not be listed.
    #[error("Failed to enumerate files under {}: {source}", path.display())]
    Enumerate {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoreError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
