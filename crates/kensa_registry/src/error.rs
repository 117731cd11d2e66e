//! Error types for registry and fetch operations.

use std::path::PathBuf;

use kensa_manifest::ManifestError;
use thiserror::Error;

/// Error type for checksum fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network request failed.
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Server answered with something other than 200.
    #[error("Couldn't fetch response from {url} (HTTP code {status}).")]
    HttpStatus { url: String, status: u16 },

    /// Response body exceeds the size limit.
    #[error("Response too large: {size} bytes exceeds maximum of {max} bytes")]
    ResponseTooLarge { size: u64, max: u64 },

    /// Payload parsing failed.
    #[error("Invalid manifest: {0}")]
    InvalidManifest(#[from] ManifestError),
}

/// Error type for installed plugin discovery.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Plugins directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Failed to read plugins directory: {0}")]
    Walk(#[from] walkdir::Error),
}
