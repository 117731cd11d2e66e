//! # kensa_core
//!
//! Checksum verification engine for kensa.
//!
//! This crate provides:
//! - File enumeration below a package root
//! - The manifest-versus-disk diff
//! - Per-package result aggregation and serialization
//! - The `VerificationSession` orchestrating several packages
//!
//! Fetching manifests and listing installed packages are left to
//! implementations of [`ManifestProvider`] and [`PackageRegistry`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use kensa_core::{PackageLookup, PathResolver, VerificationSession, VerifyOptions};
//!
//! let lookup = PackageLookup::from_registry(&registry)?;
//! let session = VerificationSession::new(
//!     &lookup,
//!     fetcher,
//!     PathResolver::new("wp-content/plugins"),
//!     VerifyOptions::default(),
//! );
//!
//! let outcome = session.run(&lookup.all()).await?;
//! println!("{}", serde_json::to_string(&outcome.reports)?);
//! ```

mod config;
mod error;
pub mod package;
pub mod paths;
pub mod provider;
mod result;
mod session;
pub mod verifier;
pub mod walker;

pub use config::{
    CONFIG_FILE_NAME, DEFAULT_CHECKSUM_URL, DEFAULT_PLUGINS_DIR, DEFAULT_TIMEOUT_SECS,
    KensaConfig,
};
pub use error::CoreError;
pub use package::{InstalledPackage, PackageLookup, PackageRegistry};
pub use paths::PathResolver;
pub use provider::ManifestProvider;
pub use result::{FailureReason, MAX_REPORTED_FILES, VerificationReport, VerificationResult};
pub use session::{SessionOutcome, VerificationSession, VerifyOptions};
pub use verifier::{ChecksumDiff, ContentHasher, DiskHasher, SOFT_CHANGE_FILES, verify};
pub use walker::{IgnoreFilter, LocalFileSet, enumerate_files};

pub use kensa_manifest::{ChecksumManifest, FileChecksums, HashAlgorithm};
