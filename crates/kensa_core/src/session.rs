//! Verification of one or more installed packages.

use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::package::{InstalledPackage, PackageLookup};
use crate::paths::PathResolver;
use crate::provider::ManifestProvider;
use crate::result::{FailureReason, VerificationReport, VerificationResult};
use crate::verifier::{DiskHasher, verify};
use crate::walker::IgnoreFilter;

/// Options applied identically to every package of a session.
#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    /// Report soft-change files too.
    pub strict: bool,
    /// Version to verify against instead of the installed one.
    pub version: Option<String>,
    /// Paths left out of directory scans.
    pub filter: IgnoreFilter,
}

/// Reports of a session, in the order the packages were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub reports: Vec<VerificationReport>,
    /// True when every package verified.
    pub succeeded: bool,
}

pub struct VerificationSession<'a, P> {
    lookup: &'a PackageLookup,
    provider: P,
    paths: PathResolver,
    options: VerifyOptions,
}

impl<'a, P: ManifestProvider> VerificationSession<'a, P> {
    pub fn new(
        lookup: &'a PackageLookup,
        provider: P,
        paths: PathResolver,
        options: VerifyOptions,
    ) -> Self {
        Self {
            lookup,
            provider,
            paths,
            options,
        }
    }

    /// Verifies `packages` one after another.
    ///
    /// Only a failure to list a package's files stops the run; everything
    /// else is recorded on that package's report.
    pub async fn run(&self, packages: &[InstalledPackage]) -> Result<SessionOutcome, CoreError> {
        let mut reports = Vec::with_capacity(packages.len());
        let mut succeeded = true;

        for package in packages {
            let report = self.verify_package(package).await?.report();
            succeeded = succeeded && report.verified;
            reports.push(report);
        }

        info!(
            "Verified {} package(s): {}",
            reports.len(),
            if succeeded { "all passed" } else { "some failed" }
        );

        Ok(SessionOutcome { reports, succeeded })
    }

    pub async fn verify_package(
        &self,
        package: &InstalledPackage,
    ) -> Result<VerificationResult, CoreError> {
        let mut result = VerificationResult::new();
        result.set_name(&package.name);

        let Some(version) = self.resolve_version(package) else {
            debug!("No version found for {}", package.name);
            result.set_reason(FailureReason::PluginVersionNotFound);
            return Ok(result);
        };

        let manifest = match self.provider.fetch(&package.name, &version).await {
            Ok(Some(manifest)) => manifest,
            Ok(None) => {
                debug!("No checksums published for {} {}", package.name, version);
                result.set_reason(FailureReason::PluginChecksumNotFound);
                return Ok(result);
            }
            Err(e) => {
                warn!(
                    "Failed to fetch checksums for {} {}: {}",
                    package.name, version, e
                );
                result.set_message(e.to_string());
                result.set_reason(FailureReason::PluginChecksumNotFound);
                return Ok(result);
            }
        };

        let files = self
            .paths
            .package_files(&package.file, &self.options.filter)?;
        let hasher = DiskHasher::new(self.paths.package_dir(&package.file));

        debug!(
            "Checking {} local file(s) of {} {} against {} manifest entries",
            files.len(),
            package.name,
            version,
            manifest.len()
        );

        result.record_diff(verify(&manifest, &files, &hasher, self.options.strict));
        Ok(result)
    }

    fn resolve_version(&self, package: &InstalledPackage) -> Option<String> {
        match self.options.version.as_deref() {
            Some(version) if !version.is_empty() => Some(version.to_string()),
            _ => self.lookup.version_of(&package.file).map(str::to_string),
        }
    }
}
