//! Installed packages and the lookup table built from them.

use std::collections::{HashMap, HashSet};

use tracing::warn;

/// A package installed under the plugins root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    /// Slug used to request checksums, e.g. `akismet`.
    pub name: String,
    /// Entry file relative to the plugins root, e.g. `akismet/akismet.php`.
    pub file: String,
    /// Version declared by the package, if any.
    pub version: Option<String>,
}

impl InstalledPackage {
    pub fn new(name: impl Into<String>, file: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            version: version.map(str::to_string),
        }
    }
}

/// Source of installed packages.
pub trait PackageRegistry {
    type Error: std::error::Error + Send + Sync + 'static;

    fn installed(&self) -> Result<Vec<InstalledPackage>, Self::Error>;
}

/// Installed packages indexed by entry file, built once per session.
#[derive(Debug, Clone, Default)]
pub struct PackageLookup {
    packages: Vec<InstalledPackage>,
    versions: HashMap<String, String>,
}

impl PackageLookup {
    pub fn new(packages: Vec<InstalledPackage>) -> Self {
        let versions = packages
            .iter()
            .filter_map(|p| {
                p.version
                    .as_ref()
                    .filter(|v| !v.is_empty())
                    .map(|v| (p.file.clone(), v.clone()))
            })
            .collect();

        Self { packages, versions }
    }

    pub fn from_registry<R: PackageRegistry>(registry: &R) -> Result<Self, R::Error> {
        registry.installed().map(Self::new)
    }

    /// First installed package with the given slug.
    pub fn find(&self, name: &str) -> Option<&InstalledPackage> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Resolves slugs to packages, warning about and skipping unknown ones.
    pub fn resolve(&self, names: &[String]) -> Vec<InstalledPackage> {
        names
            .iter()
            .filter_map(|name| {
                let found = self.find(name).cloned();
                if found.is_none() {
                    warn!("The '{}' plugin could not be found.", name);
                }
                found
            })
            .collect()
    }

    /// One package per distinct slug, in registry order.
    pub fn all(&self) -> Vec<InstalledPackage> {
        let mut seen = HashSet::new();
        self.packages
            .iter()
            .filter(|p| seen.insert(p.name.as_str()))
            .cloned()
            .collect()
    }

    /// Installed version of the package whose entry file is `file`.
    /// An empty version counts as unknown.
    pub fn version_of(&self, file: &str) -> Option<&str> {
        self.versions.get(file).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
