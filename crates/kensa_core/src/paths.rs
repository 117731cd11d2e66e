//! Resolution of package paths below the plugins root.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CoreError;
use crate::walker::{IgnoreFilter, LocalFileSet, enumerate_files, normalize_separators};

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn absolute(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Directory holding the package whose entry file is `entry_file`.
    pub fn package_dir(&self, entry_file: &str) -> PathBuf {
        self.absolute(entry_file)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone())
    }

    /// Whether the entry file sits directly in the plugins root.
    pub fn is_single_file(&self, entry_file: &str) -> bool {
        self.package_dir(entry_file) == self.root
    }

    /// Files belonging to a package, relative to its directory.
    ///
    /// A package living directly in the root is just its entry file; the
    /// root is shared with every other package and is never scanned.
    pub fn package_files(
        &self,
        entry_file: &str,
        filter: &IgnoreFilter,
    ) -> Result<LocalFileSet, CoreError> {
        if self.is_single_file(entry_file) {
            debug!("{} is a single-file package", entry_file);
            return Ok(LocalFileSet::from([normalize_separators(entry_file)]));
        }

        enumerate_files(&self.package_dir(entry_file), |relative| {
            filter.includes(relative)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_single_file_package_is_not_scanned() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("hello.php"), "<?php").unwrap();
        fs::write(dir.path().join("other.php"), "<?php").unwrap();

        let resolver = PathResolver::new(dir.path());
        assert!(resolver.is_single_file("hello.php"));

        let files = resolver
            .package_files("hello.php", &IgnoreFilter::default())
            .unwrap();
        assert_eq!(files.into_iter().collect::<Vec<_>>(), vec!["hello.php"]);
    }

    #[test]
    fn test_directory_package_is_scanned() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("akismet/views")).unwrap();
        fs::write(dir.path().join("akismet/akismet.php"), "<?php").unwrap();
        fs::write(dir.path().join("akismet/views/notice.php"), "<?php").unwrap();
        fs::write(dir.path().join("hello.php"), "<?php").unwrap();

        let resolver = PathResolver::new(dir.path());
        assert!(!resolver.is_single_file("akismet/akismet.php"));
        assert_eq!(
            resolver.package_dir("akismet/akismet.php"),
            dir.path().join("akismet")
        );

        let files = resolver
            .package_files("akismet/akismet.php", &IgnoreFilter::default())
            .unwrap();
        assert_eq!(
            files.into_iter().collect::<Vec<_>>(),
            vec!["akismet.php", "views/notice.php"]
        );
    }

    #[test]
    fn test_ignore_filter_applies_to_scans() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pkg/.git")).unwrap();
        fs::write(dir.path().join("pkg/main.php"), "").unwrap();
        fs::write(dir.path().join("pkg/.git/HEAD"), "").unwrap();

        let filter = IgnoreFilter::new(&[".git".to_string()]).unwrap();
        let files = PathResolver::new(dir.path())
            .package_files("pkg/main.php", &filter)
            .unwrap();

        assert_eq!(files.into_iter().collect::<Vec<_>>(), vec!["main.php"]);
    }

    #[test]
    fn test_missing_package_dir_is_an_error() {
        let dir = tempdir().unwrap();
        let result = PathResolver::new(dir.path())
            .package_files("gone/gone.php", &IgnoreFilter::default());

        assert!(matches!(result, Err(CoreError::Enumerate { .. })));
    }
}
