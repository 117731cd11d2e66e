//! Recursive file enumeration under a package root.
//!
//! Paths are reported relative to the root and always use `/` as the
//! separator, so they compare directly against manifest keys.

use std::collections::BTreeSet;
use std::path::{Component, Path};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::CoreError;

/// Relative, `/`-separated file paths found under a package root.
pub type LocalFileSet = BTreeSet<String>;

/// Lists every file below `root` for which `include` returns true.
///
/// The predicate sees directories as well as files; rejecting a directory
/// prunes everything beneath it. Any traversal error, including a missing
/// root, is returned rather than skipped.
pub fn enumerate_files<F>(root: &Path, include: F) -> Result<LocalFileSet, CoreError>
where
    F: Fn(&str) -> bool,
{
    let mut files = LocalFileSet::new();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || include(&relative_path(root, entry.path())));

    for entry in walker {
        let entry = entry.map_err(|source| CoreError::Enumerate {
            path: root.to_path_buf(),
            source,
        })?;

        if entry.depth() > 0 && is_file(&entry) {
            files.insert(relative_path(root, entry.path()));
        }
    }

    debug!("Enumerated {} files under {}", files.len(), root.display());
    Ok(files)
}

// Directory symlinks are not descended into, but a link to a regular file
// is still part of the package.
fn is_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Normalizes a caller-supplied relative path to `/` separators.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Inclusion predicate built from glob patterns of paths to leave out.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    globs: Option<GlobSet>,
}

impl IgnoreFilter {
    pub fn new(patterns: &[String]) -> Result<Self, CoreError> {
        if patterns.is_empty() {
            return Ok(Self::default());
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .map_err(|e| CoreError::config(format!("Invalid ignore pattern '{}': {}", pattern, e)))?;
            builder.add(glob);
        }

        let globs = builder
            .build()
            .map_err(|e| CoreError::config(format!("Failed to build globset: {}", e)))?;

        Ok(Self { globs: Some(globs) })
    }

    /// Whether `relative` should take part in verification.
    pub fn includes(&self, relative: &str) -> bool {
        !self
            .globs
            .as_ref()
            .is_some_and(|globs| globs.is_match(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_enumerate_lists_nested_files_relative_to_root() {
        let dir = tempdir().unwrap();
        write(dir.path(), "akismet.php", "<?php");
        write(dir.path(), "views/config.php", "<?php");
        write(dir.path(), "_inc/img/logo.svg", "<svg/>");
        fs::create_dir_all(dir.path().join("empty")).unwrap();

        let files = enumerate_files(dir.path(), |_| true).unwrap();

        assert_eq!(
            files.into_iter().collect::<Vec<_>>(),
            vec!["_inc/img/logo.svg", "akismet.php", "views/config.php"]
        );
    }

    #[test]
    fn test_enumerate_applies_predicate_to_directories() {
        let dir = tempdir().unwrap();
        write(dir.path(), "main.php", "");
        write(dir.path(), "vendor/lib/a.php", "");
        write(dir.path(), "notes.bak", "");

        let files = enumerate_files(dir.path(), |rel| rel != "vendor" && !rel.ends_with(".bak"))
            .unwrap();

        assert_eq!(files.into_iter().collect::<Vec<_>>(), vec!["main.php"]);
    }

    #[test]
    fn test_enumerate_missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        match enumerate_files(&missing, |_| true) {
            Err(CoreError::Enumerate { path, .. }) => assert_eq!(path, missing),
            other => panic!("Expected Enumerate error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_enumerate_includes_file_symlinks() {
        let dir = tempdir().unwrap();
        write(dir.path(), "real.php", "");
        std::os::unix::fs::symlink(dir.path().join("real.php"), dir.path().join("link.php"))
            .unwrap();

        let files = enumerate_files(dir.path(), |_| true).unwrap();
        assert!(files.contains("link.php"));
        assert!(files.contains("real.php"));
    }

    #[test]
    fn test_normalize_separators() {
        assert_eq!(normalize_separators(r"inc\admin\page.php"), "inc/admin/page.php");
        assert_eq!(normalize_separators("inc/page.php"), "inc/page.php");
    }

    #[test]
    fn test_ignore_filter() {
        let filter = IgnoreFilter::new(&["**/.DS_Store".to_string(), ".git".to_string()]).unwrap();

        assert!(!filter.includes(".git"));
        assert!(!filter.includes("assets/.DS_Store"));
        assert!(filter.includes("assets/logo.png"));
        assert!(IgnoreFilter::default().includes(".git"));
    }

    #[test]
    fn test_ignore_filter_invalid_pattern() {
        let err = IgnoreFilter::new(&["a[".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Invalid ignore pattern"));
    }
}
