//! Discovery of installed plugins from their file headers.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use kensa_core::{InstalledPackage, PackageRegistry};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::RegistryError;

/// Only the beginning of a plugin file is searched for headers.
const HEADER_READ_LIMIT: u64 = 8 * 1024;

/// Headers declared in a plugin's main file comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginHeaders {
    pub name: Option<String>,
    pub version: Option<String>,
}

impl PluginHeaders {
    pub fn parse(content: &str) -> Self {
        let mut headers = Self::default();
        for line in content.split(['\n', '\r']) {
            if headers.name.is_none() {
                headers.name = header_value(line, "Plugin Name");
            }
            if headers.version.is_none() {
                headers.version = header_value(line, "Version");
            }
        }
        headers
    }
}

fn header_value(line: &str, field: &str) -> Option<String> {
    let line = line.trim_start_matches([' ', '\t']);
    let line = line.strip_prefix("<?php").unwrap_or(line);
    let line = line.trim_start_matches([' ', '\t', '/', '*', '#', '@']);

    let key = line.get(..field.len())?;
    if !key.eq_ignore_ascii_case(field) {
        return None;
    }

    let value = line[field.len()..].strip_prefix(':')?;
    let end = [value.find("*/"), value.find("?>")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(value.len());
    let value = value[..end].trim();

    (!value.is_empty()).then(|| value.to_string())
}

/// Plugins installed below a plugins directory.
///
/// Plugin files are `.php` files directly in the directory or one level
/// below it that declare a `Plugin Name` header.
#[derive(Debug, Clone)]
pub struct PluginDirectory {
    root: PathBuf,
}

impl PluginDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists installed plugins ordered by entry file.
    pub fn scan(&self) -> Result<Vec<InstalledPackage>, RegistryError> {
        if !self.root.is_dir() {
            return Err(RegistryError::RootNotFound(self.root.clone()));
        }

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(2)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        let mut packages = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    warn!("Skipping unreadable plugin path: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_php(entry.path()) {
                continue;
            }

            let headers = match read_headers(entry.path()) {
                Ok(headers) => headers,
                Err(e) => {
                    warn!("Failed to read {}: {}", entry.path().display(), e);
                    continue;
                }
            };

            if headers.name.is_none() {
                continue;
            }

            let Some(file) = relative_file(&self.root, entry.path()) else {
                continue;
            };
            let name = plugin_slug(&file);
            debug!("Found plugin {} ({})", name, file);

            packages.push(InstalledPackage {
                name,
                file,
                version: headers.version,
            });
        }

        packages.sort_by(|a, b| a.file.cmp(&b.file));
        Ok(packages)
    }
}

impl PackageRegistry for PluginDirectory {
    type Error = RegistryError;

    fn installed(&self) -> Result<Vec<InstalledPackage>, RegistryError> {
        self.scan()
    }
}

/// Slug of a plugin: its directory, or the file stem for single-file plugins.
pub fn plugin_slug(file: &str) -> String {
    match file.split_once('/') {
        Some((dir, _)) => dir.to_string(),
        None => file.strip_suffix(".php").unwrap_or(file).to_string(),
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_php(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "php")
}

fn read_headers(path: &Path) -> std::io::Result<PluginHeaders> {
    let mut buf = Vec::new();
    File::open(path)?
        .take(HEADER_READ_LIMIT)
        .read_to_end(&mut buf)?;
    Ok(PluginHeaders::parse(&String::from_utf8_lossy(&buf)))
}

fn relative_file(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}
