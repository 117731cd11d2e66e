//! kensa configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use jsonschema::Validator;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::walker::IgnoreFilter;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".kensa.json";

pub const DEFAULT_PLUGINS_DIR: &str = "wp-content/plugins";

pub const DEFAULT_CHECKSUM_URL: &str =
    "https://downloads.wordpress.org/plugin-checksums/{slug}/{version}.json";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KensaConfig {
    /// Directory holding the installed plugins.
    #[serde(default = "default_plugins_dir")]
    pub plugins_dir: PathBuf,

    /// URL template for checksum payloads.
    #[serde(default = "default_checksum_url")]
    pub checksum_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Glob patterns of package paths left out of directory scans.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Directory of the configuration file; relative paths resolve against it.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_plugins_dir() -> PathBuf {
    PathBuf::from(DEFAULT_PLUGINS_DIR)
}

fn default_checksum_url() -> String {
    DEFAULT_CHECKSUM_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl KensaConfig {
    pub fn new() -> Self {
        Self {
            plugins_dir: default_plugins_dir(),
            checksum_url: default_checksum_url(),
            timeout: default_timeout(),
            ignore: Vec::new(),
            base_dir: None,
        }
    }

    /// Finds `.kensa.json` in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        path.is_file().then_some(path)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| CoreError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;
        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Parses configuration from JSON with schema validation.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| CoreError::config(format!("Invalid JSON: {}", e)))?;

        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
            Validator::new(&schema_json).expect("Invalid config schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(CoreError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| CoreError::config(format!("Invalid config: {}", e)))
    }

    /// Plugins directory, resolved against the config file's directory.
    pub fn plugins_root(&self) -> PathBuf {
        match &self.base_dir {
            Some(base) if self.plugins_dir.is_relative() => base.join(&self.plugins_dir),
            _ => self.plugins_dir.clone(),
        }
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn ignore_filter(&self) -> Result<IgnoreFilter, CoreError> {
        IgnoreFilter::new(&self.ignore)
    }
}

impl Default for KensaConfig {
    fn default() -> Self {
        Self::new()
    }
}
