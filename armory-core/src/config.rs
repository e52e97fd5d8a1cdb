//! Armory configuration
//!
//! ## Configuration Sources (in precedence order)
//!
//! 1. CLI flags (`--page-size`, `--endpoint`, ...)
//! 2. `--config <path>` or `~/.config/armory/config.yaml`
//! 3. Built-in defaults
//!
//! ```yaml
//! catalog:
//!   endpoint: https://api.tanki.su/wot/encyclopedia/vehicles/
//!   application_id: 22716c2a0bff5e7fbced747f4c19b614
//!   timeout_seconds: 30
//! table:
//!   page_size_options: [10, 25, 50]
//!   initial_page_size: 25
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default encyclopedia endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.tanki.su/wot/encyclopedia/vehicles/";

/// Public application id of the encyclopedia client
pub const DEFAULT_APPLICATION_ID: &str = "22716c2a0bff5e7fbced747f4c19b614";

/// Fields requested from the API, in request order
pub const DEFAULT_FIELDS: &[&str] = &[
    "tank_id",
    "name",
    "short_name",
    "tier",
    "type",
    "nation",
    "is_premium",
    "is_gift",
    "images.small_icon",
];

/// Page sizes offered when none (or only invalid ones) are configured
pub const DEFAULT_PAGE_SIZE_OPTIONS: &[usize] = &[10, 25, 50];

/// Lower bound for the HTTP timeout
pub const MIN_TIMEOUT_SECONDS: u64 = 5;

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArmoryConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub table: TableConfig,
}

/// Where and how to fetch the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Encyclopedia vehicles endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Application id sent with every request
    #[serde(default = "default_application_id")]
    pub application_id: String,

    /// Fields to request
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,

    /// Optional response language (e.g. "ru", "en")
    #[serde(default)]
    pub language: Option<String>,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            application_id: default_application_id(),
            fields: default_fields(),
            language: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_application_id() -> String {
    DEFAULT_APPLICATION_ID.to_string()
}

fn default_fields() -> Vec<String> {
    DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect()
}

fn default_timeout() -> u64 {
    30
}

impl CatalogConfig {
    /// Query parameters for the vehicles request
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("application_id".to_string(), self.application_id.clone()),
            ("fields".to_string(), self.fields.join(",")),
        ];
        if let Some(language) = &self.language {
            params.push(("language".to_string(), language.clone()));
        }
        params
    }

    /// Timeout with the lower bound applied
    pub fn effective_timeout_seconds(&self) -> u64 {
        if self.timeout_seconds < MIN_TIMEOUT_SECONDS {
            tracing::warn!(
                "Configured timeout_seconds={} is too low; using minimum of {} seconds",
                self.timeout_seconds,
                MIN_TIMEOUT_SECONDS
            );
            MIN_TIMEOUT_SECONDS
        } else {
            self.timeout_seconds
        }
    }
}

/// Page-size settings for the table
///
/// Values are kept raw here; sanitizing happens in
/// [`PageSizeOptions`](crate::view::PageSizeOptions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<i64>,

    #[serde(default)]
    pub initial_page_size: Option<i64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size_options: default_page_size_options(),
            initial_page_size: None,
        }
    }
}

fn default_page_size_options() -> Vec<i64> {
    DEFAULT_PAGE_SIZE_OPTIONS.iter().map(|&n| n as i64).collect()
}

impl ArmoryConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let path = Self::default_config_path()?;
        Self::load_from_path(&path)
    }

    /// Load configuration from a specific path
    ///
    /// A missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(content).context("Failed to parse armory config YAML")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self).context("Failed to serialize armory config")
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = directories::ProjectDirs::from("", "", "armory")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .context("Could not determine config directory")?;

        Ok(config_dir.join("config.yaml"))
    }
}
