//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. User values are
//! layered over stock defaults, so a config file only needs the keys it wants
//! to change. CLI positional arguments override the `[generator]` values.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [generator]
//! source = "assets/projects"     # Folder scanned for project folders
//! prefix = "assets/projects"     # URL prefix written into image paths
//!
//! [loader]
//! assets_root = "./assets/projects"
//! api_endpoint = "/api/projects" # "" skips the API tier
//! fallback_folders = ["RU-SM", "B-SJL", "CASA-XD", "LM-H-1", "Antena", "VIS"]
//! guess_count = 12               # Numbered guesses when index.json is missing
//!
//! [http]
//! timeout_secs = 10              # Omit for the transport default
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Manifest generator defaults.
    pub generator: GeneratorConfig,
    /// Project loader data sources.
    pub loader: LoaderConfig,
    /// HTTP transport settings.
    pub http: HttpConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generator.source.trim().is_empty() {
            return Err(ConfigError::Validation(
                "generator.source must not be empty".into(),
            ));
        }
        if self.loader.assets_root.trim().is_empty() {
            return Err(ConfigError::Validation(
                "loader.assets_root must not be empty".into(),
            ));
        }
        if self.loader.guess_count > 99 {
            return Err(ConfigError::Validation(
                "loader.guess_count must be 0-99".into(),
            ));
        }
        if let Some(bad) = self
            .loader
            .fallback_folders
            .iter()
            .find(|f| f.is_empty() || f.contains('/'))
        {
            return Err(ConfigError::Validation(format!(
                "loader.fallback_folders entry {bad:?} must be a plain folder name"
            )));
        }
        Ok(())
    }
}

/// Manifest generator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Directory holding one subdirectory per project.
    pub source: String,
    /// URL prefix image paths are built under.
    pub prefix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            source: "assets/projects".into(),
            prefix: "assets/projects".into(),
        }
    }
}

/// Fallback cascade settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Site-relative root of the project folders and `manifest.json`.
    pub assets_root: String,
    /// Endpoint returning `{ "projects": [...] }`. `None` or `""` skips the
    /// API tier.
    pub api_endpoint: Option<String>,
    /// Folders tried by the last-resort tier when nothing else answers.
    pub fallback_folders: Vec<String>,
    /// How many `NN.jpg` names to guess for folders without `index.json`.
    pub guess_count: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            assets_root: "./assets/projects".into(),
            api_endpoint: Some("/api/projects".into()),
            fallback_folders: ["RU-SM", "B-SJL", "CASA-XD", "LM-H-1", "Antena", "VIS"]
                .into_iter()
                .map(String::from)
                .collect(),
            guess_count: 12,
        }
    }
}

impl LoaderConfig {
    /// The API endpoint, if the API tier is enabled.
    pub fn api_endpoint(&self) -> Option<&str> {
        self.api_endpoint.as_deref().filter(|e| !e.trim().is_empty())
    }
}

/// HTTP transport settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Per-request timeout. When absent, requests wait as long as the
    /// transport allows.
    pub timeout_secs: Option<u64>,
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Name of the config file looked up in the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no config file exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, falling back to
/// stock defaults when the file is absent.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# portfolio-gal configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Manifest generator
# ---------------------------------------------------------------------------
[generator]
# Folder containing one subdirectory per project. manifest.json is written here.
source = "assets/projects"

# URL prefix joined with folder and file name to form each image path.
prefix = "assets/projects"

# ---------------------------------------------------------------------------
# Project loader (API -> manifest.json -> fallback folders)
# ---------------------------------------------------------------------------
[loader]
# Site-relative location of the project folders and manifest.json.
assets_root = "./assets/projects"

# Endpoint returning { "projects": [...] }. Set to "" to skip the API tier.
api_endpoint = "/api/projects"

# Folders tried when neither the API nor manifest.json answers.
fallback_folders = ["RU-SM", "B-SJL", "CASA-XD", "LM-H-1", "Antena", "VIS"]

# Number of 01.jpg, 02.jpg, ... names guessed for folders without index.json.
guess_count = 12

# ---------------------------------------------------------------------------
# HTTP
# ---------------------------------------------------------------------------
[http]
# Per-request timeout in seconds. Omit to wait for the transport default.
# timeout_secs = 10
"##
}
