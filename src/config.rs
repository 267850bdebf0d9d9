//! Configuration module.
//!
//! Handles loading, validating, and merging `thumbcrop.toml`. Stock defaults
//! are serialized to a TOML value and the user file is merged on top of
//! them, so a config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [batch]
//! temp_dir = ".thumbcrop-temp"   # Where previews are rendered
//! temp_url = "/thumbcrop-temp/"  # Public URL of temp_dir
//! cache_buster = false           # Add a timestamp to derivative names
//! hidden_sizes = []              # Sizes never offered or rendered
//!
//! [images]
//! quality = 90                   # JPEG quality (1-100)
//!
//! [processing]
//! max_processes = 4              # Max parallel workers (omit for auto = CPU cores)
//!
//! [[sizes]]                      # The size catalog, in display order
//! name = "thumbnail"
//! width = 150
//! height = 150
//! crop = true
//! ```
//!
//! Declaring `[[sizes]]` replaces the whole stock catalog. Unknown keys are
//! rejected to catch typos early.

use crate::types::SizeSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
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

/// Configuration loaded from `thumbcrop.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Naming and visibility settings handed to the batch coordinator.
    pub batch: BatchConfig,
    /// Encoding settings.
    pub images: ImagesConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// The size catalog, in display order.
    pub sizes: Vec<SizeSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch: BatchConfig::default(),
            images: ImagesConfig::default(),
            processing: ProcessingConfig::default(),
            sizes: default_sizes(),
        }
    }
}

fn default_sizes() -> Vec<SizeSpec> {
    vec![
        SizeSpec::new("thumbnail", 150, 150, true),
        SizeSpec::new("medium", 300, 300, false),
        SizeSpec::new("medium_large", 768, 0, false),
        SizeSpec::new("large", 1024, 1024, false),
    ]
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.quality == 0 || self.images.quality > 100 {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.batch.temp_url.is_empty() {
            return Err(ConfigError::Validation(
                "batch.temp_url must not be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for size in &self.sizes {
            if size.name.is_empty() {
                return Err(ConfigError::Validation(
                    "sizes.name must not be empty".into(),
                ));
            }
            if !seen.insert(size.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate size name: {}",
                    size.name
                )));
            }
        }
        Ok(())
    }
}

/// Everything the batch coordinator reads from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Directory previews (unsaved derivatives) are written to.
    pub temp_dir: PathBuf,
    /// Public URL prefix of `temp_dir`.
    pub temp_url: String,
    /// Insert a unix timestamp into derivative names so browsers refetch.
    pub cache_buster: bool,
    /// Size names excluded from every batch.
    pub hidden_sizes: Vec<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            temp_dir: PathBuf::from(".thumbcrop-temp"),
            temp_url: "/thumbcrop-temp/".to_string(),
            cache_buster: false,
            hidden_sizes: Vec::new(),
        }
    }
}

impl BatchConfig {
    pub fn is_hidden(&self, size: &str) -> bool {
        self.hidden_sizes.iter().any(|h| h == size)
    }
}

/// Encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self { quality: 90 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// The base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (including arrays) replace base values entirely.
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist, `Err` if it is not valid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(path)?)
}

/// Returns a fully-commented stock `thumbcrop.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# thumbcrop configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Batch naming and visibility
# ---------------------------------------------------------------------------
[batch]
# Directory unsaved previews are rendered into. Not cleaned up by thumbcrop.
temp_dir = ".thumbcrop-temp"

# Public URL of temp_dir.
temp_url = "/thumbcrop-temp/"

# Append a unix timestamp to derivative names (photo-150x150-1700000000.jpg)
# so browsers and CDNs fetch the new crop instead of a cached one.
cache_buster = false

# Sizes that are never listed or rendered.
hidden_sizes = []

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[images]
# JPEG quality (1 = worst, 100 = best). PNG and WebP are lossless.
quality = 90

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Size catalog
# ---------------------------------------------------------------------------
# crop = true renders exactly width x height. crop = false keeps the
# selection's aspect ratio; a width or height of 0 means "no limit".
# Declaring any [[sizes]] replaces this whole list.

[[sizes]]
name = "thumbnail"
width = 150
height = 150
crop = true

[[sizes]]
name = "medium"
width = 300
height = 300
crop = false

[[sizes]]
name = "medium_large"
width = 768
height = 0
crop = false

[[sizes]]
name = "large"
width = 1024
height = 1024
crop = false
"##
}
