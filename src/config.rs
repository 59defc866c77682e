//! Tool configuration.
//!
//! Handles loading, validating, and merging `double-avatar.toml`. Stock
//! defaults are the base layer; a user file only needs the keys it wants
//! to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [avatar]
//! size = 256                # Output diameter in pixels
//! antialias = true          # Smooth the circle edge
//!
//! [double]
//! overlap = 0.3             # Fraction of the diameter shared by both avatars
//! border_width = 4          # Ring around the front avatar, in pixels
//! border_color = "#ffffff"  # #rrggbb or #rrggbbaa; transparent cuts a gap
//!
//! [processing]
//! max_processes = 4         # Max parallel workers for `batch` (omit for auto)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{
    CircleCropParams, Diameter, DoubleAvatarParams, ImagingError, parse_hex_color,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "double-avatar.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

impl From<ImagingError> for ConfigError {
    fn from(err: ImagingError) -> Self {
        ConfigError::Validation(err.to_string())
    }
}

/// Tool configuration loaded from `double-avatar.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AvatarConfig {
    /// Single-avatar settings.
    pub avatar: AvatarSection,
    /// Double-avatar composition settings.
    pub double: DoubleSection,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AvatarSection {
    /// Output diameter in pixels.
    pub size: i64,
    /// Smooth the circle edge over sub-pixel samples.
    pub antialias: bool,
}

impl Default for AvatarSection {
    fn default() -> Self {
        Self {
            size: 256,
            antialias: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DoubleSection {
    /// Fraction of the diameter both avatars share, `0 <= overlap < 1`.
    pub overlap: f32,
    /// Width of the ring around the front avatar, in pixels.
    pub border_width: u32,
    /// Ring color as `#rrggbb` or `#rrggbbaa`.
    pub border_color: String,
}

impl Default for DoubleSection {
    fn default() -> Self {
        Self {
            overlap: 0.3,
            border_width: 4,
            border_color: "#ffffff".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
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
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

impl AvatarConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.circle_params()?;
        self.double_params()?.validate()?;
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Circle crop parameters from the `[avatar]` section.
    pub fn circle_params(&self) -> Result<CircleCropParams, ConfigError> {
        Ok(CircleCropParams {
            diameter: Diameter::new(self.avatar.size)?,
            antialias: self.avatar.antialias,
        })
    }

    /// Double-avatar parameters from the `[avatar]` and `[double]` sections.
    pub fn double_params(&self) -> Result<DoubleAvatarParams, ConfigError> {
        Ok(DoubleAvatarParams {
            diameter: Diameter::new(self.avatar.size)?,
            overlap: self.double.overlap,
            border_width: self.double.border_width,
            border_color: parse_hex_color(&self.double.border_color)?,
            antialias: self.avatar.antialias,
        })
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AvatarConfig::default()).expect("default config must serialize")
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

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<AvatarConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AvatarConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load a config file.
///
/// With `Some(path)` the file must exist. With `None`, [`DEFAULT_CONFIG_FILE`]
/// in the working directory is used if present, otherwise stock defaults.
pub fn load_config(path: Option<&Path>) -> Result<AvatarConfig, ConfigError> {
    let overlay = match path {
        Some(p) => Some(read_toml(p)?),
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if fallback.exists() {
                Some(read_toml(fallback)?)
            } else {
                None
            }
        }
    };
    resolve_config(overlay)
}

fn read_toml(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# double-avatar configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Picked up from ./double-avatar.toml, or pass --config <file>.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Circular avatar
# ---------------------------------------------------------------------------
[avatar]
# Output diameter in pixels, between 1 and 16384.
size = 256

# Smooth the circle edge. With false, pixels are either fully inside or
# fully transparent.
antialias = true

# ---------------------------------------------------------------------------
# Double avatar (two overlapping circles)
# ---------------------------------------------------------------------------
[double]
# Fraction of the diameter both avatars share. 0 = side by side.
# Must be below 1.
overlap = 0.3

# Ring painted around the front avatar, in pixels. 0 disables it.
border_width = 4

# Ring color, #rrggbb or #rrggbbaa. A fully transparent color cuts a gap
# into the back avatar instead of painting.
border_color = "#ffffff"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for the batch command.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
