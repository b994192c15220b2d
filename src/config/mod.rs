//! Configuration file support for trellis.
//!
//! This module handles loading and validating settings from the configuration file
//! located at `~/.config/trellis/config.toml`. Settings cover the canvas surface,
//! pointer gesture thresholds, and animation defaults.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::ColorSpec;
pub use types::{AnimationConfig, CanvasConfig, EventsConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const MAX_SIDE: u32 = 16384;

/// Main configuration structure containing all settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [canvas]
/// width = 800
/// height = 600
/// pixel_ratio = 2.0
/// local_refresh = true
/// background = "white"
///
/// [events]
/// click_tolerance = 40.0
/// drag_delay_ms = 120
///
/// [animation]
/// default_easing = "cubic-out"
/// frame_interval_ms = 16.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Surface size and repaint behaviour
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Click and drag thresholds
    #[serde(default)]
    pub events: EventsConfig,

    /// Animation defaults
    #[serde(default)]
    pub animation: AnimationConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `canvas.width`, `canvas.height`: 1 - 16384
    /// - `canvas.pixel_ratio`: 0.5 - 4.0
    /// - `events.click_tolerance`: 0.0 - 10000.0
    /// - `events.drag_delay_ms`: 0 - 5000
    /// - `animation.frame_interval_ms`: 1.0 - 1000.0
    pub fn validate_and_clamp(&mut self) {
        if !(1..=MAX_SIDE).contains(&self.canvas.width) {
            log::warn!(
                "Invalid canvas width {}, clamping to 1-{} range",
                self.canvas.width,
                MAX_SIDE
            );
            self.canvas.width = self.canvas.width.clamp(1, MAX_SIDE);
        }

        if !(1..=MAX_SIDE).contains(&self.canvas.height) {
            log::warn!(
                "Invalid canvas height {}, clamping to 1-{} range",
                self.canvas.height,
                MAX_SIDE
            );
            self.canvas.height = self.canvas.height.clamp(1, MAX_SIDE);
        }

        // NaN fails the range check and clamps to the lower bound.
        if !(0.5..=4.0).contains(&self.canvas.pixel_ratio) {
            log::warn!(
                "Invalid pixel_ratio {:.2}, clamping to 0.5-4.0 range",
                self.canvas.pixel_ratio
            );
            self.canvas.pixel_ratio = clamp_f64(self.canvas.pixel_ratio, 0.5, 4.0);
        }

        if !(0.0..=10000.0).contains(&self.events.click_tolerance) {
            log::warn!(
                "Invalid click_tolerance {:.1}, clamping to 0.0-10000.0 range",
                self.events.click_tolerance
            );
            self.events.click_tolerance = clamp_f64(self.events.click_tolerance, 0.0, 10000.0);
        }

        if self.events.drag_delay_ms > 5000 {
            log::warn!(
                "Invalid drag_delay_ms {}, clamping to 0-5000 range",
                self.events.drag_delay_ms
            );
            self.events.drag_delay_ms = 5000;
        }

        if !(1.0..=1000.0).contains(&self.animation.frame_interval_ms) {
            log::warn!(
                "Invalid frame_interval_ms {:.1}, clamping to 1.0-1000.0 range",
                self.animation.frame_interval_ms
            );
            self.animation.frame_interval_ms =
                clamp_f64(self.animation.frame_interval_ms, 1.0, 1000.0);
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/trellis/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("trellis");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config = Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.validate_and_clamp();

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Parses configuration text without validating it.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Saves the configuration to `path` as TOML, creating parent directories.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, the config cannot be
    /// serialized, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, config_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// JSON schema of the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() { min } else { value.clamp(min, max) }
}
