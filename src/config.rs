use crate::ruler::Easing;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RulerConfig {
    pub min_value: i32,
    pub max_value: i32,
    /// Distance between two adjacent ticks, in pixels.
    pub tick_spacing: i32,
    /// Fixed long tick height. Derived from the viewport height when unset.
    pub long_tick_height: Option<f64>,
    /// Fixed short tick height. Derived from the long tick height when unset.
    pub short_tick_height: Option<f64>,
    /// Every Nth tick is drawn long.
    pub long_tick_interval: u32,
    pub center_marker_height: f64,
    pub initial_value: Option<i32>,
    pub padding_top: f64,
    pub padding_bottom: f64,
    pub short_tick_inset: f64,
    pub tick_width: f64,
    pub marker_width: f64,
    pub min_fling_velocity: f64,
    pub max_fling_velocity: f64,
    /// px/s²
    pub fling_deceleration: f64,
    pub snap_duration_ms: u64,
    pub snap_easing: Easing,
}

impl Default for RulerConfig {
    fn default() -> Self {
        Self {
            min_value: 0,
            max_value: 155,
            tick_spacing: 11,
            long_tick_height: None,
            short_tick_height: None,
            long_tick_interval: 10,
            center_marker_height: 70.0,
            initial_value: None,
            padding_top: 0.0,
            padding_bottom: 0.0,
            short_tick_inset: 10.0,
            tick_width: 1.5,
            marker_width: 4.0,
            min_fling_velocity: 50.0,
            max_fling_velocity: 8_000.0,
            fling_deceleration: 2_000.0,
            snap_duration_ms: 200,
            snap_easing: Easing::default(),
        }
    }
}

impl RulerConfig {
    pub fn tick_count(&self) -> i32 {
        self.max_value - self.min_value
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_spacing <= 0 {
            return Err(ConfigError::InvalidTickSpacing(self.tick_spacing));
        }
        if self.min_value >= self.max_value {
            return Err(ConfigError::InvertedRange {
                min: self.min_value,
                max: self.max_value,
            });
        }
        if self.long_tick_interval == 0 {
            return Err(ConfigError::InvalidTickInterval);
        }
        let (min_fling, max_fling) = (self.min_fling_velocity, self.max_fling_velocity);
        if !(min_fling.is_finite() && max_fling.is_finite() && 0.0 <= min_fling && min_fling <= max_fling)
        {
            return Err(ConfigError::InvalidFlingVelocity {
                min: min_fling,
                max: max_fling,
            });
        }
        if !(self.fling_deceleration.is_finite() && self.fling_deceleration > 0.0) {
            return Err(ConfigError::InvalidFlingDeceleration(self.fling_deceleration));
        }
        self.max_value
            .checked_sub(self.min_value)
            .and_then(|count| count.checked_mul(self.tick_spacing))
            .ok_or(ConfigError::RangeTooLarge {
                min: self.min_value,
                max: self.max_value,
                spacing: self.tick_spacing,
            })?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SweepConfig {
    pub interval_ms: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self { interval_ms: 150 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub ruler: RulerConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Tick spacing must be positive, got {0}")]
    InvalidTickSpacing(i32),
    #[error("Minimum value {min} must be below maximum value {max}")]
    InvertedRange { min: i32, max: i32 },
    #[error("Long tick interval must be positive")]
    InvalidTickInterval,
    #[error("Fling velocity limits must satisfy 0 <= min <= max, got {min}..{max}")]
    InvalidFlingVelocity { min: f64, max: f64 },
    #[error("Fling deceleration must be positive, got {0}")]
    InvalidFlingDeceleration(f64),
    #[error("Range {min}..={max} at spacing {spacing} does not fit in pixel space")]
    RangeTooLarge { min: i32, max: i32, spacing: i32 },
}

const CONFIG_FILE: &str = "config.toml";
const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub fn config_path() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("org", "scale-ruler", "scale-ruler")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
        .ok_or(ConfigError::ConfigDirNotFound)
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path()?)
}

/// Reads `path` if it exists, layers `RULER_*` environment overrides on top and validates the
/// ruler section.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("RULER")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()?;
    config.ruler.validate()?;
    Ok(config)
}

pub fn load_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        log::error!("Failed to load config, using defaults: {}", e);
        Config::default()
    })
}

/// Writes the commented default config unless a file is already there. Returns its path.
pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = config_path()?;
    if path.exists() {
        log::info!("Keeping existing config at {}", path.display());
        return Ok(path);
    }
    if let Some(dir) = path.parent() {
        fs_err::create_dir_all(dir)?;
    }
    fs_err::write(&path, DEFAULT_CONFIG)?;
    Ok(path)
}
