//! TOML Configuration File Support
//!
//! Loads the visualizer settings from `~/.config/sortviz/config.toml`.
//!
//! # Configuration Priority
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables (`SORTVIZ_*`)
//! 3. TOML configuration file
//! 4. Default values
//!
//! # XDG Base Directory Compliance
//!
//! The file lives at `$XDG_CONFIG_HOME/sortviz/config.toml`
//! (typically `~/.config/sortviz/config.toml`).
//!
//! # Example Configuration
//!
//! ```toml
//! [playback]
//! step_delay_ms = 100
//! algorithm = "QuickSort"
//!
//! [input]
//! min_bars = 5
//! max_bars = 50
//! min_value = 5
//! max_value = 1000
//! initial_bars = 30
//! seed = 42
//!
//! [controls]
//! debounce_ms = 200
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::algorithms::Algorithm;
use crate::debounce::DEFAULT_DEBOUNCE;
use crate::playback::PlaybackConfig;
use crate::run_config::InputLimits;

/// Environment variable for the pacing delay in milliseconds
pub const ENV_STEP_DELAY_MS: &str = "SORTVIZ_STEP_DELAY_MS";
/// Environment variable for the size debounce in milliseconds
pub const ENV_DEBOUNCE_MS: &str = "SORTVIZ_DEBOUNCE_MS";
/// Environment variable for the input RNG seed
pub const ENV_SEED: &str = "SORTVIZ_SEED";
/// Environment variable for the default algorithm
pub const ENV_ALGORITHM: &str = "SORTVIZ_ALGORITHM";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the highest-priority configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[playback]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackToml {
    /// Wait after each delivered step, in milliseconds
    pub step_delay_ms: Option<u64>,

    /// Algorithm used when none is named on the command line
    pub algorithm: Option<String>,
}

/// `[input]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputToml {
    /// Smallest allowed number of bars
    pub min_bars: Option<usize>,

    /// Largest allowed number of bars
    pub max_bars: Option<usize>,

    /// Smallest generated value
    pub min_value: Option<i64>,

    /// Largest generated value
    pub max_value: Option<i64>,

    /// Number of bars generated at startup
    pub initial_bars: Option<usize>,

    /// Seed for reproducible inputs
    pub seed: Option<u64>,
}

/// `[controls]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsToml {
    /// Quiet period before a size change is applied, in milliseconds
    pub debounce_ms: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerToml {
    /// Playback section
    pub playback: PlaybackToml,

    /// Input section
    pub input: InputToml,

    /// Controls section
    pub controls: ControlsToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved visualizer configuration
///
/// Use [`load_config`] to build one with proper priority handling.
#[derive(Clone, Debug)]
pub struct VisualizerConfig {
    /// Controller pacing
    pub playback: PlaybackConfig,

    /// Bounds for generated inputs
    pub limits: InputLimits,

    /// Bars generated at startup (clamped into the limits when used)
    pub initial_bars: usize,

    /// Seed for reproducible inputs
    pub seed: Option<u64>,

    /// Default algorithm
    pub algorithm: Algorithm,

    /// Quiet period before a requested size change takes effect
    pub debounce: Duration,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    source: ConfigSource,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        let limits = InputLimits::default();
        Self {
            playback: PlaybackConfig::default(),
            initial_bars: limits.max_bars,
            limits,
            seed: None,
            algorithm: Algorithm::default(),
            debounce: DEFAULT_DEBOUNCE,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl VisualizerConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Check the limits for contradictions
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a zero minimum bar count
    /// or an inverted bar or value range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = &self.limits;
        if limits.min_bars == 0 {
            return Err(ConfigError::ValidationError(
                "min_bars must be at least 1".to_string(),
            ));
        }
        if limits.min_bars > limits.max_bars {
            return Err(ConfigError::ValidationError(format!(
                "min_bars ({}) exceeds max_bars ({})",
                limits.min_bars, limits.max_bars
            )));
        }
        if limits.min_value > limits.max_value {
            return Err(ConfigError::ValidationError(format!(
                "min_value ({}) exceeds max_value ({})",
                limits.min_value, limits.max_value
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/sortviz/config.toml` or
/// `~/.config/sortviz/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("sortviz").join("config.toml"))
}

/// Load configuration from the default path, the environment and defaults
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the resulting limits are contradictory. A missing file is not an error.
pub fn load_config() -> Result<VisualizerConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// `None` skips the file and uses only defaults and environment variables.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or fails validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<VisualizerConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with a custom environment lookup
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<VisualizerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = VisualizerConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: VisualizerToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            info!(path = %config_path.display(), "Loaded configuration from file");
        } else {
            debug!(path = %config_path.display(), "Config file not found, using defaults");
        }
    }

    apply_env_config(&mut config, env);
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut VisualizerConfig, toml: &VisualizerToml) {
    if let Some(ms) = toml.playback.step_delay_ms {
        config.playback.step_delay = Duration::from_millis(ms);
    }
    if let Some(ref name) = toml.playback.algorithm {
        config.algorithm = Algorithm::from_name_or_default(name);
    }

    if let Some(min) = toml.input.min_bars {
        config.limits.min_bars = min;
    }
    if let Some(max) = toml.input.max_bars {
        config.limits.max_bars = max;
        if toml.input.initial_bars.is_none() {
            config.initial_bars = max;
        }
    }
    if let Some(min) = toml.input.min_value {
        config.limits.min_value = min;
    }
    if let Some(max) = toml.input.max_value {
        config.limits.max_value = max;
    }
    if let Some(initial) = toml.input.initial_bars {
        config.initial_bars = initial;
    }
    if toml.input.seed.is_some() {
        config.seed = toml.input.seed;
    }

    if let Some(ms) = toml.controls.debounce_ms {
        config.debounce = Duration::from_millis(ms);
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config<F>(config: &mut VisualizerConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = env(ENV_STEP_DELAY_MS) {
        match raw.parse::<u64>() {
            Ok(ms) => {
                config.playback.step_delay = Duration::from_millis(ms);
                config.source = ConfigSource::Env;
            }
            Err(_) => warn!(var = ENV_STEP_DELAY_MS, value = %raw, "Ignoring non-numeric value"),
        }
    }
    if let Some(raw) = env(ENV_DEBOUNCE_MS) {
        match raw.parse::<u64>() {
            Ok(ms) => {
                config.debounce = Duration::from_millis(ms);
                config.source = ConfigSource::Env;
            }
            Err(_) => warn!(var = ENV_DEBOUNCE_MS, value = %raw, "Ignoring non-numeric value"),
        }
    }
    if let Some(raw) = env(ENV_SEED) {
        match raw.parse::<u64>() {
            Ok(seed) => {
                config.seed = Some(seed);
                config.source = ConfigSource::Env;
            }
            Err(_) => warn!(var = ENV_SEED, value = %raw, "Ignoring non-numeric value"),
        }
    }
    if let Some(name) = env(ENV_ALGORITHM) {
        config.algorithm = Algorithm::from_name_or_default(&name);
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Step delay override (milliseconds)
    pub step_delay_ms: Option<u64>,

    /// Debounce override (milliseconds)
    pub debounce_ms: Option<u64>,

    /// Initial bar count override
    pub initial_bars: Option<usize>,

    /// Seed override
    pub seed: Option<u64>,

    /// Algorithm override
    pub algorithm: Option<Algorithm>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set step delay override
    #[must_use]
    pub fn with_step_delay_ms(mut self, ms: u64) -> Self {
        self.step_delay_ms = Some(ms);
        self
    }

    /// Set debounce override
    #[must_use]
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = Some(ms);
        self
    }

    /// Set initial bar count override
    #[must_use]
    pub fn with_initial_bars(mut self, bars: usize) -> Self {
        self.initial_bars = Some(bars);
        self
    }

    /// Set seed override
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set algorithm override
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Whether any override is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.step_delay_ms.is_none()
            && self.debounce_ms.is_none()
            && self.initial_bars.is_none()
            && self.seed.is_none()
            && self.algorithm.is_none()
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut VisualizerConfig) {
        if !self.is_empty() {
            config.source = ConfigSource::Cli;
        }

        if let Some(ms) = self.step_delay_ms {
            config.playback.step_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.debounce_ms {
            config.debounce = Duration::from_millis(ms);
        }
        if let Some(bars) = self.initial_bars {
            config.initial_bars = bars;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
