// Configuration loading and parsing (config/toolkit.toml).
//
// The config file is optional: a missing file means built-in defaults, so
// the binary runs out of the box. A present-but-invalid file is an error.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub draw: DrawConfig,
    pub grouping: GroupingConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Total length of the cosmetic spin before settlement.
    pub spin_duration_ms: u64,
    /// Interval between candidate-name flashes during the spin.
    pub spin_cadence_ms: u64,
    /// Initial "allow repeat winners" setting; togglable at runtime.
    pub allow_repeat: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Initial members-per-team value for BY_SIZE mode.
    pub default_size: usize,
    /// Initial team-count value for BY_COUNT mode.
    pub default_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory grouping exports are written to.
    pub dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            draw: DrawConfig::default(),
            grouping: GroupingConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for DrawConfig {
    fn default() -> Self {
        DrawConfig {
            spin_duration_ms: 2000,
            spin_cadence_ms: 50,
            allow_repeat: false,
        }
    }
}

impl Default for GroupingConfig {
    fn default() -> Self {
        GroupingConfig {
            default_size: 2,
            default_count: 2,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            dir: ".".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load configuration from `config/toolkit.toml` under the given base
/// directory. A missing file yields the built-in defaults.
///
/// This is the lower-level loading primitive; prefer `load_config()` which
/// resolves against the current working directory.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("toolkit.toml");

    let config = if path.exists() {
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::ParseError {
            path: path.clone(),
            source,
        })?
    } else {
        Config::default()
    };

    validate(&config)?;
    Ok(config)
}

/// Load configuration relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|source| ConfigError::Io {
        path: PathBuf::from("."),
        source,
    })?;
    load_config_from(&cwd)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.draw.spin_cadence_ms == 0 {
        return Err(ConfigError::ValidationError {
            field: "draw.spin_cadence_ms".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    if config.draw.spin_duration_ms < config.draw.spin_cadence_ms {
        return Err(ConfigError::ValidationError {
            field: "draw.spin_duration_ms".to_string(),
            message: "must be at least one cadence interval".to_string(),
        });
    }
    if config.grouping.default_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "grouping.default_size".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    if config.grouping.default_count == 0 {
        return Err(ConfigError::ValidationError {
            field: "grouping.default_count".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
