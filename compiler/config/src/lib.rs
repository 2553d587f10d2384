#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! go2proto Configuration
//!
//! This crate provides configuration management for go2proto.
//! A configuration file specifies:
//! - The Go package paths to read
//! - The message name filter
//! - The output file and whether struct tags are emitted
//! - Logging configuration
//!
//! Configuration is stored in TOML format. Every key is optional; command-line
//! flags take precedence over file values.

use std::path::{Path, PathBuf};

use logging::LogLevel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Output path used when none is configured.
pub const DEFAULT_OUTPUT: &str = "./output.proto";

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Configuration file was not found at the specified path
    #[error("Config file not found at: {0}")]
    NotFound(PathBuf),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Go package directories; a trailing `/...` includes sub-packages
    pub inputs: Vec<String>,
    /// Keep only messages whose final name contains this substring
    pub filter: String,
    /// Destination `.proto` file
    pub output: PathBuf,
    /// Emit struct tags as field options
    pub use_tags: bool,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: LogLevel,
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/go2proto/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("go2proto");
        Ok(config_dir.join("config.toml"))
    }

    /// Load `explicit` if given, otherwise the default file if it exists.
    ///
    /// A missing explicit file is an error; a missing default file yields
    /// [`Config::default`].
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Ok(path) if path.exists() => Self::from_file(path),
            Ok(_) | Err(ConfigError::ConfigDirUnavailable) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            filter: String::new(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            use_tags: false,
            logging: LoggingConfig::default(),
        }
    }
}
