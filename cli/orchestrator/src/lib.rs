#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
//! Command-line surface of the go2proto binary.
//!
//! Flags are merged over the optional TOML configuration; a flag that is
//! given always wins over the file.

use std::path::PathBuf;

use clap::Parser;
use config::{Config, ConfigError};
use logging::LogLevel;
use pipeline::{PipelineError, Settings};
use thiserror::Error;

/// Errors that can occur during a go2proto run.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The pipeline failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Command-line arguments.
#[derive(Parser, Debug, Default)]
#[command(name = "go2proto", about = "Generate proto3 messages from Go struct definitions", version)]
pub struct Cli {
    /// Comma-separated Go package directories; a trailing `/...` includes sub-packages
    #[arg(short, long, value_delimiter = ',', value_name = "PATHS")]
    pub paths: Vec<String>,
    /// Keep only messages whose name contains this substring
    #[arg(short, long)]
    pub filter: Option<String>,
    /// Output file [default: ./output.proto]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Emit struct tags as `(tagger.tags)` field options
    #[arg(short, long)]
    pub tags: bool,
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Also write the resolved messages as JSON
    #[arg(long, value_name = "FILE")]
    pub dump_ir: Option<PathBuf>,
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl Cli {
    /// Load the configuration named by `--config`, or the default file if present.
    pub fn load_config(&self) -> Result<Config> { Ok(Config::load(self.config.as_deref())?) }

    /// Effective log level.
    pub fn log_level(&self, config: &Config) -> LogLevel {
        self.log_level.unwrap_or(config.logging.level)
    }

    /// Merge flags over `config` into pipeline settings.
    pub fn settings(&self, config: &Config) -> Settings {
        let paths: Vec<String> =
            self.paths.iter().map(|p| p.trim()).filter(|p| !p.is_empty()).map(String::from).collect();
        Settings {
            inputs: if paths.is_empty() { config.inputs.clone() } else { paths },
            filter: self.filter.clone().unwrap_or_else(|| config.filter.clone()),
            output: self.output.clone().unwrap_or_else(|| config.output.clone()),
            use_tags: self.tags || config.use_tags,
            dump_ir: self.dump_ir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_from([
            "go2proto", "-p", "./a, ./b/...", "-f", "Req", "-o", "out/x.proto", "-t", "--log-level", "debug",
        ])
        .expect("Failed to parse flags");

        let settings = cli.settings(&Config::default());
        assert_eq!(settings.inputs, vec!["./a".to_string(), "./b/...".to_string()]);
        assert_eq!(settings.filter, "Req");
        assert_eq!(settings.output, PathBuf::from("out/x.proto"));
        assert!(settings.use_tags);
        assert_eq!(cli.log_level(&Config::default()), LogLevel::Debug);
    }

    #[test]
    fn test_config_fills_missing_flags() {
        let config = Config {
            inputs: vec!["./models".to_string()],
            filter: "Event".to_string(),
            use_tags: true,
            ..Config::default()
        };

        let settings = Cli::default().settings(&config);
        assert_eq!(settings.inputs, vec!["./models".to_string()]);
        assert_eq!(settings.filter, "Event");
        assert_eq!(settings.output, PathBuf::from("./output.proto"));
        assert!(settings.use_tags);

        let cli = Cli { paths: vec!["./api".to_string()], filter: Some(String::new()), ..Cli::default() };
        let settings = cli.settings(&config);
        assert_eq!(settings.inputs, vec!["./api".to_string()]);
        assert!(settings.filter.is_empty());
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        assert!(Cli::try_parse_from(["go2proto", "--log-level", "loud"]).is_err());
    }
}
