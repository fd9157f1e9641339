//! Configuration management for arduino-harvest
//!
//! Settings are read from environment variables with defaults, so the tool can
//! be steered from a CMake or CI environment without changing the command line.
//!
//! # Environment Variables
//!
//! - `ARDUINO_HARVEST_CLI`: arduino-cli program to run - default: "arduino-cli"
//! - `ARDUINO_HARVEST_EXTRA_ARGS`: extra arguments for `arduino-cli compile`,
//!   split with shell quoting rules - default: none
//! - `ARDUINO_HARVEST_LOG_LEVEL`: Logging level - default: "info"
//! - `ARDUINO_HARVEST_LOG_JSON`: JSON log lines (true|false) - default: "false"
//!
//! # Example
//!
//! ```no_run
//! use arduino_harvest::HarvestConfig;
//!
//! let config = HarvestConfig::default();
//! config.validate().expect("Invalid configuration");
//! let cli = config.build_tool(Vec::new()).expect("Invalid configuration");
//! ```

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use thiserror::Error;

use crate::probe::ArduinoCli;
use crate::util::logging::try_parse_level;
use crate::util::try_split_line;

const DEFAULT_CLI: &str = "arduino-cli";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    /// Program invoked for probe builds
    pub cli: String,

    /// Unsplit pass-through arguments for the compile command
    pub extra_args: String,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for HarvestConfig {
    /// Loads from `ARDUINO_HARVEST_*` environment variables with defaults
    fn default() -> Self {
        let cli = env::var("ARDUINO_HARVEST_CLI").unwrap_or_else(|_| DEFAULT_CLI.to_string());

        let extra_args = env::var("ARDUINO_HARVEST_EXTRA_ARGS").unwrap_or_default();

        let log_level = env::var("ARDUINO_HARVEST_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_json = env::var("ARDUINO_HARVEST_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            cli,
            extra_args,
            log_level,
            log_json,
        }
    }
}

impl HarvestConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an empty CLI program, an unknown log level or
    /// extra arguments with unbalanced quotes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cli.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "ARDUINO_HARVEST_CLI must name a program".to_string(),
            ));
        }

        if try_parse_level(&self.log_level).is_none() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        self.extra_args()?;
        Ok(())
    }

    /// Pass-through arguments split with shell quoting rules
    pub fn extra_args(&self) -> Result<Vec<String>, ConfigError> {
        if self.extra_args.trim().is_empty() {
            return Ok(Vec::new());
        }
        try_split_line(&self.extra_args).ok_or_else(|| ConfigError::ParseError {
            field: "ARDUINO_HARVEST_EXTRA_ARGS".to_string(),
            error: format!("unbalanced quoting in '{}'", self.extra_args),
        })
    }

    /// Builds the arduino-cli runner with the given build properties
    pub fn build_tool(&self, properties: Vec<String>) -> Result<ArduinoCli, ConfigError> {
        Ok(ArduinoCli::new(self.cli.clone())
            .with_properties(properties)
            .with_extra_args(self.extra_args()?))
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("cli".to_string(), self.cli.clone());
        map.insert("extra_args".to_string(), self.extra_args.clone());
        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert("log_json".to_string(), self.log_json.to_string());
        map
    }
}

impl fmt::Display for HarvestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "arduino-harvest Configuration:")?;
        writeln!(f, "  CLI: {}", self.cli)?;
        writeln!(f, "  Extra Args: {}", self.extra_args)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Log JSON: {}", self.log_json)?;
        Ok(())
    }
}
