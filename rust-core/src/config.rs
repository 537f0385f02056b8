//! CLI settings. Resolution order, highest priority first:
//! CLI flags > `AIRMOBILITY_*` env vars > TOML file (`--config`) > defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const LOG_ENV: &str = "AIRMOBILITY_LOG";
pub const PRETTY_ENV: &str = "AIRMOBILITY_PRETTY";

const DEFAULT_LOG_FILTER: &str = "airmobility=info";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON on stdout. Default: false.
    pub pretty: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string. Default: `airmobility=info`.
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub pretty: bool,
    pub log_level: Option<String>,
}

impl Config {
    pub fn load(path: Option<&Path>, cli: &CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };

        if let Ok(level) = std::env::var(LOG_ENV) {
            config.logging.level = Some(level);
        }
        if let Ok(pretty) = std::env::var(PRETTY_ENV) {
            config.output.pretty = Some(matches!(pretty.as_str(), "1" | "true" | "yes"));
        }

        if cli.pretty {
            config.output.pretty = Some(true);
        }
        if cli.log_level.is_some() {
            config.logging.level = cli.log_level.clone();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(level) = &self.logging.level {
            if level.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "logging.level".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn pretty(&self) -> bool {
        self.output.pretty.unwrap_or(false)
    }

    pub fn log_filter(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}
