// Configuration utilities
// Author: Gabriel Demetrios Lafis

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::processing::{
    MeltOptions, RecastOptions, DEFAULT_SAMPLE_SIZE, DEFAULT_VALUE_LABEL, DEFAULT_VARIABLE_LABEL,
};
use super::{AppError, AppResult};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub reshape: ReshapeConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

/// Defaults for melt and recast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReshapeConfig {
    pub sample_size: usize,
    pub variable_label: String,
    pub value_label: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

impl Default for ReshapeConfig {
    fn default() -> Self {
        ReshapeConfig {
            sample_size: DEFAULT_SAMPLE_SIZE,
            variable_label: DEFAULT_VARIABLE_LABEL.to_string(),
            value_label: DEFAULT_VALUE_LABEL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON or YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        let config = match extension {
            "json" => serde_json::from_str(&contents)?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)?,
            other => {
                return Err(AppError::Config(format!(
                    "Unsupported config file format: '{}'",
                    other
                )))
            }
        };

        Ok(config)
    }

    /// Get the log level filter
    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "off" => log::LevelFilter::Off,
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        }
    }

    /// Melt options seeded with the configured labels
    pub fn melt_options(&self) -> MeltOptions {
        MeltOptions::new()
            .with_variable_label(&self.reshape.variable_label)
            .with_value_label(&self.reshape.value_label)
    }

    /// Recast options seeded with the configured labels and sample size
    pub fn recast_options(&self) -> RecastOptions {
        RecastOptions::new()
            .with_variable_fields(self.reshape.variable_label.as_str())
            .with_value_field(&self.reshape.value_label)
            .with_sample_size(self.reshape.sample_size)
    }
}
