use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use receive::config::{ConfigError, PanelConfig};
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter;

pub const DEFAULT_FILE_NAME: &str = "receive.toml";

fn default_addresses() -> Vec<String> {
    vec![
        "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq".to_string(),
        "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh".to_string(),
        "tb1qkldgvljmjpxrjq2ev5qxe8dvhn0dph9q85pwtfkjeanmwdue2akqj4twxj".to_string(),
    ]
}

fn default_deposit_amount() -> u64 {
    10_000
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// log level, can be "info", "debug", "trace".
    pub log_level: Option<String>,
    /// Log at debug level if true and no log level is set.
    pub debug: Option<bool>,
    /// Receive addresses of the demo wallet, used in order.
    #[serde(default = "default_addresses")]
    pub addresses: Vec<String>,
    /// Credit the demo wallet at this interval.
    pub deposit_interval_secs: Option<u64>,
    #[serde(default = "default_deposit_amount")]
    pub deposit_amount: u64,
    #[serde(default)]
    pub panels: PanelConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            debug: None,
            addresses: default_addresses(),
            deposit_interval_secs: None,
            deposit_amount: default_deposit_amount(),
            panels: PanelConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str::<Config>(&content).map_err(|e| {
            ConfigError::ReadingFile(format!("Parsing configuration file: {}", e))
        })?;

        config.check()?;
        Ok(config)
    }

    /// Like [`Config::from_file`], but a missing file means the default configuration.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::from_file(path) {
            Err(ConfigError::NotFound) => {
                tracing::info!("No configuration file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            res => res,
        }
    }

    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string(&self).map_err(|e| {
            ConfigError::Unexpected(format!("Failed to serialize config: {}", e))
        })?;

        let mut config_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| ConfigError::Unexpected(e.to_string()))?;

        config_file.write_all(content.as_bytes()).map_err(|e| {
            tracing::warn!("failed to write to file: {:?}", e);
            ConfigError::Unexpected(e.to_string())
        })?;

        tracing::info!("Done writing gui configuration file");
        Ok(())
    }

    /// Make sure the settings are sane.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.log_level()?;
        self.panels.check()?;
        if self.addresses.is_empty() {
            return Err(ConfigError::InvalidField(
                "addresses",
                "at least one address is needed".to_string(),
            ));
        }
        if self.deposit_interval_secs == Some(0) {
            return Err(ConfigError::InvalidField(
                "deposit_interval_secs",
                "must not be zero".to_string(),
            ));
        }
        if self.deposit_amount == 0 {
            return Err(ConfigError::InvalidField(
                "deposit_amount",
                "must not be zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn log_level(&self) -> Result<filter::LevelFilter, ConfigError> {
        if let Some(level) = &self.log_level {
            match level.as_ref() {
                "info" => Ok(filter::LevelFilter::INFO),
                "debug" => Ok(filter::LevelFilter::DEBUG),
                "trace" => Ok(filter::LevelFilter::TRACE),
                _ => Err(ConfigError::InvalidField(
                    "log_level",
                    format!("Unknown value '{}'", level),
                )),
            }
        } else if let Some(true) = self.debug {
            Ok(filter::LevelFilter::DEBUG)
        } else {
            Ok(filter::LevelFilter::INFO)
        }
    }
}
