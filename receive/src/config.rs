use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_animation_duration_ms() -> u64 {
    300
}

fn default_copied_message_ms() -> u64 {
    2000
}

fn default_large_share_padding() -> f32 {
    20.0
}

fn default_small_share_padding() -> f32 {
    12.0
}

fn default_qr_size() -> u32 {
    186
}

/// Timings and geometry of the receive screen panels.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PanelConfig {
    /// Duration of a panel expand or collapse animation.
    #[serde(default = "default_animation_duration_ms")]
    pub animation_duration_ms: u64,
    /// How long the copy confirmation stays open before collapsing by itself.
    #[serde(default = "default_copied_message_ms")]
    pub copied_message_ms: u64,
    /// Padding above the share panel while it is collapsed.
    #[serde(default = "default_large_share_padding")]
    pub large_share_padding: f32,
    /// Padding above the share panel while it is expanded.
    #[serde(default = "default_small_share_padding")]
    pub small_share_padding: f32,
    /// Side of the square address encoding, in pixels.
    #[serde(default = "default_qr_size")]
    pub qr_size: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            animation_duration_ms: default_animation_duration_ms(),
            copied_message_ms: default_copied_message_ms(),
            large_share_padding: default_large_share_padding(),
            small_share_padding: default_small_share_padding(),
            qr_size: default_qr_size(),
        }
    }
}

impl PanelConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str::<PanelConfig>(content)
            .map_err(|e| ConfigError::ReadingFile(format!("Parsing panel configuration: {}", e)))?;
        config.check()?;
        Ok(config)
    }

    /// Make sure the settings are sane.
    pub fn check(&self) -> Result<(), ConfigError> {
        if !(self.small_share_padding >= 0.0 && self.small_share_padding <= self.large_share_padding)
        {
            return Err(ConfigError::InvalidField(
                "small_share_padding",
                format!(
                    "must be between 0 and large_share_padding ({})",
                    self.large_share_padding
                ),
            ));
        }
        if self.qr_size == 0 {
            return Err(ConfigError::InvalidField(
                "qr_size",
                "must not be zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    pub fn copied_message_delay(&self) -> Duration {
        Duration::from_millis(self.copied_message_ms)
    }
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum ConfigError {
    InvalidField(&'static str, String),
    NotFound,
    ReadingFile(String),
    Unexpected(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "Config file not found"),
            Self::InvalidField(field, message) => {
                write!(f, "Config field {} is invalid: {}", field, message)
            }
            Self::ReadingFile(e) => write!(f, "Error while reading file: {}", e),
            Self::Unexpected(e) => write!(f, "Unexpected error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::ReadingFile(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors() {
        let not_found = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert_eq!(ConfigError::from(not_found), ConfigError::NotFound);
        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(matches!(
            ConfigError::from(denied),
            ConfigError::ReadingFile(_)
        ));
    }

    #[test]
    fn defaults_from_empty_file() {
        let config = PanelConfig::from_toml("").unwrap();
        assert_eq!(config, PanelConfig::default());
        assert_eq!(config.copied_message_delay(), Duration::from_secs(2));
        assert_eq!(config.animation_duration(), Duration::from_millis(300));
    }

    #[test]
    fn partial_file() {
        let config = PanelConfig::from_toml(
            r#"
            copied_message_ms = 1500
            small_share_padding = 8.0
            "#,
        )
        .unwrap();
        assert_eq!(config.copied_message_ms, 1500);
        assert_eq!(config.small_share_padding, 8.0);
        assert_eq!(config.large_share_padding, 20.0);
    }

    #[test]
    fn insane_paddings() {
        let err = PanelConfig::from_toml(
            r#"
            large_share_padding = 10.0
            small_share_padding = 12.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField("small_share_padding", _)
        ));
    }

    #[test]
    fn zero_qr_size() {
        assert_eq!(
            PanelConfig::from_toml("qr_size = 0").unwrap_err(),
            ConfigError::InvalidField("qr_size", "must not be zero".to_string())
        );
    }

    #[test]
    fn garbage() {
        assert!(matches!(
            PanelConfig::from_toml("qr_size = \"big\""),
            Err(ConfigError::ReadingFile(_))
        ));
    }
}
