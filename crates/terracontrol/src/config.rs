//! Configuration management for the TerraControl panel.
//!
//! This module handles loading, validation, and conversion of the panel
//! configuration from TOML files and command-line arguments.

use crate::cli::Args;
use anyhow::Context;
use panel_core::PanelConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Game server connection settings
    pub server: ServerSettings,
    /// Panel behaviour settings
    #[serde(default)]
    pub panel: PanelSettings,
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the administration backend lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Base URL of the backend (e.g., "http://127.0.0.1:8080")
    pub base_url: String,
    /// Timeout for each API request in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Panel timings and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    /// Seconds between two full-status polls
    pub poll_interval_secs: u64,
    /// Seconds to wait after a kick before refreshing the player list
    pub kick_refresh_delay_secs: u64,
    /// Shortest accepted chat message, in characters
    pub message_min_len: usize,
    /// Longest accepted chat message, in characters
    pub message_max_len: usize,
    /// Number of log lines kept in the log window
    pub log_capacity: usize,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 10,
            kick_refresh_delay_secs: 3,
            message_min_len: 1,
            message_max_len: 256,
            log_capacity: 2000,
        }
    }
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    pub json_format: bool,
    /// Optional file path for log output; the interactive panel discards
    /// logs when this is unset
    pub file_path: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            file_path: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, creates a default configuration file at the
    /// specified path and returns the default configuration.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    ///
    /// The parsed configuration, or an error if the file cannot be read,
    /// parsed or created. Missing `[panel]` and `[logging]` sections and
    /// missing keys fall back to their defaults.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let config = AppConfig::load_from_file(Path::new("terracontrol.toml")).await?;
    /// config.validate().map_err(anyhow::Error::msg)?;
    /// ```
    pub async fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let config: AppConfig = toml::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Applies command-line overrides on top of the file settings.
    pub fn apply_overrides(&mut self, args: &Args) {
        if let Some(server) = &args.server {
            self.server.base_url = server.clone();
        }

        if let Some(log_level) = &args.log_level {
            self.logging.level = log_level.clone();
        }

        if args.json_logs {
            self.logging.json_format = true;
        }
    }

    /// Validates the configuration for consistency and correctness.
    ///
    /// # Returns
    ///
    /// `Ok(())` when the configuration is usable, or a message naming the
    /// first invalid setting: the server URL and its scheme, a zero timeout
    /// or poll interval, an empty message length range, a zero log capacity
    /// or an unknown log level.
    pub fn validate(&self) -> Result<(), String> {
        match Url::parse(&self.server.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(format!(
                    "Unsupported server URL scheme: {} (expected http or https)",
                    url.scheme()
                ))
            }
            Err(e) => {
                return Err(format!(
                    "Invalid server URL {}: {}",
                    &self.server.base_url, e
                ))
            }
        }

        if self.server.request_timeout_secs == 0 {
            return Err("Request timeout must be at least one second".to_string());
        }

        if self.panel.poll_interval_secs == 0 {
            return Err("Poll interval must be at least one second".to_string());
        }

        if self.panel.message_max_len == 0
            || self.panel.message_min_len > self.panel.message_max_len
        {
            return Err(format!(
                "Invalid message length range: {}..={}",
                self.panel.message_min_len, self.panel.message_max_len
            ));
        }

        if self.panel.log_capacity == 0 {
            return Err("Log capacity cannot be zero".to_string());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        Ok(())
    }

    /// Converts the file configuration into the panel core's configuration.
    pub fn to_panel_config(&self) -> anyhow::Result<PanelConfig> {
        let base_url = Url::parse(&self.server.base_url)
            .with_context(|| format!("invalid server URL {}", self.server.base_url))?;
        Ok(PanelConfig {
            base_url,
            request_timeout: Duration::from_secs(self.server.request_timeout_secs),
            poll_interval: Duration::from_secs(self.panel.poll_interval_secs),
            kick_refresh_delay: Duration::from_secs(self.panel.kick_refresh_delay_secs),
            message_len: self.panel.message_min_len..=self.panel.message_max_len,
            log_capacity: self.panel.log_capacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let panel = config
            .to_panel_config()
            .expect("Default config should convert to PanelConfig");
        assert_eq!(panel.base_url.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(panel.poll_interval, Duration::from_secs(10));
        assert_eq!(panel.kick_refresh_delay, Duration::from_secs(3));
        assert_eq!(panel.message_len, 1..=256);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.server.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.server.base_url = "ftp://game.example".to_string();
        assert!(config.validate().is_err());

        config.server.base_url = "https://game.example".to_string();
        config.panel.message_min_len = 10;
        config.panel.message_max_len = 5;
        assert!(config.validate().is_err());

        config.panel.message_min_len = 1;
        config.panel.poll_interval_secs = 0;
        assert!(config.validate().is_err());

        config.panel.poll_interval_secs = 10;
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "warn".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        let args = Args {
            server: Some("https://game.example:8443".to_string()),
            log_level: Some("debug".to_string()),
            json_logs: true,
            ..Default::default()
        };
        config.apply_overrides(&args);
        assert_eq!(config.server.base_url, "https://game.example:8443");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
    }

    #[tokio::test]
    async fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("terracontrol.toml");

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config.server.base_url, "http://127.0.0.1:8080");
        assert!(path.exists());

        let reloaded = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(reloaded.panel.log_capacity, config.panel.log_capacity);
    }

    #[tokio::test]
    async fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[server]
base_url = "http://10.0.0.5:8080"

[panel]
poll_interval_secs = 30
"#,
        )
        .unwrap();

        let config = AppConfig::load_from_file(file.path()).await.unwrap();
        assert_eq!(config.server.base_url, "http://10.0.0.5:8080");
        assert_eq!(config.server.request_timeout_secs, 10);
        assert_eq!(config.panel.poll_interval_secs, 30);
        assert_eq!(config.panel.kick_refresh_delay_secs, 3);
        assert_eq!(config.logging.level, "info");
    }
}
