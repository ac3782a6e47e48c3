//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `scenehub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mesh network settings.
    pub network: NetworkConfig,
    /// Scene snapshot storage.
    pub storage: StorageConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Virtual demo installation.
    pub demo: DemoConfig,
}

/// Mesh network settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Node id of this coordinator, added to every controller group.
    pub coordinator_id: u8,
    /// Buttons exposed by each scene controller.
    pub number_of_buttons: u8,
}

/// Snapshot file settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding the scenes.
    pub path: PathBuf,
    /// Save the scenes on shutdown.
    pub autosave: bool,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Populate the virtual network and create demo scenes when nothing is
    /// stored.
    pub enabled: bool,
}

impl Config {
    /// Load configuration from `scenehub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("scenehub.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(val) = var("SCENEHUB_COORDINATOR_ID") {
            self.network.coordinator_id = val.parse().map_err(|_| {
                ConfigError::Validation(format!("SCENEHUB_COORDINATOR_ID is not a node id: {val}"))
            })?;
        }
        if let Some(val) = var("SCENEHUB_STORAGE_PATH") {
            self.storage.path = PathBuf::from(val);
        }
        if let Some(val) = var("SCENEHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.network.coordinator_id == 0 {
            return Err(ConfigError::Validation(
                "coordinator_id must be non-zero".to_string(),
            ));
        }
        if !(2..=8).contains(&self.network.number_of_buttons) {
            return Err(ConfigError::Validation(format!(
                "number_of_buttons must be within 2..=8, got {}",
                self.network.number_of_buttons
            )));
        }
        Ok(())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            coordinator_id: 1,
            number_of_buttons: 5,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("scenes.json"),
            autosave: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "scenehubd=info,scenehub=info".to_string(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.network.coordinator_id, 1);
        assert_eq!(config.network.number_of_buttons, 5);
        assert_eq!(config.storage.path, PathBuf::from("scenes.json"));
        assert!(config.storage.autosave);
        assert!(config.demo.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [network]
            coordinator_id = 7
            number_of_buttons = 8

            [storage]
            path = '/var/lib/scenehub/scenes.json'
            autosave = false

            [logging]
            filter = 'debug'

            [demo]
            enabled = false
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.network.coordinator_id, 7);
        assert_eq!(config.network.number_of_buttons, 8);
        assert_eq!(config.storage.path, PathBuf::from("/var/lib/scenehub/scenes.json"));
        assert!(!config.storage.autosave);
        assert_eq!(config.logging.filter, "debug");
        assert!(!config.demo.enabled);
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [network]
            number_of_buttons = 3
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.network.number_of_buttons, 3);
        assert_eq!(config.network.coordinator_id, 1);
        assert!(config.storage.autosave);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.network.coordinator_id, 1);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_zero_coordinator() {
        let mut config = Config::default();
        config.network.coordinator_id = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_button_count_outside_indicator_width() {
        let mut config = Config::default();
        config.network.number_of_buttons = 9;
        assert!(config.validate().is_err());
        config.network.number_of_buttons = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_apply_overrides_with_rust_log_winning() {
        let mut config = Config::default();
        config
            .apply_overrides(|key| match key {
                "SCENEHUB_COORDINATOR_ID" => Some("9".to_string()),
                "SCENEHUB_STORAGE_PATH" => Some("/tmp/s.json".to_string()),
                "SCENEHUB_LOG" => Some("warn".to_string()),
                "RUST_LOG" => Some("trace".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.network.coordinator_id, 9);
        assert_eq!(config.storage.path, PathBuf::from("/tmp/s.json"));
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_leave_config_untouched_without_env() {
        let mut config = Config::default();
        config.apply_overrides(no_env).unwrap();
        assert_eq!(config.logging.filter, "scenehubd=info,scenehub=info");
    }

    #[test]
    fn should_reject_non_numeric_coordinator_override() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| {
            (key == "SCENEHUB_COORDINATOR_ID").then(|| "node-one".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
