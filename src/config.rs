//! Configuration management for classifier tooling
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (phonenumbers.toml)
//! - Environment variables (PHONENUMBERS__*)
//!
//! ## Example config file (phonenumbers.toml):
//! ```toml
//! [metadata]
//! path = "metadata/simple.json"
//! accepted_schemas = ["goui.net/phonenumbers/simple@1"]
//!
//! [logging]
//! level = "info"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::version::SchemaVersion;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Metadata settings
    #[serde(default)]
    pub metadata: MetadataConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Path to the metadata file
    #[serde(default = "default_metadata_path")]
    pub path: PathBuf,

    /// Accepted schema versions, as `namespace@version`
    #[serde(default)]
    pub accepted_schemas: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_metadata_path() -> PathBuf {
    PathBuf::from("metadata.json")
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            path: default_metadata_path(),
            accepted_schemas: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl ClassifierConfig {
    /// Load configuration from default locations
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> std::result::Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "phonenumbers.toml",
            ".phonenumbers.toml",
            "config/phonenumbers.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("net", "phonenumbers", "classifier") {
            let xdg_config = config_dir.config_dir().join("phonenumbers.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("PHONENUMBERS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Parse the accepted schema versions
    pub fn accepted_schemas(&self) -> Result<Vec<SchemaVersion>> {
        self.metadata
            .accepted_schemas
            .iter()
            .map(|s| SchemaVersion::parse(s))
            .collect()
    }

    /// Get the metadata path (resolves relative paths)
    pub fn metadata_path(&self) -> PathBuf {
        if self.metadata.path.is_absolute() {
            self.metadata.path.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.metadata.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClassifierConfig::default();
        assert_eq!(config.metadata.path, PathBuf::from("metadata.json"));
        assert_eq!(config.logging.level, "warn");
        assert!(config.accepted_schemas().unwrap().is_empty());
    }

    #[test]
    fn test_serialize_config() {
        let config = ClassifierConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[metadata]"));
        assert!(toml_str.contains("[logging]"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
            [metadata]
            path = "/data/simple.json"
            accepted_schemas = ["goui.net/phonenumbers/simple@1", "goui.net/phonenumbers/simple-v2@1"]
            "#,
        )
        .unwrap();

        let config = ClassifierConfig::load_from(path.to_str()).unwrap();
        assert_eq!(config.metadata_path(), PathBuf::from("/data/simple.json"));
        let schemas = config.accepted_schemas().unwrap();
        assert_eq!(schemas.len(), 2);
        assert_eq!(schemas[0], SchemaVersion::of("goui.net/phonenumbers/simple", 1));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = ClassifierConfig::default();
        config.metadata.accepted_schemas = vec!["ns@3".to_string()];
        config.save(path.to_str().unwrap()).unwrap();

        let loaded = ClassifierConfig::load_from(path.to_str()).unwrap();
        assert_eq!(loaded.metadata.accepted_schemas, vec!["ns@3".to_string()]);
    }

    #[test]
    fn test_bad_schema_string() {
        let mut config = ClassifierConfig::default();
        config.metadata.accepted_schemas = vec!["missing-version".to_string()];
        assert!(config.accepted_schemas().is_err());
    }
}
