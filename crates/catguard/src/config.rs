//! Configuration file parsing and structures.
//!
//! catguard uses a small TOML file; every section is optional:
//! - `[logging]`: log verbosity
//! - `[storage]`: where the sensor set and status fields are kept
//! - `[detector]`: image classification settings

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use tracing_subscriber::filter::LevelFilter;

use crate::engine::DEFAULT_CONFIDENCE_THRESHOLD;

/// Top-level configuration structure
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default)]
    pub level: LogLevel,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// JSON document holding sensors and status fields.
    /// The CLI falls back to `catguard.json` in the working directory when omitted.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct DetectorConfig {
    /// Minimum confidence, in percent, for an image to count as showing a cat
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
}

fn default_confidence_threshold() -> f32 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().to_path_buf(), e))?;

        Self::parse(&contents)
    }

    /// Parse and validate configuration from TOML source
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.detector.confidence_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ConfigError::Invalid {
                field: "detector.confidence_threshold",
                message: format!("{} is not a percentage between 0 and 100", threshold),
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.storage.path.is_none());
        assert_eq!(config.detector.confidence_threshold, 50.0);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [logging]
            level = "debug"

            [storage]
            path = "/var/lib/catguard/state.json"

            [detector]
            confidence_threshold = 72.5
        "#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(
            config.storage.path.as_deref(),
            Some(Path::new("/var/lib/catguard/state.json"))
        );
        assert_eq!(config.detector.confidence_threshold, 72.5);
    }

    #[test]
    fn test_threshold_out_of_range() {
        let toml = r#"
            [detector]
            confidence_threshold = 150.0
        "#;

        let err = Config::parse(toml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "detector.confidence_threshold",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let toml = r#"
            [logging]
            level = "chatty"
        "#;

        assert!(matches!(Config::parse(toml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        assert!(matches!(
            Config::parse("[mqtt]\nbroker = \"localhost\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("catguard.toml");
        std::fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.logging.level, LogLevel::Warn);

        let missing = Config::from_file(temp_dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(..)));
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::TRACE);
        assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::ERROR);
    }
}
