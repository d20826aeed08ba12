use serde::Deserialize;
use std::path::Path;

use crate::error::{Result, SyncError};
use crate::logging::LogLevel;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "loc-sync.json";

/// Scratch capacity for one literal; raw literals must be shorter than this
pub const DEFAULT_MAX_LITERAL_LEN: usize = 1000;

/// Configuration for loc-sync
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Marker function name (e.g. "loc" for `loc("...")`)
    #[serde(default = "default_function")]
    pub function: String,

    /// Scratch capacity for a raw literal; longer literals abort the run
    #[serde(default = "default_max_literal_length")]
    pub max_literal_length: usize,

    /// One of "error", "warn", "info", "debug"
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_function() -> String {
    "loc".to_string()
}

fn default_max_literal_length() -> usize {
    DEFAULT_MAX_LITERAL_LEN
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            function: default_function(),
            max_literal_length: default_max_literal_length(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SyncError::config(path, format!("failed to read: {}", e)))?;

        let config = Self::from_json_str(&content).map_err(|e| match e {
            SyncError::Config { reason, .. } => SyncError::config(path, reason),
            other => other,
        })?;

        Ok(config)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json_str: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json_str)
            .map_err(|e| SyncError::config("<inline>", format!("failed to parse: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Try to load from the default config file, or return default config
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(&self.log_level).unwrap_or(LogLevel::Info)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: String| -> Result<()> { Err(SyncError::config("<inline>", reason)) };
        if self.function.is_empty() {
            return invalid("function must not be empty".to_string());
        }
        if self.function.bytes().any(|b| b == b'(' || b == b'"') {
            return invalid(format!("function name {:?} contains '(' or '\"'", self.function));
        }
        if self.max_literal_length == 0 {
            return invalid("maxLiteralLength must be at least 1".to_string());
        }
        if LogLevel::parse(&self.log_level).is_none() {
            return invalid(format!("unknown logLevel {:?}", self.log_level));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.function, "loc");
        assert_eq!(config.max_literal_length, 1000);
        assert_eq!(config.log_level(), LogLevel::Info);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = Config::from_json_str(r#"{ "function": "tr" }"#).unwrap();
        assert_eq!(config.function, "tr");
        assert_eq!(config.max_literal_length, DEFAULT_MAX_LITERAL_LEN);
    }

    #[test]
    fn test_full_json() {
        let config = Config::from_json_str(
            r#"{ "function": "loc", "maxLiteralLength": 64, "logLevel": "debug" }"#,
        )
        .unwrap();
        assert_eq!(config.max_literal_length, 64);
        assert_eq!(config.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Config::from_json_str(r#"{ "function": "" }"#).is_err());
        assert!(Config::from_json_str(r#"{ "function": "loc(" }"#).is_err());
        assert!(Config::from_json_str(r#"{ "maxLiteralLength": 0 }"#).is_err());
        assert!(Config::from_json_str(r#"{ "logLevel": "loud" }"#).is_err());
        assert!(Config::from_json_str(r#"{ "unknown": 1 }"#).is_err());
        assert!(Config::from_json_str("not json").is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("loc-sync.json");
        std::fs::write(&path, r#"{ "logLevel": "loud" }"#).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("loc-sync.json"));
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Config::load(tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SyncError::Config { .. }));
    }
}
