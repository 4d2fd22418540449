//! Configuration module - environment variable parsing

use std::env;

/// Inspector configuration loaded from environment variables
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Byte offset of the record inside each decoded hex line
    pub record_offset: usize,
    /// Pretty-print decoded records
    pub output_pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            record_offset: 0,
            output_pretty: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();

        let record_offset = match lookup("RECORD_OFFSET") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("RECORD_OFFSET", raw))?,
            None => defaults.record_offset,
        };

        let output_pretty = match lookup("OUTPUT_PRETTY") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid("OUTPUT_PRETTY", raw))?,
            None => defaults.output_pretty,
        };

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            record_offset,
            output_pretty,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
