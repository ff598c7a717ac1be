use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles loading, validating and saving the settings used by
/// candidate discovery, track loading and logging.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Spoken language requested from the translation service
    #[serde(default = "default_language")]
    pub request_language: String,

    /// Preferred UI language, favored when ranking candidates
    #[serde(default = "default_language")]
    pub ui_language: String,

    /// Network settings
    #[serde(default)]
    pub network: NetworkConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Deadlines and endpoints for the external collaborators
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NetworkConfig {
    /// Deadline for each candidate round-trip, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub candidate_timeout_ms: u64,

    /// Timeout for fetching a track payload, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Translation service endpoint; empty disables the service
    #[serde(default)]
    pub service_endpoint: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            candidate_timeout_ms: default_timeout_ms(),
            fetch_timeout_ms: default_timeout_ms(),
            service_endpoint: String::new(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_timeout_ms() -> u64 {
    5000 // both round-trips give up after 5 seconds
}

impl Default for Config {
    fn default() -> Self {
        Config {
            request_language: default_language(),
            ui_language: default_language(),
            network: NetworkConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Default config file location: `<config dir>/subtrack/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("subtrack").join("config.json"))
    }

    /// Load the configuration from `path`; a missing file yields the defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_code(&self.request_language)?;
        crate::language_utils::validate_language_code(&self.ui_language)?;

        if self.network.candidate_timeout_ms == 0 {
            return Err(anyhow!("candidate_timeout_ms must be greater than zero"));
        }
        if self.network.fetch_timeout_ms == 0 {
            return Err(anyhow!("fetch_timeout_ms must be greater than zero"));
        }

        if !self.network.service_endpoint.is_empty() {
            let endpoint = url::Url::parse(&self.network.service_endpoint)
                .with_context(|| format!("Invalid service endpoint: {}", self.network.service_endpoint))?;
            if !matches!(endpoint.scheme(), "http" | "https") {
                return Err(anyhow!("Service endpoint must use http or https: {}", endpoint));
            }
        }

        Ok(())
    }
}
