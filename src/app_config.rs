use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::catalog::CatalogConfig;
use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Root directory that model paths are resolved against
    #[serde(default = "default_model_cache_dir")]
    pub model_cache_dir: PathBuf,

    /// Inference backend config
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Model, language-pair and engine tables
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the model-serving process
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InferenceConfig {
    // @field: Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Generation length limit in tokens
    #[serde(default = "default_max_length")]
    pub max_length: u32,

    // @field: At most one in-flight call per model
    #[serde(default = "default_true")]
    pub serialize_per_model: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            max_length: default_max_length(),
            serialize_per_model: default_true(),
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
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

/// Environment variable that overrides `model_cache_dir`
pub const MODEL_CACHE_DIR_ENV: &str = "MODEL_CACHE_DIR";

fn default_model_cache_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_endpoint() -> String {
    "http://localhost:8008".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_length() -> u32 {
    512
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))
    }

    /// Write the configuration as pretty JSON
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, json)
            .map_err(|e| ConfigError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Apply environment overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var(MODEL_CACHE_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.model_cache_dir = PathBuf::from(dir.trim());
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inference.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("Inference endpoint is required".to_string()));
        }
        if self.inference.timeout_secs == 0 {
            return Err(ConfigError::Invalid("Inference timeout must be greater than zero".to_string()));
        }
        if self.inference.max_length == 0 {
            return Err(ConfigError::Invalid("max_length must be greater than zero".to_string()));
        }
        self.catalog.validate()
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Self {
            model_cache_dir: default_model_cache_dir(),
            inference: InferenceConfig::default(),
            catalog: CatalogConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
