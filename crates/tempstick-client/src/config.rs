//! Client configuration with YAML, TOML and JSON support

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::response::DecodeMode;

/// Default base URL of the TempStick API
pub const DEFAULT_BASE_URL: &str = "https://tempstickapi.com/api/v1";

/// Header that carries the API key
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// TempStick client configuration
///
/// Can be loaded from YAML, TOML, JSON, or constructed programmatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key from the account dashboard
    #[serde(default)]
    pub api_key: Option<String>,

    /// API key header name (default: X-API-KEY)
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,

    /// How response bodies are read
    #[serde(default)]
    pub decode_mode: DecodeMode,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    /// User-Agent header sent with every request
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_key_header() -> String {
    API_KEY_HEADER.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            api_key_header: default_api_key_header(),
            decode_mode: DecodeMode::default(),
            timeouts: TimeoutsConfig::default(),
            user_agent: None,
        }
    }
}

/// Timeout configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Whole-request timeout in milliseconds (default: 30s)
    #[serde(default = "default_request_timeout")]
    pub request_ms: u64,

    /// Connect timeout in milliseconds (default: 10s)
    #[serde(default = "default_connect_timeout")]
    pub connect_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            request_ms: default_request_timeout(),
            connect_ms: default_connect_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30_000 // 30 seconds
}

fn default_connect_timeout() -> u64 {
    10_000 // 10 seconds
}

impl ClientConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Create a builder for programmatic configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the API key header name
    pub fn api_key_header(mut self, header: impl Into<String>) -> Self {
        self.config.api_key_header = header.into();
        self
    }

    /// Set how response bodies are read
    pub fn decode_mode(mut self, mode: DecodeMode) -> Self {
        self.config.decode_mode = mode;
        self
    }

    /// Set request timeout in milliseconds
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeouts.request_ms = ms;
        self
    }

    /// Set connect timeout in milliseconds
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeouts.connect_ms = ms;
        self
    }

    /// Set the User-Agent header
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(agent.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
