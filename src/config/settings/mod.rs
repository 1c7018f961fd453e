
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

use crate::docqa::chunking::ChunkingConfig;

pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";
pub const BRIGHTDATA_API_KEY_VAR: &str = "BRIGHTDATA_API_KEY";
pub const WEB_UNLOCKER_ZONE_VAR: &str = "WEB_UNLOCKER_ZONE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub groq: GroqConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
}

/// Settings for the hosted Groq chat-completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GroqConfig {
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    /// Token budget for a single-topic headline analysis
    pub max_tokens_topic: u32,
    /// Token budget for the combined multi-topic report
    pub max_tokens_report: u32,
    pub timeout_seconds: u64,
}

impl Default for GroqConfig {
    #[inline]
    fn default() -> Self {
        Self {
            api_base: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.1,
            max_tokens_topic: 2000,
            max_tokens_report: 3000,
            timeout_seconds: 60,
        }
    }
}

/// Settings for the web-unlocker proxy used to fetch search result pages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScraperConfig {
    pub endpoint: String,
    pub zone: String,
    pub country: String,
    pub timeout_seconds: u64,
    /// Minimum delay between outbound requests in milliseconds (200 = 5/s)
    pub rate_limit_ms: u64,
    /// Fixed politeness delay after each topic in milliseconds
    pub topic_delay_ms: u64,
    pub max_retries: u32,
}

impl Default for ScraperConfig {
    #[inline]
    fn default() -> Self {
        Self {
            endpoint: "https://api.brightdata.com/request".to_string(),
            zone: "web_unlocker1".to_string(),
            country: "US".to_string(),
            timeout_seconds: 30,
            rate_limit_ms: 200,
            topic_delay_ms: 1000,
            max_retries: 3,
        }
    }
}

/// Settings for the local Ollama instance used for embedding generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OllamaConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub model: String,
    pub batch_size: u32,
}

impl Default for OllamaConfig {
    #[inline]
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 11434,
            model: "nomic-embed-text:latest".to_string(),
            batch_size: 16,
        }
    }
}

/// API credentials, sourced from the environment rather than the config file
#[derive(Debug, Clone)]
pub struct Secrets {
    pub groq_api_key: String,
    pub brightdata_api_key: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("Invalid port: {0} (must be between 1 and 65535)")]
    InvalidPort(u16),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid temperature: {0} (must be between 0.0 and 2.0)")]
    InvalidTemperature(f32),
    #[error("Invalid max tokens: {0} (must be between 1 and 32768)")]
    InvalidMaxTokens(u32),
    #[error("Invalid batch size: {0} (must be between 1 and 1000)")]
    InvalidBatchSize(u32),
    #[error("Invalid rate limit: {0}ms (must be between 1 and 60000)")]
    InvalidRateLimit(u64),
    #[error("Invalid retry count: {0} (must be between 1 and 10)")]
    InvalidRetries(u32),
    #[error("Invalid zone name: {0} (cannot be empty)")]
    InvalidZone(String),
    #[error("Invalid chunk size: {0} (must be between 200 and 8000 characters)")]
    InvalidChunkSize(usize),
    #[error("Chunk overlap ({0}) must be smaller than chunk size ({1})")]
    OverlapTooLarge(usize, usize),
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            groq: GroqConfig::default(),
            scraper: ScraperConfig::default(),
            ollama: OllamaConfig::default(),
            chunking: ChunkingConfig::default(),
        }
    }
}

impl Config {
    #[inline]
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(".briefly"))
            .ok_or(ConfigError::DirectoryError)
    }

    #[inline]
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    #[inline]
    pub fn load() -> Result<Self> {
        let config_path =
            Self::config_file_path().context("Failed to determine config file path")?;
        Self::load_from(config_path)
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// when the file does not exist.
    #[inline]
    pub fn load_from(config_path: PathBuf) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        let config_dir = Self::config_dir().context("Failed to determine config directory")?;

        fs::create_dir_all(&config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.groq.validate()?;
        self.scraper.validate()?;
        self.ollama.validate()?;
        self.validate_chunking()?;
        Ok(())
    }

    fn validate_chunking(&self) -> Result<(), ConfigError> {
        let chunking = &self.chunking;

        if !(200..=8000).contains(&chunking.chunk_size) {
            return Err(ConfigError::InvalidChunkSize(chunking.chunk_size));
        }

        if chunking.chunk_overlap >= chunking.chunk_size {
            return Err(ConfigError::OverlapTooLarge(
                chunking.chunk_overlap,
                chunking.chunk_size,
            ));
        }

        Ok(())
    }
}

impl GroqConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.api_base).map_err(|_| ConfigError::InvalidUrl(self.api_base.clone()))?;

        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.model.clone()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }

        for tokens in [self.max_tokens_topic, self.max_tokens_report] {
            if tokens == 0 || tokens > 32768 {
                return Err(ConfigError::InvalidMaxTokens(tokens));
            }
        }

        Ok(())
    }

    pub fn api_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.api_base).map_err(|_| ConfigError::InvalidUrl(self.api_base.clone()))
    }
}

impl ScraperConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.endpoint).map_err(|_| ConfigError::InvalidUrl(self.endpoint.clone()))?;

        if self.zone.trim().is_empty() {
            return Err(ConfigError::InvalidZone(self.zone.clone()));
        }

        if self.rate_limit_ms == 0 || self.rate_limit_ms > 60_000 {
            return Err(ConfigError::InvalidRateLimit(self.rate_limit_ms));
        }

        if self.max_retries == 0 || self.max_retries > 10 {
            return Err(ConfigError::InvalidRetries(self.max_retries));
        }

        Ok(())
    }
}

impl OllamaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.protocol != "http" && self.protocol != "https" {
            return Err(ConfigError::InvalidUrl(self.protocol.clone()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.model.clone()));
        }

        if self.batch_size == 0 || self.batch_size > 1000 {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }

        Ok(())
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let url_str = format!("{}://{}:{}", self.protocol, self.host, self.port);
        Url::parse(&url_str).map_err(|_| ConfigError::InvalidUrl(url_str))
    }
}

impl Secrets {
    /// Read API credentials from the environment. The Groq key is required
    /// for every command that talks to the LLM; the BrightData key is only
    /// needed when scraping.
    #[inline]
    pub fn from_env() -> Result<Self, ConfigError> {
        let groq_api_key = env::var(GROQ_API_KEY_VAR)
            .map_err(|_| ConfigError::MissingEnvVar(GROQ_API_KEY_VAR.to_string()))?;

        Ok(Self {
            groq_api_key,
            brightdata_api_key: env::var(BRIGHTDATA_API_KEY_VAR).ok(),
        })
    }

    #[inline]
    pub fn require_brightdata(&self) -> Result<&str, ConfigError> {
        self.brightdata_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar(BRIGHTDATA_API_KEY_VAR.to_string()))
    }
}

/// Resolve the unlocker zone, preferring the environment override when set.
#[inline]
pub fn resolve_zone(config: &ScraperConfig) -> String {
    env::var(WEB_UNLOCKER_ZONE_VAR).unwrap_or_else(|_| config.zone.clone())
}
