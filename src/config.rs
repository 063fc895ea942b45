use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Model requested from the completion endpoint unless configured otherwise
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
/// Sampling temperature sent with every completion request
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Top-level application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Completion endpoint settings and credential
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Listener for the `serve` command
    #[serde(default)]
    pub server: ServerConfig,
    /// Retry behaviour for the outbound call
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Configuration for the completion provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// API key (can also be set via the OPENAI_API_KEY environment variable)
    pub api_key: Option<String>,
    /// Base URL for the API endpoint (for custom or proxy endpoints)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Temperature for generation
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Request timeout in seconds (0 disables the timeout)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    /// Provider configuration with an explicit credential and default settings
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }
}

/// Configuration for the HTTP server
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Configuration for retrying failed completion calls
///
/// `attempts = 1` means a single try with no retry.
#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    #[serde(default = "default_retry_attempts")]
    pub attempts: u32,
    /// Base delay between attempts in milliseconds, multiplied by the attempt number
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_retry_attempts(),
            delay_ms: default_retry_delay_ms(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_retry_attempts() -> u32 {
    1
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl AppConfig {
    /// Load configuration from `config.toml` and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with SENZU__ prefix
    /// 2. config.toml file in current directory
    /// 3. OPENAI_API_KEY and PORT, for fields still unset
    /// 4. Default values
    ///
    /// Environment variable format: SENZU__PROVIDER__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config(None)
    }

    /// Same as [`AppConfig::load`], reading the given file instead of `config.toml`
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        load_config(Some(path))
    }
}

/// Load configuration, optionally from an explicit file path
///
/// A `.env` file in the working directory is read first, so its variables
/// feed both the SENZU__ source and the OPENAI_API_KEY / PORT fallbacks.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, ConfigError> {
    load_env_file(None)?;

    let file = match path {
        Some(path) => File::with_name(path).required(true),
        // Optional config file (can be missing)
        None => File::with_name("config").required(false),
    };

    let raw = Config::builder()
        .add_source(file)
        // Use double underscore for nested: SENZU__PROVIDER__API_KEY
        .add_source(
            Environment::with_prefix("SENZU")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let port_configured = port_is_configured(&raw);
    let mut config: AppConfig = raw.try_deserialize()?;
    apply_plain_env(
        &mut config,
        std::env::var("OPENAI_API_KEY").ok(),
        std::env::var("PORT").ok(),
        port_configured,
    )?;
    Ok(config)
}

/// Load variables from a `.env` file (`./.env` when `path` is `None`).
///
/// Variables already present in the process environment are kept. A missing
/// file is not an error; an unreadable or malformed one is.
fn load_env_file(path: Option<&Path>) -> Result<(), ConfigError> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };
    match loaded {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::Message(format!("failed to load .env: {}", e))),
    }
}

/// Whether a file or SENZU__ variable set `server.port`, even to the default
fn port_is_configured(raw: &Config) -> bool {
    raw.get::<u16>("server.port").is_ok()
}

/// Fill the credential and port from the conventional unprefixed variables.
///
/// Values already set by a file or SENZU__ variable win: PORT is only used
/// when no source set `server.port`.
fn apply_plain_env(
    config: &mut AppConfig,
    api_key: Option<String>,
    port: Option<String>,
    port_configured: bool,
) -> Result<(), ConfigError> {
    let has_key = config
        .provider
        .api_key
        .as_deref()
        .is_some_and(|key| !key.trim().is_empty());
    if !has_key {
        if let Some(key) = api_key.filter(|key| !key.trim().is_empty()) {
            config.provider.api_key = Some(key);
        }
    }

    if let Some(port) = port.filter(|_| !port_configured) {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::Message(format!("PORT is not a valid port: {}", port)))?;
    }

    Ok(())
}
