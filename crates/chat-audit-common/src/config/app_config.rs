//! Application configuration structs
//!
//! Loads configuration from environment variables, an optional `.env` file,
//! and the legacy JSON settings file that holds the bot token.

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub gateway: GatewayConfig,
    pub storage: StorageConfig,
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Chat gateway connection settings
#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_url")]
    pub url: String,
    pub token: String,
}

// Keep the token out of logs
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Log file storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

/// Snapshot cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
}

/// Legacy settings file layout
#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(rename = "DiscordUserToken")]
    token: String,
}

// Default value functions
fn default_app_name() -> String {
    "chat-audit".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_max_messages() -> usize {
    1000
}

fn default_settings_file() -> PathBuf {
    PathBuf::from("settings.json")
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if no token can be found or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = match lookup("APP_ENV") {
            Some(value) => Environment::parse(&value)
                .ok_or(ConfigError::InvalidValue("APP_ENV", value))?,
            None => default_env(),
        };

        let token = match lookup("DISCORD_TOKEN").filter(|t| !t.trim().is_empty()) {
            Some(token) => token,
            None => {
                let path = lookup("SETTINGS_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(default_settings_file);
                read_settings_token(&path)?.ok_or(ConfigError::MissingVar("DISCORD_TOKEN"))?
            }
        };

        let max_messages = match lookup("MESSAGE_CACHE_SIZE") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MESSAGE_CACHE_SIZE", value))?,
            None => default_max_messages(),
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            gateway: GatewayConfig {
                url: lookup("GATEWAY_URL").unwrap_or_else(default_gateway_url),
                token,
            },
            storage: StorageConfig {
                log_dir: lookup("LOG_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(default_log_dir),
            },
            cache: CacheConfig { max_messages },
        })
    }
}

/// Read the token from the settings file, `Ok(None)` if the file is absent
fn read_settings_token(path: &Path) -> Result<Option<String>, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::SettingsFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    let settings: SettingsFile = serde_json::from_str(&raw)
        .map_err(|e| ConfigError::SettingsFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    Ok(Some(settings.token).filter(|t| !t.trim().is_empty()))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Unreadable settings file {}: {reason}", path.display())]
    SettingsFile { path: PathBuf, reason: String },
}
