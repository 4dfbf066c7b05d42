//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Alert configuration.
    #[serde(default)]
    pub alerts: AlertConfig,
    /// Email delivery configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// File storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Alert visibility configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    /// Hours after creation during which a report counts as an active alert.
    #[serde(default = "default_visibility_hours")]
    pub visibility_hours: i64,
    /// How often the active-alert state is recomputed, in seconds.
    #[serde(default = "default_refresh_secs")]
    pub refresh_interval_secs: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            visibility_hours: default_visibility_hours(),
            refresh_interval_secs: default_refresh_secs(),
        }
    }
}

/// Email (SMTP) configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailConfig {
    /// Whether outgoing mail is enabled. Disabled means verification mails
    /// are logged instead of sent.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP relay host.
    #[serde(default)]
    pub smtp_host: String,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub username: Option<String>,
    /// SMTP password.
    #[serde(default)]
    pub password: Option<String>,
    /// From address for outgoing mail.
    #[serde(default = "default_from_address")]
    pub from_address: String,
}

/// File storage settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Base path for stored attachment files.
    #[serde(default = "default_storage_path")]
    pub base_path: String,
    /// Base URL under which attachments are served.
    #[serde(default = "default_storage_url")]
    pub base_url: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            base_path: default_storage_path(),
            base_url: default_storage_url(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_visibility_hours() -> i64 {
    12
}

const fn default_refresh_secs() -> u64 {
    1
}

const fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "no-reply@civita.local".to_string()
}

fn default_storage_path() -> String {
    "./files".to_string()
}

fn default_storage_url() -> String {
    "/files".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `CIVITA_ENV`)
    /// 3. Environment variables with `CIVITA_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("CIVITA_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CIVITA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("CIVITA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
