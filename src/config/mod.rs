use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Prefix shared by every server-side variable, e.g. `RURAL_CONNECT_PORT`
pub const ENV_PREFIX: &str = "RURAL_CONNECT";
/// Client settings live one level down, e.g. `RURAL_CONNECT_CLIENT_API_BASE_URL`
pub const CLIENT_ENV_PREFIX: &str = "RURAL_CONNECT_CLIENT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_max_request_size")]
    pub max_request_size: u64,
    /// Bearer token for `/api/admin/*`; the admin routes are not mounted without one
    #[serde(default)]
    pub admin_token: Option<String>,
}

/// Where catalog, booking and account records are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    DynamoDb,
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::DynamoDb => write!(f, "dynamodb"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub storage_backend: StorageBackend,
    #[serde(default = "default_products_table")]
    pub products_table_name: String,
    #[serde(default = "default_services_table")]
    pub services_table_name: String,
    #[serde(default = "default_news_table")]
    pub news_table_name: String,
    #[serde(default = "default_bookings_table")]
    pub bookings_table_name: String,
    #[serde(default = "default_contacts_table")]
    pub contacts_table_name: String,
    #[serde(default = "default_profiles_table")]
    pub profiles_table_name: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// DynamoDB Local or another compatible endpoint
    #[serde(default)]
    pub dynamodb_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_service_version")]
    pub service_version: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub enable_json_logging: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_local_store_path")]
    pub local_store_path: PathBuf,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

/// Deserialize one section from the environment variables under `prefix`
fn load_section<T: DeserializeOwned>(prefix: &str, section: &str) -> Result<T, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::Environment::with_prefix(prefix))
        .build()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to load {} config: {}", section, e),
        })?;

    settings
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to deserialize {} config: {}", section, e),
        })
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError {
        message: message.to_string(),
    }
}

impl Config {
    pub fn from_environment() -> Result<Self, ConfigError> {
        Self::from_env_prefix(ENV_PREFIX)
    }

    pub fn from_env_prefix(prefix: &str) -> Result<Self, ConfigError> {
        info!("Loading configuration from environment");

        let config = Config {
            server: ServerConfig::from_env_prefix(prefix)?,
            database: DatabaseConfig::from_env_prefix(prefix)?,
            observability: ObservabilityConfig::from_env_prefix(prefix)?,
        };

        config.validate()?;

        debug!("Configuration: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }

        if self.server.request_timeout_seconds == 0 {
            return Err(invalid("Request timeout cannot be 0"));
        }

        if self
            .server
            .admin_token
            .as_deref()
            .is_some_and(|token| token.trim().is_empty())
        {
            return Err(invalid("Admin token cannot be blank"));
        }

        self.database.validate()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_timeout(),
            max_request_size: default_max_request_size(),
            admin_token: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env_prefix(prefix: &str) -> Result<Self, ConfigError> {
        load_section(prefix, "server")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl DatabaseConfig {
    pub fn from_env_prefix(prefix: &str) -> Result<Self, ConfigError> {
        load_section(prefix, "database")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let tables = [
            ("Products", &self.products_table_name),
            ("Services", &self.services_table_name),
            ("News", &self.news_table_name),
            ("Bookings", &self.bookings_table_name),
            ("Contacts", &self.contacts_table_name),
            ("Profiles", &self.profiles_table_name),
        ];

        for (label, name) in tables {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    message: format!("{} table name cannot be empty", label),
                });
            }
        }

        Ok(())
    }

    /// Build a DynamoDB client for the configured region and optional endpoint
    pub async fn dynamodb_client(&self) -> DynamoDbClient {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(self.region.clone()));

        if let Some(endpoint) = &self.dynamodb_endpoint {
            info!(endpoint = %endpoint, "Using custom DynamoDB endpoint");
            loader = loader.endpoint_url(endpoint);
        }

        DynamoDbClient::new(&loader.load().await)
    }
}

impl ObservabilityConfig {
    pub fn from_env_prefix(prefix: &str) -> Result<Self, ConfigError> {
        load_section(prefix, "observability")
    }
}

impl ClientConfig {
    pub fn from_environment() -> Result<Self, ConfigError> {
        Self::from_env_prefix(CLIENT_ENV_PREFIX)
    }

    pub fn from_env_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let config: Self = load_section(prefix, "client")?;
        if config.request_timeout_seconds == 0 {
            return Err(invalid("Request timeout cannot be 0"));
        }
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            local_store_path: default_local_store_path(),
            request_timeout_seconds: default_timeout(),
        }
    }
}

pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    5000
}

pub(crate) fn default_timeout() -> u64 {
    30
}

pub(crate) fn default_max_request_size() -> u64 {
    1024 * 1024
}

pub(crate) fn default_products_table() -> String {
    "RuralConnectProducts".to_string()
}

pub(crate) fn default_services_table() -> String {
    "RuralConnectServices".to_string()
}

pub(crate) fn default_news_table() -> String {
    "RuralConnectNews".to_string()
}

pub(crate) fn default_bookings_table() -> String {
    "RuralConnectBookings".to_string()
}

pub(crate) fn default_contacts_table() -> String {
    "RuralConnectContacts".to_string()
}

pub(crate) fn default_profiles_table() -> String {
    "RuralConnectProfiles".to_string()
}

pub(crate) fn default_region() -> String {
    "ap-south-1".to_string()
}

pub(crate) fn default_service_name() -> String {
    "rural-connect".to_string()
}

pub(crate) fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_api_base_url() -> String {
    "http://localhost:5000".to_string()
}

pub(crate) fn default_local_store_path() -> PathBuf {
    PathBuf::from(".rural-connect/store.json")
}
