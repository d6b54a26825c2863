//! Server Configuration
//!
//! Configuration management for the VolunHub API server.
//! Supports environment variables, config files, and CLI arguments.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    /// Server binding configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthSettings,

    /// Outbound mail configuration
    #[serde(default)]
    pub mail: MailSettings,

    /// API configuration
    #[serde(default)]
    pub api: ApiSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server binding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl ServerSettings {
    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Get the shutdown timeout duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// MongoDB connection URL
    #[serde(default = "default_mongo_url")]
    pub mongo_url: String,

    /// Database name
    #[serde(default = "default_db_name")]
    pub db_name: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            mongo_url: default_mongo_url(),
            db_name: default_db_name(),
        }
    }
}

/// Authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// JWT secret key
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// JWT issuer
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,

    /// Session token lifetime in seconds
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime_secs: u64,

    /// One-time-code expiry in seconds
    #[serde(default = "default_otp_expiry")]
    pub otp_expiry_secs: u64,

    /// Minimum accepted password length
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_issuer: default_jwt_issuer(),
            token_lifetime_secs: default_token_lifetime(),
            otp_expiry_secs: default_otp_expiry(),
            min_password_length: default_min_password_length(),
        }
    }
}

/// Outbound mail settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailSettings {
    /// Sender address
    #[serde(default = "default_mail_from")]
    pub from_address: String,

    /// HTTP mail API endpoint; mail is logged when unset
    pub api_url: Option<String>,

    /// Bearer token for the mail API
    pub api_token: Option<String>,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            from_address: default_mail_from(),
            api_url: None,
            api_token: None,
        }
    }
}

/// API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// CORS allowed origins
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable request tracing
    #[serde(default = "default_true")]
    pub enable_tracing: bool,

    /// Mark session cookies `Secure`
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            enable_cors: true,
            cors_origins: default_cors_origins(),
            enable_tracing: true,
            secure_cookies: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// =============================================================================
// Default Functions
// =============================================================================

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_mongo_url() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_db_name() -> String {
    "volunhub".to_string()
}

fn default_jwt_secret() -> String {
    "change-me-in-production".to_string()
}

fn default_jwt_issuer() -> String {
    "volunhub".to_string()
}

fn default_token_lifetime() -> u64 {
    7 * 24 * 60 * 60 // 7 days
}

fn default_otp_expiry() -> u64 {
    10 * 60 // 10 minutes
}

fn default_min_password_length() -> usize {
    6
}

fn default_mail_from() -> String {
    "no-reply@volunhub.org".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Configuration Loading
// =============================================================================

impl ServerConfig {
    /// Load configuration from environment and optional config file
    pub fn load(config_path: Option<&str>) -> anyhow::Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        // Environment variables with VOLUNHUB_ prefix, e.g.
        // VOLUNHUB__AUTH__JWT_SECRET
        builder = builder.add_source(
            config::Environment::with_prefix("VOLUNHUB")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;

        let server_config: ServerConfig = config.try_deserialize().unwrap_or_else(|_| {
            tracing::warn!("Using default configuration - some settings may need adjustment");
            ServerConfig::default()
        });

        Ok(server_config)
    }
}
