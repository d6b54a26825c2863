//! VolunHub API Server
//!
//! REST backend for the VolunHub volunteer-management platform:
//! credential and OTP authentication over a MongoDB document store.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings
//! volunhub-server
//!
//! # Start with custom config
//! volunhub-server --config /path/to/config.toml
//!
//! # Start with environment overrides
//! VOLUNHUB__SERVER__PORT=8080 volunhub-server
//! ```

mod config;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use volunhub_api::{create_router, ApiConfig, AppState};
use volunhub_auth::{AuthService, EmailSender, HttpEmailSender, LogEmailSender};
use volunhub_db::{Database, DatabaseConfig};

use crate::config::ServerConfig;

/// VolunHub API Server - volunteer-management platform backend
#[derive(Parser, Debug)]
#[command(name = "volunhub-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, env = "VOLUNHUB_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "VOLUNHUB_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "VOLUNHUB_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "VOLUNHUB_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log format (json, pretty)
    #[arg(long, env = "VOLUNHUB_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// MongoDB connection URL
    #[arg(long, env = "MONGO_URL")]
    mongo_url: Option<String>,

    /// JWT secret key
    #[arg(long, env = "JWT_SECRET")]
    jwt_secret: Option<String>,

    /// Enable development mode (relaxed secret validation)
    #[arg(long, env = "VOLUNHUB_DEV_MODE")]
    dev_mode: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut server_config = ServerConfig::load(args.config.as_deref())?;

    // Override with CLI arguments
    if let Some(host) = args.host {
        server_config.server.host = host;
    }
    if let Some(port) = args.port {
        server_config.server.port = port;
    }
    if let Some(mongo_url) = args.mongo_url {
        server_config.database.mongo_url = mongo_url;
    }
    if let Some(jwt_secret) = args.jwt_secret {
        server_config.auth.jwt_secret = jwt_secret;
    }
    server_config.logging.level = args.log_level;
    server_config.logging.format = args.log_format;

    init_logging(&server_config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting VolunHub API Server"
    );

    validate_config(&server_config, args.dev_mode)?;

    // Initialize database
    let db = init_database(&server_config).await?;
    let store = Arc::new(db.user_store());

    // Initialize auth service
    let auth_config = build_auth_config(&server_config);
    let mailer = build_mailer(&auth_config)?;
    let auth = Arc::new(AuthService::new(store.clone(), mailer, auth_config));

    let state = Arc::new(AppState::new(
        store,
        auth,
        server_config.api.secure_cookies,
    ));

    let api_config = ApiConfig {
        enable_cors: server_config.api.enable_cors,
        cors_origins: server_config.api.cors_origins.clone(),
        enable_tracing: server_config.api.enable_tracing,
    };

    let app = create_router(state, api_config);

    let addr = server_config.server.socket_addr();

    tracing::info!(
        host = %server_config.server.host,
        port = %server_config.server.port,
        "Server listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(server_config.server.shutdown_timeout()))
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

// =============================================================================
// Initialization Functions
// =============================================================================

/// Initialize tracing/logging
fn init_logging(config: &config::LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber.with(fmt::layer().json().with_target(true)).init();
        }
        _ => {
            subscriber
                .with(fmt::layer().pretty().with_target(true))
                .init();
        }
    }

    Ok(())
}

/// Validate configuration
fn validate_config(config: &ServerConfig, dev_mode: bool) -> anyhow::Result<()> {
    if !dev_mode {
        if config.auth.jwt_secret == "change-me-in-production" {
            anyhow::bail!(
                "JWT secret must be changed in production. Set JWT_SECRET environment variable."
            );
        }
        if config.auth.jwt_secret.len() < 32 {
            anyhow::bail!("JWT secret should be at least 256 bits (32 bytes)");
        }
        if config.mail.api_url.is_none() {
            tracing::warn!("No mail API configured; one-time codes will only be logged");
        }
    }

    if config.api.enable_cors && config.api.cors_origins.iter().any(|o| o == "*") {
        anyhow::bail!("CORS origins must be explicit: the session cookie requires credentials");
    }

    Ok(())
}

/// Initialize database connection
async fn init_database(config: &ServerConfig) -> anyhow::Result<Database> {
    tracing::info!("Connecting to database...");

    let db_config = DatabaseConfig {
        mongo_url: config.database.mongo_url.clone(),
        db_name: config.database.db_name.clone(),
    };

    let db = Database::connect(&db_config).await?;

    let health = db.health_check().await?;
    if !health.healthy {
        anyhow::bail!("Database health check failed");
    }

    tracing::info!("Database health check passed");

    Ok(db)
}

/// Build the auth-layer configuration from server settings.
fn build_auth_config(config: &ServerConfig) -> volunhub_auth::AuthConfig {
    let mut auth_config = volunhub_auth::AuthConfig::default();
    auth_config.jwt.secret = config.auth.jwt_secret.clone();
    auth_config.jwt.issuer = config.auth.jwt_issuer.clone();
    auth_config.jwt.token_lifetime = Duration::from_secs(config.auth.token_lifetime_secs);
    auth_config.otp.expiry = Duration::from_secs(config.auth.otp_expiry_secs);
    auth_config.password.min_password_length = config.auth.min_password_length;
    auth_config.mail.from_address = config.mail.from_address.clone();
    auth_config.mail.api_url = config.mail.api_url.clone();
    auth_config.mail.api_token = config.mail.api_token.clone();
    auth_config
}

/// Pick the mail transport: the HTTP API when configured, the logging
/// sender otherwise.
fn build_mailer(config: &volunhub_auth::AuthConfig) -> anyhow::Result<Arc<dyn EmailSender>> {
    if config.mail.api_url.is_some() {
        let sender = HttpEmailSender::from_config(&config.mail)
            .map_err(|e| anyhow::anyhow!("mail sender: {e}"))?;
        Ok(Arc::new(sender))
    } else {
        Ok(Arc::new(LogEmailSender))
    }
}

// =============================================================================
// Graceful Shutdown
// =============================================================================

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    tracing::info!(
        timeout_secs = timeout.as_secs(),
        "Waiting for in-flight requests to complete..."
    );

    tokio::time::sleep(timeout).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["volunhub-server", "--port", "8080"]);
        assert_eq!(args.port, Some(8080));
    }

    #[test]
    fn test_validate_rejects_default_secret() {
        let config = ServerConfig::default();
        assert!(validate_config(&config, false).is_err());
        assert!(validate_config(&config, true).is_ok());
    }

    #[test]
    fn test_validate_rejects_wildcard_cors() {
        let mut config = ServerConfig::default();
        config.auth.jwt_secret = "a".repeat(32);
        config.api.cors_origins = vec!["*".to_string()];
        assert!(validate_config(&config, false).is_err());
    }

    #[test]
    fn test_build_auth_config_carries_secrets() {
        let mut config = ServerConfig::default();
        config.auth.jwt_secret = "a".repeat(32);
        config.mail.api_url = Some("https://mail.example.com/send".to_string());
        config.mail.api_token = Some("token".to_string());

        let auth_config = build_auth_config(&config);
        assert_eq!(auth_config.jwt.secret, "a".repeat(32));
        assert_eq!(
            auth_config.otp.expiry,
            Duration::from_secs(config.auth.otp_expiry_secs)
        );
        assert!(auth_config.mail.api_url.is_some());
    }
}
