//! FitPulse backend
//!
//! Gym management service: admin and member dashboards over one domain
//! store, with optional Gemini-backed coaching.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling and routing
//! - Services: surface logic for sessions, admins and members
//! - Store: users and templates, mirrored to a key-value store on change

use anyhow::{Context, Result};
use fitpulse_backend::{
    ai::AiBridge, config, routes, state::AppState, storage::FileKvStore,
};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting FitPulse backend"
    );

    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    let kv = FileKvStore::open(&config.storage.data_dir)?;
    info!(data_dir = %kv.dir().display(), "Storage opened");
    let ai = AiBridge::from_config(&config.ai).context("Failed to set up AI client")?;

    let state = AppState::new(config.clone(), Arc::new(kv), ai);
    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "fitpulse_backend=info,tower_http=info".into()
        } else {
            "fitpulse_backend=debug,tower_http=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Refuse to start in production with development secrets
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.jwt.secret.contains("development") || config.jwt.secret.len() < 32 {
        errors.push("JWT secret must be at least 32 characters and not contain 'development'");
    }

    if config.auth.admin_verification_code.expose_secret() == config::DEFAULT_ADMIN_VERIFICATION_CODE {
        warn!("Admin verification code is the built-in default; set FP__AUTH__ADMIN_VERIFICATION_CODE");
    }

    if config.ai.enabled && config.ai.api_key.is_none() {
        warn!("AI is enabled without an API key; AI features will be unavailable");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
