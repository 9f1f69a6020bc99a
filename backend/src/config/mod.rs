//! Configuration management for the FitPulse backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: FP__)

use anyhow::Result;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Default administrator verification code
pub const DEFAULT_ADMIN_VERIFICATION_CODE: &str = "wasd123wasd";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ai: AiConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Durable key-value storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub members_key: String,
    pub templates_key: String,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_secs: i64,
}

/// Authentication gate configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared code required on every admin login and registration
    pub admin_verification_code: SecretString,
}

impl Serialize for AuthConfig {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use secrecy::ExposeSecret;
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("AuthConfig", 1)?;
        s.serialize_field(
            "admin_verification_code",
            self.admin_verification_code.expose_secret(),
        )?;
        s.end()
    }
}

/// Session registry limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Sessions without a logged-in user are dropped after this much inactivity
    pub idle_ttl_secs: i64,
    /// Hard cap; the least recently touched sessions are evicted beyond it
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: 30 * 60,
            max_sessions: 10_000,
        }
    }
}

/// AI/LLM configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<SecretString>,
    pub timeout_secs: u64,
}

impl Serialize for AiConfig {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use secrecy::ExposeSecret;
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("AiConfig", 5)?;
        s.serialize_field("enabled", &self.enabled)?;
        s.serialize_field("base_url", &self.base_url)?;
        s.serialize_field("model", &self.model)?;
        s.serialize_field(
            "api_key",
            &self.api_key.as_ref().map(|k| k.expose_secret().clone()),
        )?;
        s.serialize_field("timeout_secs", &self.timeout_secs)?;
        s.end()
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("data"),
                members_key: "fitpulse_members".to_string(),
                templates_key: "fitpulse_templates".to_string(),
            },
            jwt: JwtConfig {
                secret: "development-secret-change-in-production".to_string(),
                access_token_expiry_secs: 3600 * 12,
            },
            auth: AuthConfig {
                admin_verification_code: SecretString::new(
                    DEFAULT_ADMIN_VERIFICATION_CODE.to_string(),
                ),
            },
            session: SessionConfig::default(),
            ai: AiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with FP__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(&config_file).required(false))
            // e.g., FP__AI__API_KEY=... sets ai.api_key
            .add_source(config::Environment::with_prefix("FP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}
