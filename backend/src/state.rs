//! Application state management
//!
//! Everything handlers share, created once at startup. Cloning is cheap:
//! every field is an `Arc` or wraps one.

use crate::ai::AiBridge;
use crate::auth::{AuthGate, JwtService};
use crate::config::AppConfig;
use crate::roster::default_roster;
use crate::session::{SessionLimits, SessionRegistry};
use crate::storage::KeyValueStore;
use crate::store::{DomainStore, StorageKeys};
use fitpulse_shared::Trainer;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Single source of truth for users and templates
    pub store: Arc<RwLock<DomainStore>>,
    pub sessions: SessionRegistry,
    pub jwt: JwtService,
    pub gate: AuthGate,
    pub ai: AiBridge,
    pub roster: Arc<Vec<Trainer>>,
    kv: Arc<dyn KeyValueStore>,
}

impl AppState {
    /// Load the domain store from `kv` and wire up the services
    pub fn new(config: AppConfig, kv: Arc<dyn KeyValueStore>, ai: AiBridge) -> Self {
        let store = DomainStore::load(kv.clone(), StorageKeys::from(&config.storage));
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry_secs);
        let gate = AuthGate::new(config.auth.admin_verification_code.clone());
        let sessions = SessionRegistry::with_limits(SessionLimits::from_config(
            &config.session,
            config.jwt.access_token_expiry_secs,
        ));

        Self {
            config: Arc::new(config),
            store: Arc::new(RwLock::new(store)),
            sessions,
            jwt,
            gate,
            ai,
            roster: Arc::new(default_roster()),
            kv,
        }
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn store(&self) -> &RwLock<DomainStore> {
        &self.store
    }

    #[inline]
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    #[inline]
    pub fn ai(&self) -> &AiBridge {
        &self.ai
    }

    /// Durable storage the store writes through
    pub fn storage(&self) -> &dyn KeyValueStore {
        self.kv.as_ref()
    }
}
