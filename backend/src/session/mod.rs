//! Session and view controller
//!
//! A session tracks which screen a client is on and which user, by id, is
//! logged in. The user record itself is always read from the domain
//! store. Sessions live in memory only and disappear on restart.
//!
//! The registry is bounded: sessions nobody is logged into expire after an
//! idle period, logged-in ones once their access token would have expired,
//! and beyond a hard cap the least recently touched are evicted.

use crate::config::SessionConfig;
use chrono::{DateTime, Duration, Utc};
use fitpulse_shared::types::View;
use fitpulse_shared::{Role, SessionError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// One client's navigation state
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: Uuid,
    pub view: View,
    /// Set by the admin back door on the landing page; forces the admin role
    pub secret_admin_entry: bool,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Last successful transition
    pub touched_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            view: View::Landing,
            secret_admin_entry: false,
            user_id: None,
            created_at: now,
            touched_at: now,
        }
    }

    fn require(&self, expected: View, action: &'static str) -> Result<(), SessionError> {
        if self.view == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                action,
                view: self.view.to_string(),
            })
        }
    }

    /// Landing page login button
    pub fn open_login(&mut self) -> Result<(), SessionError> {
        self.require(View::Landing, "open login")?;
        self.secret_admin_entry = false;
        self.view = View::Login;
        Ok(())
    }

    /// Landing page footer back door to the admin form
    pub fn admin_access(&mut self) -> Result<(), SessionError> {
        self.require(View::Landing, "open admin access")?;
        self.secret_admin_entry = true;
        self.view = View::Login;
        Ok(())
    }

    /// Role the login form submits with
    pub fn effective_role(&self, requested: Role) -> Role {
        if self.secret_admin_entry {
            Role::Admin
        } else {
            requested
        }
    }

    /// Fails unless the login form is showing
    pub fn ensure_login_form(&self) -> Result<(), SessionError> {
        self.require(View::Login, "submit credentials")
    }

    /// Move to the role's dashboard as `user_id`
    pub fn logged_in(&mut self, user_id: &str, role: Role) -> Result<(), SessionError> {
        self.ensure_login_form()?;
        self.user_id = Some(user_id.to_string());
        self.view = View::dashboard_for(role);
        Ok(())
    }

    /// Back to the login form from anywhere
    pub fn logout(&mut self) {
        self.user_id = None;
        self.secret_admin_entry = false;
        self.view = View::Login;
    }

    /// Whether this session is currently logged in as `user_id`
    pub fn is_logged_in_as(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifetime and size bounds of the registry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionLimits {
    pub idle_ttl: Duration,
    pub logged_in_ttl: Duration,
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default(), 3600 * 12)
    }
}

impl SessionLimits {
    /// Logged-in sessions live as long as the access token issued at login
    pub fn from_config(config: &SessionConfig, token_expiry_secs: i64) -> Self {
        Self {
            idle_ttl: Duration::seconds(config.idle_ttl_secs),
            logged_in_ttl: Duration::seconds(token_expiry_secs),
            max_sessions: config.max_sessions.max(1),
        }
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        let ttl = if session.user_id.is_some() {
            self.logged_in_ttl
        } else {
            self.idle_ttl
        };
        now - session.touched_at > ttl
    }
}

/// All live sessions, shared across handlers
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    limits: SessionLimits,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: SessionLimits) -> Self {
        Self {
            sessions: Arc::default(),
            limits,
        }
    }

    /// Start a session on the landing page, evicting stale ones first
    pub async fn create(&self) -> Session {
        let session = Session::new();
        let mut sessions = self.sessions.write().await;
        let evicted = self.prune(&mut sessions, session.created_at);
        sessions.insert(session.id, session.clone());
        debug!(session_id = %session.id, evicted, live = sessions.len(), "Session created");
        session
    }

    /// Drop expired sessions, then the least recently touched ones until
    /// there is room for one more. Returns how many were removed.
    fn prune(&self, sessions: &mut HashMap<Uuid, Session>, now: DateTime<Utc>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, s| !self.limits.is_expired(s, now));

        if sessions.len() >= self.limits.max_sessions {
            let excess = sessions.len() + 1 - self.limits.max_sessions;
            let mut by_age: Vec<(DateTime<Utc>, Uuid)> =
                sessions.values().map(|s| (s.touched_at, s.id)).collect();
            by_age.sort_unstable();
            for (_, id) in by_age.into_iter().take(excess) {
                sessions.remove(&id);
            }
        }

        before - sessions.len()
    }

    /// Expired sessions read as unknown even before they are pruned
    pub async fn get(&self, id: Uuid) -> Result<Session, SessionError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .filter(|s| !self.limits.is_expired(s, Utc::now()))
            .cloned()
            .ok_or(SessionError::NotFound)
    }

    /// Apply a transition and return the resulting state.
    ///
    /// The session is left untouched when `f` fails.
    pub async fn update<F, E>(&self, id: Uuid, f: F) -> Result<Session, E>
    where
        F: FnOnce(&mut Session) -> Result<(), E>,
        E: From<SessionError>,
    {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let current = sessions
            .get(&id)
            .filter(|s| !self.limits.is_expired(s, now))
            .ok_or(SessionError::NotFound)?;
        let mut next = current.clone();
        f(&mut next)?;
        next.touched_at = now;
        sessions.insert(id, next.clone());
        Ok(next)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
