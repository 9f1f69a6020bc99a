//! Domain store
//!
//! Holds the user collection (admins and members) and the workout template
//! pool. Every mutation rewrites the whole touched collection to the
//! key-value store before returning. Lookups that miss are silent no-ops.

use crate::config::StorageConfig;
use crate::storage::KeyValueStore;
use chrono::Utc;
use fitpulse_shared::types::NewMemberRequest;
use fitpulse_shared::{MembershipTier, Role, User, WorkoutPlan};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Id of the seeded administrator account
pub const DEFAULT_ADMIN_ID: &str = "admin_def";
/// Email of the seeded administrator account
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@fitpulse.com";
/// Password of the seeded administrator account
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

const DEFAULT_MEMBER_NAME: &str = "Yeni Üye";
const DEFAULT_MEMBER_EMAIL: &str = "uye@fitpulse.com";
const DEFAULT_MEMBER_PASSWORD: &str = "123456";

/// Storage keys of the two persisted collections
#[derive(Debug, Clone)]
pub struct StorageKeys {
    pub members: String,
    pub templates: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            members: "fitpulse_members".to_string(),
            templates: "fitpulse_templates".to_string(),
        }
    }
}

impl From<&StorageConfig> for StorageKeys {
    fn from(config: &StorageConfig) -> Self {
        Self {
            members: config.members_key.clone(),
            templates: config.templates_key.clone(),
        }
    }
}

/// The collection a fresh installation starts with
pub fn default_users() -> Vec<User> {
    vec![User {
        id: DEFAULT_ADMIN_ID.to_string(),
        name: "Sistem Yöneticisi".to_string(),
        email: DEFAULT_ADMIN_EMAIL.to_string(),
        password: Some(DEFAULT_ADMIN_PASSWORD.to_string()),
        role: Role::Admin,
        avatar_url: None,
        join_date: Utc::now(),
        membership_type: None,
        workout_plan: None,
        assigned_templates: None,
        age: None,
        height: None,
        weight: None,
        goal: None,
        measurements: None,
        daily_food_log: None,
        nutrition_goal: None,
    }]
}

fn filled(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// In-memory collections mirrored to durable storage
pub struct DomainStore {
    users: Vec<User>,
    templates: Vec<WorkoutPlan>,
    kv: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl DomainStore {
    /// Read both collections once.
    ///
    /// A missing entry yields the default collection. An unreadable or
    /// corrupt entry is logged and also falls back to the default.
    pub fn load(kv: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        let users = Self::read_collection(kv.as_ref(), &keys.members).unwrap_or_else(default_users);
        let templates = Self::read_collection(kv.as_ref(), &keys.templates).unwrap_or_default();

        info!(
            users = users.len(),
            templates = templates.len(),
            "Domain store loaded"
        );

        Self {
            users,
            templates,
            kv,
            keys,
        }
    }

    fn read_collection<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> Option<Vec<T>> {
        let raw = match kv.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!(key, error = %e, "Failed to read persisted collection");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(items) => Some(items),
            Err(e) => {
                error!(key, error = %e, "Persisted collection is corrupt, using default");
                None
            }
        }
    }

    /// Full-collection write; blocks the caller, see [`KeyValueStore`]
    fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) {
        let result = serde_json::to_string(items)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.kv.set(key, &json));
        if let Err(e) = result {
            // In-memory state stays authoritative until the next write
            error!(key, error = %e, "Failed to persist collection");
        }
    }

    fn persist_users(&self) {
        self.write_collection(&self.keys.members, &self.users);
    }

    fn persist_templates(&self) {
        self.write_collection(&self.keys.templates, &self.templates);
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// Every account, admins included
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Accounts with the member role, in collection order
    pub fn members(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|u| u.role == Role::Member)
    }

    /// Case-insensitive email lookup restricted to one role
    pub fn find_by_email(&self, email: &str, role: Role) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.role == role && u.email_matches(email))
    }

    /// Whether any account, of any role, uses this email
    pub fn email_exists(&self, email: &str) -> bool {
        self.users.iter().any(|u| u.email_matches(email))
    }

    pub fn templates(&self) -> &[WorkoutPlan] {
        &self.templates
    }

    pub fn template(&self, id: &str) -> Option<&WorkoutPlan> {
        self.templates.iter().find(|t| t.id == id)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Create a member from partial data and put it first in the collection.
    ///
    /// Missing fields get defaults; the role is always member. No
    /// uniqueness check happens here.
    pub fn add_member(&mut self, partial: NewMemberRequest) -> User {
        let member = User {
            id: Uuid::new_v4().simple().to_string(),
            name: filled(partial.name, DEFAULT_MEMBER_NAME),
            email: filled(partial.email, DEFAULT_MEMBER_EMAIL),
            password: Some(filled(partial.password, DEFAULT_MEMBER_PASSWORD)),
            role: Role::Member,
            avatar_url: partial.avatar_url,
            join_date: Utc::now(),
            membership_type: Some(partial.membership_type.unwrap_or(MembershipTier::Bronze)),
            workout_plan: None,
            assigned_templates: Some(Vec::new()),
            age: partial.age,
            height: partial.height,
            weight: partial.weight,
            goal: partial.goal,
            measurements: Some(Vec::new()),
            daily_food_log: Some(Vec::new()),
            nutrition_goal: None,
        };

        self.users.insert(0, member.clone());
        self.persist_users();
        info!(member_id = %member.id, "Member added");
        member
    }

    /// Append a freshly registered administrator
    pub fn add_admin(&mut self, admin: User) {
        debug_assert_eq!(admin.role, Role::Admin);
        info!(admin_id = %admin.id, "Administrator added");
        self.users.push(admin);
        self.persist_users();
    }

    /// Replace the entry with the same id. Returns `false` on a miss.
    pub fn update_member(&mut self, user: User) -> bool {
        let Some(slot) = self.users.iter_mut().find(|u| u.id == user.id) else {
            debug!(user_id = %user.id, "Update for unknown user ignored");
            return false;
        };
        *slot = user;
        self.persist_users();
        true
    }

    /// Add a plan to the shared template pool
    pub fn add_template(&mut self, plan: WorkoutPlan) {
        info!(template_id = %plan.id, title = %plan.title, "Template added");
        self.templates.push(plan);
        self.persist_templates();
    }

    /// Append a plan to a member's suggestion list. Returns `false` on a miss.
    pub fn assign_template(&mut self, member_id: &str, plan: WorkoutPlan) -> bool {
        let Some(member) = self.user(member_id) else {
            warn!(member_id, "Template assignment to unknown member ignored");
            return false;
        };
        let mut updated = member.clone();
        updated
            .assigned_templates
            .get_or_insert_with(Vec::new)
            .push(plan);
        self.update_member(updated)
    }
}
