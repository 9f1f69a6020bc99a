//! Credential checks against the domain store
//!
//! Passwords are stored and compared as plaintext. The admin verification
//! code is one shared string for every administrator; it gates the form,
//! it does not identify anybody.

use crate::store::{DomainStore, DEFAULT_ADMIN_PASSWORD};
use chrono::Utc;
use fitpulse_shared::validation::validate_email;
use fitpulse_shared::{AuthError, Role, User};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};
use uuid::Uuid;

/// Login and registration rules
#[derive(Clone)]
pub struct AuthGate {
    verification_code: SecretString,
}

impl AuthGate {
    pub fn new(verification_code: SecretString) -> Self {
        Self { verification_code }
    }

    /// Admin submissions must carry the exact verification code
    pub fn check_verification(&self, role: Role, supplied: Option<&str>) -> Result<(), AuthError> {
        if role != Role::Admin {
            return Ok(());
        }
        match supplied {
            Some(code) if code == self.verification_code.expose_secret() => Ok(()),
            _ => {
                warn!("Admin form submitted with wrong verification code");
                Err(AuthError::InvalidVerificationCode)
            }
        }
    }

    /// Find the account for `(role, email)` and check the password.
    ///
    /// The password is only compared when one is supplied and the account
    /// has one stored.
    pub fn login<'a>(
        &self,
        store: &'a DomainStore,
        role: Role,
        email: &str,
        password: Option<&str>,
        verification_code: Option<&str>,
    ) -> Result<&'a User, AuthError> {
        self.check_verification(role, verification_code)?;

        let Some(user) = store.find_by_email(email.trim(), role) else {
            info!(%role, "Login failed: no matching account");
            return Err(AuthError::LoginFailed);
        };

        let supplied = password.filter(|p| !p.is_empty());
        if let (Some(supplied), Some(stored)) = (supplied, user.password.as_deref()) {
            if supplied != stored {
                info!(user_id = %user.id, "Login failed: wrong password");
                return Err(AuthError::WrongPassword);
            }
        }

        info!(user_id = %user.id, %role, "Login succeeded");
        Ok(user)
    }

    /// Create an administrator account. Members cannot self-register.
    pub fn register(
        &self,
        store: &mut DomainStore,
        role: Role,
        email: &str,
        name: &str,
        password: Option<&str>,
        verification_code: Option<&str>,
    ) -> Result<User, AuthError> {
        self.check_verification(role, verification_code)?;

        if role != Role::Admin {
            return Err(AuthError::RegistrationNotAllowed);
        }

        let email = email.trim();
        validate_email(email).map_err(AuthError::InvalidEmail)?;
        if name.trim().is_empty() {
            return Err(AuthError::MissingName);
        }
        if store.email_exists(email) {
            info!("Registration rejected: email in use");
            return Err(AuthError::EmailInUse);
        }

        let now = Utc::now();
        // Unique even for registrations within the same millisecond
        let suffix = Uuid::new_v4().simple().to_string();
        let admin = User {
            id: format!("admin_{}_{}", now.timestamp_millis(), &suffix[..8]),
            name: name.trim().to_string(),
            email: email.to_string(),
            password: Some(
                password
                    .filter(|p| !p.is_empty())
                    .unwrap_or(DEFAULT_ADMIN_PASSWORD)
                    .to_string(),
            ),
            role: Role::Admin,
            avatar_url: None,
            join_date: now,
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
        };

        store.add_admin(admin.clone());
        Ok(admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;
    use crate::store::{StorageKeys, DEFAULT_ADMIN_EMAIL};
    use fitpulse_shared::types::NewMemberRequest;
    use rstest::rstest;
    use std::sync::Arc;

    const CODE: &str = "wasd123wasd";

    fn gate() -> AuthGate {
        AuthGate::new(SecretString::new(CODE.to_string()))
    }

    fn store_with_member() -> DomainStore {
        let mut store = DomainStore::load(Arc::new(MemoryKvStore::new()), StorageKeys::default());
        store.add_member(NewMemberRequest {
            email: Some("uye@fitpulse.com".to_string()),
            password: Some("123456".to_string()),
            ..Default::default()
        });
        store
    }

    #[test]
    fn test_member_login_success_ignores_email_case() {
        let store = store_with_member();
        let user = gate()
            .login(&store, Role::Member, "UYE@fitpulse.com", Some("123456"), None)
            .unwrap();
        assert_eq!(user.role, Role::Member);
    }

    #[rstest]
    #[case::wrong_role(Role::Admin, "uye@fitpulse.com", Some("123456"), AuthError::LoginFailed)]
    #[case::wrong_email(Role::Member, "x@fitpulse.com", Some("123456"), AuthError::LoginFailed)]
    #[case::wrong_password(Role::Member, "uye@fitpulse.com", Some("654321"), AuthError::WrongPassword)]
    fn test_member_login_mismatch(
        #[case] role: Role,
        #[case] email: &str,
        #[case] password: Option<&str>,
        #[case] expected: AuthError,
    ) {
        let store = store_with_member();
        // Code supplied so the admin case reaches the lookup
        let err = gate()
            .login(&store, role, email, password, Some(CODE))
            .unwrap_err();
        assert_eq!(err, expected);
    }

    #[test]
    fn test_login_without_password_is_accepted() {
        let store = store_with_member();
        assert!(gate()
            .login(&store, Role::Member, "uye@fitpulse.com", None, None)
            .is_ok());
        assert!(gate()
            .login(&store, Role::Member, "uye@fitpulse.com", Some(""), None)
            .is_ok());
    }

    #[test]
    fn test_admin_login_requires_verification_code() {
        let store = store_with_member();
        let err = gate()
            .login(&store, Role::Admin, DEFAULT_ADMIN_EMAIL, Some("admin123"), Some("nope"))
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidVerificationCode);

        let err = gate()
            .login(&store, Role::Admin, DEFAULT_ADMIN_EMAIL, Some("admin123"), None)
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidVerificationCode);

        assert!(gate()
            .login(&store, Role::Admin, DEFAULT_ADMIN_EMAIL, Some("admin123"), Some(CODE))
            .is_ok());
    }

    #[test]
    fn test_register_admin() {
        let mut store = store_with_member();
        let admin = gate()
            .register(&mut store, Role::Admin, "a@x.com", "Ayşe", Some("pw"), Some(CODE))
            .unwrap();

        assert!(admin.id.starts_with("admin_"));
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(store.users().last().unwrap().id, admin.id);
        assert!(gate()
            .login(&store, Role::Admin, "A@X.com", Some("pw"), Some(CODE))
            .is_ok());
    }

    #[test]
    fn test_back_to_back_registrations_get_distinct_ids() {
        let mut store = store_with_member();
        let a = gate()
            .register(&mut store, Role::Admin, "a@x.com", "Ayşe", None, Some(CODE))
            .unwrap();
        let b = gate()
            .register(&mut store, Role::Admin, "b@x.com", "Burak", None, Some(CODE))
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.user(&b.id).unwrap().email, "b@x.com");
        assert_eq!(store.user(&a.id).unwrap().email, "a@x.com");
    }

    #[test]
    fn test_register_defaults_password() {
        let mut store = store_with_member();
        let admin = gate()
            .register(&mut store, Role::Admin, "a@x.com", "Ayşe", None, Some(CODE))
            .unwrap();
        assert_eq!(admin.password.as_deref(), Some(DEFAULT_ADMIN_PASSWORD));
    }

    #[test]
    fn test_register_wrong_code_creates_nothing() {
        let mut store = store_with_member();
        let before = store.users().len();
        let err = gate()
            .register(&mut store, Role::Admin, "a@x.com", "Ayşe", Some("pw"), Some("bad"))
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidVerificationCode);
        assert_eq!(store.users().len(), before);
    }

    #[test]
    fn test_register_member_not_allowed() {
        let mut store = store_with_member();
        let err = gate()
            .register(&mut store, Role::Member, "m@x.com", "Mehmet", None, None)
            .unwrap_err();
        assert_eq!(err, AuthError::RegistrationNotAllowed);
    }

    #[test]
    fn test_register_duplicate_email_across_roles() {
        let mut store = store_with_member();
        // Taken by a member, still rejected for an admin
        let err = gate()
            .register(&mut store, Role::Admin, "UYE@fitpulse.com", "Ali", None, Some(CODE))
            .unwrap_err();
        assert_eq!(err, AuthError::EmailInUse);
    }

    #[test]
    fn test_register_rejects_bad_email_and_blank_name() {
        let mut store = store_with_member();
        assert!(matches!(
            gate().register(&mut store, Role::Admin, "nope", "Ali", None, Some(CODE)),
            Err(AuthError::InvalidEmail(_))
        ));
        assert_eq!(
            gate()
                .register(&mut store, Role::Admin, "ali@x.com", "  ", None, Some(CODE))
                .unwrap_err(),
            AuthError::MissingName
        );
    }
}
