//! Access tokens
//!
//! A token names the user, the role it logged in with and the session it
//! belongs to. Tokens are only honoured while that session is still logged
//! in as the same user, so logging out revokes them.

use anyhow::Result;
use chrono::{Duration, Utc};
use fitpulse_shared::Role;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const ACCESS_TOKEN_TYPE: &str = "access";

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub role: Role,
    /// Session the login happened in
    pub sid: Uuid,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub token_type: String,
}

/// Pre-computed JWT keys, created once at startup
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Issues and checks access tokens
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_token_expiry_secs: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_expiry_secs: i64) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            access_token_expiry_secs,
        }
    }

    /// Issue a token for `user_id` logged in as `role` within `session_id`
    pub fn generate_access_token(&self, user_id: &str, role: Role, session_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_token_expiry_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            sid: session_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate access token: {}", e))
    }

    pub fn validate_access_token(&self, token: &str) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?
            .claims;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(anyhow::anyhow!("Not an access token"));
        }
        Ok(claims)
    }

    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret", 3600)
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let service = create_test_service();
        let sid = Uuid::new_v4();

        let token = service
            .generate_access_token("admin_def", Role::Admin, sid)
            .unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, "admin_def");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.sid, sid);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();
        assert!(service.validate_access_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let token = JwtService::new("other-secret", 3600)
            .generate_access_token("u1", Role::Member, Uuid::new_v4())
            .unwrap();
        assert!(create_test_service().validate_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the default 60s leeway
        let service = JwtService::new("test-secret", -120);
        let token = service
            .generate_access_token("u1", Role::Member, Uuid::new_v4())
            .unwrap();
        assert!(service.validate_access_token(&token).is_err());
    }
}
