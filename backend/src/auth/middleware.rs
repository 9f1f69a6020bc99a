//! Request extractors for logged-in users
//!
//! A bearer token is accepted only while its session is still logged in as
//! the token's subject.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use fitpulse_shared::Role;
use tracing::debug;
use uuid::Uuid;

/// Authenticated user extracted from the access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub role: Role,
    pub session_id: Uuid,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))?;

        let claims = app_state
            .jwt()
            .validate_access_token(token)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))?;

        let live = app_state
            .sessions()
            .get(claims.sid)
            .await
            .map(|session| session.is_logged_in_as(&claims.sub))
            .unwrap_or(false);
        if !live {
            debug!(session_id = %claims.sid, "Token presented for a closed session");
            return Err(ApiError::Unauthorized("Session has ended".to_string()));
        }

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
            session_id: claims.sid,
        })
    }
}

/// Logged-in administrator
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

/// Logged-in member
#[derive(Debug, Clone)]
pub struct MemberUser(pub AuthUser);

async fn require_role<S>(parts: &mut Parts, state: &S, role: Role) -> Result<AuthUser, ApiError>
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    let user = AuthUser::from_request_parts(parts, state).await?;
    if user.role != role {
        return Err(ApiError::Forbidden(format!("Requires the {} role", role)));
    }
    Ok(user)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Admin).await.map(AdminUser)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MemberUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Member).await.map(MemberUser)
    }
}
