//! Session service - navigation, login, registration and logout

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::session::Session;
use crate::state::AppState;
use fitpulse_shared::types::{
    AuthResponse, LoginRequest, RegisterRequest, SessionResponse, UserProfile,
};
use fitpulse_shared::Role;
use tracing::info;
use uuid::Uuid;

/// Session service for the landing and login screens
pub struct SessionService;

impl SessionService {
    /// Client view of a session, with the logged-in user read fresh from the store
    pub async fn describe(state: &AppState, session: &Session) -> SessionResponse {
        let user = match session.user_id.as_deref() {
            Some(id) => state.store().read().await.user(id).map(UserProfile::from),
            None => None,
        };
        SessionResponse {
            session_id: session.id,
            view: session.view,
            secret_admin_entry: session.secret_admin_entry,
            user,
        }
    }

    pub async fn create(state: &AppState) -> SessionResponse {
        let session = state.sessions().create().await;
        Self::describe(state, &session).await
    }

    pub async fn get(state: &AppState, session_id: Uuid) -> ApiResult<SessionResponse> {
        let session = state.sessions().get(session_id).await?;
        Ok(Self::describe(state, &session).await)
    }

    pub async fn open_login(state: &AppState, session_id: Uuid) -> ApiResult<SessionResponse> {
        let session = state
            .sessions()
            .update(session_id, |s| s.open_login())
            .await
            .map_err(ApiError::from)?;
        Ok(Self::describe(state, &session).await)
    }

    /// Landing page back door to the admin form
    pub async fn admin_access(state: &AppState, session_id: Uuid) -> ApiResult<SessionResponse> {
        let session = state
            .sessions()
            .update(session_id, |s| s.admin_access())
            .await
            .map_err(ApiError::from)?;
        Ok(Self::describe(state, &session).await)
    }

    /// Check credentials and move the session to the role's dashboard.
    ///
    /// A failed attempt leaves the session on the login form.
    pub async fn login(
        state: &AppState,
        session_id: Uuid,
        req: LoginRequest,
    ) -> ApiResult<AuthResponse> {
        let session = state.sessions().get(session_id).await?;
        session.ensure_login_form()?;
        let role = session.effective_role(req.role);

        let user_id = {
            let store = state.store().read().await;
            state
                .gate()
                .login(
                    &store,
                    role,
                    &req.email,
                    req.password.as_deref(),
                    req.verification_code.as_deref(),
                )?
                .id
                .clone()
        };

        Self::enter_dashboard(state, session_id, &user_id, role).await
    }

    /// Register an administrator and log the session in as them
    pub async fn register(
        state: &AppState,
        session_id: Uuid,
        req: RegisterRequest,
    ) -> ApiResult<AuthResponse> {
        let session = state.sessions().get(session_id).await?;
        session.ensure_login_form()?;
        let role = session.effective_role(req.role);

        let admin = {
            let mut store = state.store().write().await;
            state.gate().register(
                &mut store,
                role,
                &req.email,
                &req.name,
                req.password.as_deref(),
                req.verification_code.as_deref(),
            )?
        };

        Self::enter_dashboard(state, session_id, &admin.id, admin.role).await
    }

    async fn enter_dashboard(
        state: &AppState,
        session_id: Uuid,
        user_id: &str,
        role: Role,
    ) -> ApiResult<AuthResponse> {
        let session = state
            .sessions()
            .update(session_id, |s| s.logged_in(user_id, role))
            .await
            .map_err(ApiError::from)?;

        let access_token = state.jwt().generate_access_token(user_id, role, session_id)?;
        info!(%session_id, user_id, %role, "Session logged in");

        Ok(AuthResponse {
            session: Self::describe(state, &session).await,
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt().access_token_expiry_secs(),
        })
    }

    /// Back to the login form; the caller's token stops working
    pub async fn logout(state: &AppState, auth: &AuthUser) -> ApiResult<SessionResponse> {
        let session = state
            .sessions()
            .update(auth.session_id, |s| {
                s.logout();
                Ok::<_, ApiError>(())
            })
            .await?;
        info!(session_id = %auth.session_id, user_id = %auth.user_id, "Session logged out");
        Ok(Self::describe(state, &session).await)
    }
}
