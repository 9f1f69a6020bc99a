//! Session routes
//!
//! Landing page navigation, login, admin registration and logout.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::SessionService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use fitpulse_shared::types::{AuthResponse, LoginRequest, RegisterRequest, SessionResponse};
use uuid::Uuid;

/// Create session routes
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/logout", post(logout))
        .route("/:id", get(get_session))
        .route("/:id/open-login", post(open_login))
        .route("/:id/admin-access", post(admin_access))
        .route("/:id/login", post(login))
        .route("/:id/register", post(register))
}

/// POST /api/v1/session - Start on the landing page
async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    (StatusCode::CREATED, Json(SessionService::create(&state).await))
}

/// GET /api/v1/session/:id
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    Ok(Json(SessionService::get(&state, id).await?))
}

/// POST /api/v1/session/:id/open-login
async fn open_login(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    Ok(Json(SessionService::open_login(&state, id).await?))
}

/// POST /api/v1/session/:id/admin-access
async fn admin_access(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    Ok(Json(SessionService::admin_access(&state, id).await?))
}

/// POST /api/v1/session/:id/login
async fn login(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    Ok(Json(SessionService::login(&state, id, req).await?))
}

/// POST /api/v1/session/:id/register - Administrators only
async fn register(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let auth = SessionService::register(&state, id, req).await?;
    Ok((StatusCode::CREATED, Json(auth)))
}

/// POST /api/v1/session/logout - Ends the session the token belongs to
async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<SessionResponse>> {
    Ok(Json(SessionService::logout(&state, &auth).await?))
}
