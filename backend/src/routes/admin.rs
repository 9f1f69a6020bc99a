//! Admin routes
//!
//! Every handler requires a logged-in administrator.

use crate::auth::AdminUser;
use crate::error::ApiResult;
use crate::services::AdminService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use fitpulse_shared::ai_payload::WorkoutPlanDraft;
use fitpulse_shared::types::{
    MemberSearchQuery, NewMemberRequest, OverviewResponse, TemplateRef, UpdateMemberRequest,
    UserProfile,
};
use fitpulse_shared::{Trainer, WorkoutPlan};

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview))
        .route("/members", get(list_members).post(add_member))
        .route("/members/:id", get(get_member).put(update_member))
        .route("/members/:id/templates", post(assign_template))
        .route("/members/:id/plan", post(set_active_plan))
        .route("/members/:id/plan/ai", post(generate_plan))
        .route("/templates", get(list_templates).post(add_template))
        .route("/trainers", get(trainers))
}

/// GET /api/v1/admin/overview
async fn overview(State(state): State<AppState>, _admin: AdminUser) -> Json<OverviewResponse> {
    Json(AdminService::overview(&state).await)
}

/// GET /api/v1/admin/members?q= - Filter by name, case-insensitive
async fn list_members(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<MemberSearchQuery>,
) -> Json<Vec<UserProfile>> {
    Json(AdminService::list_members(&state, query.q.as_deref()).await)
}

/// POST /api/v1/admin/members
async fn add_member(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<NewMemberRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let member = AdminService::add_member(&state, req).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// GET /api/v1/admin/members/:id
async fn get_member(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(AdminService::get_member(&state, &id).await?))
}

/// PUT /api/v1/admin/members/:id
async fn update_member(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateMemberRequest>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(AdminService::update_member(&state, &id, req).await?))
}

/// POST /api/v1/admin/members/:id/templates - Suggest a pool template
async fn assign_template(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<TemplateRef>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(
        AdminService::assign_template(&state, &id, &req.template_id).await?,
    ))
}

/// POST /api/v1/admin/members/:id/plan - Activate a pool template
async fn set_active_plan(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<TemplateRef>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(
        AdminService::set_active_plan(&state, &id, &req.template_id).await?,
    ))
}

/// POST /api/v1/admin/members/:id/plan/ai
async fn generate_plan(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(AdminService::generate_plan(&state, &id).await?))
}

/// GET /api/v1/admin/templates
async fn list_templates(State(state): State<AppState>, _admin: AdminUser) -> Json<Vec<WorkoutPlan>> {
    Json(AdminService::list_templates(&state).await)
}

/// POST /api/v1/admin/templates
async fn add_template(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(draft): Json<WorkoutPlanDraft>,
) -> ApiResult<(StatusCode, Json<WorkoutPlan>)> {
    let plan = AdminService::add_template(&state, draft).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// GET /api/v1/admin/trainers
async fn trainers(State(state): State<AppState>, _admin: AdminUser) -> Json<Vec<Trainer>> {
    Json(AdminService::trainers(&state))
}
