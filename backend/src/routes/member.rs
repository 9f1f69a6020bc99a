//! Member routes
//!
//! Every handler acts on the logged-in member's own record.

use crate::auth::MemberUser;
use crate::error::ApiResult;
use crate::services::MemberService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use fitpulse_shared::ai_payload::FoodDraft;
use fitpulse_shared::types::{
    AnalyzeFoodRequest, ChatRequest, ChatResponse, DailyNutritionResponse, NutritionPlanRequest,
    NutritionPlanResponse, TemplateRef, UpdateProfileRequest, UserProfile,
};
use fitpulse_shared::{FoodItem, MeasurementLog, NutritionGoal, WorkoutPlan};

/// Create member routes
pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile).put(update_profile))
        .route("/nutrition-goal", put(set_nutrition_goal))
        .route("/measurements", post(add_measurement))
        .route("/food", post(add_food))
        .route("/food/analyze", post(analyze_food))
        .route("/food/:food_id", delete(remove_food))
        .route("/nutrition/daily", get(daily_summary))
        .route("/nutrition/plan", post(nutrition_plan))
        .route("/plan", put(adopt_plan))
        .route("/plan/ai", post(generate_plan))
        .route("/plan/apply", post(apply_template))
        .route("/plan/exercises/:index/toggle", post(toggle_exercise))
        .route("/chat", post(chat))
}

/// GET /api/v1/member/profile
async fn profile(
    State(state): State<AppState>,
    MemberUser(auth): MemberUser,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(MemberService::profile(&state, &auth.user_id).await?))
}

/// PUT /api/v1/member/profile
async fn update_profile(
    State(state): State<AppState>,
    MemberUser(auth): MemberUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(
        MemberService::update_profile(&state, &auth.user_id, req).await?,
    ))
}

/// PUT /api/v1/member/nutrition-goal
async fn set_nutrition_goal(
    State(state): State<AppState>,
    MemberUser(auth): MemberUser,
    Json(goal): Json<NutritionGoal>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(
        MemberService::set_nutrition_goal(&state, &auth.user_id, goal).await?,
    ))
}

/// POST /api/v1/member/measurements
async fn add_measurement(
    State(state): State<AppState>,
    MemberUser(auth): MemberUser,
    Json(log): Json<MeasurementLog>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile = MemberService::add_measurement(&state, &auth.user_id, log).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// POST /api/v1/member/food - Manual entry
async fn add_food(
    State(state): State<AppState>,
    MemberUser(auth): MemberUser,
    Json(draft): Json<FoodDraft>,
) -> ApiResult<(StatusCode, Json<FoodItem>)> {
    let item = MemberService::add_food(&state, &auth.user_id, draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// POST /api/v1/member/food/analyze - Log a meal from its description
async fn analyze_food(
    State(state): State<AppState>,
    MemberUser(auth): MemberUser,
    Json(req): Json<AnalyzeFoodRequest>,
) -> ApiResult<(StatusCode, Json<FoodItem>)> {
    let item = MemberService::analyze_food(&state, &auth.user_id, &req.description).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// DELETE /api/v1/member/food/:food_id
async fn remove_food(
    State(state): State<AppState>,
    MemberUser(auth): MemberUser,
    Path(food_id): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(
        MemberService::remove_food(&state, &auth.user_id, &food_id).await?,
    ))
}

/// GET /api/v1/member/nutrition/daily
async fn daily_summary(
    State(state): State<AppState>,
    MemberUser(auth): MemberUser,
) -> ApiResult<Json<DailyNutritionResponse>> {
    Ok(Json(
        MemberService::daily_summary(&state, &auth.user_id).await?,
    ))
}

/// POST /api/v1/member/nutrition/plan
async fn nutrition_plan(
    State(state): State<AppState>,
    MemberUser(auth): MemberUser,
    Json(req): Json<NutritionPlanRequest>,
) -> ApiResult<Json<NutritionPlanResponse>> {
    Ok(Json(
        MemberService::nutrition_plan(&state, &auth.user_id, req).await?,
    ))
}

/// PUT /api/v1/member/plan - Adopt a plan, e.g. one proposed in chat
async fn adopt_plan(
    State(state): State<AppState>,
    MemberUser(auth): MemberUser,
    Json(plan): Json<WorkoutPlan>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(
        MemberService::adopt_plan(&state, &auth.user_id, plan).await?,
    ))
}

/// POST /api/v1/member/plan/ai
async fn generate_plan(
    State(state): State<AppState>,
    MemberUser(auth): MemberUser,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(
        MemberService::generate_plan(&state, &auth.user_id).await?,
    ))
}

/// POST /api/v1/member/plan/apply - Start a suggested template
async fn apply_template(
    State(state): State<AppState>,
    MemberUser(auth): MemberUser,
    Json(req): Json<TemplateRef>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(
        MemberService::apply_template(&state, &auth.user_id, &req.template_id).await?,
    ))
}

/// POST /api/v1/member/plan/exercises/:index/toggle
async fn toggle_exercise(
    State(state): State<AppState>,
    MemberUser(auth): MemberUser,
    Path(index): Path<usize>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(
        MemberService::toggle_exercise(&state, &auth.user_id, index).await?,
    ))
}

/// POST /api/v1/member/chat
async fn chat(
    State(state): State<AppState>,
    MemberUser(auth): MemberUser,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    Ok(Json(MemberService::chat(&state, &auth.user_id, req).await?))
}
