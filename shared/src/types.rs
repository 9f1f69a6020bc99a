//! API request and response types

use crate::models::{
    FoodItem, MeasurementLog, MembershipTier, NutritionGoal, Role, User, WorkoutPlan,
};
use crate::nutrition::{MacroProgress, MacroTotals};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Session and Authentication Types
// ============================================================================

/// Screen a session is on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    Landing,
    Login,
    AdminDashboard,
    MemberDashboard,
}

impl View {
    /// Dashboard a role lands on after login
    pub fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Admin => View::AdminDashboard,
            Role::Member => View::MemberDashboard,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            View::Landing => "LANDING",
            View::Login => "LOGIN",
            View::AdminDashboard => "ADMIN_DASHBOARD",
            View::MemberDashboard => "MEMBER_DASHBOARD",
        };
        f.write_str(label)
    }
}

/// Session state as seen by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub view: View,
    pub secret_admin_entry: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub role: Role,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    /// Required for the admin role
    #[serde(default)]
    pub verification_code: Option<String>,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub role: Role,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub verification_code: Option<String>,
}

/// Successful login or registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub session: SessionResponse,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User as returned by the API. Never carries the password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub join_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_type: Option<MembershipTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_plan: Option<WorkoutPlan>,
    #[serde(default)]
    pub assigned_templates: Vec<WorkoutPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default)]
    pub measurements: Vec<MeasurementLog>,
    #[serde(default)]
    pub daily_food_log: Vec<FoodItem>,
    pub nutrition_goal: NutritionGoal,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            avatar_url: user.avatar_url.clone(),
            join_date: user.join_date,
            membership_type: user.membership_type,
            workout_plan: user.workout_plan.clone(),
            assigned_templates: user.assigned_templates().to_vec(),
            age: user.age.clone(),
            height: user.height.clone(),
            weight: user.weight.clone(),
            goal: user.goal.clone(),
            measurements: user.measurements().to_vec(),
            daily_food_log: user.food_log().to_vec(),
            nutrition_goal: user.nutrition_goal.unwrap_or_default(),
        }
    }
}

// ============================================================================
// Admin Surface Types
// ============================================================================

/// Partial member data for admin-add; missing fields get defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMemberRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub membership_type: Option<MembershipTier>,
    pub avatar_url: Option<String>,
    pub age: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub goal: Option<String>,
}

/// Field edits applied by an admin; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub membership_type: Option<MembershipTier>,
    pub avatar_url: Option<String>,
    pub age: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub goal: Option<String>,
}

/// Member list filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberSearchQuery {
    /// Case-insensitive substring of the member name
    #[serde(default)]
    pub q: Option<String>,
}

/// Reference to a template in the pool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRef {
    pub template_id: String,
}

/// Admin overview counters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub total_members: usize,
    pub total_admins: usize,
    pub total_templates: usize,
    pub members_with_plan: usize,
}

// ============================================================================
// Member Surface Types
// ============================================================================

/// Profile edits a member can make on their own record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub age: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub goal: Option<String>,
}

/// Free-text meal description for AI analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeFoodRequest {
    pub description: String,
}

/// Daily macro summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyNutritionResponse {
    pub totals: MacroTotals,
    pub goal: NutritionGoal,
    pub progress: MacroProgress,
    pub entry_count: usize,
}

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One line of chat history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

/// Chat request; the client owns the history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Chat reply
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub text: String,
    /// Plan proposed by the assistant, not yet adopted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_plan: Option<WorkoutPlan>,
    /// Why an embedded plan block was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_error: Option<String>,
}

/// Nutrition plan request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionPlanRequest {
    pub calories: String,
    #[serde(default)]
    pub info: String,
}

/// Generated nutrition plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionPlanResponse {
    pub plan: String,
}
