//! Member service - profile, tracking, nutrition and AI coaching
//!
//! Every operation reads the member by id from the store. AI calls work on
//! a snapshot taken before the call; the result is written back afterwards
//! and overwrites whatever changed in between.

use super::{member_snapshot, modify_member};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use chrono::Utc;
use fitpulse_shared::ai_payload::FoodDraft;
use fitpulse_shared::types::{
    ChatRequest, ChatResponse, DailyNutritionResponse, NutritionPlanRequest,
    NutritionPlanResponse, UpdateProfileRequest, UserProfile,
};
use fitpulse_shared::validation::{validate_measurement, validate_nutrition_goal};
use fitpulse_shared::{
    aggregate_macros, macro_progress, FoodItem, MeasurementLog, NutritionGoal, User, WorkoutPlan,
};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

/// Member service for the member dashboard
pub struct MemberService;

impl MemberService {
    pub async fn profile(state: &AppState, member_id: &str) -> ApiResult<UserProfile> {
        let member = member_snapshot(state, member_id).await?;
        Ok(UserProfile::from(&member))
    }

    pub async fn update_profile(
        state: &AppState,
        member_id: &str,
        req: UpdateProfileRequest,
    ) -> ApiResult<UserProfile> {
        let (member, _) = modify_member(state, member_id, |m| {
            if let Some(name) = req.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
                m.name = name.to_string();
            }
            if req.avatar_url.is_some() {
                m.avatar_url = req.avatar_url;
            }
            if req.age.is_some() {
                m.age = req.age;
            }
            if req.height.is_some() {
                m.height = req.height;
            }
            if req.weight.is_some() {
                m.weight = req.weight;
            }
            if req.goal.is_some() {
                m.goal = req.goal;
            }
            Ok(())
        })
        .await?;
        Ok(UserProfile::from(&member))
    }

    pub async fn set_nutrition_goal(
        state: &AppState,
        member_id: &str,
        goal: NutritionGoal,
    ) -> ApiResult<UserProfile> {
        validate_nutrition_goal(&goal)?;
        let (member, _) = modify_member(state, member_id, |m| {
            m.nutrition_goal = Some(goal);
            Ok(())
        })
        .await?;
        Ok(UserProfile::from(&member))
    }

    /// Record a measurement; the history stays sorted by date
    pub async fn add_measurement(
        state: &AppState,
        member_id: &str,
        log: MeasurementLog,
    ) -> ApiResult<UserProfile> {
        validate_measurement(&log)?;
        let (member, _) = modify_member(state, member_id, |m| {
            m.record_measurement(log);
            Ok(())
        })
        .await?;
        Ok(UserProfile::from(&member))
    }

    fn push_food(member: &mut User, item: FoodItem) {
        member
            .daily_food_log
            .get_or_insert_with(Vec::new)
            .push(item);
    }

    /// Estimate macros for a meal description and log the result
    pub async fn analyze_food(
        state: &AppState,
        member_id: &str,
        description: &str,
    ) -> ApiResult<FoodItem> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ApiError::Validation(
                "Meal description cannot be empty".to_string(),
            ));
        }
        // Fail fast on an unknown member before spending an AI call
        member_snapshot(state, member_id).await?;

        let item = state.ai().analyze_food(description).await?;
        modify_member(state, member_id, |m| {
            Self::push_food(m, item.clone());
            Ok(())
        })
        .await?;

        info!(member_id, food = %item.name, calories = item.calories, "Food logged from analysis");
        Ok(item)
    }

    /// Log a food entry typed in by the member
    pub async fn add_food(
        state: &AppState,
        member_id: &str,
        draft: FoodDraft,
    ) -> ApiResult<FoodItem> {
        draft
            .validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        let item = draft.into_item(Uuid::new_v4().simple().to_string(), Utc::now());

        modify_member(state, member_id, |m| {
            Self::push_food(m, item.clone());
            Ok(())
        })
        .await?;
        Ok(item)
    }

    pub async fn remove_food(
        state: &AppState,
        member_id: &str,
        food_id: &str,
    ) -> ApiResult<UserProfile> {
        let (member, _) = modify_member(state, member_id, |m| {
            let log = m.daily_food_log.get_or_insert_with(Vec::new);
            let before = log.len();
            log.retain(|item| item.id != food_id);
            if log.len() == before {
                return Err(ApiError::NotFound(format!("Food entry {} not found", food_id)));
            }
            Ok(())
        })
        .await?;
        Ok(UserProfile::from(&member))
    }

    /// Totals over the whole food log against the member's goal
    pub async fn daily_summary(
        state: &AppState,
        member_id: &str,
    ) -> ApiResult<DailyNutritionResponse> {
        let member = member_snapshot(state, member_id).await?;
        let goal = member.nutrition_goal.unwrap_or_default();
        let totals = aggregate_macros(member.food_log());

        Ok(DailyNutritionResponse {
            totals,
            goal,
            progress: macro_progress(&totals, &goal),
            entry_count: member.food_log().len(),
        })
    }

    /// Flip the completion mark of one exercise on the active plan
    pub async fn toggle_exercise(
        state: &AppState,
        member_id: &str,
        index: usize,
    ) -> ApiResult<UserProfile> {
        let (member, completed) = modify_member(state, member_id, |m| {
            let plan = m
                .workout_plan
                .as_mut()
                .ok_or_else(|| ApiError::NotFound("No active workout plan".to_string()))?;
            let exercise = plan.exercises.get_mut(index).ok_or_else(|| {
                ApiError::NotFound(format!("Exercise {} not found in the active plan", index))
            })?;
            exercise.completed = !exercise.completed;
            Ok(exercise.completed)
        })
        .await?;

        debug!(member_id, index, completed, "Exercise toggled");
        Ok(UserProfile::from(&member))
    }

    /// Start one of the suggested templates.
    ///
    /// The suggestion is copied with a fresh timestamp into the active plan
    /// and taken off the suggestion list.
    pub async fn apply_template(
        state: &AppState,
        member_id: &str,
        template_id: &str,
    ) -> ApiResult<UserProfile> {
        let (member, _) = modify_member(state, member_id, |m| {
            let suggestions = m.assigned_templates.get_or_insert_with(Vec::new);
            let position = suggestions
                .iter()
                .position(|t| t.id == template_id)
                .ok_or_else(|| {
                    ApiError::NotFound(format!("Template {} is not suggested", template_id))
                })?;
            let template = suggestions.remove(position);
            m.workout_plan = Some(template.assigned_copy(Utc::now()));
            Ok(())
        })
        .await?;

        info!(member_id, template_id, "Suggested template applied");
        Ok(UserProfile::from(&member))
    }

    /// Make an arbitrary plan active, such as one proposed in chat
    pub async fn adopt_plan(
        state: &AppState,
        member_id: &str,
        plan: WorkoutPlan,
    ) -> ApiResult<UserProfile> {
        if plan.title.trim().is_empty() || plan.exercises.is_empty() {
            return Err(ApiError::Validation(
                "A plan needs a title and at least one exercise".to_string(),
            ));
        }
        let (member, _) = modify_member(state, member_id, |m| {
            m.workout_plan = Some(plan.assigned_copy(Utc::now()));
            Ok(())
        })
        .await?;
        Ok(UserProfile::from(&member))
    }

    /// Ask the AI for a plan for this member and make it active
    pub async fn generate_plan(state: &AppState, member_id: &str) -> ApiResult<UserProfile> {
        let snapshot = member_snapshot(state, member_id).await?;
        let plan = state.ai().generate_workout_plan(&snapshot).await?;

        let (member, _) = modify_member(state, member_id, |m| {
            m.workout_plan = Some(plan);
            Ok(())
        })
        .await?;
        info!(member_id, "AI plan generated by member");
        Ok(UserProfile::from(&member))
    }

    /// Coaching chat. A proposed plan is returned, not applied.
    pub async fn chat(
        state: &AppState,
        member_id: &str,
        req: ChatRequest,
    ) -> ApiResult<ChatResponse> {
        if req.message.trim().is_empty() {
            return Err(ApiError::Validation("Message cannot be empty".to_string()));
        }
        let snapshot = member_snapshot(state, member_id).await?;
        let response = state
            .ai()
            .chat(&req.message, &req.history, snapshot.food_log())
            .await?;
        Ok(response)
    }

    pub async fn nutrition_plan(
        state: &AppState,
        member_id: &str,
        req: NutritionPlanRequest,
    ) -> ApiResult<NutritionPlanResponse> {
        if req.calories.trim().is_empty() {
            return Err(ApiError::Validation(
                "Calorie target cannot be empty".to_string(),
            ));
        }
        member_snapshot(state, member_id).await?;
        let plan = state.ai().nutrition_plan(&req.calories, &req.info).await?;
        Ok(NutritionPlanResponse { plan })
    }
}
