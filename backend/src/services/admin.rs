//! Admin service - member management, template pool and roster

use super::{find_member, member_snapshot, modify_member};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use chrono::Utc;
use fitpulse_shared::ai_payload::WorkoutPlanDraft;
use fitpulse_shared::types::{
    NewMemberRequest, OverviewResponse, UpdateMemberRequest, UserProfile,
};
use fitpulse_shared::validation::validate_email;
use fitpulse_shared::{Trainer, WorkoutPlan};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Admin service for the admin dashboard
pub struct AdminService;

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl AdminService {
    /// Members whose name contains `query`, ignoring case. No query lists all.
    pub async fn list_members(state: &AppState, query: Option<&str>) -> Vec<UserProfile> {
        let needle = query.map(|q| q.trim().to_lowercase()).unwrap_or_default();
        let store = state.store().read().await;
        store
            .members()
            .filter(|m| m.name.to_lowercase().contains(&needle))
            .map(UserProfile::from)
            .collect()
    }

    pub async fn get_member(state: &AppState, member_id: &str) -> ApiResult<UserProfile> {
        let member = member_snapshot(state, member_id).await?;
        Ok(UserProfile::from(&member))
    }

    /// Create a member; missing fields get defaults
    pub async fn add_member(state: &AppState, req: NewMemberRequest) -> ApiResult<UserProfile> {
        if let Some(email) = non_blank(&req.email) {
            validate_email(email).map_err(ApiError::Validation)?;
        }
        let member = state.store().write().await.add_member(req);
        Ok(UserProfile::from(&member))
    }

    /// Edit member fields; absent fields stay as they are
    pub async fn update_member(
        state: &AppState,
        member_id: &str,
        req: UpdateMemberRequest,
    ) -> ApiResult<UserProfile> {
        if let Some(email) = non_blank(&req.email) {
            validate_email(email).map_err(ApiError::Validation)?;
        }

        let (member, _) = modify_member(state, member_id, |m| {
            if let Some(name) = non_blank(&req.name) {
                m.name = name.to_string();
            }
            if let Some(email) = non_blank(&req.email) {
                m.email = email.to_string();
            }
            if let Some(password) = non_blank(&req.password) {
                m.password = Some(password.to_string());
            }
            if let Some(tier) = req.membership_type {
                m.membership_type = Some(tier);
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

        info!(member_id, "Member updated by admin");
        Ok(UserProfile::from(&member))
    }

    pub async fn list_templates(state: &AppState) -> Vec<WorkoutPlan> {
        state.store().read().await.templates().to_vec()
    }

    /// Validate a plan and put it in the shared pool
    pub async fn add_template(state: &AppState, draft: WorkoutPlanDraft) -> ApiResult<WorkoutPlan> {
        draft
            .validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        let plan = draft.into_plan(
            format!("tpl-{}", Uuid::new_v4().simple()),
            Utc::now(),
            None,
        );
        state.store().write().await.add_template(plan.clone());
        Ok(plan)
    }

    /// Add a pool template to a member's suggestions
    pub async fn assign_template(
        state: &AppState,
        member_id: &str,
        template_id: &str,
    ) -> ApiResult<UserProfile> {
        let mut store = state.store().write().await;
        find_member(&store, member_id)?;
        let plan = store
            .template(template_id)
            .ok_or_else(|| ApiError::NotFound(format!("Template {} not found", template_id)))?
            .assigned_copy(Utc::now());

        store.assign_template(member_id, plan);
        let member = find_member(&store, member_id)?;
        Ok(UserProfile::from(member))
    }

    /// Make a pool template the member's active plan
    pub async fn set_active_plan(
        state: &AppState,
        member_id: &str,
        template_id: &str,
    ) -> ApiResult<UserProfile> {
        let template = state
            .store()
            .read()
            .await
            .template(template_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Template {} not found", template_id)))?;

        let (member, _) = modify_member(state, member_id, |m| {
            m.workout_plan = Some(template.assigned_copy(Utc::now()));
            Ok(())
        })
        .await?;
        Ok(UserProfile::from(&member))
    }

    /// Generate a plan from the member's profile and make it active
    pub async fn generate_plan(state: &AppState, member_id: &str) -> ApiResult<UserProfile> {
        let snapshot = member_snapshot(state, member_id).await?;
        let plan = state.ai().generate_workout_plan(&snapshot).await?;

        let (member, _) = modify_member(state, member_id, |m| {
            m.workout_plan = Some(plan);
            Ok(())
        })
        .await?;
        info!(member_id, "AI plan assigned by admin");
        Ok(UserProfile::from(&member))
    }

    pub fn trainers(state: &AppState) -> Vec<Trainer> {
        state.roster.to_vec()
    }

    pub async fn overview(state: &AppState) -> OverviewResponse {
        let store = state.store().read().await;
        OverviewResponse {
            total_members: store.members().count(),
            total_admins: store.users().iter().filter(|u| u.is_admin()).count(),
            total_templates: store.templates().len(),
            members_with_plan: store.members().filter(|m| m.workout_plan.is_some()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiBridge;
    use crate::config::AppConfig;
    use crate::storage::MemoryKvStore;
    use crate::store::DEFAULT_ADMIN_ID;
    use fitpulse_shared::ai_payload::ExerciseDraft;
    use fitpulse_shared::{Difficulty, Role};
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(
            AppConfig::default(),
            Arc::new(MemoryKvStore::new()),
            AiBridge::disabled(),
        )
    }

    fn draft() -> WorkoutPlanDraft {
        WorkoutPlanDraft {
            title: "Güç A".to_string(),
            focus: "Bacak".to_string(),
            difficulty: Difficulty::Advanced,
            duration: None,
            exercises: vec![ExerciseDraft {
                name: "Squat".to_string(),
                sets: "5".to_string(),
                reps: "5".to_string(),
                rest: None,
            }],
        }
    }

    async fn member(state: &AppState, name: &str) -> String {
        AdminService::add_member(
            state,
            NewMemberRequest {
                name: Some(name.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_skips_admins() {
        let state = state();
        member(&state, "Ayşe Kara").await;
        member(&state, "Mehmet Öz").await;

        let found = AdminService::list_members(&state, Some("KARA")).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ayşe Kara");

        let all = AdminService::list_members(&state, None).await;
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|m| m.role == Role::Member));
    }

    #[tokio::test]
    async fn test_admin_is_not_a_member() {
        let state = state();
        let err = AdminService::get_member(&state, DEFAULT_ADMIN_ID)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_member_keeps_absent_fields() {
        let state = state();
        let id = member(&state, "Ali").await;

        let updated = AdminService::update_member(
            &state,
            &id,
            UpdateMemberRequest {
                goal: Some("Yağ yakmak".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Ali");
        assert_eq!(updated.goal.as_deref(), Some("Yağ yakmak"));
    }

    #[tokio::test]
    async fn test_update_unknown_member_is_not_found() {
        let err = AdminService::update_member(&state(), "nope", UpdateMemberRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_template_assign_and_activate() {
        let state = state();
        let id = member(&state, "Ali").await;
        let template = AdminService::add_template(&state, draft()).await.unwrap();

        let profile = AdminService::assign_template(&state, &id, &template.id)
            .await
            .unwrap();
        assert_eq!(profile.assigned_templates.len(), 1);
        assert!(profile.workout_plan.is_none());

        let profile = AdminService::set_active_plan(&state, &id, &template.id)
            .await
            .unwrap();
        assert_eq!(profile.workout_plan.unwrap().title, "Güç A");

        let overview = AdminService::overview(&state).await;
        assert_eq!(overview.total_templates, 1);
        assert_eq!(overview.members_with_plan, 1);
        assert_eq!(overview.total_admins, 1);
    }

    #[tokio::test]
    async fn test_assign_unknown_template_is_not_found() {
        let state = state();
        let id = member(&state, "Ali").await;
        let err = AdminService::assign_template(&state, &id, "tpl-missing")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_add_template_rejects_empty_plan() {
        let mut bad = draft();
        bad.exercises.clear();
        let err = AdminService::add_template(&state(), bad).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_generate_plan_with_ai_disabled() {
        let state = state();
        let id = member(&state, "Ali").await;
        let err = AdminService::generate_plan(&state, &id).await.unwrap_err();
        assert!(matches!(err, ApiError::AiUnavailable(_)));
    }
}
