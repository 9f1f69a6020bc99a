//! AI bridge
//!
//! Builds prompts, sends them to a [`TextGenerator`] and turns the replies
//! into domain objects. Replies are parsed strictly: anything that does not
//! validate is an [`AiError::InvalidResponse`], never a half-filled object.
//!
//! The bridge never touches the domain store. Callers snapshot what they
//! need, release the store, call the bridge, then write the result back.

mod gemini;
mod prompts;

pub use gemini::GeminiClient;

use crate::config::AiConfig;
use anyhow::Result;
use chrono::Utc;
use fitpulse_shared::ai_payload::{extract_chat_plan, parse_food, parse_workout_plan};
use fitpulse_shared::types::{ChatMessage, ChatResponse};
use fitpulse_shared::{FoodItem, ParseError, User, WorkoutPlan};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Duration given to chat plans that do not state one
pub const CHAT_PLAN_DEFAULT_DURATION: &str = "45-60 dk";

#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI features are disabled")]
    Disabled,

    #[error("AI request failed: {0}")]
    Request(String),

    #[error("AI response rejected: {0}")]
    InvalidResponse(#[from] ParseError),
}

/// Prompt in, text out
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

/// Typed AI operations over an optional generator
#[derive(Clone)]
pub struct AiBridge {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl AiBridge {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// Every call fails with [`AiError::Disabled`]
    pub fn disabled() -> Self {
        Self { generator: None }
    }

    /// Gemini-backed bridge, or a disabled one when AI is off or has no key
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        if !config.enabled {
            info!("AI features disabled by configuration");
            return Ok(Self::disabled());
        }
        let Some(api_key) = config.api_key.clone() else {
            warn!("AI enabled but no API key configured, disabling AI features");
            return Ok(Self::disabled());
        };
        let client = GeminiClient::from_config(config, api_key)?;
        info!(model = %config.model, "AI features enabled");
        Ok(Self::new(Arc::new(client)))
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    async fn generate(&self, operation: &'static str, prompt: &str) -> Result<String, AiError> {
        let generator = self.generator.as_ref().ok_or(AiError::Disabled)?;
        generator.generate(prompt).await.map_err(|e| {
            warn!(operation, error = %e, "AI request failed");
            e
        })
    }

    /// One-day plan for the member's profile
    pub async fn generate_workout_plan(&self, member: &User) -> Result<WorkoutPlan, AiError> {
        let text = self
            .generate("workout_plan", &prompts::workout_plan(member))
            .await?;
        let draft = parse_workout_plan(&text).map_err(|e| {
            warn!(member_id = %member.id, error = %e, "Generated workout plan rejected");
            e
        })?;

        info!(
            member_id = %member.id,
            difficulty = draft.difficulty.label(),
            exercises = draft.exercises.len(),
            "Workout plan generated"
        );
        let now = Utc::now();
        Ok(draft.into_plan(format!("ai-{}", now.timestamp_millis()), now, None))
    }

    /// Coaching reply, possibly carrying a proposed plan
    pub async fn chat(
        &self,
        message: &str,
        history: &[ChatMessage],
        food_log: &[FoodItem],
    ) -> Result<ChatResponse, AiError> {
        let text = self
            .generate("chat", &prompts::chat(message, history, food_log))
            .await?;
        if text.trim().is_empty() {
            return Err(AiError::InvalidResponse(ParseError::Empty));
        }

        let extraction = extract_chat_plan(&text);
        let (workout_plan, plan_error) = match extraction.plan {
            None => (None, None),
            Some(Ok(draft)) => {
                let now = Utc::now();
                let plan = draft.into_plan(
                    format!("ai-chat-{}", now.timestamp_millis()),
                    now,
                    Some(CHAT_PLAN_DEFAULT_DURATION),
                );
                (Some(plan), None)
            }
            Some(Err(e)) => {
                warn!(error = %e, "Plan block in chat reply rejected");
                (None, Some(e.to_string()))
            }
        };

        Ok(ChatResponse {
            text: extraction.display_text,
            workout_plan,
            plan_error,
        })
    }

    /// Macro estimate for a meal description
    pub async fn analyze_food(&self, description: &str) -> Result<FoodItem, AiError> {
        let text = self
            .generate("food_analysis", &prompts::food_analysis(description))
            .await?;
        let draft = parse_food(&text).map_err(|e| {
            warn!(error = %e, "Food analysis rejected");
            e
        })?;
        Ok(draft.into_item(Uuid::new_v4().simple().to_string(), Utc::now()))
    }

    /// Free-text meal plan
    pub async fn nutrition_plan(&self, calories: &str, info: &str) -> Result<String, AiError> {
        let text = self
            .generate("nutrition_plan", &prompts::nutrition_plan(calories, info))
            .await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(AiError::InvalidResponse(ParseError::Empty));
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitpulse_shared::{Difficulty, Role};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned replies and records prompts
    #[derive(Default)]
    struct Scripted {
        replies: Mutex<VecDeque<Result<String, AiError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn replying(replies: Vec<Result<String, AiError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::default(),
            })
        }
    }

    #[async_trait::async_trait]
    impl TextGenerator for Scripted {
        async fn generate(&self, prompt: &str) -> Result<String, AiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn bridge(reply: &str) -> AiBridge {
        AiBridge::new(Scripted::replying(vec![Ok(reply.to_string())]))
    }

    fn member() -> User {
        User {
            id: "m1".to_string(),
            name: "Ali".to_string(),
            email: "ali@x.com".to_string(),
            password: None,
            role: Role::Member,
            avatar_url: None,
            join_date: Utc::now(),
            membership_type: None,
            workout_plan: None,
            assigned_templates: None,
            age: None,
            height: None,
            weight: None,
            goal: Some("Kas kazanmak".to_string()),
            measurements: None,
            daily_food_log: None,
            nutrition_goal: None,
        }
    }

    const PLAN_JSON: &str = r#"{"title":"Güç A","focus":"Tüm Vücut","difficulty":"Orta",
        "exercises":[{"name":"Squat","sets":"4","reps":"8","rest":"90 sn"}]}"#;

    #[tokio::test]
    async fn test_disabled_bridge() {
        let bridge = AiBridge::disabled();
        assert!(!bridge.is_enabled());
        assert!(matches!(
            bridge.analyze_food("elma").await,
            Err(AiError::Disabled)
        ));
    }

    #[tokio::test]
    async fn test_workout_plan_strips_fences_and_stamps() {
        let reply = format!("```json\n{}\n```", PLAN_JSON);
        let plan = bridge(&reply).generate_workout_plan(&member()).await.unwrap();

        assert!(plan.id.starts_with("ai-"));
        assert!(!plan.id.starts_with("ai-chat-"));
        assert_eq!(plan.difficulty, Difficulty::Intermediate);
        assert_eq!(plan.duration, None);
        assert_eq!(plan.exercises.len(), 1);
    }

    #[tokio::test]
    async fn test_workout_plan_prompt_carries_goal() {
        let scripted = Scripted::replying(vec![Ok(PLAN_JSON.to_string())]);
        AiBridge::new(scripted.clone())
            .generate_workout_plan(&member())
            .await
            .unwrap();
        assert!(scripted.prompts.lock().unwrap()[0].contains("Kas kazanmak"));
    }

    #[tokio::test]
    async fn test_workout_plan_rejects_partial_object() {
        let err = bridge(r#"{"title":"Eksik"}"#)
            .generate_workout_plan(&member())
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::InvalidResponse(ParseError::Json(_))));
    }

    #[tokio::test]
    async fn test_request_error_passes_through() {
        let bridge = AiBridge::new(Scripted::replying(vec![Err(AiError::Request(
            "timeout".to_string(),
        ))]));
        assert!(matches!(
            bridge.nutrition_plan("2000", "").await,
            Err(AiError::Request(_))
        ));
    }

    #[tokio::test]
    async fn test_chat_with_valid_block() {
        let reply = format!("Harika! ||JSON_START||{}||JSON_END|| Başarılar.", PLAN_JSON);
        let response = bridge(&reply).chat("Program yaz", &[], &[]).await.unwrap();

        let plan = response.workout_plan.unwrap();
        assert!(plan.id.starts_with("ai-chat-"));
        assert_eq!(plan.duration.as_deref(), Some(CHAT_PLAN_DEFAULT_DURATION));
        assert!(!response.text.contains("JSON_START"));
        assert!(response.text.starts_with("Harika!"));
        assert!(response.plan_error.is_none());
    }

    #[tokio::test]
    async fn test_chat_with_broken_block_keeps_text() {
        let reply = "Al bakalım ||JSON_START|| {bozuk ||JSON_END||";
        let response = bridge(reply).chat("Program yaz", &[], &[]).await.unwrap();

        assert!(response.workout_plan.is_none());
        assert!(response.plan_error.is_some());
        assert_eq!(response.text, reply);
    }

    #[tokio::test]
    async fn test_chat_plain_and_empty() {
        let response = bridge("Su içmeyi unutma!").chat("selam", &[], &[]).await.unwrap();
        assert_eq!(response.text, "Su içmeyi unutma!");
        assert!(response.workout_plan.is_none() && response.plan_error.is_none());

        assert!(matches!(
            bridge("  ").chat("selam", &[], &[]).await,
            Err(AiError::InvalidResponse(ParseError::Empty))
        ));
    }

    #[tokio::test]
    async fn test_analyze_food() {
        let item = bridge(r#"{"name":"Tavuklu Salata","calories":350,"protein":25,"carbs":10,"fat":15}"#)
            .analyze_food("tavuklu salata")
            .await
            .unwrap();
        assert_eq!(item.name, "Tavuklu Salata");
        assert_eq!(item.calories, 350.0);
        assert!(!item.id.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_food_rejects_negative_macros() {
        let err = bridge(r#"{"name":"X","calories":-5,"protein":1,"carbs":1,"fat":1}"#)
            .analyze_food("x")
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::InvalidResponse(ParseError::Invalid(_))));
    }

    #[test]
    fn test_from_config_without_key_is_disabled() {
        let config = AiConfig {
            enabled: true,
            ..AiConfig::default()
        };
        assert!(!AiBridge::from_config(&config).unwrap().is_enabled());
        assert!(!AiBridge::from_config(&AiConfig::default()).unwrap().is_enabled());
    }
}
