//! Strict parsing of generated text into domain objects
//!
//! The text generator is asked for bare JSON but may wrap it in markdown
//! code fences, or (for chat) embed one block between sentinel markers.
//! Everything parsed here goes through `validator` before it becomes a
//! domain object; partial objects are rejected, never patched up.

use crate::errors::ParseError;
use crate::models::{Difficulty, Exercise, FoodItem, WorkoutPlan};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Opening sentinel of a plan block inside a chat reply
pub const PLAN_BLOCK_START: &str = "||JSON_START||";
/// Closing sentinel of a plan block inside a chat reply
pub const PLAN_BLOCK_END: &str = "||JSON_END||";

static PLAN_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\|\|JSON_START\|\|([\s\S]*?)\|\|JSON_END\|\|").unwrap());

/// Accept `"3"` or `3` for free-text exercise fields
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

fn optional_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "text_or_number")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
}

/// Exercise as produced by the generator
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ExerciseDraft {
    #[validate(length(min = 1, max = 120, message = "exercise name must not be empty"))]
    pub name: String,
    #[serde(deserialize_with = "text_or_number")]
    #[validate(length(min = 1, max = 40, message = "sets must not be empty"))]
    pub sets: String,
    #[serde(deserialize_with = "text_or_number")]
    #[validate(length(min = 1, max = 40, message = "reps must not be empty"))]
    pub reps: String,
    #[serde(default, deserialize_with = "optional_text_or_number")]
    pub rest: Option<String>,
}

/// Workout plan without the locally assigned id and timestamp
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct WorkoutPlanDraft {
    #[validate(length(min = 1, max = 120, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, max = 120, message = "focus must not be empty"))]
    pub focus: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub duration: Option<String>,
    #[validate(length(min = 1, max = 20, message = "plan needs 1 to 20 exercises"), nested)]
    pub exercises: Vec<ExerciseDraft>,
}

impl WorkoutPlanDraft {
    /// Turn the draft into a plan with a local id and timestamp.
    ///
    /// `default_duration` only applies when the draft carries none.
    pub fn into_plan(
        self,
        id: String,
        assigned_at: DateTime<Utc>,
        default_duration: Option<&str>,
    ) -> WorkoutPlan {
        WorkoutPlan {
            id,
            title: self.title,
            focus: self.focus,
            difficulty: self.difficulty,
            duration: self
                .duration
                .or_else(|| default_duration.map(str::to_string)),
            exercises: self
                .exercises
                .into_iter()
                .map(|e| Exercise {
                    name: e.name,
                    sets: e.sets,
                    reps: e.reps,
                    rest: e.rest,
                    completed: false,
                })
                .collect(),
            assigned_at,
        }
    }
}

/// Food macros as produced by the generator or entered by hand
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct FoodDraft {
    #[validate(length(min = 1, max = 120, message = "food name must not be empty"))]
    pub name: String,
    #[validate(range(min = 0.0, max = 50000.0, message = "calories out of range"))]
    pub calories: f64,
    #[validate(range(min = 0.0, max = 5000.0, message = "protein out of range"))]
    pub protein: f64,
    #[validate(range(min = 0.0, max = 5000.0, message = "carbs out of range"))]
    pub carbs: f64,
    #[validate(range(min = 0.0, max = 5000.0, message = "fat out of range"))]
    pub fat: f64,
}

impl FoodDraft {
    pub fn into_item(self, id: String, timestamp: DateTime<Utc>) -> FoodItem {
        FoodItem {
            id,
            name: self.name,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            timestamp,
        }
    }
}

/// Remove markdown code fence markers and surrounding whitespace
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

fn parse_validated<T>(json: &str) -> Result<T, ParseError>
where
    T: for<'de> Deserialize<'de> + Validate,
{
    if json.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let value: T = serde_json::from_str(json).map_err(|e| ParseError::Json(e.to_string()))?;
    value
        .validate()
        .map_err(|e| ParseError::Invalid(e.to_string()))?;
    Ok(value)
}

/// Parse a whole response as one workout plan object
pub fn parse_workout_plan(text: &str) -> Result<WorkoutPlanDraft, ParseError> {
    parse_validated(&strip_code_fences(text))
}

/// Parse a whole response as one food macro object
pub fn parse_food(text: &str) -> Result<FoodDraft, ParseError> {
    parse_validated(&strip_code_fences(text))
}

/// Chat reply split into display text and an optional plan block
#[derive(Debug, Clone, PartialEq)]
pub struct ChatExtraction {
    /// Text to show the member. Still contains the block if it was rejected.
    pub display_text: String,
    /// `None` when the reply carried no block at all
    pub plan: Option<Result<WorkoutPlanDraft, ParseError>>,
}

/// Find and parse the sentinel-delimited plan block of a chat reply
pub fn extract_chat_plan(text: &str) -> ChatExtraction {
    let Some(captures) = PLAN_BLOCK.captures(text) else {
        return ChatExtraction {
            display_text: text.to_string(),
            plan: None,
        };
    };

    let block = captures.get(0).map(|m| m.as_str()).unwrap_or_default();
    let inner = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

    match parse_workout_plan(inner) {
        Ok(draft) => ChatExtraction {
            display_text: text.replacen(block, "", 1).trim().to_string(),
            plan: Some(Ok(draft)),
        },
        Err(e) => ChatExtraction {
            display_text: text.to_string(),
            plan: Some(Err(e)),
        },
    }
}
