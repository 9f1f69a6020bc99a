//! FitPulse WASM Module
//!
//! Browser bindings for the nutrition math and the AI-reply parsing, so
//! the client shows exactly the numbers and plans the backend would.
//! Structured values cross the boundary as JSON strings.

use fitpulse_shared::ai_payload::{
    extract_chat_plan, parse_food, parse_workout_plan, WorkoutPlanDraft,
};
use fitpulse_shared::{
    aggregate_macros, macro_progress, FoodItem, MacroProgress, MacroTotals, NutritionGoal,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Serialize)]
struct MacroSummary {
    totals: MacroTotals,
    progress: MacroProgress,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatSplit {
    display_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<WorkoutPlanDraft>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan_error: Option<String>,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn summarize(food_log_json: &str, goal_json: Option<&str>) -> Result<String, String> {
    let items: Vec<FoodItem> =
        serde_json::from_str(food_log_json).map_err(|e| format!("food log: {}", e))?;
    let goal = match goal_json.map(str::trim).filter(|g| !g.is_empty()) {
        Some(json) => serde_json::from_str(json).map_err(|e| format!("goal: {}", e))?,
        None => NutritionGoal::default(),
    };

    let totals = aggregate_macros(&items);
    to_json(&MacroSummary {
        totals,
        progress: macro_progress(&totals, &goal),
    })
}

fn split_chat(text: &str) -> Result<String, String> {
    let extraction = extract_chat_plan(text);
    let (plan, plan_error) = match extraction.plan {
        None => (None, None),
        Some(Ok(draft)) => (Some(draft), None),
        Some(Err(e)) => (None, Some(e.to_string())),
    };
    to_json(&ChatSplit {
        display_text: extraction.display_text,
        plan,
        plan_error,
    })
}

/// Totals and goal progress for a food log.
///
/// `goal_json` may be empty, in which case the default goal applies.
#[wasm_bindgen]
pub fn summarize_food_log(food_log_json: &str, goal_json: &str) -> Result<String, JsError> {
    summarize(food_log_json, Some(goal_json)).map_err(|e| JsError::new(&e))
}

/// Validated workout plan from a generated reply
#[wasm_bindgen]
pub fn parse_plan_reply(text: &str) -> Result<String, JsError> {
    parse_workout_plan(text)
        .map_err(|e| e.to_string())
        .and_then(|draft| to_json(&draft))
        .map_err(|e| JsError::new(&e))
}

/// Validated food macros from a generated reply
#[wasm_bindgen]
pub fn parse_food_reply(text: &str) -> Result<String, JsError> {
    parse_food(text)
        .map_err(|e| e.to_string())
        .and_then(|draft| to_json(&draft))
        .map_err(|e| JsError::new(&e))
}

/// Chat reply split into display text and an optional plan
#[wasm_bindgen]
pub fn split_chat_reply(text: &str) -> Result<String, JsError> {
    split_chat(text).map_err(|e| JsError::new(&e))
}


/// Exercises the exported signatures, `JsError` included; run with
/// `wasm-pack test --node wasm`
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn test_food_reply_round_trips_through_export() {
        let json = parse_food_reply(
            r#"```json
{"name": "Mercimek Çorbası", "calories": 180, "protein": 9, "carbs": 28, "fat": 4}
```"#,
        )
        .unwrap();
        let food: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(food["calories"], 180.0);
    }

    #[wasm_bindgen_test]
    fn test_rejected_plan_reply_is_js_error() {
        assert!(parse_plan_reply("Bugün dinlen.").is_err());
    }

    #[wasm_bindgen_test]
    fn test_empty_goal_uses_default() {
        let json = summarize_food_log("[]", "").unwrap();
        let summary: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(summary["progress"]["calories"], 0.0);
    }
}
