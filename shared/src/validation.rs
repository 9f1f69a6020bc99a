//! Input validation functions
//!
//! Free-text profile fields (age, height, weight, goal) are not validated;
//! measurements and nutrition goals are numeric and checked here.

use crate::models::{MeasurementLog, NutritionGoal};
use once_cell::sync::Lazy;
use regex_lite::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate body weight (kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate percentage value (0-100)
pub fn validate_percentage(value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err("Percentage must be a valid number".to_string());
    }
    if !(0.0..=100.0).contains(&value) {
        return Err("Percentage must be between 0 and 100".to_string());
    }
    Ok(())
}

/// Validate a body circumference (cm)
pub fn validate_circumference_cm(value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err("Measurement must be a valid number".to_string());
    }
    if !(10.0..=300.0).contains(&value) {
        return Err("Measurement must be between 10 and 300 cm".to_string());
    }
    Ok(())
}

/// Validate a macro target (calories or grams)
pub fn validate_macro_target(value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err("Target must be a valid number".to_string());
    }
    if !(0.0..=50000.0).contains(&value) {
        return Err("Target must be between 0 and 50000".to_string());
    }
    Ok(())
}

/// Map field names to display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "weight" => "Weight",
        "body_fat" => "Body Fat",
        "waist" => "Waist",
        "arm" => "Arm",
        "chest" => "Chest",
        "leg" => "Leg",
        "calories" => "Daily Calories",
        "protein" => "Daily Protein",
        "carbs" => "Daily Carbs",
        "fat" => "Daily Fat",
        "email" => "Email",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

fn check(field: &str, result: Result<(), String>) -> Result<(), ValidationError> {
    result.map_err(|msg| ValidationError::new(field, &msg))
}

/// Validate every numeric field of a measurement entry
pub fn validate_measurement(log: &MeasurementLog) -> Result<(), ValidationError> {
    check("weight", validate_weight(log.weight))?;
    if let Some(body_fat) = log.body_fat {
        check("body_fat", validate_percentage(body_fat))?;
    }
    let circumferences = [
        ("waist", log.waist),
        ("arm", log.arm),
        ("chest", log.chest),
        ("leg", log.leg),
    ];
    for (field, value) in circumferences {
        if let Some(v) = value {
            check(field, validate_circumference_cm(v))?;
        }
    }
    Ok(())
}

/// Validate a nutrition goal
pub fn validate_nutrition_goal(goal: &NutritionGoal) -> Result<(), ValidationError> {
    check("calories", validate_macro_target(goal.calories))?;
    check("protein", validate_macro_target(goal.protein))?;
    check("carbs", validate_macro_target(goal.carbs))?;
    check("fat", validate_macro_target(goal.fat))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn log(weight: f64) -> MeasurementLog {
        MeasurementLog {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            weight,
            body_fat: None,
            waist: None,
            arm: None,
            chest: None,
            leg: None,
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("admin@fitpulse.com").is_ok());
        assert!(validate_email("user.name@domain.co.uk").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@dot").is_err());
        assert!(validate_email("spaces in@email.com").is_err());
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(70.0).is_ok());
        assert!(validate_weight(10.0).is_err());
        assert!(validate_weight(600.0).is_err());
        assert!(validate_weight(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_measurement_reports_field() {
        let mut entry = log(80.0);
        entry.waist = Some(5.0);
        let err = validate_measurement(&entry).unwrap_err();
        assert_eq!(err.field, "waist");
        assert_eq!(err.user_message(), "Waist: Measurement must be between 10 and 300 cm");
    }

    #[test]
    fn test_validate_measurement_body_fat() {
        let mut entry = log(80.0);
        entry.body_fat = Some(18.5);
        assert!(validate_measurement(&entry).is_ok());
        entry.body_fat = Some(120.0);
        assert_eq!(validate_measurement(&entry).unwrap_err().field, "body_fat");
    }

    #[test]
    fn test_validate_nutrition_goal() {
        assert!(validate_nutrition_goal(&NutritionGoal::default()).is_ok());
        let goal = NutritionGoal {
            protein: -10.0,
            ..NutritionGoal::default()
        };
        assert_eq!(validate_nutrition_goal(&goal).unwrap_err().field, "protein");
    }

    #[test]
    fn test_field_display_labels() {
        assert_eq!(get_field_display_label("body_fat"), "Body Fat");
        assert_eq!(get_field_display_label("unknown_field"), "unknown_field");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_valid_weight_range(weight in 20.0f64..=500.0) {
            prop_assert!(validate_measurement(&log(weight)).is_ok());
        }

        #[test]
        fn prop_invalid_weight_below_min(weight in 0.0f64..20.0) {
            prop_assert!(validate_measurement(&log(weight)).is_err());
        }

        #[test]
        fn prop_valid_percentage_range(pct in 0.0f64..=100.0) {
            prop_assert!(validate_percentage(pct).is_ok());
        }
    }
}
