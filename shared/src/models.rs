//! Domain models for the FitPulse application
//!
//! Field names serialize in camelCase so the persisted collections keep the
//! same JSON shape the browser client stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Member,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::Member => write!(f, "MEMBER"),
        }
    }
}

/// Membership tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MembershipTier {
    Gold,
    Silver,
    #[default]
    Bronze,
}

/// Workout difficulty, stored with its Turkish label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    #[serde(rename = "Başlangıç")]
    Beginner,
    #[serde(rename = "Orta")]
    Intermediate,
    #[serde(rename = "İleri")]
    Advanced,
}

impl Difficulty {
    /// Turkish label, same as the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Başlangıç",
            Difficulty::Intermediate => "Orta",
            Difficulty::Advanced => "İleri",
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Single exercise inside a workout plan. All fields are free text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub sets: String,
    pub reps: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<String>,
    /// Ticked off by the member on their active plan
    #[serde(default, skip_serializing_if = "is_false")]
    pub completed: bool,
}

/// Workout plan, used both as a pool template and as a member's plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub id: String,
    pub title: String,
    pub focus: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub exercises: Vec<Exercise>,
    pub assigned_at: DateTime<Utc>,
}

impl WorkoutPlan {
    /// Copy of this plan re-stamped for a new assignment.
    ///
    /// Completion marks are cleared so the copy starts fresh.
    pub fn assigned_copy(&self, at: DateTime<Utc>) -> Self {
        let mut copy = self.clone();
        copy.assigned_at = at;
        for exercise in &mut copy.exercises {
            exercise.completed = false;
        }
        copy
    }
}

/// Body measurement entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementLog {
    pub date: NaiveDate,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chest: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leg: Option<f64>,
}

/// Logged food entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub timestamp: DateTime<Utc>,
}

/// Daily macro targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NutritionGoal {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Default for NutritionGoal {
    fn default() -> Self {
        Self {
            calories: 2500.0,
            protein: 180.0,
            carbs: 250.0,
            fat: 80.0,
        }
    }
}

/// User account, admin or member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Plaintext, compared by equality
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub join_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_type: Option<MembershipTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_plan: Option<WorkoutPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_templates: Option<Vec<WorkoutPlan>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurements: Option<Vec<MeasurementLog>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_food_log: Option<Vec<FoodItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition_goal: Option<NutritionGoal>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Case-insensitive email comparison
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }

    pub fn food_log(&self) -> &[FoodItem] {
        self.daily_food_log.as_deref().unwrap_or_default()
    }

    pub fn measurements(&self) -> &[MeasurementLog] {
        self.measurements.as_deref().unwrap_or_default()
    }

    pub fn assigned_templates(&self) -> &[WorkoutPlan] {
        self.assigned_templates.as_deref().unwrap_or_default()
    }

    /// Insert a measurement and keep the list ascending by date
    pub fn record_measurement(&mut self, log: MeasurementLog) {
        let list = self.measurements.get_or_insert_with(Vec::new);
        list.push(log);
        // Stable sort keeps same-day entries in insertion order
        list.sort_by_key(|m| m.date);
    }
}

/// Gym trainer on the admin roster. Not linked to user accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trainer {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub students: u32,
    pub rating: f32,
    pub img: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
