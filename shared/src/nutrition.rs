//! Daily macro aggregation
//!
//! Totals sum every logged item. Entries are not filtered by day, so the
//! "daily" figure keeps growing until items are removed.

use crate::models::{FoodItem, NutritionGoal};
use serde::{Deserialize, Serialize};

/// Summed macros
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Progress toward each goal as a percentage, capped at 100
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct MacroProgress {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Sum every item of a food log
pub fn aggregate_macros(items: &[FoodItem]) -> MacroTotals {
    items.iter().fold(MacroTotals::default(), |acc, item| MacroTotals {
        calories: acc.calories + item.calories,
        protein: acc.protein + item.protein,
        carbs: acc.carbs + item.carbs,
        fat: acc.fat + item.fat,
    })
}

fn percent_of(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (value / target * 100.0).min(100.0)
}

/// Percentage of each goal reached
pub fn macro_progress(totals: &MacroTotals, goal: &NutritionGoal) -> MacroProgress {
    MacroProgress {
        calories: percent_of(totals.calories, goal.calories),
        protein: percent_of(totals.protein, goal.protein),
        carbs: percent_of(totals.carbs, goal.carbs),
        fat: percent_of(totals.fat, goal.fat),
    }
}
