//! Goal progress
//!
//! Ratios and remaining amounts of a day's totals against the goal. Calories
//! always have a goal; each macro only when the user tracks it.

use serde::{Deserialize, Serialize};

use crate::models::{DailyTotals, NutritionGoal};

/// Lower edge of the on-target band, as a fraction of the goal
pub const ON_TARGET_LOWER: f64 = 0.9;
/// Upper edge of the on-target band, as a fraction of the goal
pub const ON_TARGET_UPPER: f64 = 1.1;

/// `total / goal`, or `None` when there is no usable goal.
///
/// The ratio is not clamped; values above 1.0 mean the goal was exceeded.
pub fn progress(total: f64, goal: Option<f64>) -> Option<f64> {
    match goal {
        Some(g) if g > 0.0 => Some(total / g),
        _ => None,
    }
}

/// What is left before the goal is reached, never negative
pub fn remaining(total: f64, goal: f64) -> f64 {
    (goal - total).max(0.0)
}

/// How far past the goal the total is, never negative
pub fn overage(total: f64, goal: f64) -> f64 {
    (total - goal).max(0.0)
}

/// Where a day sits relative to its calorie goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    Under,
    OnTarget,
    Over,
}

impl TargetStatus {
    /// Classify a progress ratio against the ±10% band
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > ON_TARGET_UPPER {
            TargetStatus::Over
        } else if ratio >= ON_TARGET_LOWER {
            TargetStatus::OnTarget
        } else {
            TargetStatus::Under
        }
    }

    /// Classify whole calories exactly, without float rounding.
    ///
    /// The band is `ceil(0.9 * goal) ..= floor(1.1 * goal)`, which is the same
    /// as comparing `10 * total` against `9 * goal` and `11 * goal`.
    /// Returns `None` for a goal of zero or less.
    pub fn for_calories(total: i64, goal: i64) -> Option<Self> {
        if goal <= 0 {
            return None;
        }
        let total = total as i128 * 10;
        let goal = goal as i128;
        Some(if total > goal * 11 {
            TargetStatus::Over
        } else if total >= goal * 9 {
            TargetStatus::OnTarget
        } else {
            TargetStatus::Under
        })
    }
}

/// Calorie progress for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieProgress {
    pub consumed: i64,
    pub goal: i64,
    pub remaining: i64,
    pub overage: i64,
    pub progress: Option<f64>,
}

impl CalorieProgress {
    pub fn new(consumed: i64, goal: i64) -> Self {
        Self {
            consumed,
            goal,
            remaining: (goal - consumed).max(0),
            overage: (consumed - goal).max(0),
            progress: progress(consumed as f64, Some(goal as f64)),
        }
    }
}

/// Progress for one tracked macro
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroProgress {
    pub consumed: f64,
    pub goal: f64,
    pub remaining: f64,
    pub progress: Option<f64>,
}

impl MacroProgress {
    /// `None` when the macro is not tracked
    pub fn new(consumed: f64, goal: Option<f64>) -> Option<Self> {
        goal.map(|g| Self {
            consumed,
            goal: g,
            remaining: remaining(consumed, g),
            progress: progress(consumed, Some(g)),
        })
    }
}

/// A day's totals measured against the goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub calories: CalorieProgress,
    pub protein: Option<MacroProgress>,
    pub carbs: Option<MacroProgress>,
    pub fat: Option<MacroProgress>,
    pub is_over_goal: bool,
}

impl GoalProgress {
    pub fn new(totals: &DailyTotals, goal: &NutritionGoal) -> Self {
        Self {
            calories: CalorieProgress::new(totals.calories, goal.calories),
            protein: MacroProgress::new(totals.protein, goal.protein),
            carbs: MacroProgress::new(totals.carbs, goal.carbs),
            fat: MacroProgress::new(totals.fat, goal.fat),
            is_over_goal: totals.calories > goal.calories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Nutrition;

    #[test]
    fn test_progress_without_goal() {
        assert_eq!(progress(500.0, None), None);
        assert_eq!(progress(500.0, Some(0.0)), None);
        assert_eq!(progress(500.0, Some(-10.0)), None);
    }

    #[test]
    fn test_progress_is_unbounded() {
        assert_eq!(progress(50.0, Some(100.0)), Some(0.5));
        assert_eq!(progress(250.0, Some(100.0)), Some(2.5));
    }

    #[test]
    fn test_remaining_never_negative() {
        for &(total, goal) in &[(0.0, 0.0), (50.0, 100.0), (100.0, 100.0), (180.0, 100.0)] {
            assert!(remaining(total, goal) >= 0.0);
            assert!(overage(total, goal) >= 0.0);
        }
        assert_eq!(remaining(180.0, 100.0), 0.0);
        assert_eq!(overage(180.0, 100.0), 80.0);
    }

    #[test]
    fn test_status_band_edges() {
        assert_eq!(TargetStatus::for_calories(1800, 2000), Some(TargetStatus::OnTarget));
        assert_eq!(TargetStatus::for_calories(2200, 2000), Some(TargetStatus::OnTarget));
        assert_eq!(TargetStatus::for_calories(1799, 2000), Some(TargetStatus::Under));
        assert_eq!(TargetStatus::for_calories(2201, 2000), Some(TargetStatus::Over));
        assert_eq!(TargetStatus::for_calories(100, 0), None);
    }

    #[test]
    fn test_status_band_rounds_inward() {
        // 0.9 * 1995 = 1795.5 -> 1796, 1.1 * 1995 = 2194.5 -> 2194
        assert_eq!(TargetStatus::for_calories(1795, 1995), Some(TargetStatus::Under));
        assert_eq!(TargetStatus::for_calories(1796, 1995), Some(TargetStatus::OnTarget));
        assert_eq!(TargetStatus::for_calories(2194, 1995), Some(TargetStatus::OnTarget));
        assert_eq!(TargetStatus::for_calories(2195, 1995), Some(TargetStatus::Over));
    }

    #[test]
    fn test_status_from_ratio() {
        assert_eq!(TargetStatus::from_ratio(0.5), TargetStatus::Under);
        assert_eq!(TargetStatus::from_ratio(1.0), TargetStatus::OnTarget);
        assert_eq!(TargetStatus::from_ratio(1.2), TargetStatus::Over);
    }

    #[test]
    fn test_goal_progress_tracks_only_set_macros() {
        let totals = Nutrition { calories: 2300, protein: 90.0, carbs: 250.0, fat: 80.0 };
        let goal = NutritionGoal { calories: 2000, protein: Some(120.0), carbs: None, fat: Some(0.0) };

        let p = GoalProgress::new(&totals, &goal);
        assert!(p.is_over_goal);
        assert_eq!(p.calories.remaining, 0);
        assert_eq!(p.calories.overage, 300);
        assert_eq!(p.calories.progress, Some(1.15));

        let protein = p.protein.unwrap();
        assert_eq!(protein.remaining, 30.0);
        assert_eq!(protein.progress, Some(0.75));

        assert!(p.carbs.is_none());

        // a zero goal is tracked but has no ratio
        let fat = p.fat.unwrap();
        assert_eq!(fat.progress, None);
        assert_eq!(fat.remaining, 0.0);
    }

    #[test]
    fn test_goal_progress_with_zero_calorie_goal() {
        let p = GoalProgress::new(&Nutrition::zero(), &NutritionGoal::calories_only(0));
        assert_eq!(p.calories.progress, None);
        assert_eq!(p.calories.remaining, 0);
        assert!(!p.is_over_goal);
    }
}
