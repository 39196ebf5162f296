//! Goal and App State Tools
//!
//! Reading and editing the nutrition goal, and finishing onboarding.

use serde::Serialize;

use crate::db::Database;
use crate::models::{AppSettings, Goal, NutritionGoal};

/// Response for get_goal
#[derive(Debug, Serialize)]
pub struct GoalResponse {
    pub goal: NutritionGoal,
    /// false when nothing is stored and the default target is returned
    pub is_set: bool,
    /// true when at least one macro target is tracked
    pub has_macros: bool,
    pub updated_at: Option<String>,
}

/// Response for app_state
#[derive(Debug, Serialize)]
pub struct AppStateResponse {
    pub onboarding_completed: bool,
    pub has_goal: bool,
}

fn validate_goal(goal: &NutritionGoal) -> Result<(), String> {
    if goal.calories < 0 {
        return Err("calories cannot be negative".to_string());
    }
    for (field, value) in [("protein", goal.protein), ("carbs", goal.carbs), ("fat", goal.fat)] {
        if value.is_some_and(|v| v < 0.0 || !v.is_finite()) {
            return Err(format!("{} goal must be a non-negative number", field));
        }
    }
    Ok(())
}

pub fn get_goal(db: &Database) -> Result<GoalResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let goal = Goal::current(&conn).map_err(|e| format!("Failed to load goal: {}", e))?;

    let (target, updated_at) = match goal {
        Some(g) => (g.target, Some(g.updated_at)),
        None => (NutritionGoal::default(), None),
    };

    Ok(GoalResponse {
        goal: target,
        is_set: updated_at.is_some(),
        has_macros: target.has_macros(),
        updated_at,
    })
}

/// Replace the current goal
pub fn save_goal(db: &Database, goal: NutritionGoal) -> Result<Goal, String> {
    validate_goal(&goal)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let saved = Goal::save(&conn, &goal).map_err(|e| format!("Failed to save goal: {}", e))?;
    tracing::info!(calories = saved.target.calories, "saved goal");
    Ok(saved)
}

/// Store the first goal and mark onboarding as done
pub fn complete_onboarding(db: &Database, goal: NutritionGoal) -> Result<AppStateResponse, String> {
    validate_goal(&goal)?;

    db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        Goal::save(&tx, &goal)?;
        AppSettings::set_onboarding_completed(&tx, true)?;
        tx.commit()?;
        Ok(())
    })
    .map_err(|e| format!("Failed to complete onboarding: {}", e))?;

    tracing::info!("onboarding completed");
    Ok(AppStateResponse {
        onboarding_completed: true,
        has_goal: true,
    })
}

pub fn app_state(db: &Database) -> Result<AppStateResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let settings = AppSettings::load(&conn).map_err(|e| format!("Failed to load settings: {}", e))?;
    let has_goal = Goal::current(&conn)
        .map_err(|e| format!("Failed to load goal: {}", e))?
        .is_some();

    Ok(AppStateResponse {
        onboarding_completed: settings.onboarding_completed,
        has_goal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;
    use crate::models::DEFAULT_CALORIE_GOAL;

    #[test]
    fn test_default_goal_when_unset() {
        let db = test_database();
        let response = get_goal(&db).unwrap();
        assert!(!response.is_set);
        assert!(!response.has_macros);
        assert_eq!(response.goal.calories, DEFAULT_CALORIE_GOAL);
    }

    #[test]
    fn test_save_goal_validation() {
        let db = test_database();
        assert!(save_goal(&db, NutritionGoal::calories_only(-1)).is_err());
        assert!(save_goal(
            &db,
            NutritionGoal { calories: 2000, protein: Some(-5.0), carbs: None, fat: None }
        )
        .is_err());

        save_goal(&db, NutritionGoal { calories: 1900, protein: Some(140.0), carbs: None, fat: None })
            .unwrap();
        let response = get_goal(&db).unwrap();
        assert!(response.is_set);
        assert!(response.has_macros);
        assert_eq!(response.goal.protein, Some(140.0));
        assert_eq!(response.goal.carbs, None);
    }

    #[test]
    fn test_onboarding() {
        let db = test_database();
        let before = app_state(&db).unwrap();
        assert!(!before.onboarding_completed);
        assert!(!before.has_goal);

        complete_onboarding(&db, NutritionGoal::calories_only(2100)).unwrap();

        let after = app_state(&db).unwrap();
        assert!(after.onboarding_completed);
        assert!(after.has_goal);
        assert_eq!(get_goal(&db).unwrap().goal.calories, 2100);
    }
}
