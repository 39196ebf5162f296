//! Goal model
//!
//! Daily calorie target with optional macro targets.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Calorie target shown when the user has not set a goal yet
pub const DEFAULT_CALORIE_GOAL: i64 = 2000;

/// Daily nutrition targets.
///
/// A `None` macro means the macro is not tracked, which is not the same as a
/// target of zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionGoal {
    pub calories: i64,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

impl NutritionGoal {
    pub fn calories_only(calories: i64) -> Self {
        Self {
            calories,
            protein: None,
            carbs: None,
            fat: None,
        }
    }

    pub fn has_macros(&self) -> bool {
        self.protein.is_some() || self.carbs.is_some() || self.fat.is_some()
    }
}

impl Default for NutritionGoal {
    fn default() -> Self {
        Self::calories_only(DEFAULT_CALORIE_GOAL)
    }
}

/// A stored goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    #[serde(flatten)]
    pub target: NutritionGoal,
    pub created_at: String,
    pub updated_at: String,
}

impl Goal {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            target: NutritionGoal {
                calories: row.get("calories")?,
                protein: row.get("protein")?,
                carbs: row.get("carbs")?,
                fat: row.get("fat")?,
            },
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn create(conn: &Connection, target: &NutritionGoal) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO goals (calories, protein, carbs, fat) VALUES (?1, ?2, ?3, ?4)",
            params![target.calories, target.protein, target.carbs, target.fat],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM goals WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(goal) => Ok(Some(goal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The most recently created goal
    pub fn current(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM goals ORDER BY created_at DESC, id DESC LIMIT 1")?;

        match stmt.query_row([], Self::from_row) {
            Ok(goal) => Ok(Some(goal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the current goal, or create the first one
    pub fn save(conn: &Connection, target: &NutritionGoal) -> DbResult<Self> {
        let Some(existing) = Self::current(conn)? else {
            return Self::create(conn, target);
        };

        conn.execute(
            r#"
            UPDATE goals SET
                calories = ?1,
                protein = ?2,
                carbs = ?3,
                fat = ?4,
                updated_at = datetime('now')
            WHERE id = ?5
            "#,
            params![target.calories, target.protein, target.carbs, target.fat, existing.id],
        )?;

        Self::get_by_id(conn, existing.id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_conn;

    #[test]
    fn test_current_is_none_on_empty_database() {
        let conn = test_conn();
        assert!(Goal::current(&conn).unwrap().is_none());
    }

    #[test]
    fn test_save_creates_then_updates_in_place() {
        let conn = test_conn();

        let first = Goal::save(&conn, &NutritionGoal::calories_only(1800)).unwrap();
        let second = Goal::save(
            &conn,
            &NutritionGoal { calories: 2200, protein: Some(150.0), carbs: None, fat: Some(0.0) },
        )
        .unwrap();

        assert_eq!(first.id, second.id);
        let current = Goal::current(&conn).unwrap().unwrap();
        assert_eq!(current.target.calories, 2200);
        assert_eq!(current.target.protein, Some(150.0));
        assert_eq!(current.target.carbs, None);
        // zero is a tracked target, distinct from absent
        assert_eq!(current.target.fat, Some(0.0));
    }

    #[test]
    fn test_current_prefers_latest_created() {
        let conn = test_conn();
        Goal::create(&conn, &NutritionGoal::calories_only(1500)).unwrap();
        let latest = Goal::create(&conn, &NutritionGoal::calories_only(2500)).unwrap();

        assert_eq!(Goal::current(&conn).unwrap().unwrap().id, latest.id);
    }

    #[test]
    fn test_default_goal() {
        let goal = NutritionGoal::default();
        assert_eq!(goal.calories, DEFAULT_CALORIE_GOAL);
        assert!(!goal.has_macros());
    }
}
