//! Food Entry model
//!
//! A single logged food item, owned by a daily log.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::Nutrition;

/// Name given to calorie-only entries
pub const QUICK_ADD_NAME: &str = "Quick Add";

/// A logged food entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: i64,
    pub daily_log_id: i64,
    pub name: String,
    pub nutrition: Nutrition,
    /// Reference weight in grams; 0 means there is no weight basis
    pub weight: f64,
    pub is_quick_add: bool,
    pub logged_at: String,
}

/// Data for creating a food entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntryCreate {
    pub name: String,
    #[serde(flatten)]
    pub nutrition: Nutrition,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub is_quick_add: bool,
}

impl FoodEntryCreate {
    /// Calories with no macros and no weight basis
    pub fn quick_add(calories: i64) -> Self {
        Self {
            name: QUICK_ADD_NAME.to_string(),
            nutrition: Nutrition {
                calories,
                ..Nutrition::zero()
            },
            weight: 0.0,
            is_quick_add: true,
        }
    }

    /// The same food at a different weight
    pub fn scaled_to(&self, weight: f64) -> Self {
        Self {
            name: self.name.clone(),
            nutrition: self.nutrition.scaled(self.weight, weight),
            weight,
            is_quick_add: self.is_quick_add,
        }
    }
}

impl FoodEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            daily_log_id: row.get("daily_log_id")?,
            name: row.get("name")?,
            nutrition: Nutrition {
                calories: row.get("calories")?,
                protein: row.get("protein")?,
                carbs: row.get("carbs")?,
                fat: row.get("fat")?,
            },
            weight: row.get("weight")?,
            is_quick_add: row.get("is_quick_add")?,
            logged_at: row.get("logged_at")?,
        })
    }

    /// Append an entry to a day
    pub fn create(conn: &Connection, daily_log_id: i64, data: &FoodEntryCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO food_entries (
                daily_log_id, name, calories, protein, carbs, fat, weight, is_quick_add
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                daily_log_id,
                data.name,
                data.nutrition.calories,
                data.nutrition.protein,
                data.nutrition.carbs,
                data.nutrition.fat,
                data.weight,
                data.is_quick_add,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_entries WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All entries of a day, in logging order
    pub fn list_for_day(conn: &Connection, daily_log_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_entries WHERE daily_log_id = ?1 ORDER BY logged_at ASC, id ASC",
        )?;

        let entries = stmt
            .query_map([daily_log_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    pub fn count_for_day(conn: &Connection, daily_log_id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM food_entries WHERE daily_log_id = ?1",
            [daily_log_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM food_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_conn;
    use crate::models::DailyLog;
    use chrono::NaiveDate;

    fn oats() -> FoodEntryCreate {
        FoodEntryCreate {
            name: "Oats".to_string(),
            nutrition: Nutrition { calories: 380, protein: 13.0, carbs: 67.0, fat: 7.0 },
            weight: 100.0,
            is_quick_add: false,
        }
    }

    #[test]
    fn test_quick_add_has_no_weight_basis() {
        let entry = FoodEntryCreate::quick_add(450);
        assert_eq!(entry.name, QUICK_ADD_NAME);
        assert_eq!(entry.nutrition.calories, 450);
        assert_eq!(entry.weight, 0.0);
        assert!(entry.is_quick_add);
        // rescaling a quick add changes nothing but the recorded weight
        assert_eq!(entry.scaled_to(250.0).nutrition, entry.nutrition);
    }

    #[test]
    fn test_scaled_to_half_weight() {
        let half = oats().scaled_to(50.0);
        assert_eq!(half.nutrition.calories, 190);
        assert!((half.nutrition.protein - 6.5).abs() < 1e-9);
        assert!((half.nutrition.carbs - 33.5).abs() < 1e-9);
        assert!((half.nutrition.fat - 3.5).abs() < 1e-9);
        assert_eq!(half.weight, 50.0);
    }

    #[test]
    fn test_create_and_list_for_day() {
        let conn = test_conn();
        let day = DailyLog::get_or_create(&conn, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()).unwrap();

        let first = FoodEntry::create(&conn, day.id, &oats()).unwrap();
        let second = FoodEntry::create(&conn, day.id, &FoodEntryCreate::quick_add(200)).unwrap();

        let entries = FoodEntry::list_for_day(&conn, day.id).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, first.id);
        assert_eq!(entries[1].id, second.id);
        assert!(entries[1].is_quick_add);
        assert_eq!(FoodEntry::count_for_day(&conn, day.id).unwrap(), 2);
    }

    #[test]
    fn test_delete_entry() {
        let conn = test_conn();
        let day = DailyLog::get_or_create(&conn, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()).unwrap();
        let entry = FoodEntry::create(&conn, day.id, &oats()).unwrap();

        assert!(FoodEntry::delete(&conn, entry.id).unwrap());
        assert!(!FoodEntry::delete(&conn, entry.id).unwrap());
        assert!(FoodEntry::get_by_id(&conn, entry.id).unwrap().is_none());
    }
}
