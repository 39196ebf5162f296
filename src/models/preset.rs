//! Preset model
//!
//! Reusable named templates that materialize into food entries.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::{FoodEntryCreate, Nutrition};

fn default_weight() -> f64 {
    100.0
}

/// A saved food template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub id: i64,
    pub name: String,
    pub nutrition: Nutrition,
    /// Weight in grams that `nutrition` describes
    pub default_weight: f64,
    pub use_count: i64,
    pub last_used_at: Option<String>,
    pub order: i64,
    pub created_at: String,
}

/// Data for creating a preset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetCreate {
    pub name: String,
    #[serde(flatten)]
    pub nutrition: Nutrition,
    #[serde(default = "default_weight")]
    pub default_weight: f64,
}

/// Data for updating a preset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresetUpdate {
    pub name: Option<String>,
    pub calories: Option<i64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub default_weight: Option<f64>,
}

impl Preset {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            nutrition: Nutrition {
                calories: row.get("calories")?,
                protein: row.get("protein")?,
                carbs: row.get("carbs")?,
                fat: row.get("fat")?,
            },
            default_weight: row.get("default_weight")?,
            use_count: row.get("use_count")?,
            last_used_at: row.get("last_used_at")?,
            order: row.get("sort_order")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Materialize an entry, rescaled when `weight` differs from the default
    pub fn to_entry(&self, weight: Option<f64>) -> FoodEntryCreate {
        let base = FoodEntryCreate {
            name: self.name.clone(),
            nutrition: self.nutrition,
            weight: self.default_weight,
            is_quick_add: false,
        };

        match weight {
            Some(w) if w != self.default_weight => base.scaled_to(w),
            _ => base,
        }
    }

    /// New presets go to the end of the manual ordering
    pub fn create(conn: &Connection, data: &PresetCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO presets (name, calories, protein, carbs, fat, default_weight, sort_order)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6,
                    (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM presets))
            "#,
            params![
                data.name,
                data.nutrition.calories,
                data.nutrition.protein,
                data.nutrition.carbs,
                data.nutrition.fat,
                data.default_weight,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM presets WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(preset) => Ok(Some(preset)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All presets in manual order, most used first among equal positions
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM presets ORDER BY sort_order ASC, use_count DESC, id ASC",
        )?;

        let presets = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(presets)
    }

    /// Case-insensitive name search, in list order
    pub fn search(conn: &Connection, query: &str) -> DbResult<Vec<Self>> {
        let pattern = format!("%{}%", query.trim());
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM presets
            WHERE name LIKE ?1
            ORDER BY sort_order ASC, use_count DESC, id ASC
            "#,
        )?;

        let presets = stmt
            .query_map([&pattern], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(presets)
    }

    /// Most used presets, ties broken by most recent use
    pub fn recent(conn: &Connection, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM presets
            ORDER BY use_count DESC, last_used_at DESC, id DESC
            LIMIT ?1
            "#,
        )?;

        let presets = stmt
            .query_map([limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(presets)
    }

    pub fn update(conn: &Connection, id: i64, data: &PresetUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        macro_rules! add_update {
            ($field:ident, $col:expr) => {
                if let Some(ref val) = data.$field {
                    updates.push(format!("{} = ?{}", $col, params_vec.len() + 1));
                    params_vec.push(Box::new(val.clone()));
                }
            };
        }

        add_update!(name, "name");
        add_update!(calories, "calories");
        add_update!(protein, "protein");
        add_update!(carbs, "carbs");
        add_update!(fat, "fat");
        add_update!(default_weight, "default_weight");

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        let sql = format!(
            "UPDATE presets SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Stamp a use: bump the counter and set the last-used time
    pub fn record_usage(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "UPDATE presets SET use_count = use_count + 1, last_used_at = datetime('now') WHERE id = ?1",
            [id],
        )?;
        Ok(rows > 0)
    }

    /// Assign positions 0.. in the given order. Ids not listed keep theirs.
    pub fn reorder(conn: &mut Connection, ids: &[i64]) -> DbResult<()> {
        let tx = conn.transaction()?;
        for (position, id) in ids.iter().enumerate() {
            tx.execute(
                "UPDATE presets SET sort_order = ?1 WHERE id = ?2",
                params![position as i64, id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM presets WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
