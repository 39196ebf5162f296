//! Daily Log model
//!
//! One container per calendar day. Entries belong to exactly one day and are
//! removed with it (ON DELETE CASCADE).

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::nutrition::{aggregate, DayTotals};
use super::{DailyTotals, FoodEntry};

/// Storage format for calendar days
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A day container for food entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLog {
    pub id: i64,
    pub date: NaiveDate,
    pub created_at: String,
}

/// A day with its entries and their summed totals
#[derive(Debug, Clone, Serialize)]
pub struct DailyAggregate {
    pub id: i64,
    pub date: NaiveDate,
    pub entries: Vec<FoodEntry>,
    pub totals: DailyTotals,
}

impl DailyAggregate {
    /// Load the entries of `log` and total them
    pub fn load(conn: &Connection, log: &DailyLog) -> DbResult<Self> {
        let entries = FoodEntry::list_for_day(conn, log.id)?;
        let totals = aggregate(&entries);
        Ok(Self {
            id: log.id,
            date: log.date,
            entries,
            totals,
        })
    }
}

fn date_column(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl DailyLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        // date is the second column of daily_logs
        let date = date_column(row, 1)?;

        Ok(Self {
            id: row.get("id")?,
            date,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, date: NaiveDate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO daily_logs (date) VALUES (?1)",
            params![date.format(DATE_FORMAT).to_string()],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM daily_logs WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(day) => Ok(Some(day)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_by_date(conn: &Connection, date: NaiveDate) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM daily_logs WHERE date = ?1")?;

        match stmt.query_row([date.format(DATE_FORMAT).to_string()], Self::from_row) {
            Ok(day) => Ok(Some(day)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Days are created lazily, the first time they are needed
    pub fn get_or_create(conn: &Connection, date: NaiveDate) -> DbResult<Self> {
        if let Some(day) = Self::get_by_date(conn, date)? {
            return Ok(day);
        }
        Self::create(conn, date)
    }

    /// Days within an optional date range, oldest first
    pub fn list(
        conn: &Connection,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM daily_logs WHERE 1=1");
        let mut params_vec: Vec<String> = Vec::new();

        if let Some(start) = start {
            params_vec.push(start.format(DATE_FORMAT).to_string());
            sql.push_str(&format!(" AND date >= ?{}", params_vec.len()));
        }

        if let Some(end) = end {
            params_vec.push(end.format(DATE_FORMAT).to_string());
            sql.push_str(&format!(" AND date <= ?{}", params_vec.len()));
        }

        sql.push_str(" ORDER BY date ASC");

        let mut stmt = conn.prepare(&sql)?;
        let days = stmt
            .query_map(rusqlite::params_from_iter(params_vec.iter()), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(days)
    }

    /// Aggregates for every stored day within an optional range, oldest first
    pub fn aggregates_in_range(
        conn: &Connection,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> DbResult<Vec<DailyAggregate>> {
        Self::list(conn, start, end)?
            .iter()
            .map(|day| DailyAggregate::load(conn, day))
            .collect()
    }

    /// Summed totals per stored day in `start..=end`, oldest first.
    ///
    /// One grouped query; days without entries total to zero.
    pub fn totals_in_range(conn: &Connection, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<DayTotals>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT
                d.date,
                COALESCE(SUM(e.calories), 0),
                COALESCE(SUM(e.protein), 0.0),
                COALESCE(SUM(e.carbs), 0.0),
                COALESCE(SUM(e.fat), 0.0)
            FROM daily_logs d
            LEFT JOIN food_entries e ON e.daily_log_id = d.id
            WHERE d.date >= ?1 AND d.date <= ?2
            GROUP BY d.id, d.date
            ORDER BY d.date ASC
            "#,
        )?;

        let days = stmt
            .query_map(
                params![start.format(DATE_FORMAT).to_string(), end.format(DATE_FORMAT).to_string()],
                |row| {
                    Ok(DayTotals {
                        date: date_column(row, 0)?,
                        totals: DailyTotals {
                            calories: row.get(1)?,
                            protein: row.get(2)?,
                            carbs: row.get(3)?,
                            fat: row.get(4)?,
                        },
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(days)
    }

    /// Delete a day together with its entries
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM daily_logs WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_conn;
    use crate::models::{FoodEntryCreate, Nutrition};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn test_get_or_create_is_lazy_and_unique() {
        let conn = test_conn();
        assert!(DailyLog::get_by_date(&conn, day(1)).unwrap().is_none());

        let created = DailyLog::get_or_create(&conn, day(1)).unwrap();
        let again = DailyLog::get_or_create(&conn, day(1)).unwrap();
        assert_eq!(created.id, again.id);
        assert_eq!(again.date, day(1));
    }

    #[test]
    fn test_list_is_bounded_and_ordered() {
        let conn = test_conn();
        for d in [5, 1, 3, 9] {
            DailyLog::get_or_create(&conn, day(d)).unwrap();
        }

        let dates: Vec<_> = DailyLog::list(&conn, Some(day(2)), Some(day(8)))
            .unwrap()
            .into_iter()
            .map(|l| l.date)
            .collect();
        assert_eq!(dates, vec![day(3), day(5)]);
    }

    #[test]
    fn test_delete_cascades_to_entries() {
        let conn = test_conn();
        let log = DailyLog::get_or_create(&conn, day(2)).unwrap();
        let entry = FoodEntry::create(&conn, log.id, &FoodEntryCreate::quick_add(300)).unwrap();

        assert!(DailyLog::delete(&conn, log.id).unwrap());
        assert!(FoodEntry::get_by_id(&conn, entry.id).unwrap().is_none());
    }

    #[test]
    fn test_aggregate_totals() {
        let conn = test_conn();
        let log = DailyLog::get_or_create(&conn, day(7)).unwrap();
        FoodEntry::create(&conn, log.id, &FoodEntryCreate::quick_add(300)).unwrap();
        FoodEntry::create(
            &conn,
            log.id,
            &FoodEntryCreate {
                name: "Eggs".to_string(),
                nutrition: Nutrition { calories: 155, protein: 13.0, carbs: 1.1, fat: 11.0 },
                weight: 100.0,
                is_quick_add: false,
            },
        )
        .unwrap();

        let aggregates = DailyLog::aggregates_in_range(&conn, Some(day(1)), None).unwrap();
        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].entries.len(), 2);
        assert_eq!(aggregates[0].totals.calories, 455);
        assert!((aggregates[0].totals.protein - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_totals_in_range_matches_aggregates() {
        let conn = test_conn();
        let busy = DailyLog::get_or_create(&conn, day(3)).unwrap();
        FoodEntry::create(&conn, busy.id, &FoodEntryCreate::quick_add(300)).unwrap();
        FoodEntry::create(
            &conn,
            busy.id,
            &FoodEntryCreate {
                name: "Eggs".to_string(),
                nutrition: Nutrition { calories: 155, protein: 13.0, carbs: 1.1, fat: 11.0 },
                weight: 100.0,
                is_quick_add: false,
            },
        )
        .unwrap();
        DailyLog::get_or_create(&conn, day(4)).unwrap();
        DailyLog::get_or_create(&conn, day(9)).unwrap();

        let totals = DailyLog::totals_in_range(&conn, day(1), day(5)).unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].date, day(3));
        assert_eq!(totals[0].totals.calories, 455);
        assert!((totals[0].totals.fat - 11.0).abs() < 1e-9);
        // an empty day is still listed, with zero totals
        assert_eq!(totals[1].date, day(4));
        assert_eq!(totals[1].totals, Nutrition::zero());
    }
}
