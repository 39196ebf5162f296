//! Day and Food Entry Tools
//!
//! Tools for the daily view: logging food, reading the day's progress, and
//! removing entries or whole days.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::db::Database;
use crate::models::{
    DailyAggregate, DailyLog, DailyTotals, FoodEntry, FoodEntryCreate, Goal, NutritionGoal,
    Preset, PresetCreate,
};
use crate::nutrition::{self, GoalProgress};

/// How many presets the daily view offers for one-tap logging
pub const RECENT_PRESET_LIMIT: i64 = 5;

/// Days covered by list_days when no start date is given
pub const DEFAULT_LIST_DAYS: i64 = 30;

/// Response for today_summary
#[derive(Debug, Serialize)]
pub struct DaySummaryDetail {
    pub id: i64,
    pub date: NaiveDate,
    pub totals: DailyTotals,
    pub goal: NutritionGoal,
    /// true when no goal is stored and the default target is shown
    pub goal_is_default: bool,
    pub progress: GoalProgress,
    pub entries: Vec<FoodEntry>,
    pub recent_presets: Vec<Preset>,
}

/// Response for the logging tools
#[derive(Debug, Serialize)]
pub struct LogEntryResponse {
    pub entry: FoodEntry,
    pub date: NaiveDate,
    pub day_totals: DailyTotals,
    /// Set when the entry was also saved as a preset
    pub preset_id: Option<i64>,
}

/// Day summary for listing
#[derive(Debug, Serialize)]
pub struct DayListItem {
    pub id: i64,
    pub date: NaiveDate,
    pub totals: DailyTotals,
    pub entry_count: usize,
}

/// Response for list_days
#[derive(Debug, Serialize)]
pub struct ListDaysResponse {
    pub days: Vec<DayListItem>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Response for suggest_calories
#[derive(Debug, Serialize)]
pub struct SuggestCaloriesResponse {
    pub estimate: i64,
    pub suggestion: Option<i64>,
}

fn validate_entry(data: &FoodEntryCreate) -> Result<(), String> {
    if let Some(field) = data.nutrition.first_negative() {
        return Err(format!("{} cannot be negative", field));
    }
    if data.weight < 0.0 {
        return Err("weight cannot be negative".to_string());
    }
    if data.nutrition.calories <= 0 {
        return Err("calories must be greater than 0".to_string());
    }
    if !data.is_quick_add && data.name.trim().is_empty() {
        return Err("Food name cannot be empty".to_string());
    }
    Ok(())
}

/// Load a day (creating it on first access) with totals and goal progress
pub fn today_summary(db: &Database, date: NaiveDate) -> Result<DaySummaryDetail, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let day = DailyLog::get_or_create(&conn, date)
        .map_err(|e| format!("Failed to get/create day: {}", e))?;
    let aggregate = DailyAggregate::load(&conn, &day)
        .map_err(|e| format!("Failed to load entries: {}", e))?;

    let stored_goal = Goal::current(&conn)
        .map_err(|e| format!("Failed to load goal: {}", e))?;
    let goal_is_default = stored_goal.is_none();
    let goal = stored_goal.map(|g| g.target).unwrap_or_default();

    let recent_presets = Preset::recent(&conn, RECENT_PRESET_LIMIT)
        .map_err(|e| format!("Failed to load presets: {}", e))?;

    Ok(DaySummaryDetail {
        id: aggregate.id,
        date: aggregate.date,
        progress: GoalProgress::new(&aggregate.totals, &goal),
        totals: aggregate.totals,
        goal,
        goal_is_default,
        entries: aggregate.entries,
        recent_presets,
    })
}

/// Log calories with no food details
pub fn quick_add(db: &Database, date: NaiveDate, calories: i64) -> Result<LogEntryResponse, String> {
    add_food(db, date, FoodEntryCreate::quick_add(calories), false)
}

/// Log a food entry, optionally saving it as a preset as well.
///
/// Quick-add entries are normalized (fixed name, no weight) and never become
/// presets.
pub fn add_food(
    db: &Database,
    date: NaiveDate,
    data: FoodEntryCreate,
    save_as_preset: bool,
) -> Result<LogEntryResponse, String> {
    let data = if data.is_quick_add {
        FoodEntryCreate::quick_add(data.nutrition.calories)
    } else {
        FoodEntryCreate {
            name: data.name.trim().to_string(),
            ..data
        }
    };
    validate_entry(&data)?;
    let save_as_preset = save_as_preset && !data.is_quick_add;
    if save_as_preset {
        // the weight becomes the preset's default weight
        super::presets::validate_weight(data.weight)?;
    }

    let (entry, preset_id, day_totals) = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let day = DailyLog::get_or_create(&tx, date)?;
            let entry = FoodEntry::create(&tx, day.id, &data)?;

            let preset_id = if save_as_preset {
                let preset = Preset::create(
                    &tx,
                    &PresetCreate {
                        name: data.name.clone(),
                        nutrition: data.nutrition,
                        default_weight: data.weight,
                    },
                )?;
                Some(preset.id)
            } else {
                None
            };

            let totals = DailyAggregate::load(&tx, &day)?.totals;
            tx.commit()?;
            Ok((entry, preset_id, totals))
        })
        .map_err(|e| format!("Failed to log food: {}", e))?;

    tracing::info!(
        entry_id = entry.id,
        %date,
        calories = entry.nutrition.calories,
        quick_add = entry.is_quick_add,
        "logged food entry"
    );

    Ok(LogEntryResponse {
        entry,
        date,
        day_totals,
        preset_id,
    })
}

/// Log a preset, rescaled to `weight` grams when given, and record its use
pub fn add_preset_entry(
    db: &Database,
    date: NaiveDate,
    preset_id: i64,
    weight: Option<f64>,
) -> Result<LogEntryResponse, String> {
    if let Some(w) = weight {
        if w <= 0.0 {
            return Err("weight must be greater than 0".to_string());
        }
    }

    let result = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let Some(preset) = Preset::get_by_id(&tx, preset_id)? else {
                return Ok(None);
            };
            let day = DailyLog::get_or_create(&tx, date)?;
            let entry = FoodEntry::create(&tx, day.id, &preset.to_entry(weight))?;
            Preset::record_usage(&tx, preset.id)?;

            let totals = DailyAggregate::load(&tx, &day)?.totals;
            tx.commit()?;
            Ok(Some((entry, totals)))
        })
        .map_err(|e| format!("Failed to log preset: {}", e))?;

    let (entry, day_totals) =
        result.ok_or_else(|| format!("Preset not found with id: {}", preset_id))?;

    tracing::info!(entry_id = entry.id, preset_id, %date, "logged preset entry");

    Ok(LogEntryResponse {
        entry,
        date,
        day_totals,
        preset_id: Some(preset_id),
    })
}

/// Delete a single food entry
pub fn delete_entry(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    FoodEntry::delete(&conn, id).map_err(|e| format!("Failed to delete entry: {}", e))
}

/// Delete a day and every entry in it
pub fn delete_day(db: &Database, date: NaiveDate) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let day = DailyLog::get_by_date(&conn, date)
        .map_err(|e| format!("Failed to get day: {}", e))?;

    match day {
        Some(day) => {
            let deleted = DailyLog::delete(&conn, day.id)
                .map_err(|e| format!("Failed to delete day: {}", e))?;
            tracing::info!(%date, "deleted day");
            Ok(deleted)
        }
        None => Ok(false),
    }
}

/// Start of the default list_days range ending on `end`
pub fn default_list_start(end: NaiveDate) -> Result<NaiveDate, String> {
    end.checked_sub_signed(Duration::days(DEFAULT_LIST_DAYS - 1))
        .ok_or_else(|| format!("end date {} is out of range", end))
}

/// List stored days within a date range, oldest first
pub fn list_days(db: &Database, start: NaiveDate, end: NaiveDate) -> Result<ListDaysResponse, String> {
    if start > end {
        return Err("start date must not be after end date".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let aggregates = DailyLog::aggregates_in_range(&conn, Some(start), Some(end))
        .map_err(|e| format!("Failed to list days: {}", e))?;

    let days = aggregates
        .into_iter()
        .map(|a| DayListItem {
            id: a.id,
            date: a.date,
            totals: a.totals,
            entry_count: a.entries.len(),
        })
        .collect();

    Ok(ListDaysResponse { days, start, end })
}

/// Calorie hint for the given macros
pub fn suggest_calories(protein: f64, carbs: f64, fat: f64) -> Result<SuggestCaloriesResponse, String> {
    if protein < 0.0 || carbs < 0.0 || fat < 0.0 {
        return Err("Macros cannot be negative".to_string());
    }

    Ok(SuggestCaloriesResponse {
        estimate: nutrition::estimate_calories(protein, carbs, fat),
        suggestion: nutrition::suggest_calories(protein, carbs, fat),
    })
}
