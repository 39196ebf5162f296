//! Weekly Review Tool

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{Database, DbResult};
use crate::models::{DailyLog, Goal, NutritionGoal};
use crate::nutrition::{
    current_streak, progress, weekly_stats, DayTotals, TargetStatus, WeekWindow, WeeklyStats,
};

/// Days loaded per step while walking the streak back from today
const STREAK_PAGE_DAYS: i64 = 28;

/// Response for weekly_summary
#[derive(Debug, Serialize)]
pub struct WeeklySummary {
    pub week_offset: i64,
    pub goal: Option<NutritionGoal>,
    #[serde(flatten)]
    pub stats: WeeklyStats,
    /// Weekly average as a fraction of the calorie goal
    pub average_progress: Option<f64>,
    pub average_status: Option<TargetStatus>,
}

/// Statistics for the calendar week containing `today`, moved by
/// `week_offset` weeks. The streak always counts back from `today`.
pub fn weekly_summary(db: &Database, today: NaiveDate, week_offset: i64) -> Result<WeeklySummary, String> {
    let window = WeekWindow::calendar_week_of(today)
        .and_then(|w| w.shifted(week_offset))
        .ok_or_else(|| format!("week_offset {} is out of range", week_offset))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let goal = Goal::current(&conn)
        .map_err(|e| format!("Failed to load goal: {}", e))?
        .map(|g| g.target);

    let days = load_days(&conn, &window, today).map_err(|e| format!("Failed to load days: {}", e))?;

    let stats = weekly_stats(&days, goal.as_ref(), &window, today);

    let average_progress = goal.and_then(|g| progress(stats.average as f64, Some(g.calories as f64)));
    let average_status = average_progress.map(TargetStatus::from_ratio);

    tracing::debug!(
        start = %stats.start,
        end = %stats.end,
        average = stats.average,
        streak = stats.streak,
        "computed weekly stats"
    );

    Ok(WeeklySummary {
        week_offset,
        goal,
        stats,
        average_progress,
        average_status,
    })
}

/// The window's days plus the unbroken run of logged days ending at `today`
fn load_days(conn: &Connection, window: &WeekWindow, today: NaiveDate) -> DbResult<Vec<DayTotals>> {
    let mut by_date: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();

    for day in DailyLog::totals_in_range(conn, window.start(), window.end())? {
        by_date.insert(day.date, day);
    }

    let mut page_end = Some(today);
    while let Some(end) = page_end {
        let start = end
            .checked_sub_signed(Duration::days(STREAK_PAGE_DAYS - 1))
            .unwrap_or(NaiveDate::MIN);
        let page = DailyLog::totals_in_range(conn, start, end)?;
        let run = current_streak(&page, end) as i64;

        for day in page {
            by_date.insert(day.date, day);
        }

        // a gap inside this page ends the streak
        if run < (end - start).num_days() + 1 {
            break;
        }
        page_end = start.pred_opt();
    }

    Ok(by_date.into_values().collect())
}
