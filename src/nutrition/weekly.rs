//! Weekly statistics
//!
//! Average intake, on-target days and the logging streak over a seven day
//! window. Days without a stored aggregate count as zero calories.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{DailyTotals, NutritionGoal};
use super::progress::TargetStatus;

/// Days in a statistics window
pub const DAYS_PER_WEEK: i64 = 7;

/// Totals for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayTotals {
    pub date: NaiveDate,
    pub totals: DailyTotals,
}

/// Seven consecutive calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl WeekWindow {
    /// `None` when the last day would fall past `NaiveDate::MAX`
    fn starting_on(start: NaiveDate) -> Option<Self> {
        let end = start.checked_add_signed(Duration::days(DAYS_PER_WEEK - 1))?;
        Some(Self { start, end })
    }

    /// The Monday-to-Sunday week that contains `date`
    pub fn calendar_week_of(date: NaiveDate) -> Option<Self> {
        let since_monday = date.weekday().num_days_from_monday() as i64;
        Self::starting_on(date.checked_sub_signed(Duration::days(since_monday))?)
    }

    /// Move by whole weeks; negative goes back in time.
    ///
    /// Returns `None` when the result is outside the supported date range.
    pub fn shifted(&self, weeks: i64) -> Option<Self> {
        let offset = Duration::try_weeks(weeks)?;
        Self::starting_on(self.start.checked_add_signed(offset)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(DAYS_PER_WEEK as usize)
    }
}

/// One day of the weekly chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub calories: i64,
    /// `None` when there is no usable calorie goal
    pub status: Option<TargetStatus>,
}

/// Result of [`weekly_stats`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_calories: i64,
    /// Floor of the total over all seven days
    pub average: i64,
    pub on_target_days: u32,
    pub streak: u32,
    pub days: Vec<WeekDay>,
}

/// Calories per date; repeated dates are summed
fn calories_by_date(days: &[DayTotals]) -> HashMap<NaiveDate, i64> {
    let mut by_date = HashMap::with_capacity(days.len());
    for day in days {
        let calories = by_date.entry(day.date).or_insert(0i64);
        *calories = calories.saturating_add(day.totals.calories);
    }
    by_date
}

/// Consecutive days with calories logged, counting back from `anchor`.

///
/// The anchor itself must have calories for the streak to be non-zero. A
/// missing day ends the streak like a zero day does.
pub fn current_streak(days: &[DayTotals], anchor: NaiveDate) -> u32 {
    streak_from(&calories_by_date(days), anchor)
}

fn streak_from(by_date: &HashMap<NaiveDate, i64>, anchor: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = Some(anchor);

    while let Some(date) = day {
        match by_date.get(&date) {
            Some(&calories) if calories > 0 => {
                streak += 1;
                day = date.pred_opt();
            }
            _ => break,
        }
    }

    streak
}

/// Statistics for `window`, with the streak counted back from `today`.
///
/// `days` may contain dates outside the window: they are ignored for the
/// average and on-target count but still extend the streak. Without a goal
/// (or with a goal of zero calories) no day is on target.
pub fn weekly_stats(
    days: &[DayTotals],
    goal: Option<&NutritionGoal>,
    window: &WeekWindow,
    today: NaiveDate,
) -> WeeklyStats {
    let by_date = calories_by_date(days);
    let goal_calories = goal.map(|g| g.calories).unwrap_or(0);

    let week: Vec<WeekDay> = window
        .dates()
        .map(|date| {
            let calories = by_date.get(&date).copied().unwrap_or(0);
            WeekDay {
                date,
                calories,
                status: TargetStatus::for_calories(calories, goal_calories),
            }
        })
        .collect();

    let total_calories = week.iter().fold(0i64, |acc, d| acc.saturating_add(d.calories));
    let on_target_days = week
        .iter()
        .filter(|d| d.status == Some(TargetStatus::OnTarget))
        .count() as u32;

    WeeklyStats {
        start: window.start(),
        end: window.end(),
        total_calories,
        average: total_calories.div_euclid(DAYS_PER_WEEK),
        on_target_days,
        streak: streak_from(&by_date, today),
        days: week,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Nutrition;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2025-05-18 is a Sunday, so its calendar week ends on it
    fn week_of(day: NaiveDate) -> WeekWindow {
        WeekWindow::calendar_week_of(day).unwrap()
    }

    /// Consecutive days ending on `end`, one per calorie value
    fn days_ending(end: NaiveDate, calories: &[i64]) -> Vec<DayTotals> {
        let n = calories.len() as i64;
        calories
            .iter()
            .enumerate()
            .map(|(i, &c)| DayTotals {
                date: end - Duration::days(n - 1 - i as i64),
                totals: Nutrition { calories: c, ..Nutrition::zero() },
            })
            .collect()
    }

    #[test]
    fn test_streak_and_average_with_gap() {
        let today = date(2025, 5, 18);
        let days = days_ending(today, &[2000, 2000, 2000, 0, 2000, 2000, 2000]);
        let stats = weekly_stats(&days, None, &week_of(today), today);

        assert_eq!(stats.streak, 3);
        assert_eq!(stats.average, 1714);
        assert_eq!(stats.total_calories, 12000);
    }

    #[test]
    fn test_on_target_days() {
        let today = date(2025, 5, 18);
        let days = days_ending(today, &[1800, 2200, 1000, 2000, 2100, 1900, 2050]);
        let goal = NutritionGoal::calories_only(2000);
        let stats = weekly_stats(&days, Some(&goal), &week_of(today), today);

        assert_eq!(stats.on_target_days, 6);
        assert_eq!(stats.days[2].status, Some(TargetStatus::Under));
        assert_eq!(stats.streak, 7);
    }

    #[test]
    fn test_no_goal_means_no_on_target_days() {
        let today = date(2025, 5, 18);
        let days = days_ending(today, &[2000; 7]);
        let window = week_of(today);

        assert_eq!(weekly_stats(&days, None, &window, today).on_target_days, 0);
        let zero = NutritionGoal::calories_only(0);
        let stats = weekly_stats(&days, Some(&zero), &window, today);
        assert_eq!(stats.on_target_days, 0);
        assert!(stats.days.iter().all(|d| d.status.is_none()));
    }

    #[test]
    fn test_missing_days_count_as_zero() {
        let today = date(2025, 5, 18);
        let days = vec![DayTotals {
            date: today,
            totals: Nutrition { calories: 700, ..Nutrition::zero() },
        }];
        let stats = weekly_stats(&days, None, &week_of(today), today);

        assert_eq!(stats.days.len(), 7);
        assert_eq!(stats.average, 100);
        assert_eq!(stats.streak, 1);
    }

    #[test]
    fn test_empty_history() {
        let today = date(2025, 5, 18);
        let stats = weekly_stats(&[], None, &week_of(today), today);
        assert_eq!(stats.average, 0);
        assert_eq!(stats.on_target_days, 0);
        assert_eq!(stats.streak, 0);
    }

    #[test]
    fn test_streak_is_zero_when_today_is_empty() {
        let today = date(2025, 5, 18);
        let days = days_ending(today, &[500, 500, 0]);
        assert_eq!(current_streak(&days, today), 0);
        assert_eq!(current_streak(&days, today.pred_opt().unwrap()), 2);
    }

    #[test]
    fn test_streak_reaches_past_the_window() {
        let today = date(2025, 5, 18);
        let days = days_ending(today, &[300; 10]);
        let stats = weekly_stats(&days, None, &week_of(today), today);
        assert_eq!(stats.streak, 10);
        // only the window's seven days feed the average
        assert_eq!(stats.total_calories, 2100);
    }

    #[test]
    fn test_streak_stops_at_absent_day() {
        let today = date(2025, 5, 18);
        let mut days = days_ending(today, &[400, 400]);
        days.extend(days_ending(today - Duration::days(3), &[400, 400]));
        assert_eq!(current_streak(&days, today), 2);
    }

    #[test]
    fn test_days_outside_window_ignored_for_average() {
        let window = WeekWindow::starting_on(date(2025, 5, 5)).unwrap();
        let days = vec![
            DayTotals { date: date(2025, 5, 4), totals: Nutrition { calories: 7000, ..Nutrition::zero() } },
            DayTotals { date: date(2025, 5, 6), totals: Nutrition { calories: 1400, ..Nutrition::zero() } },
        ];
        let stats = weekly_stats(&days, None, &window, date(2025, 5, 20));
        assert_eq!(stats.average, 200);
        assert_eq!(stats.streak, 0);
    }

    #[test]
    fn test_duplicate_dates_are_summed() {
        let today = date(2025, 5, 18);
        let days = vec![
            DayTotals { date: today, totals: Nutrition { calories: 1000, ..Nutrition::zero() } },
            DayTotals { date: today, totals: Nutrition { calories: 1000, ..Nutrition::zero() } },
        ];
        let goal = NutritionGoal::calories_only(2000);
        let stats = weekly_stats(&days, Some(&goal), &week_of(today), today);
        assert_eq!(stats.days[6].calories, 2000);
        assert_eq!(stats.on_target_days, 1);
    }

    #[test]
    fn test_calendar_week_starts_monday() {
        // 2025-05-14 is a Wednesday
        let window = week_of(date(2025, 5, 14));
        assert_eq!(window.start(), date(2025, 5, 12));
        assert_eq!(window.end(), date(2025, 5, 18));
        assert_eq!(window.dates().last(), Some(date(2025, 5, 18)));
        assert_eq!(window.dates().count(), 7);

        let previous = window.shifted(-1).unwrap();
        assert_eq!(previous.start(), date(2025, 5, 5));
        assert_eq!(previous.end(), date(2025, 5, 11));
    }

    #[test]
    fn test_out_of_range_windows_are_none() {
        let window = week_of(date(2025, 5, 14));
        assert!(window.shifted(i64::MAX).is_none());
        assert!(window.shifted(i64::MIN).is_none());
        assert!(window.shifted(20_000_000).is_none());
        assert!(WeekWindow::starting_on(NaiveDate::MAX).is_none());
        // NaiveDate::MAX is a Monday, so its Sunday does not exist
        assert!(WeekWindow::calendar_week_of(NaiveDate::MAX).is_none());
    }
}
