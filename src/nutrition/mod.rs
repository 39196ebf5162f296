//! Nutrition calculation module
//!
//! Pure arithmetic over already-loaded values: weight scaling, calorie
//! estimation, daily aggregation, goal progress and weekly statistics.

pub mod aggregate;
pub mod calories;
pub mod progress;
pub mod scaler;
pub mod weekly;

pub use aggregate::aggregate;
pub use calories::{estimate_calories, suggest_calories};
pub use progress::{
    overage, progress, remaining, CalorieProgress, GoalProgress, MacroProgress, TargetStatus,
};
pub use scaler::{scale, scale_calories};
pub use weekly::{current_streak, weekly_stats, DayTotals, WeekDay, WeekWindow, WeeklyStats};
