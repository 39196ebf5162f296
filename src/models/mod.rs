//! Data models
//!
//! Rust structs representing database entities.

mod daily_log;
mod food_entry;
mod goal;
mod nutrition;
mod preset;
mod settings;

pub use daily_log::{DailyAggregate, DailyLog, DATE_FORMAT};
pub use food_entry::{FoodEntry, FoodEntryCreate, QUICK_ADD_NAME};
pub use goal::{Goal, NutritionGoal, DEFAULT_CALORIE_GOAL};
pub use nutrition::{DailyTotals, Nutrition};
pub use preset::{Preset, PresetCreate, PresetUpdate};
pub use settings::AppSettings;
