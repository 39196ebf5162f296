//! Calio Status Tool
//!
//! Runtime status of the service, plus the usage guide served to clients.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Logging guide for assistants driving the tools
pub const LOGGING_INSTRUCTIONS: &str = r#"
# Calio Logging Instructions

## Dates

All `date` parameters use `YYYY-MM-DD`. Leave `date` out to mean today
(server local time). A day is created automatically the first time it is used.

## Logging food

| Situation | Tool |
|-----------|------|
| Only calories are known | `quick_add` |
| Name and macros are known | `add_food` (set `save_as_preset` to reuse it) |
| A saved preset matches | `add_preset_entry` (pass `weight` to rescale) |

- Calories must be greater than 0; macros and weight cannot be negative.
- Quick adds are stored as "Quick Add" with no weight and never become presets.
- Presets describe their `default_weight` in grams. Logging a different weight
  scales calories and macros by `weight / default_weight`. Calories are
  rounded to the nearest whole calorie.

## Suggested calories

`suggest_calories` estimates calories from macros as
`protein * 4 + carbs * 4 + fat * 9`, rounded down. It is a hint only; it never
changes an entry.

## Goals

- `get_goal` returns the current goal, or the 2000 kcal default when none is set.
- `save_goal` replaces it. Leave a macro out to stop tracking it; 0 is a real
  target, not "untracked".
- `complete_onboarding` saves the first goal and marks setup as finished.

## Review

- `today_summary` shows totals, remaining amounts, progress ratios (which may
  exceed 1.0) and the five most used presets.
- `weekly_summary` covers a Monday-to-Sunday week. `week_offset` -1 is last
  week. A day is on target when its calories are within 10% of the goal,
  bounds included. The streak counts consecutive days with calories, going
  back from today.

## Cleanup

`delete_entry` removes one entry; `delete_day` removes a day and all of its
entries.
"#;

/// Runtime status of the Calio service
#[derive(Debug, Clone, Serialize)]
pub struct CalioStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Collects runtime information for the status tool
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    pub fn get_status(&self) -> CalioStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        CalioStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
