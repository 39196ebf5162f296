//! Calio MCP Server Implementation
//!
//! Implements the MCP server with all Calio tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{FoodEntryCreate, Nutrition, NutritionGoal, PresetCreate, PresetUpdate};
use crate::tools::status::StatusTracker;
use crate::tools::{days, goals, parse_date, presets, weekly};

/// Calio MCP Service
#[derive(Clone)]
pub struct CalioService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<CalioService>,
}

impl CalioService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn tool_error(message: String) -> McpError {
    McpError::internal_error(message, None)
}

// ============================================================================
// Day and Entry Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// Date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct QuickAddParams {
    /// Date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
    /// Calories to log (must be greater than 0)
    pub calories: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodParams {
    /// Date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
    /// Food name
    pub name: String,
    /// Calories (must be greater than 0)
    pub calories: i64,
    /// Protein in grams
    #[serde(default)]
    pub protein: f64,
    /// Carbs in grams
    #[serde(default)]
    pub carbs: f64,
    /// Fat in grams
    #[serde(default)]
    pub fat: f64,
    /// Weight in grams the values describe (default 100)
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Also save these values as a preset (default false)
    #[serde(default)]
    pub save_as_preset: bool,
}

fn default_weight() -> f64 { 100.0 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddPresetEntryParams {
    /// Date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
    /// Preset ID
    pub preset_id: i64,
    /// Weight in grams; the preset is rescaled when this differs from its default
    pub weight: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListDaysParams {
    /// Start date (YYYY-MM-DD), defaults to 30 days before end_date
    pub start_date: Option<String>,
    /// End date (YYYY-MM-DD), defaults to today
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SuggestCaloriesParams {
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

// ============================================================================
// Preset Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreatePresetParams {
    pub name: String,
    pub calories: i64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    /// Weight in grams the values describe (default 100)
    #[serde(default = "default_weight")]
    pub default_weight: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListPresetsParams {
    /// Filter by name (optional)
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdatePresetParams {
    pub id: i64,
    pub name: Option<String>,
    pub calories: Option<i64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub default_weight: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReorderPresetsParams {
    /// Preset IDs in the desired display order
    pub ids: Vec<i64>,
}

// ============================================================================
// Goal and Weekly Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GoalParams {
    /// Daily calorie goal
    pub calories: i64,
    /// Protein goal in grams; omit to not track protein
    pub protein: Option<f64>,
    /// Carbs goal in grams; omit to not track carbs
    pub carbs: Option<f64>,
    /// Fat goal in grams; omit to not track fat
    pub fat: Option<f64>,
}

impl From<GoalParams> for NutritionGoal {
    fn from(p: GoalParams) -> Self {
        NutritionGoal {
            calories: p.calories,
            protein: p.protein,
            carbs: p.carbs,
            fat: p.fat,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WeeklySummaryParams {
    /// Weeks relative to the current one: 0 = this week, -1 = last week
    #[serde(default)]
    pub week_offset: i64,
    /// Reference "today" (YYYY-MM-DD), defaults to the actual date
    pub today: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl CalioService {
    // --- Status ---

    #[tool(description = "Get the current status of the Calio service including build info, database size, and process information")]
    async fn calio_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status())
    }

    #[tool(description = "Get instructions for logging food, presets, goals and weekly review. Call this when starting a logging session.")]
    fn logging_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::LOGGING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(LOGGING_INSTRUCTIONS)]))
    }

    // --- Days ---

    #[tool(description = "Get a day's entries, totals, goal progress (remaining and ratios) and the most used presets. Creates the day if needed.")]
    fn today_summary(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(p.date.as_deref()).map_err(tool_error)?;
        let result = days::today_summary(&self.database, date).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Log calories only, without food details")]
    fn quick_add(&self, Parameters(p): Parameters<QuickAddParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(p.date.as_deref()).map_err(tool_error)?;
        let result = days::quick_add(&self.database, date, p.calories).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Log a named food with macros. Optionally save it as a preset at the same time.")]
    fn add_food(&self, Parameters(p): Parameters<AddFoodParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(p.date.as_deref()).map_err(tool_error)?;
        let data = FoodEntryCreate {
            name: p.name,
            nutrition: Nutrition { calories: p.calories, protein: p.protein, carbs: p.carbs, fat: p.fat },
            weight: p.weight,
            is_quick_add: false,
        };
        let result = days::add_food(&self.database, date, data, p.save_as_preset).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Log a preset, optionally at a different weight (values scale with weight). Records the preset's use.")]
    fn add_preset_entry(&self, Parameters(p): Parameters<AddPresetEntryParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(p.date.as_deref()).map_err(tool_error)?;
        let result = days::add_preset_entry(&self.database, date, p.preset_id, p.weight).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Delete a food entry")]
    fn delete_entry(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let deleted = days::delete_entry(&self.database, p.id).map_err(tool_error)?;
        json_result(&serde_json::json!({"success": deleted, "id": p.id}))
    }

    #[tool(description = "Delete a day and all of its entries")]
    fn delete_day(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date(p.date.as_deref()).map_err(tool_error)?;
        let deleted = days::delete_day(&self.database, date).map_err(tool_error)?;
        json_result(&serde_json::json!({"success": deleted, "date": date}))
    }

    #[tool(description = "List logged days with totals within a date range (default: last 30 days)")]
    fn list_days(&self, Parameters(p): Parameters<ListDaysParams>) -> Result<CallToolResult, McpError> {
        let end = parse_date(p.end_date.as_deref()).map_err(tool_error)?;
        let start = match p.start_date.as_deref() {
            Some(s) => parse_date(Some(s)).map_err(tool_error)?,
            None => days::default_list_start(end).map_err(tool_error)?,
        };
        let result = days::list_days(&self.database, start, end).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Estimate calories from macros (protein*4 + carbs*4 + fat*9). A suggestion only; nothing is stored.")]
    fn suggest_calories(&self, Parameters(p): Parameters<SuggestCaloriesParams>) -> Result<CallToolResult, McpError> {
        let result = days::suggest_calories(p.protein, p.carbs, p.fat).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Presets ---

    #[tool(description = "Save a reusable preset")]
    fn create_preset(&self, Parameters(p): Parameters<CreatePresetParams>) -> Result<CallToolResult, McpError> {
        let data = PresetCreate {
            name: p.name,
            nutrition: Nutrition { calories: p.calories, protein: p.protein, carbs: p.carbs, fat: p.fat },
            default_weight: p.default_weight,
        };
        let result = presets::create_preset(&self.database, data).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get a preset by ID")]
    fn get_preset(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = presets::get_preset(&self.database, p.id).map_err(tool_error)?;
        match result {
            Some(preset) => json_result(&preset),
            None => json_result(&serde_json::json!({"error": "Preset not found", "id": p.id})),
        }
    }

    #[tool(description = "List presets in display order, optionally filtered by name")]
    fn list_presets(&self, Parameters(p): Parameters<ListPresetsParams>) -> Result<CallToolResult, McpError> {
        let result = presets::list_presets(&self.database, p.query.as_deref()).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Update a preset's name, values or default weight")]
    fn update_preset(&self, Parameters(p): Parameters<UpdatePresetParams>) -> Result<CallToolResult, McpError> {
        let data = PresetUpdate {
            name: p.name,
            calories: p.calories,
            protein: p.protein,
            carbs: p.carbs,
            fat: p.fat,
            default_weight: p.default_weight,
        };
        let result = presets::update_preset(&self.database, p.id, data).map_err(tool_error)?;
        match result {
            Some(preset) => json_result(&preset),
            None => json_result(&serde_json::json!({"error": "Preset not found", "id": p.id})),
        }
    }

    #[tool(description = "Set the display order of presets")]
    fn reorder_presets(&self, Parameters(p): Parameters<ReorderPresetsParams>) -> Result<CallToolResult, McpError> {
        let result = presets::reorder_presets(&self.database, &p.ids).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Delete a preset")]
    fn delete_preset(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let deleted = presets::delete_preset(&self.database, p.id).map_err(tool_error)?;
        json_result(&serde_json::json!({"success": deleted, "id": p.id}))
    }

    // --- Goals ---

    #[tool(description = "Get the current nutrition goal (or the default when none is set)")]
    fn get_goal(&self) -> Result<CallToolResult, McpError> {
        let result = goals::get_goal(&self.database).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Save the nutrition goal. Omitted macros are not tracked.")]
    fn save_goal(&self, Parameters(p): Parameters<GoalParams>) -> Result<CallToolResult, McpError> {
        let result = goals::save_goal(&self.database, p.into()).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Save the first goal and mark onboarding as complete")]
    fn complete_onboarding(&self, Parameters(p): Parameters<GoalParams>) -> Result<CallToolResult, McpError> {
        let result = goals::complete_onboarding(&self.database, p.into()).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get application state: onboarding completion and whether a goal exists")]
    fn app_state(&self) -> Result<CallToolResult, McpError> {
        let result = goals::app_state(&self.database).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Weekly ---

    #[tool(description = "Weekly review: average calories, days within 10% of the goal, current logging streak, and per-day totals")]
    fn weekly_summary(&self, Parameters(p): Parameters<WeeklySummaryParams>) -> Result<CallToolResult, McpError> {
        let today = parse_date(p.today.as_deref()).map_err(tool_error)?;
        let result = weekly::weekly_summary(&self.database, today, p.week_offset).map_err(tool_error)?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for CalioService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "calio".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Calio".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Calio - calorie and macro tracking. \
                 Call logging_instructions first. \
                 Days: today_summary, list_days, delete_day. \
                 Entries: quick_add, add_food, add_preset_entry, delete_entry, suggest_calories. \
                 Presets: create/get/list/update/delete_preset, reorder_presets. \
                 Goals: get_goal, save_goal, complete_onboarding, app_state. \
                 Review: weekly_summary."
                    .into(),
            ),
        }
    }
}
