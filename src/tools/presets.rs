//! Preset Tools
//!
//! Tools for managing reusable food templates.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Preset, PresetCreate, PresetUpdate};

/// Response for list_presets
#[derive(Debug, Serialize)]
pub struct ListPresetsResponse {
    pub presets: Vec<Preset>,
    pub total: usize,
}

pub(crate) fn validate_weight(weight: f64) -> Result<(), String> {
    if weight <= 0.0 {
        return Err("default_weight must be greater than 0".to_string());
    }
    Ok(())
}

/// Save a new preset
pub fn create_preset(db: &Database, data: PresetCreate) -> Result<Preset, String> {
    let name = data.name.trim();
    if name.is_empty() {
        return Err("Preset name cannot be empty".to_string());
    }
    if let Some(field) = data.nutrition.first_negative() {
        return Err(format!("{} cannot be negative", field));
    }
    validate_weight(data.default_weight)?;

    let data = PresetCreate {
        name: name.to_string(),
        ..data
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let preset = Preset::create(&conn, &data)
        .map_err(|e| format!("Failed to create preset: {}", e))?;

    tracing::info!(preset_id = preset.id, name = %preset.name, "created preset");
    Ok(preset)
}

pub fn get_preset(db: &Database, id: i64) -> Result<Option<Preset>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Preset::get_by_id(&conn, id).map_err(|e| format!("Failed to get preset: {}", e))
}

/// List presets in display order, optionally filtered by name
pub fn list_presets(db: &Database, query: Option<&str>) -> Result<ListPresetsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let presets = match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => Preset::search(&conn, q),
        None => Preset::list(&conn),
    }
    .map_err(|e| format!("Failed to list presets: {}", e))?;

    Ok(ListPresetsResponse {
        total: presets.len(),
        presets,
    })
}

pub fn update_preset(db: &Database, id: i64, data: PresetUpdate) -> Result<Option<Preset>, String> {
    if let Some(ref name) = data.name {
        if name.trim().is_empty() {
            return Err("Preset name cannot be empty".to_string());
        }
    }
    if data.calories.is_some_and(|c| c < 0) {
        return Err("calories cannot be negative".to_string());
    }
    for (field, value) in [("protein", data.protein), ("carbs", data.carbs), ("fat", data.fat)] {
        if value.is_some_and(|v| v < 0.0) {
            return Err(format!("{} cannot be negative", field));
        }
    }
    if let Some(w) = data.default_weight {
        validate_weight(w)?;
    }

    let data = PresetUpdate {
        name: data.name.map(|n| n.trim().to_string()),
        ..data
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Preset::update(&conn, id, &data).map_err(|e| format!("Failed to update preset: {}", e))
}

/// Store a new manual order. Every listed id must exist.
pub fn reorder_presets(db: &Database, ids: &[i64]) -> Result<ListPresetsResponse, String> {
    let mut conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    for &id in ids {
        let exists = Preset::get_by_id(&conn, id)
            .map_err(|e| format!("Failed to get preset: {}", e))?
            .is_some();
        if !exists {
            return Err(format!("Preset not found with id: {}", id));
        }
    }

    Preset::reorder(&mut conn, ids).map_err(|e| format!("Failed to reorder presets: {}", e))?;

    let presets = Preset::list(&conn).map_err(|e| format!("Failed to list presets: {}", e))?;
    Ok(ListPresetsResponse {
        total: presets.len(),
        presets,
    })
}

pub fn delete_preset(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Preset::delete(&conn, id).map_err(|e| format!("Failed to delete preset: {}", e))?;
    if deleted {
        tracing::info!(preset_id = id, "deleted preset");
    }
    Ok(deleted)
}
