//! Calio Library
//!
//! Calorie and macro tracking: food logging, goals, presets, and daily and
//! weekly progress.

pub mod build_info;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
