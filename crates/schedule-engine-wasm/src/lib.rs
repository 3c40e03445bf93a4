//! WASM bindings for schedule-engine.
//!
//! Exposes recurrence expansion, column packing and time-grid layout to the
//! React Native/web views via `wasm-bindgen`. All complex types are passed as
//! JSON strings in the app's camelCase task format.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p schedule-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/schedule-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/schedule_engine_wasm.wasm
//! ```
//!
//! Each export delegates to a `*_json` function with a `String` error so the
//! conversions can be exercised natively.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use schedule_engine::calendar::{agenda_for, month_cells, occurrences_on};
use schedule_engine::grid::layout_day as engine_layout_day;
use schedule_engine::time::parse_date_strict;
use schedule_engine::{
    assign_columns, expand_with, parse_occurrences_json, parse_tasks_json, ChildFilter,
    ColumnAssignment, ExpandOptions, GridConfig, PackingPolicy,
};
use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    parse_date_strict(s).map_err(|e| e.to_string())
}

fn parse_policy(policy: &str) -> Result<PackingPolicy, String> {
    match policy {
        "global" => Ok(PackingPolicy::Global),
        "clustered" => Ok(PackingPolicy::Clustered),
        other => Err(format!(
            "Unknown packing policy: '{}'. Expected 'global' or 'clustered'",
            other
        )),
    }
}

fn parse_options(options_json: Option<&str>) -> Result<ExpandOptions, String> {
    match options_json {
        Some(json) if !json.trim().is_empty() => serde_json::from_str(json)
            .map_err(|e| format!("Invalid expand options JSON: {}", e)),
        _ => Ok(ExpandOptions::default()),
    }
}

fn parse_grid(config_json: Option<&str>) -> Result<GridConfig, String> {
    match config_json {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str(json).map_err(|e| format!("Invalid grid config JSON: {}", e))
        }
        _ => Ok(GridConfig::daily()),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn js_err(e: String) -> JsValue {
    JsValue::from_str(&e)
}

// ---------------------------------------------------------------------------
// JSON-in/JSON-out implementations
// ---------------------------------------------------------------------------

/// Expand a JSON task array over `from..=to`. See [`expand_tasks`].
pub fn expand_tasks_json(
    tasks_json: &str,
    from: &str,
    to: &str,
    options_json: Option<&str>,
) -> Result<String, String> {
    let tasks = parse_tasks_json(tasks_json).map_err(|e| e.to_string())?;
    let options = parse_options(options_json)?;
    let occurrences = expand_with(&tasks, parse_date(from)?, parse_date(to)?, &options);
    to_json(&occurrences)
}

/// Occurrences of one day for one child (or `"all"`), optionally sorted by time.
pub fn day_occurrences_json(
    occurrences_json: &str,
    date: &str,
    child: &str,
    sorted: bool,
) -> Result<String, String> {
    let occurrences = parse_occurrences_json(occurrences_json).map_err(|e| e.to_string())?;
    let date = parse_date(date)?;
    let filter = ChildFilter::from(child.to_string());
    let day = if sorted {
        agenda_for(&occurrences, date, &filter)
    } else {
        occurrences_on(&occurrences, date, &filter)
    };
    to_json(&day)
}

/// Column assignment per occurrence id, as a JSON object ordered by id.
pub fn assign_columns_json(occurrences_json: &str, policy: &str) -> Result<String, String> {
    let occurrences = parse_occurrences_json(occurrences_json).map_err(|e| e.to_string())?;
    let policy = parse_policy(policy)?;
    let columns: BTreeMap<String, ColumnAssignment> = assign_columns(&occurrences, policy)
        .into_iter()
        .map(|(id, assignment)| (id.to_string(), assignment))
        .collect();
    to_json(&columns)
}

/// Grid rows plus placed occurrences for one day.
pub fn layout_day_json(
    occurrences_json: &str,
    config_json: Option<&str>,
    policy: &str,
) -> Result<String, String> {
    let occurrences = parse_occurrences_json(occurrences_json).map_err(|e| e.to_string())?;
    let config = parse_grid(config_json)?;
    let policy = parse_policy(policy)?;
    let (grid, placed) =
        engine_layout_day(config, &occurrences, policy).map_err(|e| e.to_string())?;
    to_json(&json!({ "grid": grid, "occurrences": placed }))
}

/// Month cells with per-day counts for the month containing `month`.
pub fn month_cells_json(tasks_json: &str, month: &str, child: &str) -> Result<String, String> {
    let tasks = parse_tasks_json(tasks_json).map_err(|e| e.to_string())?;
    let day = parse_date(month)?;
    let (start, end) = schedule_engine::ViewMode::Monthly.range(day);
    let occurrences = expand_with(&tasks, start, end, &ExpandOptions::default());
    let cells = month_cells(day, &occurrences, &ChildFilter::from(child.to_string()));
    to_json(&cells)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Expand task templates into dated occurrences.
///
/// # Arguments
/// - `tasks_json` -- JSON array of task records (`id`/`_id`, `date`, `time`, `endTime`, `recurrence`)
/// - `from` / `to` -- inclusive `YYYY-MM-DD` range
/// - `options_json` -- optional `{"max_iterations": 365, "biweekly_cadence": "weekly" | "two_week"}`
#[wasm_bindgen(js_name = "expandTasks")]
pub fn expand_tasks(
    tasks_json: &str,
    from: &str,
    to: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    expand_tasks_json(tasks_json, from, to, options_json.as_deref()).map_err(js_err)
}

/// Filter expanded occurrences to one day and child (`"all"` for everyone).
#[wasm_bindgen(js_name = "dayOccurrences")]
pub fn day_occurrences(
    occurrences_json: &str,
    date: &str,
    child: &str,
    sorted: bool,
) -> Result<String, JsValue> {
    day_occurrences_json(occurrences_json, date, child, sorted).map_err(js_err)
}

/// Assign columns to one day's occurrences. `policy` is `"global"` or `"clustered"`.
#[wasm_bindgen(js_name = "assignColumns")]
pub fn assign_columns_js(occurrences_json: &str, policy: &str) -> Result<String, JsValue> {
    assign_columns_json(occurrences_json, policy).map_err(js_err)
}

/// Lay out one day's occurrences on the collapsed time grid.
#[wasm_bindgen(js_name = "layoutDay")]
pub fn layout_day(
    occurrences_json: &str,
    config_json: Option<String>,
    policy: &str,
) -> Result<String, JsValue> {
    layout_day_json(occurrences_json, config_json.as_deref(), policy).map_err(js_err)
}

/// Month grid cells with occurrence counts.
#[wasm_bindgen(js_name = "monthCells")]
pub fn month_cells_js(tasks_json: &str, month: &str, child: &str) -> Result<String, JsValue> {
    month_cells_json(tasks_json, month, child).map_err(js_err)
}

/// Recover the stored task id from an occurrence id.
#[wasm_bindgen(js_name = "baseId")]
pub fn base_id(occurrence_id: &str) -> String {
    schedule_engine::base_id(occurrence_id).to_string()
}
