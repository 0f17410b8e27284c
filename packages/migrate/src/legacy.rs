//! Version 1: root and cell shape of the original "editable" format.
//!
//! ```text
//! { id, cells: [ { content: { plugin: { name, version }, state }, rows } ] }
//!   ↓
//! { id, rows: [ { cells: [ { plugin: { id, version }, dataI18n: { <lang>: state } } ] } ] }
//! ```

use crate::engine::{walk_cells_mut, MigrationContext};
use serde_json::{Map, Value};
use tracing::debug;

pub(crate) fn migrate_legacy_shape(mut root: Map<String, Value>, ctx: &MigrationContext<'_>) -> Map<String, Value> {
    if !root.contains_key("rows") {
        if let Some(Value::Array(cells)) = root.remove("cells") {
            let rows = rows_from_root_cells(cells);
            root.insert("rows".to_string(), Value::Array(rows));
        }
    }

    if let Some(rows) = root.get_mut("rows") {
        walk_cells_mut(rows, &mut |cell: &mut Map<String, Value>| {
            upgrade_legacy_cell(cell, ctx.lang)
        });
    }

    root
}

/// A single plain container at the root contributes its rows directly;
/// anything else is wrapped into one row.
fn rows_from_root_cells(mut cells: Vec<Value>) -> Vec<Value> {
    if cells.len() == 1 {
        let is_plain_container = cells[0].as_object().map_or(false, |cell| {
            !cell.contains_key("content")
                && !cell.contains_key("layout")
                && !cell.contains_key("plugin")
                && cell.get("rows").map_or(false, Value::is_array)
        });
        if is_plain_container {
            if let Some(Value::Array(rows)) = cells[0].as_object_mut().and_then(|c| c.remove("rows")) {
                return rows;
            }
        }
    }

    if cells.is_empty() {
        return Vec::new();
    }

    let mut row = Map::new();
    row.insert("cells".to_string(), Value::Array(std::mem::take(&mut cells)));
    vec![Value::Object(row)]
}

fn upgrade_legacy_cell(cell: &mut Map<String, Value>, lang: &str) {
    if cell.contains_key("plugin") {
        return;
    }

    let (slot, id) = match (
        legacy_plugin_name(cell.get("content")),
        legacy_plugin_name(cell.get("layout")),
    ) {
        (Some(id), _) => ("content", id),
        (None, Some(id)) => ("layout", id),
        (None, None) => return,
    };

    let Some(Value::Object(legacy)) = cell.remove(slot) else {
        return;
    };

    let mut plugin = Map::new();
    plugin.insert("id".to_string(), Value::String(id.clone()));
    if let Some(version) = legacy.get("plugin").and_then(|p| p.get("version")) {
        if let Some(version) = version_string(version) {
            plugin.insert("version".to_string(), Value::String(version));
        }
    }
    cell.insert("plugin".to_string(), Value::Object(plugin));

    let data_i18n = match (legacy.get("stateI18n"), legacy.get("state")) {
        (Some(Value::Object(by_lang)), _) => Some(Value::Object(by_lang.clone())),
        (_, Some(state)) => {
            let mut by_lang = Map::new();
            by_lang.insert(lang.to_string(), state.clone());
            Some(Value::Object(by_lang))
        }
        _ => None,
    };
    if let Some(data_i18n) = data_i18n {
        if !cell.contains_key("dataI18n") {
            cell.insert("dataI18n".to_string(), data_i18n);
        }
    }

    debug!(plugin_id = %id, slot, "Upgraded legacy cell plugin slot");
}

/// Plugin id of a legacy `content`/`layout` slot
fn legacy_plugin_name(slot: Option<&Value>) -> Option<String> {
    let plugin = slot?.get("plugin")?;
    match plugin {
        Value::String(name) => Some(name.clone()),
        Value::Object(fields) => fields
            .get("id")
            .or_else(|| fields.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

pub(crate) fn version_string(version: &Value) -> Option<String> {
    match version {
        Value::String(version) => Some(version.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
