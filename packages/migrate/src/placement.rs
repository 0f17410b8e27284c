//! Version 2: plugin data lives under the plugin reference, not on the cell.

use crate::engine::{walk_cells_mut, MigrationContext};
use serde_json::{Map, Value};

const DATA_KEYS: [&str; 2] = ["dataI18n", "data"];

pub(crate) fn migrate_data_placement(mut root: Map<String, Value>, _ctx: &MigrationContext<'_>) -> Map<String, Value> {
    if let Some(rows) = root.get_mut("rows") {
        walk_cells_mut(rows, &mut move_data_under_plugin);
    }
    root
}

fn move_data_under_plugin(cell: &mut Map<String, Value>) {
    // Shorthand `"plugin": "<id>"`
    if let Some(Value::String(id)) = cell.get("plugin") {
        if !id.is_empty() {
            let mut plugin = Map::new();
            plugin.insert("id".to_string(), Value::String(id.clone()));
            cell.insert("plugin".to_string(), Value::Object(plugin));
        }
    }
    if !matches!(cell.get("plugin"), Some(Value::Object(_))) {
        return;
    }

    for key in DATA_KEYS {
        let already_placed = cell
            .get("plugin")
            .and_then(Value::as_object)
            .map_or(true, |plugin| plugin.contains_key(key));
        if already_placed {
            continue;
        }
        if let Some(data) = cell.remove(key) {
            if let Some(Value::Object(plugin)) = cell.get_mut("plugin") {
                plugin.insert(key.to_string(), data);
            }
        }
    }
}
