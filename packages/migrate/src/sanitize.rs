//! Scalar coercion for known row/cell fields.
//!
//! Runs on every migration regardless of version. It only touches keys the
//! canonical shape defines; everything else passes through.

use crate::ids::structural_id;
use crate::legacy::version_string;
use folio_model::Inline;
use serde_json::{Map, Value};
use tracing::debug;

pub(crate) fn sanitize_rows(rows: Vec<Value>, path: &str) -> Vec<Value> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| sanitize_row(row, &join(path, 'r', index)))
        .collect()
}

fn sanitize_row(row: Value, path: &str) -> Option<Value> {
    let Value::Object(mut row) = row else {
        debug!(path, "Dropping row that is not an object");
        return None;
    };

    ensure_id(&mut row, path);

    let cells = match row.remove("cells") {
        Some(Value::Array(cells)) => cells
            .into_iter()
            .enumerate()
            .filter_map(|(index, cell)| sanitize_cell(cell, &join(path, 'c', index)))
            .collect(),
        _ => Vec::new(),
    };
    row.insert("cells".to_string(), Value::Array(cells));

    Some(Value::Object(row))
}

fn sanitize_cell(cell: Value, path: &str) -> Option<Value> {
    let Value::Object(mut cell) = cell else {
        debug!(path, "Dropping cell that is not an object");
        return None;
    };

    ensure_id(&mut cell, path);

    if let Some(raw) = cell.remove("size") {
        match coerce_size(&raw) {
            Some(size) => {
                cell.insert("size".to_string(), Value::from(size));
            }
            None => debug!(path, size = %raw, "Discarding malformed cell size"),
        }
    }

    if let Some(raw) = cell.remove("inline") {
        if let Some(inline) = raw.as_str().and_then(Inline::parse) {
            cell.insert("inline".to_string(), Value::String(inline.as_str().to_string()));
        }
    }

    if let Some(raw) = cell.remove("hasInlineNeighbour") {
        if raw.is_string() {
            cell.insert("hasInlineNeighbour".to_string(), raw);
        }
    }

    if let Some(raw) = cell.remove("isDraft") {
        if let Some(draft) = coerce_bool(&raw) {
            cell.insert("isDraft".to_string(), Value::Bool(draft));
        }
    }

    if let Some(Value::Object(by_lang)) = cell.remove("isDraftI18n") {
        let by_lang: Map<String, Value> = by_lang
            .into_iter()
            .filter_map(|(lang, raw)| coerce_bool(&raw).map(|draft| (lang, Value::Bool(draft))))
            .collect();
        cell.insert("isDraftI18n".to_string(), Value::Object(by_lang));
    }

    if let Some(raw) = cell.remove("plugin") {
        match sanitize_plugin(raw) {
            Some(plugin) => {
                cell.insert("plugin".to_string(), plugin);
            }
            None => debug!(path, "Dropping plugin reference without an id"),
        }
    }

    if let Some(Value::Array(rows)) = cell.remove("rows") {
        cell.insert("rows".to_string(), Value::Array(sanitize_rows(rows, path)));
    }

    Some(Value::Object(cell))
}

fn sanitize_plugin(raw: Value) -> Option<Value> {
    let mut plugin = match raw {
        Value::String(id) if !id.is_empty() => {
            let mut plugin = Map::new();
            plugin.insert("id".to_string(), Value::String(id));
            return Some(Value::Object(plugin));
        }
        Value::Object(plugin) => plugin,
        _ => return None,
    };

    let id = plugin
        .get("id")
        .or_else(|| plugin.get("name"))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())?
        .to_string();
    plugin.insert("id".to_string(), Value::String(id));

    if let Some(raw) = plugin.remove("version") {
        if let Some(version) = version_string(&raw) {
            plugin.insert("version".to_string(), Value::String(version));
        }
    }

    if let Some(raw) = plugin.remove("dataI18n") {
        if raw.is_object() {
            plugin.insert("dataI18n".to_string(), raw);
        }
    }

    Some(Value::Object(plugin))
}

fn ensure_id(node: &mut Map<String, Value>, path: &str) {
    let id = match node.get("id") {
        Some(Value::String(id)) if !id.is_empty() => return,
        Some(Value::Number(number)) => number.to_string(),
        _ => structural_id(path),
    };
    node.insert("id".to_string(), Value::String(id));
}

/// Positive grid width, or `None` for anything unusable
pub(crate) fn coerce_size(raw: &Value) -> Option<u32> {
    let size = match raw {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !size.is_finite() || size < 0.5 {
        return None;
    }
    Some(size.round().min(u32::MAX as f64) as u32)
}

fn coerce_bool(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) if text == "true" => Some(true),
        Value::String(text) if text == "false" => Some(false),
        _ => None,
    }
}

fn join(path: &str, kind: char, index: usize) -> String {
    if path.is_empty() {
        format!("{}{}", kind, index)
    } else {
        format!("{}/{}{}", path, kind, index)
    }
}
