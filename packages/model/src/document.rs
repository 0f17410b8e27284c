//! # Canonical Document Shape
//!
//! The one in-memory structure every stage after migration agrees on.
//!
//! ```text
//! Document
//!  └─ rows: Row[]
//!      └─ cells: Cell[]
//!          ├─ plugin: PluginRef?      (content type + data)
//!          └─ rows: Row[]             (nested layout)
//! ```
//!
//! Every struct keeps keys it does not know about in `extra` and writes them
//! back out on serialization, so documents written by newer versions survive a
//! round trip through this one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Version marker written by the current migration engine
pub const CURRENT_VERSION: u32 = 2;

/// Root of a page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub version: u32,

    pub rows: Vec<Row>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Ordered horizontal group of cells
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: String,

    #[serde(default)]
    pub cells: Vec<Cell>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Float direction of an inline cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inline {
    Left,
    Right,
}

impl Inline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Inline::Left => "left",
            Inline::Right => "right",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Inline::Left),
            "right" => Some(Inline::Right),
            _ => None,
        }
    }
}

/// Grid-positioned unit: a leaf, a layout container, or plugin-bound
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub id: String,

    /// Grid width. Always `Some` after layout normalization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<PluginRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<Row>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<Inline>,

    /// Id of the inline sibling this cell flows around (derived)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_inline_neighbour: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_draft: bool,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub is_draft_i18n: BTreeMap<String, bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Reference from a cell to the plugin that owns it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginRef {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Single payload of a non-localized plugin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Payload per language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_i18n: Option<BTreeMap<String, Value>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Borrowed view over the two data layouts a plugin reference can carry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellData<'a> {
    Localized(&'a BTreeMap<String, Value>),
    Single(&'a Value),
    Empty,
}

impl PluginRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_lang_data(mut self, lang: impl Into<String>, data: Value) -> Self {
        self.data_i18n
            .get_or_insert_with(BTreeMap::new)
            .insert(lang.into(), data);
        self
    }

    /// The mapping wins when both layouts are present
    pub fn cell_data(&self) -> CellData<'_> {
        match (&self.data_i18n, &self.data) {
            (Some(map), _) => CellData::Localized(map),
            (None, Some(value)) => CellData::Single(value),
            (None, None) => CellData::Empty,
        }
    }
}

impl Row {
    pub fn new(id: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            id: id.into(),
            cells,
            extra: Map::new(),
        }
    }
}

impl Cell {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_plugin(mut self, plugin: PluginRef) -> Self {
        self.plugin = Some(plugin);
        self
    }

    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_inline(mut self, inline: Inline) -> Self {
        self.inline = Some(inline);
        self
    }

    pub fn with_draft(mut self, draft: bool) -> Self {
        self.is_draft = draft;
        self
    }

    pub fn with_lang_draft(mut self, lang: impl Into<String>, draft: bool) -> Self {
        self.is_draft_i18n.insert(lang.into(), draft);
        self
    }

    pub fn has_children(&self) -> bool {
        !self.rows.is_empty()
    }

    /// No plugin and no nested rows
    pub fn is_empty_leaf(&self) -> bool {
        self.plugin.is_none() && self.rows.is_empty()
    }
}

impl Document {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            id: None,
            version: CURRENT_VERSION,
            rows,
            extra: Map::new(),
        }
    }

    /// Depth-first search for a cell by id
    pub fn find_cell(&self, id: &str) -> Option<&Cell> {
        find_in_rows(&self.rows, id)
    }
}

fn find_in_rows<'a>(rows: &'a [Row], id: &str) -> Option<&'a Cell> {
    for row in rows {
        for cell in &row.cells {
            if cell.id == id {
                return Some(cell);
            }
            if let Some(found) = find_in_rows(&cell.rows, id) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = json!({
            "version": 2,
            "rows": [{
                "id": "r1",
                "customRowFlag": true,
                "cells": [{
                    "id": "c1",
                    "size": 12,
                    "theme": "dark",
                    "plugin": { "id": "text", "dataI18n": { "en": {} }, "meta": 1 }
                }]
            }],
            "createdBy": "importer"
        });

        let doc: Document = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(doc.extra["createdBy"], json!("importer"));
        assert_eq!(doc.rows[0].extra["customRowFlag"], json!(true));
        assert_eq!(doc.rows[0].cells[0].extra["theme"], json!("dark"));

        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_cell_data_prefers_mapping() {
        let plugin = PluginRef::new("text")
            .with_data(json!({"a": 0}))
            .with_lang_data("en", json!({"a": 1}));

        match plugin.cell_data() {
            CellData::Localized(map) => assert_eq!(map["en"], json!({"a": 1})),
            other => panic!("expected localized data, got {:?}", other),
        }
        assert_eq!(PluginRef::new("x").cell_data(), CellData::Empty);
    }

    #[test]
    fn test_find_nested_cell() {
        let doc = Document::new(vec![Row::new(
            "r1",
            vec![Cell::new("outer").with_rows(vec![Row::new("r2", vec![Cell::new("inner")])])],
        )]);

        assert_eq!(doc.find_cell("inner").map(|c| c.id.as_str()), Some("inner"));
        assert!(doc.find_cell("missing").is_none());
    }
}
