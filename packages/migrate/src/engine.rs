//! # Migration Engine
//!
//! Upgrades any previously persisted document value into the canonical
//! [`Document`].
//!
//! ```text
//! raw value
//!   → root normalization      (row arrays, non-objects rejected)
//!   → versioned transforms    (only those newer than the stored version)
//!   → scalar coercion         (always)
//!   → registry pass           (always: plugin aliases, plugin data migrations)
//!   → canonical Document
//! ```
//!
//! Every transform is total and idempotent, so migrating a migrated document
//! is a no-op. The engine never panics on unexpected shapes: unusable input is
//! reported as a [`MigrateError`] by [`try_migrate`] and as `None` by
//! [`migrate`].

use crate::legacy::migrate_legacy_shape;
use crate::placement::migrate_data_placement;
use crate::plugins::migrate_plugins;
use crate::sanitize::sanitize_rows;
use folio_model::{Document, CURRENT_VERSION};
use folio_registry::PluginRegistry;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, instrument};

pub type MigrateResult<T> = Result<T, MigrateError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrateError {
    #[error("Document root must be an object or a row array, found {0}")]
    UnsupportedRoot(&'static str),

    #[error("Document has no rows after migration")]
    MissingRows,

    #[error("Document does not match the canonical shape: {0}")]
    Shape(String),
}

/// Read-only inputs a migration may consult
#[derive(Debug, Clone, Copy)]
pub struct MigrationContext<'a> {
    pub registry: &'a PluginRegistry,
    /// Language that legacy single-language data is filed under
    pub lang: &'a str,
    /// Configured languages; a `plugin.data` object keyed only by these (or
    /// `lang`) is per-language data
    pub languages: &'a [String],
}

impl<'a> MigrationContext<'a> {
    pub fn new(registry: &'a PluginRegistry, lang: &'a str) -> Self {
        Self {
            registry,
            lang,
            languages: &[],
        }
    }

    pub fn with_languages(mut self, languages: &'a [String]) -> Self {
        self.languages = languages;
        self
    }

    pub fn is_language(&self, key: &str) -> bool {
        key == self.lang || self.languages.iter().any(|lang| lang == key)
    }
}

type TransformFn = fn(Map<String, Value>, &MigrationContext<'_>) -> Map<String, Value>;

struct Transform {
    version: u32,
    name: &'static str,
    apply: TransformFn,
}

/// Ordered document transforms, one per schema version
const TRANSFORMS: &[Transform] = &[
    Transform {
        version: 1,
        name: "legacy-shape",
        apply: migrate_legacy_shape,
    },
    Transform {
        version: 2,
        name: "data-placement",
        apply: migrate_data_placement,
    },
];

/// Migrate `value`, reporting why it could not be migrated
#[instrument(skip_all, fields(lang = ctx.lang))]
pub fn try_migrate(value: &Value, ctx: &MigrationContext<'_>) -> MigrateResult<Document> {
    let mut root = match value {
        Value::Object(root) => root.clone(),
        Value::Array(rows) => {
            let mut root = Map::new();
            root.insert("rows".to_string(), Value::Array(rows.clone()));
            root
        }
        other => return Err(MigrateError::UnsupportedRoot(kind_of(other))),
    };

    let stored_version = root
        .get("version")
        .and_then(Value::as_u64)
        .map(|version| version.min(u32::MAX as u64) as u32)
        .unwrap_or(0);

    for transform in TRANSFORMS.iter().filter(|t| t.version > stored_version) {
        debug!(transform = transform.name, to = transform.version, "Applying document transform");
        root = (transform.apply)(root, ctx);
    }

    let rows = match root.remove("rows") {
        Some(Value::Array(rows)) => rows,
        _ => return Err(MigrateError::MissingRows),
    };
    let mut rows = Value::Array(sanitize_rows(rows, ""));
    migrate_plugins(&mut rows, ctx);
    root.insert("rows".to_string(), rows);

    match root.remove("id") {
        Some(Value::String(id)) => {
            root.insert("id".to_string(), Value::String(id));
        }
        Some(Value::Number(id)) => {
            root.insert("id".to_string(), Value::String(id.to_string()));
        }
        _ => {}
    }
    root.insert(
        "version".to_string(),
        Value::from(stored_version.max(CURRENT_VERSION)),
    );

    serde_json::from_value(Value::Object(root)).map_err(|e| MigrateError::Shape(e.to_string()))
}

/// Migrate `value`; `None` means there is nothing to render
pub fn migrate(value: &Value, ctx: &MigrationContext<'_>) -> Option<Document> {
    match try_migrate(value, ctx) {
        Ok(document) => Some(document),
        Err(error) => {
            debug!(%error, "Document could not be migrated");
            None
        }
    }
}

/// Run a canonical document through the engine again, e.g. after the
/// registry gained plugin migrations
pub fn remigrate(document: &Document, ctx: &MigrationContext<'_>) -> MigrateResult<Document> {
    let value = serde_json::to_value(document).map_err(|e| MigrateError::Shape(e.to_string()))?;
    try_migrate(&value, ctx)
}

/// Visit every cell object beneath `rows`, parents before children
pub(crate) fn walk_cells_mut<F>(rows: &mut Value, visit: &mut F)
where
    F: FnMut(&mut Map<String, Value>),
{
    let Value::Array(rows) = rows else {
        return;
    };
    for row in rows {
        let Some(Value::Array(cells)) = row.get_mut("cells") else {
            continue;
        };
        for cell in cells {
            let Value::Object(cell) = cell else {
                continue;
            };
            visit(&mut *cell);
            if let Some(nested) = cell.get_mut("rows") {
                walk_cells_mut(nested, visit);
            }
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
