//! Registry-aware pass: deprecated plugin ids and plugin-owned data migrations.
//!
//! Runs on every migration because its outcome depends on the registry, not
//! on the document version.

use crate::engine::{walk_cells_mut, MigrationContext};
use folio_registry::CellPlugin;
use serde_json::{Map, Value};
use tracing::debug;

/// Version assumed for plugin data persisted without one
pub const INITIAL_PLUGIN_VERSION: &str = "0";

pub(crate) fn migrate_plugins(rows: &mut Value, ctx: &MigrationContext<'_>) {
    walk_cells_mut(rows, &mut |cell: &mut Map<String, Value>| {
        if let Some(Value::Object(plugin)) = cell.get_mut("plugin") {
            migrate_plugin_ref(plugin, ctx);
        }
    });
}

fn migrate_plugin_ref(plugin: &mut Map<String, Value>, ctx: &MigrationContext<'_>) {
    localize_data(plugin, ctx);

    let Some(id) = plugin.get("id").and_then(Value::as_str).map(str::to_string) else {
        return;
    };

    let Some(descriptor) = ctx.registry.resolve_alias(&id) else {
        return;
    };

    if descriptor.id != id {
        debug!(from = %id, to = %descriptor.id, "Rewriting deprecated plugin id");
        plugin.insert("id".to_string(), Value::String(descriptor.id.clone()));
    }

    migrate_plugin_data(plugin, descriptor);
}

/// Move a `data` object keyed only by language codes into `dataI18n`
fn localize_data(plugin: &mut Map<String, Value>, ctx: &MigrationContext<'_>) {
    if plugin.contains_key("dataI18n") {
        return;
    }
    let keyed_by_lang = match plugin.get("data") {
        Some(Value::Object(data)) => !data.is_empty() && data.keys().all(|key| ctx.is_language(key)),
        _ => false,
    };
    if !keyed_by_lang {
        return;
    }

    if let Some(data) = plugin.remove("data") {
        debug!("Moving language-keyed plugin data into dataI18n");
        plugin.insert("dataI18n".to_string(), data);
    }
}

fn migrate_plugin_data(plugin: &mut Map<String, Value>, descriptor: &CellPlugin) {
    if descriptor.migrations.is_empty() {
        return;
    }

    let mut version = plugin
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or(INITIAL_PLUGIN_VERSION)
        .to_string();
    let mut applied = false;

    // Bounded so that cyclic declarations terminate
    for _ in 0..descriptor.migrations.len() {
        let Some(step) = descriptor
            .migrations
            .iter()
            .find(|step| step.from_version == version)
        else {
            break;
        };

        if let Some(Value::Object(by_lang)) = plugin.get_mut("dataI18n") {
            for data in by_lang.values_mut() {
                *data = (step.migrate)(data.take());
            }
        }
        if let Some(data) = plugin.get_mut("data") {
            *data = (step.migrate)(data.take());
        }

        debug!(
            plugin_id = %descriptor.id,
            from = %step.from_version,
            to = %step.to_version,
            "Migrated plugin data"
        );
        version = step.to_version.clone();
        applied = true;
    }

    if applied {
        plugin.insert("version".to_string(), Value::String(version));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_registry::{PluginMigration, PluginRegistry};
    use serde_json::json;

    fn registry() -> PluginRegistry {
        PluginRegistry::new(vec![CellPlugin::new("text")
            .with_alias("ory/editor/core/content/slate")
            .with_migration(PluginMigration::new("0", "1", |data| {
                json!({ "html": data.get("text").cloned().unwrap_or(json!("")) })
            }))
            .with_migration(PluginMigration::new("1", "2", |mut data| {
                data["format"] = json!("html");
                data
            }))])
    }

    fn run(rows: Value) -> Value {
        let registry = registry();
        let ctx = MigrationContext::new(&registry, "en");
        let mut rows = rows;
        migrate_plugins(&mut rows, &ctx);
        rows
    }

    #[test]
    fn test_alias_is_rewritten_and_chain_applied() {
        let rows = run(json!([{ "cells": [{ "plugin": {
            "id": "ory/editor/core/content/slate",
            "dataI18n": { "en": { "text": "Hi" }, "de": { "text": "Hallo" } }
        } }] }]));

        assert_eq!(
            rows[0]["cells"][0]["plugin"],
            json!({
                "id": "text",
                "version": "2",
                "dataI18n": {
                    "en": { "html": "Hi", "format": "html" },
                    "de": { "html": "Hallo", "format": "html" }
                }
            })
        );
    }

    #[test]
    fn test_chain_starts_at_stored_version() {
        let rows = run(json!([{ "cells": [{ "plugin": {
            "id": "text", "version": "1", "data": { "html": "x" }
        } }] }]));

        assert_eq!(
            rows[0]["cells"][0]["plugin"]["data"],
            json!({ "html": "x", "format": "html" })
        );
        assert_eq!(rows[0]["cells"][0]["plugin"]["version"], json!("2"));
    }

    #[test]
    fn test_up_to_date_plugin_is_untouched() {
        let input = json!([{ "cells": [{ "plugin": {
            "id": "text", "version": "2", "data": { "html": "x" }
        } }] }]);
        assert_eq!(run(input.clone()), input);
    }

    #[test]
    fn test_data_keyed_by_language_is_localized() {
        let registry = registry();
        let languages = vec!["en".to_string(), "de".to_string(), "fr".to_string()];
        let ctx = MigrationContext::new(&registry, "fr").with_languages(&languages);
        let mut rows = json!([{ "cells": [
            { "plugin": { "id": "image", "data": { "en": { "a": 1 }, "de": { "a": 2 } } } },
            { "plugin": { "id": "image", "data": { "en": { "a": 1 }, "src": "x.png" } } },
            { "plugin": { "id": "image", "data": {} } }
        ] }]);

        migrate_plugins(&mut rows, &ctx);
        let cells = &rows[0]["cells"];
        assert_eq!(
            cells[0]["plugin"],
            json!({ "id": "image", "dataI18n": { "en": { "a": 1 }, "de": { "a": 2 } } })
        );
        assert_eq!(cells[1]["plugin"]["data"], json!({ "en": { "a": 1 }, "src": "x.png" }));
        assert_eq!(cells[2]["plugin"]["data"], json!({}));
    }

    #[test]
    fn test_localized_data_is_migrated_per_language() {
        let rows = run(json!([{ "cells": [{ "plugin": {
            "id": "text",
            "version": "1",
            "data": { "en": { "html": "Hi" } }
        } }] }]));

        assert_eq!(
            rows[0]["cells"][0]["plugin"]["dataI18n"],
            json!({ "en": { "html": "Hi", "format": "html" } })
        );
    }

    #[test]
    fn test_cyclic_migrations_terminate() {
        let registry = PluginRegistry::new(vec![CellPlugin::new("loop")
            .with_migration(PluginMigration::new("a", "b", |v| v))
            .with_migration(PluginMigration::new("b", "a", |v| v))]);
        let ctx = MigrationContext::new(&registry, "en");
        let mut rows = json!([{ "cells": [{ "plugin": { "id": "loop", "version": "a" } }] }]);

        migrate_plugins(&mut rows, &ctx);
        assert_eq!(rows[0]["cells"][0]["plugin"]["version"], json!("a"));
    }
}
