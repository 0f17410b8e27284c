//! Plugins bundled with the command line tool.
//!
//! Hosts embedding the pipeline supply their own; these cover the content
//! types found in typical legacy pages so that `render` produces useful output.

use folio_model::VNode;
use folio_registry::{CellPlugin, ChildPlugins, PluginControls, PluginMigration, PluginRegistry};
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub fn builtin_registry() -> PluginRegistry {
    PluginRegistry::new(vec![text(), image(), spacer(), background(), video()])
}

fn str_field<'a>(data: &'a Value, key: &str) -> &'a str {
    data.get(key).and_then(Value::as_str).unwrap_or("")
}

fn text() -> CellPlugin {
    CellPlugin::new("text")
        .with_title("Text")
        .with_alias("ory/editor/core/content/slate")
        // Version 0 stored plain strings under `value`
        .with_migration(PluginMigration::new("0", "1", |data| {
            if let Some(Value::String(text)) = data.get("value") {
                return json!({ "text": text });
            }
            data
        }))
        .with_renderer(|props, _| {
            VNode::element("p").with_child(VNode::text(str_field(&props.data, "text")))
        })
        .with_controls(PluginControls::Schema(json!({
            "type": "object",
            "properties": { "text": { "type": "string" } }
        })))
}

fn image() -> CellPlugin {
    CellPlugin::new("image")
        .with_title("Image")
        .with_alias("ory/editor/core/content/image")
        .with_renderer(|props, _| {
            VNode::element("img")
                .with_attr("src", str_field(&props.data, "src"))
                .with_attr("alt", str_field(&props.data, "alt"))
        })
        .with_controls(PluginControls::Schema(json!({
            "type": "object",
            "required": ["src"],
            "properties": { "src": { "type": "string" }, "alt": { "type": "string" } }
        })))
}

fn spacer() -> CellPlugin {
    CellPlugin::new("spacer")
        .with_title("Spacer")
        .with_alias("ory/editor/core/content/spacer")
        .with_renderer(|_, _| VNode::div("folio-spacer"))
        .with_cell_style(|data| {
            let height = data.get("height").and_then(Value::as_u64).unwrap_or(24);
            BTreeMap::from([("height".to_string(), format!("{}px", height))])
        })
}

fn background() -> CellPlugin {
    CellPlugin::new("background")
        .with_title("Background")
        .with_alias("ory/editor/core/layout/background")
        .with_dark_toolbar(true)
        .with_renderer(|_, children| VNode::element("section").with_children(children))
        .with_cell_style(|data| {
            data.get("color")
                .and_then(Value::as_str)
                .map(|color| BTreeMap::from([("background".to_string(), color.to_string())]))
                .unwrap_or_default()
        })
        // Backgrounds do not nest; `textOnly` narrows content further
        .with_child_plugins(|data| {
            if data.get("textOnly") == Some(&Value::Bool(true)) {
                ChildPlugins::Only(vec!["text".to_string(), "spacer".to_string()])
            } else {
                ChildPlugins::Except(vec!["background".to_string()])
            }
        })
}

fn video() -> CellPlugin {
    CellPlugin::new("video")
        .with_title("Video")
        .with_alias("ory/editor/core/content/video")
        .allow_click_inside(true)
        .with_renderer(|props, _| {
            VNode::element("iframe")
                .with_attr("src", str_field(&props.data, "src"))
                .with_attr("allowfullscreen", "true")
        })
}
