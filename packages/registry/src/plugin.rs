//! # Cell Plugin Descriptors
//!
//! A plugin is a capability record supplied by the host. Only `id` is
//! required; every other capability is optional and defaults to identity or
//! no-op behavior when absent.

use folio_model::{ChangeHandle, ChangeRequest, VNode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Renders a cell: `(props, rendered children) -> node`
pub type RendererFn = Arc<dyn Fn(&PluginProps, Vec<VNode>) -> VNode + Send + Sync>;

/// Wraps the rendered cell, e.g. to inject context for the subtree
pub type ProviderFn = Arc<dyn Fn(&PluginProps, VNode) -> VNode + Send + Sync>;

/// Decides which plugins may be nested beneath a cell, given its data
pub type ChildPluginsFn = Arc<dyn Fn(&Value) -> ChildPlugins + Send + Sync>;

/// Derives inline styles for the cell wrapper from the cell's data
pub type CellStyleFn = Arc<dyn Fn(&Value) -> BTreeMap<String, String> + Send + Sync>;

/// Renders custom toolbar controls
pub type ControlsFn = Arc<dyn Fn(&PluginProps) -> VNode + Send + Sync>;

/// Transforms one version of a plugin's data into the next
pub type DataMigrateFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Restriction returned by a plugin's child-plugin rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "ids", rename_all = "camelCase")]
pub enum ChildPlugins {
    All,
    Only(Vec<String>),
    Except(Vec<String>),
}

impl ChildPlugins {
    pub fn allows(&self, plugin_id: &str) -> bool {
        match self {
            ChildPlugins::All => true,
            ChildPlugins::Only(ids) => ids.iter().any(|id| id == plugin_id),
            ChildPlugins::Except(ids) => !ids.iter().any(|id| id == plugin_id),
        }
    }
}

/// Controls shown in the bottom toolbar while a cell is focused
#[derive(Clone)]
pub enum PluginControls {
    /// Form generated by the host from a JSON schema
    Schema(Value),
    /// Plugin-rendered controls
    Custom(ControlsFn),
}

impl fmt::Debug for PluginControls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginControls::Schema(schema) => f.debug_tuple("Schema").field(schema).finish(),
            PluginControls::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Data migration step declared by a plugin
#[derive(Clone)]
pub struct PluginMigration {
    pub from_version: String,
    pub to_version: String,
    pub migrate: DataMigrateFn,
}

impl PluginMigration {
    pub fn new<F>(from_version: impl Into<String>, to_version: impl Into<String>, migrate: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self {
            from_version: from_version.into(),
            to_version: to_version.into(),
            migrate: Arc::new(migrate),
        }
    }
}

impl fmt::Debug for PluginMigration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginMigration")
            .field("from_version", &self.from_version)
            .field("to_version", &self.to_version)
            .finish()
    }
}

/// Styling hints for the bottom toolbar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BottomToolbarHints {
    pub dark: bool,
}

/// Descriptor of a content type
#[derive(Clone)]
pub struct CellPlugin {
    /// Unique key cells refer to
    pub id: String,
    pub title: Option<String>,
    /// Deprecated ids that migration rewrites to `id`
    pub aliases: Vec<String>,
    pub renderer: Option<RendererFn>,
    pub provider: Option<ProviderFn>,
    pub controls: Option<PluginControls>,
    pub child_plugins: Option<ChildPluginsFn>,
    pub cell_style: Option<CellStyleFn>,
    pub migrations: Vec<PluginMigration>,
    /// Keep pointer events on a childless cell while editing
    pub allow_click_inside: bool,
    pub bottom_toolbar: BottomToolbarHints,
}

impl CellPlugin {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            aliases: Vec::new(),
            renderer: None,
            provider: None,
            controls: None,
            child_plugins: None,
            cell_style: None,
            migrations: Vec::new(),
            allow_click_inside: false,
            bottom_toolbar: BottomToolbarHints::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn with_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&PluginProps, Vec<VNode>) -> VNode + Send + Sync + 'static,
    {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    pub fn with_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn(&PluginProps, VNode) -> VNode + Send + Sync + 'static,
    {
        self.provider = Some(Arc::new(provider));
        self
    }

    pub fn with_controls(mut self, controls: PluginControls) -> Self {
        self.controls = Some(controls);
        self
    }

    pub fn with_child_plugins<F>(mut self, rule: F) -> Self
    where
        F: Fn(&Value) -> ChildPlugins + Send + Sync + 'static,
    {
        self.child_plugins = Some(Arc::new(rule));
        self
    }

    pub fn with_cell_style<F>(mut self, style: F) -> Self
    where
        F: Fn(&Value) -> BTreeMap<String, String> + Send + Sync + 'static,
    {
        self.cell_style = Some(Arc::new(style));
        self
    }

    pub fn with_migration(mut self, migration: PluginMigration) -> Self {
        self.migrations.push(migration);
        self
    }

    pub fn allow_click_inside(mut self, allow: bool) -> Self {
        self.allow_click_inside = allow;
        self
    }

    pub fn with_dark_toolbar(mut self, dark: bool) -> Self {
        self.bottom_toolbar.dark = dark;
        self
    }

    /// Style contribution for the cell wrapper (empty without a style function)
    pub fn style_for(&self, data: &Value) -> BTreeMap<String, String> {
        self.cell_style
            .as_ref()
            .map(|style| style(data))
            .unwrap_or_default()
    }

    /// Child restriction for the given data (`All` without a rule)
    pub fn child_restriction(&self, data: &Value) -> ChildPlugins {
        self.child_plugins
            .as_ref()
            .map(|rule| rule(data))
            .unwrap_or(ChildPlugins::All)
    }
}

impl fmt::Debug for CellPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellPlugin")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("aliases", &self.aliases)
            .field("renderer", &self.renderer.is_some())
            .field("provider", &self.provider.is_some())
            .field("controls", &self.controls)
            .field("child_plugins", &self.child_plugins.is_some())
            .field("cell_style", &self.cell_style.is_some())
            .field("migrations", &self.migrations)
            .field("allow_click_inside", &self.allow_click_inside)
            .finish()
    }
}

/// Uniform property bag passed to every plugin capability
#[derive(Debug, Clone)]
pub struct PluginProps {
    pub node_id: String,
    pub lang: String,
    /// Resolved data for `lang`; an empty object when nothing is stored
    pub data: Value,
    /// Resolved descriptor, `None` on the missing-plugin path
    pub plugin_config: Option<Arc<CellPlugin>>,
    pub focused: bool,
    pub read_only: bool,
    pub is_edit_mode: bool,
    pub is_preview_mode: bool,
    pub on_change: ChangeHandle,
    /// Removal request, only offered in editable mode
    pub remove: Option<ChangeRequest>,
}

impl PluginProps {
    /// Read-only props for a cell, as used by static rendering
    pub fn read_only(node_id: impl Into<String>, lang: impl Into<String>, data: Value) -> Self {
        let node_id = node_id.into();
        let lang = lang.into();
        Self {
            on_change: ChangeHandle::disabled(node_id.clone(), lang.clone()),
            node_id,
            lang,
            data,
            plugin_config: None,
            focused: false,
            read_only: true,
            is_edit_mode: false,
            is_preview_mode: false,
            remove: None,
        }
    }

    pub fn plugin_id(&self) -> Option<&str> {
        self.plugin_config.as_deref().map(|plugin| plugin.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_capabilities_default_to_identity() {
        let plugin = CellPlugin::new("text");
        assert!(plugin.style_for(&json!({})).is_empty());
        assert_eq!(plugin.child_restriction(&json!({})), ChildPlugins::All);
    }

    #[test]
    fn test_restriction_depends_on_data() {
        let plugin = CellPlugin::new("form").with_child_plugins(|data| {
            if data["strict"] == json!(true) {
                ChildPlugins::Only(vec!["form-field".to_string()])
            } else {
                ChildPlugins::Except(vec!["form".to_string()])
            }
        });

        let strict = plugin.child_restriction(&json!({"strict": true}));
        assert!(strict.allows("form-field"));
        assert!(!strict.allows("text"));

        let loose = plugin.child_restriction(&json!({}));
        assert!(loose.allows("text"));
        assert!(!loose.allows("form"));
    }

    #[test]
    fn test_child_plugins_serialization() {
        let rule = ChildPlugins::Only(vec!["text".to_string()]);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json, json!({"mode": "only", "ids": ["text"]}));
    }

    #[test]
    fn test_read_only_props() {
        let props = PluginProps::read_only("c1", "en", json!({}));
        assert!(props.read_only);
        assert!(!props.on_change.is_enabled());
        assert!(props.plugin_id().is_none());
    }
}
