use folio_layout::LayoutOptions;
use folio_model::VNode;
use folio_registry::{PluginProps, PluginRegistry};
use std::fmt;
use std::sync::Arc;

/// Renders a cell whose plugin id does not resolve:
/// `(props, unresolved id, rendered children) -> node`
pub type MissingPluginFn = Arc<dyn Fn(&PluginProps, &str, Vec<VNode>) -> VNode + Send + Sync>;

/// Per-instance render configuration, read-only during traversal
#[derive(Clone)]
pub struct RenderOptions {
    pub registry: PluginRegistry,
    /// Supported languages, the first one being the default
    pub languages: Vec<String>,
    pub layout: LayoutOptions,
    pub allow_move_in_edit_mode: bool,
    pub allow_resize_in_edit_mode: bool,
    /// Host override for the missing-plugin placeholder
    pub missing_plugin: Option<MissingPluginFn>,
}

impl RenderOptions {
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            registry,
            languages: vec!["en".to_string()],
            layout: LayoutOptions::default(),
            allow_move_in_edit_mode: true,
            allow_resize_in_edit_mode: true,
            missing_plugin: None,
        }
    }

    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_missing_plugin<F>(mut self, fallback: F) -> Self
    where
        F: Fn(&PluginProps, &str, Vec<VNode>) -> VNode + Send + Sync + 'static,
    {
        self.missing_plugin = Some(Arc::new(fallback));
        self
    }

    pub fn default_lang(&self) -> &str {
        self.languages.first().map(String::as_str).unwrap_or("en")
    }

    pub fn supports_lang(&self, lang: &str) -> bool {
        self.languages.iter().any(|supported| supported == lang)
    }

    pub(crate) fn render_missing(&self, props: &PluginProps, plugin_id: &str, children: Vec<VNode>) -> VNode {
        match &self.missing_plugin {
            Some(fallback) => fallback(props, plugin_id, children),
            None => default_missing_plugin(plugin_id, children),
        }
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("registry", &self.registry)
            .field("languages", &self.languages)
            .field("layout", &self.layout)
            .field("allow_move_in_edit_mode", &self.allow_move_in_edit_mode)
            .field("allow_resize_in_edit_mode", &self.allow_resize_in_edit_mode)
            .field("missing_plugin", &self.missing_plugin.is_some())
            .finish()
    }
}

/// Diagnostic marker carrying the unresolved id
pub fn default_missing_plugin(plugin_id: &str, children: Vec<VNode>) -> VNode {
    VNode::div("folio-missing-plugin")
        .with_attr("data-plugin-id", plugin_id)
        .with_child(VNode::text(format!("Missing plugin: {}", plugin_id)))
        .with_children(children)
}

/// How a tree is rendered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Static output without edit affordances
    #[default]
    ReadOnly,
    Editable(EditState),
}

impl RenderMode {
    pub fn editable() -> Self {
        RenderMode::Editable(EditState::default())
    }

    pub fn edit_state(&self) -> Option<&EditState> {
        match self {
            RenderMode::ReadOnly => None,
            RenderMode::Editable(state) => Some(state),
        }
    }
}

/// Editor state that affects rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditState {
    /// Cell currently holding focus
    pub focused: Option<String>,
    /// Editor shows a preview; plugins render as if read-only
    pub preview: bool,
}

impl EditState {
    pub fn focused(node_id: impl Into<String>) -> Self {
        Self {
            focused: Some(node_id.into()),
            preview: false,
        }
    }

    pub fn is_focused(&self, node_id: &str) -> bool {
        self.focused.as_deref() == Some(node_id)
    }
}
