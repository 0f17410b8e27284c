//! # Tree Walker
//!
//! Walks canonical rows and cells in order and dispatches every plugin-owned
//! cell to its plugin's capabilities.
//!
//! ## Registry scope
//!
//! The registry is passed down explicitly. A plugin-owned cell renders its
//! nested rows against the registry scoped by that plugin's child rule; a plain
//! container passes the registry it received through unchanged.
//!
//! ## Containment
//!
//! A cell that cannot be dispatched (unknown plugin id) is rendered through the
//! missing-plugin fallback. Siblings and ancestors are unaffected.
//!
//! ## Determinism
//!
//! Output depends only on the rows, the options, the language and the mode.
//! Attributes and styles are ordered maps, so serializing the same input twice
//! is byte-identical.

use crate::options::{EditState, RenderMode, RenderOptions};
use crate::resolve::{is_visible, resolve_data};
use folio_layout::row_has_inline_children;
use folio_model::{Cell, ChangeHandle, ChangeRequest, PluginRef, Row, VNode};
use folio_registry::{scope_children, CellPlugin, PluginControls, PluginProps, PluginRegistry};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// Output of a render pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderTree {
    /// One node per rendered row, in document order
    pub nodes: Vec<VNode>,
    /// Edit affordances, one per plugin-owned cell (editable mode only)
    pub surfaces: Vec<EditSurface>,
}

impl RenderTree {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn surface(&self, node_id: &str) -> Option<&EditSurface> {
        self.surfaces.iter().find(|surface| surface.node_id == node_id)
    }

    /// First rendered node carrying `key` (a row or cell id)
    pub fn find(&self, key: &str) -> Option<&VNode> {
        self.nodes.iter().find_map(|node| node.find_by_key(key))
    }
}

/// Edit property bag of a plugin-owned cell
#[derive(Debug, Clone, PartialEq)]
pub struct EditSurface {
    pub node_id: String,
    /// Declared plugin id; may be unresolved
    pub plugin_id: String,
    pub focused: bool,
    pub on_change: ChangeHandle,
    pub remove: ChangeRequest,
    pub toolbar: BottomToolbar,
    /// `false` when clicks pass through to an ancestor
    pub pointer_events: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BottomToolbar {
    pub open: bool,
    pub dark: bool,
    /// Filled while the toolbar is open and the plugin declares controls
    pub controls: Option<ToolbarControls>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarControls {
    /// Host renders a form for this schema
    Schema(Value),
    Rendered(VNode),
}

/// Render normalized `rows` in `lang`
#[instrument(skip_all, fields(rows = rows.len(), lang = lang, editable = mode.edit_state().is_some()))]
pub fn render(rows: &[Row], options: &RenderOptions, lang: &str, mode: &RenderMode) -> RenderTree {
    let mut walker = Walker {
        options,
        lang,
        edit: mode.edit_state(),
        surfaces: Vec::new(),
    };
    let nodes = walker.render_rows(rows, &options.registry);
    debug!(nodes = nodes.len(), surfaces = walker.surfaces.len(), "Rendered tree");

    RenderTree {
        nodes,
        surfaces: walker.surfaces,
    }
}

struct Walker<'a> {
    options: &'a RenderOptions,
    lang: &'a str,
    edit: Option<&'a EditState>,
    surfaces: Vec<EditSurface>,
}

impl<'a> Walker<'a> {
    fn render_rows(&mut self, rows: &[Row], registry: &PluginRegistry) -> Vec<VNode> {
        rows.iter().map(|row| self.render_row(row, registry)).collect()
    }

    fn render_row(&mut self, row: &Row, registry: &PluginRegistry) -> VNode {
        let class = if row_has_inline_children(row) {
            "folio-row folio-row-has-floating-children"
        } else {
            "folio-row"
        };

        let last = row.cells.len().saturating_sub(1);
        let cells = row
            .cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| self.render_cell(cell, registry, index == last))
            .collect();

        VNode::div(class).with_key(&row.id).with_children(cells)
    }

    fn render_cell(&mut self, cell: &Cell, registry: &PluginRegistry, last_in_row: bool) -> Option<VNode> {
        if !is_visible(cell, self.lang) {
            trace!(cell_id = %cell.id, lang = self.lang, "Skipping draft cell");
            return None;
        }

        let mut wrapper = VNode::div(self.cell_classes(cell)).with_key(&cell.id);
        if self.edit.is_some() {
            wrapper = wrapper.with_attr("data-node-id", &cell.id);
            if self.options.allow_move_in_edit_mode {
                wrapper = wrapper.with_attr("draggable", "true");
            }
            if self.options.allow_resize_in_edit_mode && !last_in_row {
                wrapper = wrapper.with_attr("data-resizable", "true");
            }
        }

        let rendered = match &cell.plugin {
            Some(plugin_ref) => self.render_plugin_cell(cell, plugin_ref, registry, wrapper),
            None if cell.has_children() => {
                let children = self.render_rows(&cell.rows, registry);
                wrapper.with_child(VNode::div("folio-cell-inner").with_children(children))
            }
            None => wrapper.with_child(VNode::div("folio-cell-inner folio-cell-inner-leaf")),
        };
        Some(rendered)
    }

    fn render_plugin_cell(
        &mut self,
        cell: &Cell,
        plugin_ref: &PluginRef,
        registry: &PluginRegistry,
        wrapper: VNode,
    ) -> VNode {
        let data = resolve_data(cell, self.lang);
        let inner_class = if cell.has_children() {
            "folio-cell-inner"
        } else {
            "folio-cell-inner folio-cell-inner-leaf"
        };

        let Some(plugin) = registry.resolve(&plugin_ref.id) else {
            debug!(cell_id = %cell.id, plugin_id = %plugin_ref.id, "Plugin not available in scope");
            let props = self.props(cell, data, None);
            let pointer_events = self.push_surface(cell, &plugin_ref.id, None, &props);
            let children = self.render_rows(&cell.rows, registry);
            let fallback = self.options.render_missing(&props, &plugin_ref.id, children);
            let wrapper = if pointer_events {
                wrapper
            } else {
                wrapper.with_style("pointer-events", "none")
            };
            return wrapper.with_child(VNode::div(inner_class).with_child(fallback));
        };

        let style = plugin.style_for(&data);
        let scoped = scope_children(registry, &plugin.id, &data);
        let props = self.props(cell, data, Some(plugin.clone()));
        let pointer_events = self.push_surface(cell, &plugin.id, Some(plugin), &props);

        let children = self.render_rows(&cell.rows, &scoped);
        let mut node = match &plugin.renderer {
            Some(renderer) => renderer(&props, children),
            None => VNode::fragment(children),
        };
        if let Some(provider) = &plugin.provider {
            node = provider(&props, node);
        }

        let mut wrapper = wrapper.with_styles(style);
        if !pointer_events {
            wrapper = wrapper.with_style("pointer-events", "none");
        }
        wrapper.with_child(VNode::div(inner_class).with_child(node))
    }

    fn cell_classes(&self, cell: &Cell) -> String {
        let size = cell.size.unwrap_or(self.options.layout.columns);
        let mut classes = vec![
            "folio-cell".to_string(),
            format!("folio-cell-sm-{}", size),
            "folio-cell-xs-12".to_string(),
        ];
        if cell.has_inline_neighbour.is_some() {
            classes.push("folio-cell-has-inline-neighbour".to_string());
        }
        if let Some(inline) = cell.inline {
            classes.push(format!("folio-cell-inline-{}", inline.as_str()));
        }
        classes.join(" ")
    }

    fn props(&self, cell: &Cell, data: Value, plugin_config: Option<Arc<CellPlugin>>) -> PluginProps {
        let Some(edit) = self.edit else {
            return PluginProps {
                plugin_config,
                ..PluginProps::read_only(&cell.id, self.lang, data)
            };
        };

        let is_edit_mode = !edit.preview;
        PluginProps {
            node_id: cell.id.clone(),
            lang: self.lang.to_string(),
            data,
            plugin_config,
            focused: is_edit_mode && edit.is_focused(&cell.id),
            read_only: !is_edit_mode,
            is_edit_mode,
            is_preview_mode: edit.preview,
            on_change: if is_edit_mode {
                ChangeHandle::new(&cell.id, self.lang)
            } else {
                ChangeHandle::disabled(&cell.id, self.lang)
            },
            remove: Some(ChangeRequest::RemoveCell {
                node_id: cell.id.clone(),
            }),
        }
    }

    /// Records the edit surface in document order and returns whether the
    /// cell keeps pointer events
    fn push_surface(
        &mut self,
        cell: &Cell,
        plugin_id: &str,
        plugin: Option<&Arc<CellPlugin>>,
        props: &PluginProps,
    ) -> bool {
        let Some(edit) = self.edit else {
            return true;
        };

        let allow_click_inside = plugin.map_or(false, |plugin| plugin.allow_click_inside);
        let pointer_events = edit.preview || cell.has_children() || allow_click_inside;

        let controls = match plugin.and_then(|plugin| plugin.controls.as_ref()) {
            Some(_) if !props.focused => None,
            Some(PluginControls::Schema(schema)) => Some(ToolbarControls::Schema(schema.clone())),
            Some(PluginControls::Custom(render)) => Some(ToolbarControls::Rendered(render(props))),
            None => None,
        };

        self.surfaces.push(EditSurface {
            node_id: cell.id.clone(),
            plugin_id: plugin_id.to_string(),
            focused: props.focused,
            on_change: props.on_change.clone(),
            remove: ChangeRequest::RemoveCell {
                node_id: cell.id.clone(),
            },
            toolbar: BottomToolbar {
                open: props.focused,
                dark: plugin.map_or(false, |plugin| plugin.bottom_toolbar.dark),
                controls,
            },
            pointer_events,
        });
        pointer_events
    }
}
