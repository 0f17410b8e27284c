//! # Folio Renderer
//!
//! Read-only and editable rendering of Folio documents.
//!
//! ```text
//! raw value → migrate → normalize → walk → RenderTree → (optional) HTML
//! ```
//!
//! Every stage is a pure function; rendering the same input twice yields
//! identical trees.

pub mod html;
mod options;
mod pipeline;
mod resolve;
mod walker;

pub use html::{node_to_html, to_html, HtmlOptions};
pub use options::{default_missing_plugin, EditState, MissingPluginFn, RenderMode, RenderOptions};
pub use pipeline::{render_document, render_value};
pub use resolve::{is_visible, resolve_data};
pub use walker::{render, BottomToolbar, EditSurface, RenderTree, ToolbarControls};
