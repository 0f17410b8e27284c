//! # Folio Model
//!
//! Value types shared by every stage of the page pipeline: the canonical
//! document, the virtual render node and the change requests editable renders
//! emit.

pub mod change;
pub mod document;
pub mod visitor;
pub mod vnode;

pub use change::{ChangeHandle, ChangeRequest};
pub use document::{Cell, CellData, Document, Inline, PluginRef, Row, CURRENT_VERSION};
pub use visitor::{walk_cell, walk_document, walk_row, DocumentStats, Visitor};
pub use vnode::VNode;
