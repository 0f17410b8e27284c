use crate::document::{Cell, Document, PluginRef, Row};

/// Visitor for walking a document immutably
///
/// Default implementations walk the whole tree depth-first in document order.
/// Override specific `visit_*` methods to collect what you need.
pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &Document) {
        walk_document(self, doc);
    }

    fn visit_row(&mut self, row: &Row, depth: usize) {
        walk_row(self, row, depth);
    }

    fn visit_cell(&mut self, cell: &Cell, depth: usize) {
        walk_cell(self, cell, depth);
    }

    fn visit_plugin(&mut self, _plugin: &PluginRef, _cell: &Cell) {
        // Leaf, nothing to walk
    }
}

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &Document) {
    for row in &doc.rows {
        visitor.visit_row(row, 0);
    }
}

pub fn walk_row<V: Visitor>(visitor: &mut V, row: &Row, depth: usize) {
    for cell in &row.cells {
        visitor.visit_cell(cell, depth);
    }
}

pub fn walk_cell<V: Visitor>(visitor: &mut V, cell: &Cell, depth: usize) {
    if let Some(plugin) = &cell.plugin {
        visitor.visit_plugin(plugin, cell);
    }
    for row in &cell.rows {
        visitor.visit_row(row, depth + 1);
    }
}

/// Summary counts for a document, used by diagnostics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DocumentStats {
    pub rows: usize,
    pub cells: usize,
    pub plugin_cells: usize,
    pub max_depth: usize,
    pub plugin_ids: Vec<String>,
}

impl DocumentStats {
    pub fn collect(doc: &Document) -> Self {
        let mut stats = Self::default();
        stats.visit_document(doc);
        stats
    }
}

impl Visitor for DocumentStats {
    fn visit_row(&mut self, row: &Row, depth: usize) {
        self.rows += 1;
        self.max_depth = self.max_depth.max(depth);
        walk_row(self, row, depth);
    }

    fn visit_cell(&mut self, cell: &Cell, depth: usize) {
        self.cells += 1;
        walk_cell(self, cell, depth);
    }

    fn visit_plugin(&mut self, plugin: &PluginRef, _cell: &Cell) {
        self.plugin_cells += 1;
        if !self.plugin_ids.contains(&plugin.id) {
            self.plugin_ids.push(plugin.id.clone());
        }
    }
}
