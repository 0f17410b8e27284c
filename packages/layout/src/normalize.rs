//! # Layout Normalization
//!
//! Recomputes derived layout for a row tree, depth-first: a cell's nested rows
//! are normalized before its own row is sized and flagged.
//!
//! After normalization:
//! - every cell has `size: Some(_)`, and each row's sizes sum to the column count
//! - rows without cells are gone
//! - a row holding only a plain container cell is replaced by that cell's rows
//! - `has_inline_neighbour` is set exactly on the second cell of an inline pair

use crate::options::LayoutOptions;
use crate::sizes::distribute;
use folio_model::{Cell, Row};
use tracing::{debug, instrument, trace};

/// Normalize a row tree; the input is never modified
#[instrument(skip_all, fields(rows = rows.len(), columns = options.columns))]
pub fn normalize(rows: &[Row], options: &LayoutOptions) -> Vec<Row> {
    normalize_rows(rows, options)
}

fn normalize_rows(rows: &[Row], options: &LayoutOptions) -> Vec<Row> {
    let mut normalized = Vec::with_capacity(rows.len());

    for row in rows {
        let cells: Vec<Cell> = row
            .cells
            .iter()
            .map(|cell| normalize_cell(cell, options))
            .collect();

        if cells.is_empty() {
            trace!(row_id = %row.id, "Dropping empty row");
            continue;
        }

        if row.extra.is_empty() && cells.len() == 1 && is_plain_container(&cells[0]) {
            debug!(row_id = %row.id, cell_id = %cells[0].id, "Collapsing single-container row");
            let Some(container) = cells.into_iter().next() else {
                continue;
            };
            normalized.extend(container.rows);
            continue;
        }

        normalized.push(Row {
            id: row.id.clone(),
            cells: compute_row(cells, options),
            extra: row.extra.clone(),
        });
    }

    normalized
}

fn normalize_cell(cell: &Cell, options: &LayoutOptions) -> Cell {
    Cell {
        rows: normalize_rows(&cell.rows, options),
        ..cell.clone()
    }
}

/// A cell that contributes nothing but its nested rows
fn is_plain_container(cell: &Cell) -> bool {
    cell.plugin.is_none()
        && !cell.rows.is_empty()
        && !cell.is_draft
        && cell.is_draft_i18n.is_empty()
        && cell.inline.is_none()
        && cell.extra.is_empty()
}

fn compute_row(cells: Vec<Cell>, options: &LayoutOptions) -> Vec<Cell> {
    let sizes = distribute(
        &cells.iter().map(|cell| cell.size).collect::<Vec<_>>(),
        options.columns,
    );
    let inline_partner = inline_partner(&cells);

    cells
        .into_iter()
        .zip(sizes)
        .enumerate()
        .map(|(index, (cell, size))| Cell {
            size: Some(size),
            has_inline_neighbour: if index == 1 { inline_partner.clone() } else { None },
            ..cell
        })
        .collect()
}

/// Id of the floating cell when `cells` is an inline pair
fn inline_partner(cells: &[Cell]) -> Option<String> {
    match cells {
        [first, _] if first.inline.is_some() => Some(first.id.clone()),
        _ => None,
    }
}

/// Whether a row is the distinguished floating layout case
pub fn row_has_inline_children(row: &Row) -> bool {
    inline_partner(&row.cells).is_some()
}
