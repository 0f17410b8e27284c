//! Pure application of change requests to documents.

use crate::errors::EditError;
use folio_layout::{normalize, LayoutOptions};
use folio_model::{Cell, ChangeRequest, Document, Row};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Apply `request` to a copy of `document`
///
/// Removing a cell re-normalizes the layout so the remaining siblings fill
/// the row again.
#[instrument(skip_all, fields(node_id = request.node_id()))]
pub fn apply_change(
    document: &Document,
    request: &ChangeRequest,
    layout: &LayoutOptions,
) -> Result<Document, EditError> {
    let mut next = document.clone();

    match request {
        ChangeRequest::UpdateData {
            node_id,
            lang,
            data,
        } => {
            let cell = find_cell_mut(&mut next.rows, node_id)
                .ok_or_else(|| EditError::CellNotFound(node_id.clone()))?;
            let plugin = cell
                .plugin
                .as_mut()
                .ok_or_else(|| EditError::NoPlugin(node_id.clone()))?;

            // Single-payload plugins keep their layout
            match (&mut plugin.data_i18n, &mut plugin.data) {
                (None, Some(single)) => *single = data.clone(),
                (by_lang, _) => {
                    by_lang
                        .get_or_insert_with(BTreeMap::new)
                        .insert(lang.clone(), data.clone());
                }
            }
        }

        ChangeRequest::RemoveCell { node_id } => {
            if !remove_cell(&mut next.rows, node_id) {
                return Err(EditError::CellNotFound(node_id.clone()));
            }
            next.rows = normalize(&next.rows, layout);
        }

        ChangeRequest::SetDraft {
            node_id,
            lang,
            draft,
        } => {
            let cell = find_cell_mut(&mut next.rows, node_id)
                .ok_or_else(|| EditError::CellNotFound(node_id.clone()))?;
            match lang {
                Some(lang) => {
                    cell.is_draft_i18n.insert(lang.clone(), *draft);
                }
                None => cell.is_draft = *draft,
            }
        }
    }

    debug!("Applied change");
    Ok(next)
}

fn find_cell_mut<'a>(rows: &'a mut [Row], node_id: &str) -> Option<&'a mut Cell> {
    for row in rows {
        for cell in &mut row.cells {
            if cell.id == node_id {
                return Some(cell);
            }
            if let Some(found) = find_cell_mut(&mut cell.rows, node_id) {
                return Some(found);
            }
        }
    }
    None
}

fn remove_cell(rows: &mut [Row], node_id: &str) -> bool {
    for row in rows {
        if let Some(index) = row.cells.iter().position(|cell| cell.id == node_id) {
            row.cells.remove(index);
            return true;
        }
        if row.cells.iter_mut().any(|cell| remove_cell(&mut cell.rows, node_id)) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_model::PluginRef;
    use serde_json::json;

    fn document() -> Document {
        Document::new(vec![Row::new(
            "r",
            vec![
                Cell::new("a")
                    .with_size(6)
                    .with_plugin(PluginRef::new("text").with_lang_data("en", json!({ "t": "hi" }))),
                Cell::new("b")
                    .with_size(6)
                    .with_plugin(PluginRef::new("image").with_data(json!({ "src": "x.png" })))
                    .with_rows(vec![Row::new("n", vec![Cell::new("nested").with_size(12)])]),
            ],
        )])
    }

    #[test]
    fn test_update_localized_data() {
        let doc = document();
        let request = ChangeRequest::UpdateData {
            node_id: "a".to_string(),
            lang: "de".to_string(),
            data: json!({ "t": "hallo" }),
        };

        let next = apply_change(&doc, &request, &LayoutOptions::default()).unwrap();
        let by_lang = next.find_cell("a").unwrap().plugin.as_ref().unwrap().data_i18n.clone().unwrap();
        assert_eq!(by_lang["en"], json!({ "t": "hi" }));
        assert_eq!(by_lang["de"], json!({ "t": "hallo" }));

        // Input untouched
        assert!(doc.find_cell("a").unwrap().plugin.as_ref().unwrap().data_i18n.as_ref().unwrap().get("de").is_none());
    }

    #[test]
    fn test_update_single_payload() {
        let request = ChangeRequest::UpdateData {
            node_id: "b".to_string(),
            lang: "de".to_string(),
            data: json!({ "src": "y.png" }),
        };

        let next = apply_change(&document(), &request, &LayoutOptions::default()).unwrap();
        let plugin = next.find_cell("b").unwrap().plugin.clone().unwrap();
        assert_eq!(plugin.data, Some(json!({ "src": "y.png" })));
        assert!(plugin.data_i18n.is_none());
    }

    #[test]
    fn test_update_requires_plugin() {
        let request = ChangeRequest::UpdateData {
            node_id: "nested".to_string(),
            lang: "en".to_string(),
            data: json!({}),
        };
        assert_eq!(
            apply_change(&document(), &request, &LayoutOptions::default()),
            Err(EditError::NoPlugin("nested".to_string()))
        );
    }

    #[test]
    fn test_remove_renormalizes() {
        let request = ChangeRequest::RemoveCell {
            node_id: "a".to_string(),
        };

        let next = apply_change(&document(), &request, &LayoutOptions::default()).unwrap();
        let row = &next.rows[0];
        assert_eq!(row.cells.len(), 1);
        assert_eq!(row.cells[0].id, "b");
        assert_eq!(row.cells[0].size, Some(12));
    }

    #[test]
    fn test_remove_last_nested_cell_drops_row() {
        let request = ChangeRequest::RemoveCell {
            node_id: "nested".to_string(),
        };

        let next = apply_change(&document(), &request, &LayoutOptions::default()).unwrap();
        assert!(next.find_cell("b").unwrap().rows.is_empty());
    }

    #[test]
    fn test_set_draft_global_and_per_language() {
        let layout = LayoutOptions::default();
        let global = ChangeRequest::SetDraft {
            node_id: "nested".to_string(),
            lang: None,
            draft: true,
        };
        let per_lang = ChangeRequest::SetDraft {
            node_id: "nested".to_string(),
            lang: Some("de".to_string()),
            draft: false,
        };

        let next = apply_change(&document(), &global, &layout).unwrap();
        let next = apply_change(&next, &per_lang, &layout).unwrap();
        let cell = next.find_cell("nested").unwrap();
        assert!(cell.is_draft);
        assert_eq!(cell.is_draft_i18n.get("de"), Some(&false));
    }

    #[test]
    fn test_unknown_cell() {
        let request = ChangeRequest::RemoveCell {
            node_id: "ghost".to_string(),
        };
        assert_eq!(
            apply_change(&document(), &request, &LayoutOptions::default()),
            Err(EditError::CellNotFound("ghost".to_string()))
        );
    }
}
