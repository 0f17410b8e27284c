//! Per-language data selection and draft visibility for a single cell.

use folio_model::{Cell, CellData};
use serde_json::{Map, Value};

/// Data handed to the plugin rendering `cell` in `lang`
///
/// A localized payload yields the entry for `lang`, a single payload is
/// returned unchanged for every language. Anything missing or `null`
/// resolves to an empty object.
pub fn resolve_data(cell: &Cell, lang: &str) -> Value {
    let resolved = match cell.plugin.as_ref().map(|plugin| plugin.cell_data()) {
        Some(CellData::Localized(by_lang)) => by_lang.get(lang),
        Some(CellData::Single(data)) => Some(data),
        Some(CellData::Empty) | None => None,
    };

    match resolved {
        Some(Value::Null) | None => Value::Object(Map::new()),
        Some(data) => data.clone(),
    }
}

/// Whether `cell` is published in `lang`
///
/// An explicit per-language flag overrides the global draft flag.
pub fn is_visible(cell: &Cell, lang: &str) -> bool {
    let draft = cell
        .is_draft_i18n
        .get(lang)
        .copied()
        .unwrap_or(cell.is_draft);
    !draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_model::PluginRef;
    use serde_json::json;

    #[test]
    fn test_localized_data_selects_language() {
        let cell = Cell::new("c").with_plugin(
            PluginRef::new("text")
                .with_lang_data("en", json!({"a": 1}))
                .with_lang_data("de", json!({"a": 2})),
        );

        assert_eq!(resolve_data(&cell, "de"), json!({"a": 2}));
        assert_eq!(resolve_data(&cell, "fr"), json!({}));
    }

    #[test]
    fn test_single_payload_ignores_language() {
        let cell = Cell::new("c").with_plugin(PluginRef::new("text").with_data(json!({"a": 1})));

        assert_eq!(resolve_data(&cell, "en"), json!({"a": 1}));
        assert_eq!(resolve_data(&cell, "fr"), json!({"a": 1}));
    }

    #[test]
    fn test_absent_data_is_never_null() {
        assert_eq!(resolve_data(&Cell::new("c"), "en"), json!({}));

        let null = Cell::new("c").with_plugin(PluginRef::new("text").with_data(Value::Null));
        assert_eq!(resolve_data(&null, "en"), json!({}));

        let null_entry =
            Cell::new("c").with_plugin(PluginRef::new("text").with_lang_data("en", Value::Null));
        assert_eq!(resolve_data(&null_entry, "en"), json!({}));
    }

    #[test]
    fn test_visibility_fallback() {
        let draft = Cell::new("c").with_draft(true);
        assert!(!is_visible(&draft, "de"));

        let published_de = draft.clone().with_lang_draft("de", false);
        assert!(is_visible(&published_de, "de"));
        assert!(!is_visible(&published_de, "en"));

        let draft_de = Cell::new("c").with_lang_draft("de", true);
        assert!(!is_visible(&draft_de, "de"));
        assert!(is_visible(&draft_de, "en"));
    }
}
