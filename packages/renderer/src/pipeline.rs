use crate::options::{RenderMode, RenderOptions};
use crate::walker::{render, RenderTree};
use folio_layout::normalize;
use folio_migrate::{migrate, MigrationContext};
use folio_model::Document;
use serde_json::Value;
use tracing::{debug, instrument};

/// Migrate, normalize and render a persisted document value
///
/// A value that cannot be migrated renders as an empty tree.
#[instrument(skip_all, fields(lang = lang))]
pub fn render_value(value: &Value, options: &RenderOptions, lang: &str, mode: &RenderMode) -> RenderTree {
    let ctx = MigrationContext::new(&options.registry, lang).with_languages(&options.languages);
    match migrate(value, &ctx) {
        Some(document) => render_document(&document, options, lang, mode),
        None => {
            debug!("Nothing to render");
            RenderTree::default()
        }
    }
}

/// Normalize and render an already canonical document
pub fn render_document(document: &Document, options: &RenderOptions, lang: &str, mode: &RenderMode) -> RenderTree {
    let rows = normalize(&document.rows, &options.layout);
    render(&rows, options, lang, mode)
}
