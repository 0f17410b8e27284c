//! # Folio Migrate
//!
//! Legacy migration engine: any persisted document value in, canonical
//! [`folio_model::Document`] out.
//!
//! ```rust,ignore
//! use folio_migrate::{migrate, MigrationContext};
//!
//! let ctx = MigrationContext::new(&registry, "en");
//! match migrate(&value, &ctx) {
//!     Some(document) => render(document),
//!     None => {} // nothing to render
//! }
//! ```

mod engine;
mod ids;
mod legacy;
mod placement;
mod plugins;
mod sanitize;

pub use engine::{migrate, remigrate, try_migrate, MigrateError, MigrateResult, MigrationContext};
pub use ids::structural_id;
pub use plugins::INITIAL_PLUGIN_VERSION;
