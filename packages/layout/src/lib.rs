//! # Folio Layout
//!
//! Recomputes the derived parts of a row tree: cell widths on the column
//! grid, structural clean-up of redundant rows and the inline-neighbour flags
//! floating cells depend on.

mod normalize;
mod options;
mod sizes;

pub use normalize::{normalize, row_has_inline_children};
pub use options::{LayoutOptions, DEFAULT_COLUMNS};
pub use sizes::distribute;
