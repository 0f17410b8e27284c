//! # Folio Editor
//!
//! Host-side helpers for editable renders.
//!
//! ```text
//! plugin onChange ──► ChangeRequest ──► EditBuffer / commit loop (debounce)
//!                                              │
//!                                              ▼
//!                   Document ◄── apply_change ─┘ ──► re-render
//! ```
//!
//! The rendering pipeline never mutates a document; everything here works on
//! snapshots and returns new ones.

pub mod commit_loop;
pub mod debounce;
pub mod errors;
pub mod reducer;
pub mod session;

pub use commit_loop::{spawn_commit_loop, CommitLoop};
pub use debounce::EditBuffer;
pub use errors::EditError;
pub use reducer::apply_change;
pub use session::EditSession;
