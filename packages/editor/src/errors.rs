//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Cell not found: {0}")]
    CellNotFound(String),

    #[error("Cell has no plugin to receive data: {0}")]
    NoPlugin(String),

    #[error("Commit loop has shut down")]
    LoopClosed,
}
