use serde::{Deserialize, Serialize};

/// Column count of the classic 12-column grid
pub const DEFAULT_COLUMNS: u32 = 12;

/// Grid configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Every normalized row's cell sizes sum to this
    #[serde(default = "default_columns")]
    pub columns: u32,
}

fn default_columns() -> u32 {
    DEFAULT_COLUMNS
}

impl LayoutOptions {
    pub fn with_columns(columns: u32) -> Self {
        Self {
            columns: columns.max(1),
        }
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
        }
    }
}
