//! # Change Requests
//!
//! The pipeline never mutates a document. Editable renders hand out
//! [`ChangeHandle`]s that turn user intent into [`ChangeRequest`]s; the host
//! decides when and how to apply them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A requested edit, addressed by cell id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChangeRequest {
    /// Replace the plugin data of a cell for one language
    UpdateData {
        node_id: String,
        lang: String,
        data: Value,
    },

    /// Remove a cell and everything beneath it
    RemoveCell { node_id: String },

    /// Mark a cell draft or published, globally (`lang: None`) or per language
    SetDraft {
        node_id: String,
        lang: Option<String>,
        draft: bool,
    },
}

impl ChangeRequest {
    pub fn node_id(&self) -> &str {
        match self {
            ChangeRequest::UpdateData { node_id, .. }
            | ChangeRequest::RemoveCell { node_id }
            | ChangeRequest::SetDraft { node_id, .. } => node_id,
        }
    }
}

/// Per-cell `onChange` capability handed to plugin renderers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeHandle {
    node_id: String,
    lang: String,
    enabled: bool,
}

impl ChangeHandle {
    /// Handle that produces change requests (editable mode)
    pub fn new(node_id: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            lang: lang.into(),
            enabled: true,
        }
    }

    /// No-op handle (read-only mode)
    pub fn disabled(node_id: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(node_id, lang)
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Build the update for `data`, or `None` when the handle is disabled
    pub fn update(&self, data: Value) -> Option<ChangeRequest> {
        self.enabled.then(|| ChangeRequest::UpdateData {
            node_id: self.node_id.clone(),
            lang: self.lang.clone(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_disabled_handle_is_noop() {
        let handle = ChangeHandle::disabled("c1", "en");
        assert!(handle.update(json!({"text": "x"})).is_none());
    }

    #[test]
    fn test_enabled_handle_addresses_cell_and_lang() {
        let handle = ChangeHandle::new("c1", "de");
        let change = handle.update(json!({"text": "Hallo"})).unwrap();

        assert_eq!(change.node_id(), "c1");
        assert_eq!(
            change,
            ChangeRequest::UpdateData {
                node_id: "c1".to_string(),
                lang: "de".to_string(),
                data: json!({"text": "Hallo"}),
            }
        );
    }

    #[test]
    fn test_change_request_serialization() {
        let change = ChangeRequest::SetDraft {
            node_id: "c9".to_string(),
            lang: None,
            draft: true,
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["type"], "SetDraft");
        let back: ChangeRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back, change);
    }
}
