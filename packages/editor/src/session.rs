//! # Edit Session Management
//!
//! An EditSession is one editor's view of a document: the current canonical
//! snapshot, focus and preview state, and the buffer of data edits that have
//! not been committed yet.
//!
//! Every committed change replaces the document with a new snapshot and bumps
//! `version`, so hosts can cheaply detect when to re-render.

use crate::debounce::EditBuffer;
use crate::errors::EditError;
use crate::reducer::apply_change;
use folio_layout::LayoutOptions;
use folio_model::{ChangeRequest, Document};
use folio_renderer::{render_document, EditState, RenderMode, RenderOptions, RenderTree};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub struct EditSession {
    /// Current committed snapshot
    pub document: Document,

    /// Incremented on every applied change
    pub version: u64,

    focused: Option<String>,
    preview: bool,
    buffer: EditBuffer,
    layout: LayoutOptions,
}

impl EditSession {
    pub fn new(document: Document, window: Duration, layout: LayoutOptions) -> Self {
        Self {
            document,
            version: 0,
            focused: None,
            preview: false,
            buffer: EditBuffer::new(window),
            layout,
        }
    }

    pub fn focus(&mut self, node_id: Option<String>) {
        self.focused = node_id;
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn set_preview(&mut self, preview: bool) {
        self.preview = preview;
    }

    /// Edits waiting for their window to elapse
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.buffer.next_deadline()
    }

    pub fn mode(&self) -> RenderMode {
        RenderMode::Editable(EditState {
            focused: self.focused.clone(),
            preview: self.preview,
        })
    }

    /// Hand a request to the session
    ///
    /// Data edits are buffered and `Ok(false)` is returned; structural
    /// requests are applied right away.
    pub fn submit(&mut self, request: ChangeRequest, now: Instant) -> Result<bool, EditError> {
        match self.buffer.push(request, now) {
            Some(immediate) => {
                self.apply(&immediate)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Apply every edit whose window has elapsed; returns how many were applied
    ///
    /// A commit that no longer applies (its cell was removed meanwhile) is
    /// dropped without affecting the others.
    pub fn tick(&mut self, now: Instant) -> usize {
        let due = self.buffer.poll(now);
        self.apply_all(due)
    }

    /// Apply all pending edits regardless of their deadline
    pub fn flush(&mut self) -> usize {
        let pending = self.buffer.flush();
        self.apply_all(pending)
    }

    /// Render the current snapshot with the session's focus and preview state
    pub fn render(&self, options: &RenderOptions, lang: &str) -> RenderTree {
        render_document(&self.document, options, lang, &self.mode())
    }

    fn apply_all(&mut self, requests: Vec<ChangeRequest>) -> usize {
        let mut applied = 0;
        for request in requests {
            match self.apply(&request) {
                Ok(()) => applied += 1,
                Err(error) => warn!(%error, "Dropping stale edit"),
            }
        }
        applied
    }

    fn apply(&mut self, request: &ChangeRequest) -> Result<(), EditError> {
        self.document = apply_change(&self.document, request, &self.layout)?;
        self.version += 1;

        if let ChangeRequest::RemoveCell { node_id } = request {
            if self.focused.as_deref() == Some(node_id.as_str()) {
                self.focused = None;
            }
        }
        debug!(version = self.version, node_id = request.node_id(), "Committed change");
        Ok(())
    }
}
