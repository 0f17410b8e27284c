//! # Edit Debouncing
//!
//! Coalesces rapid data edits so that each cell commits at most once per
//! quiescence window, always with its latest value.
//!
//! ## Design
//!
//! - One pending slot per `(cell, language)`; a new edit overwrites the slot
//!   and pushes its deadline back by a full window
//! - `poll` commits every slot whose deadline has passed, oldest deadline first
//!   (push order on ties)
//! - Structural requests (`RemoveCell`, `SetDraft`) are never delayed; removing
//!   a cell drops its pending edits
//!
//! The buffer is clock-agnostic: callers pass `now`.

use folio_model::ChangeRequest;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::trace;

type SlotKey = (String, String);

#[derive(Debug, Clone)]
struct PendingEdit {
    request: ChangeRequest,
    deadline: Instant,
    /// Push order, breaks deadline ties
    seq: u64,
}

/// Pending-value slots with a deadline each
#[derive(Debug, Clone)]
pub struct EditBuffer {
    window: Duration,
    pending: BTreeMap<SlotKey, PendingEdit>,
    next_seq: u64,
}

impl EditBuffer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: BTreeMap::new(),
            next_seq: 0,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Buffer `request`, or hand it back when it must not be delayed
    pub fn push(&mut self, request: ChangeRequest, now: Instant) -> Option<ChangeRequest> {
        match &request {
            ChangeRequest::UpdateData { node_id, lang, .. } => {
                let key = (node_id.clone(), lang.clone());
                let seq = self.next_seq;
                self.next_seq += 1;
                let replaced = self
                    .pending
                    .insert(
                        key,
                        PendingEdit {
                            request,
                            deadline: now + self.window,
                            seq,
                        },
                    )
                    .is_some();
                trace!(replaced, "Buffered data edit");
                None
            }
            ChangeRequest::RemoveCell { node_id } => {
                self.cancel(node_id);
                Some(request)
            }
            ChangeRequest::SetDraft { .. } => Some(request),
        }
    }

    /// Commit every edit whose window has elapsed
    pub fn poll(&mut self, now: Instant) -> Vec<ChangeRequest> {
        let mut due: Vec<(SlotKey, Instant, u64)> = self
            .pending
            .iter()
            .filter(|(_, edit)| edit.deadline <= now)
            .map(|(key, edit)| (key.clone(), edit.deadline, edit.seq))
            .collect();
        due.sort_by_key(|(_, deadline, seq)| (*deadline, *seq));

        due.into_iter()
            .filter_map(|(key, _, _)| self.pending.remove(&key))
            .map(|edit| edit.request)
            .collect()
    }

    /// Drop pending edits of a cell; returns whether anything was dropped
    pub fn cancel(&mut self, node_id: &str) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(pending_id, _), _| pending_id != node_id);
        before != self.pending.len()
    }

    /// Commit everything immediately, oldest deadline first
    pub fn flush(&mut self) -> Vec<ChangeRequest> {
        let mut edits: Vec<PendingEdit> = std::mem::take(&mut self.pending).into_values().collect();
        edits.sort_by_key(|edit| (edit.deadline, edit.seq));
        edits.into_iter().map(|edit| edit.request).collect()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|edit| edit.deadline).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
