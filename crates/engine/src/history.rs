//! Snapshot-based undo/redo around the clip store.
//!
//! Every historied mutation pushes the pre-mutation [`TimelineState`] onto
//! the past stack and invalidates the future stack. Undo and redo swap the
//! live state with the neighbouring snapshot. The playhead is not part of a
//! snapshot, so scrubbing is never undone and undo never moves the playhead
//! except to keep it inside the restored duration.

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::clip::{Clip, ClipId, ClipPatch};
use crate::error::Result;
use crate::store::{ClipStore, TimelineState};

/// One step of history: the state before a labelled mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub label: String,
    pub snapshot: TimelineState,
}

/// Owns the live timeline and its past/future snapshot stacks.
#[derive(Debug, Default)]
pub struct HistoryManager {
    store: ClipStore,
    past: Vec<HistoryEntry>,
    future: VecDeque<HistoryEntry>,
    limit: Option<usize>,
}

impl HistoryManager {
    /// Creates an empty timeline with unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty timeline keeping at most `limit` undo steps.
    /// `None` keeps every step.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Read-only view of the live store.
    pub fn store(&self) -> &ClipStore {
        &self.store
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Label of the mutation the next undo reverts.
    pub fn undo_label(&self) -> Option<&str> {
        self.past.last().map(|entry| entry.label.as_str())
    }

    /// Label of the mutation the next redo reapplies.
    pub fn redo_label(&self) -> Option<&str> {
        self.future.front().map(|entry| entry.label.as_str())
    }

    /// Pushes the current state onto the past stack and clears the future.
    /// Callers mutate the store right after recording.
    pub(crate) fn record(&mut self, label: &str) {
        let snapshot = self.store.snapshot();
        self.push_entry(label, snapshot);
    }

    /// Replaces the whole clip collection as one history entry.
    pub fn set_all(&mut self, clips: Vec<Clip>) -> Result<()> {
        self.batch("Set clips", |store| store.set_all(clips))
    }

    pub fn insert(&mut self, clip: Clip) -> Result<()> {
        self.batch("Add clip", |store| store.insert(clip))
    }

    /// Merges `patch` into a clip. An unknown id is recorded but changes nothing.
    pub fn update(&mut self, id: ClipId, patch: &ClipPatch) -> Result<bool> {
        self.batch("Update clip", |store| store.update(id, patch))
    }

    /// Removes a clip, clearing the selection if it pointed at it.
    pub fn remove(&mut self, id: ClipId) -> Option<Clip> {
        self.record("Delete clip");
        let removed = self.store.remove(id);
        self.store.clamp_current_time();
        removed
    }

    /// Changes the selection without creating a history entry.
    pub fn set_selection(&mut self, id: Option<ClipId>) -> Result<()> {
        self.store.set_selection(id)
    }

    /// Moves the playhead without creating a history entry.
    pub fn set_current_time(&mut self, seconds: f64) -> f64 {
        self.store.set_current_time(seconds)
    }

    /// Runs several store mutations as one atomic history entry.
    ///
    /// The entry is pushed only when `mutate` succeeds; on failure the live
    /// state is rolled back to the pre-mutation snapshot.
    pub(crate) fn batch<T>(
        &mut self,
        label: &str,
        mutate: impl FnOnce(&mut ClipStore) -> Result<T>,
    ) -> Result<T> {
        let snapshot = self.store.snapshot();
        match mutate(&mut self.store) {
            Ok(value) => {
                self.push_entry(label, snapshot);
                self.store.clamp_current_time();
                Ok(value)
            }
            Err(error) => {
                debug!(label, %error, "mutation rejected, state rolled back");
                self.store.restore(snapshot);
                Err(error)
            }
        }
    }

    /// Restores the previous snapshot. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.past.pop() else {
            return false;
        };

        self.future.push_front(HistoryEntry {
            label: entry.label.clone(),
            snapshot: self.store.snapshot(),
        });
        self.store.restore(entry.snapshot);

        info!(
            label = %entry.label,
            undo_depth = self.past.len(),
            redo_depth = self.future.len(),
            "undo applied"
        );
        true
    }

    /// Reapplies the next undone snapshot. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.future.pop_front() else {
            return false;
        };

        self.past.push(HistoryEntry {
            label: entry.label.clone(),
            snapshot: self.store.snapshot(),
        });
        self.store.restore(entry.snapshot);

        info!(
            label = %entry.label,
            undo_depth = self.past.len(),
            redo_depth = self.future.len(),
            "redo applied"
        );
        true
    }

    fn push_entry(&mut self, label: &str, snapshot: TimelineState) {
        self.future.clear();
        self.past.push(HistoryEntry {
            label: label.to_string(),
            snapshot,
        });

        if let Some(limit) = self.limit {
            let overflow = self.past.len().saturating_sub(limit);
            if overflow > 0 {
                self.past.drain(..overflow);
            }
        }

        debug!(label, undo_depth = self.past.len(), "history entry pushed");
    }
}
