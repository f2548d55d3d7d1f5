// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Undo/redo history for annotation edits.
//!
//! Entries are copy-on-write snapshots of one track's list, so keeping them
//! costs a reference count rather than a copy.

use super::store::{AnnotationList, AnnotationStore};
use super::track::TrackId;

/// Maximum number of undo steps kept.
const MAX_HISTORY: usize = 50;

/// State of one track's annotations at a point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub track: TrackId,
    pub annotations: AnnotationList,
}

#[derive(Debug, Default)]
pub struct History {
    /// Undo stack (past states)
    undo_stack: Vec<Snapshot>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<Snapshot>,
    /// Annotation whose label is being typed into, if the last entry was
    /// recorded for it
    text_edit: Option<(TrackId, String)>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a track's state from before a change.
    pub fn record(&mut self, track: &TrackId, annotations: AnnotationList) {
        self.text_edit = None;
        self.push(track, annotations);
    }

    /// Save a track's state from before a label edit. Consecutive edits of
    /// the same label share the entry recorded for the first one.
    pub fn record_text_edit(&mut self, track: &TrackId, id: &str, annotations: AnnotationList) {
        let continues = self
            .text_edit
            .as_ref()
            .is_some_and(|(t, i)| t == track && i == id);
        if continues && !self.undo_stack.is_empty() {
            return;
        }
        self.push(track, annotations);
        self.text_edit = Some((track.clone(), id.to_string()));
    }

    fn push(&mut self, track: &TrackId, annotations: AnnotationList) {
        self.undo_stack.push(Snapshot {
            track: track.clone(),
            annotations,
        });
        if self.undo_stack.len() > MAX_HISTORY {
            self.undo_stack.remove(0);
        }
        // A new edit invalidates anything that was undone
        self.redo_stack.clear();
    }

    /// Pop the previous state, remembering the current one for redo.
    pub fn undo(&mut self, store: &AnnotationStore) -> Option<Snapshot> {
        self.text_edit = None;
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(Snapshot {
            track: previous.track.clone(),
            annotations: store.list(&previous.track),
        });
        Some(previous)
    }

    /// Pop the next state, remembering the current one for undo.
    pub fn redo(&mut self, store: &AnnotationStore) -> Option<Snapshot> {
        self.text_edit = None;
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(Snapshot {
            track: next.track.clone(),
            annotations: store.list(&next.track),
        });
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.text_edit = None;
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
