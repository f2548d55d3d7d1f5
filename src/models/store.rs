// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! In-memory annotation store.
//!
//! Maps a track identifier to its annotations in insertion order. Every
//! mutation builds a new list and swaps it in, so a list handed out earlier
//! is never modified behind its holder's back.

use super::annotation::Annotation;
use super::track::TrackId;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Shared, immutable annotation list for one track.
pub type AnnotationList = Rc<[Annotation]>;

#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    tracks: BTreeMap<TrackId, AnnotationList>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotations of a track (empty when the track has none).
    pub fn list(&self, track: &TrackId) -> AnnotationList {
        self.tracks
            .get(track)
            .cloned()
            .unwrap_or_else(|| Rc::from(Vec::new()))
    }

    /// Append an annotation to a track.
    pub fn insert(&mut self, track: &TrackId, annotation: Annotation) {
        let mut next = self.list(track).to_vec();
        next.push(annotation);
        self.tracks.insert(track.clone(), next.into());
    }

    /// Move/resize an annotation. Returns `false` when nothing changed.
    pub fn update_range(&mut self, track: &TrackId, id: &str, start: f64, end: f64) -> bool {
        self.rewrite(track, id, |a| {
            if a.start == start && a.end == end {
                return false;
            }
            a.start = start;
            a.end = end;
            true
        })
    }

    /// Replace an annotation's label. Returns `false` when nothing changed.
    pub fn update_text(&mut self, track: &TrackId, id: &str, text: &str) -> bool {
        self.rewrite(track, id, |a| {
            if a.text == text {
                return false;
            }
            a.text = text.to_string();
            true
        })
    }

    /// Delete an annotation. Returns `false` when the id was not found.
    pub fn remove(&mut self, track: &TrackId, id: &str) -> bool {
        let current = self.list(track);
        if !current.iter().any(|a| a.id == id) {
            return false;
        }
        let next: Vec<Annotation> = current.iter().filter(|a| a.id != id).cloned().collect();
        self.tracks.insert(track.clone(), next.into());
        true
    }

    /// Swap in a whole list for a track (used by undo/redo).
    pub fn replace(&mut self, track: &TrackId, annotations: AnnotationList) {
        self.tracks.insert(track.clone(), annotations);
    }

    /// Move a track's annotations to a new key in one step.
    ///
    /// If the new key already holds annotations, the moved ones are appended
    /// after them. Returns `false` when the old key had nothing to move.
    pub fn rename_track(&mut self, old: &TrackId, new: &TrackId) -> bool {
        if old == new {
            return false;
        }
        let Some(moved) = self.tracks.remove(old) else {
            return false;
        };
        let merged: AnnotationList = match self.tracks.get(new) {
            Some(existing) => existing.iter().chain(moved.iter()).cloned().collect::<Vec<_>>().into(),
            None => moved,
        };
        self.tracks.insert(new.clone(), merged);
        true
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Replace the whole store content.
    pub fn replace_all(&mut self, tracks: BTreeMap<TrackId, Vec<Annotation>>) {
        self.tracks = tracks.into_iter().map(|(k, v)| (k, v.into())).collect();
    }

    /// Plain copy of the store content for persistence.
    pub fn to_map(&self) -> BTreeMap<TrackId, Vec<Annotation>> {
        self.tracks.iter().map(|(k, v)| (k.clone(), v.to_vec())).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TrackId, &AnnotationList)> {
        self.tracks.iter()
    }

    /// Total number of annotations across all tracks.
    pub fn total(&self) -> usize {
        self.tracks.values().map(|list| list.len()).sum()
    }

    fn rewrite<F>(&mut self, track: &TrackId, id: &str, mut edit: F) -> bool
    where
        F: FnMut(&mut Annotation) -> bool,
    {
        let current = self.list(track);
        let Some(idx) = current.iter().position(|a| a.id == id) else {
            return false;
        };
        let mut next = current.to_vec();
        if !edit(&mut next[idx]) {
            return false;
        }
        self.tracks.insert(track.clone(), next.into());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann(id: &str, start: f64, end: f64) -> Annotation {
        Annotation { id: id.into(), start, end, text: String::new() }
    }

    #[test]
    fn test_insert_keeps_insertion_order() {
        let track = TrackId::from_path("/a.wav");
        let mut store = AnnotationStore::new();
        store.insert(&track, ann("2", 5.0, 6.0));
        store.insert(&track, ann("1", 1.0, 2.0));

        let list = store.list(&track);
        assert_eq!(list[0].id, "2");
        assert_eq!(list[1].id, "1");
    }

    #[test]
    fn test_handed_out_list_is_not_mutated() {
        let track = TrackId::from_path("/a.wav");
        let mut store = AnnotationStore::new();
        store.insert(&track, ann("1", 1.0, 2.0));

        let before = store.list(&track);
        assert!(store.update_text(&track, "1", "intro"));
        assert!(store.update_range(&track, "1", 1.5, 2.5));

        assert_eq!(before[0].text, "");
        assert_eq!(before[0].start, 1.0);
        let after = store.list(&track);
        assert_eq!(after[0].text, "intro");
        assert_eq!(after[0].start, 1.5);
    }

    #[test]
    fn test_range_update_preserves_label() {
        let track = TrackId::from_path("/a.wav");
        let mut store = AnnotationStore::new();
        store.insert(&track, ann("1", 1.0, 2.0));
        store.update_text(&track, "1", "keep me");

        store.update_range(&track, "1", 3.0, 4.0);
        assert_eq!(store.list(&track)[0].text, "keep me");
    }

    #[test]
    fn test_unchanged_range_is_reported() {
        let track = TrackId::from_path("/a.wav");
        let mut store = AnnotationStore::new();
        store.insert(&track, ann("1", 1.0, 2.0));

        assert!(!store.update_range(&track, "1", 1.0, 2.0));
        assert!(!store.update_range(&track, "missing", 1.0, 2.0));
    }

    #[test]
    fn test_remove() {
        let track = TrackId::from_path("/a.wav");
        let mut store = AnnotationStore::new();
        store.insert(&track, ann("1", 1.0, 2.0));
        store.insert(&track, ann("2", 3.0, 4.0));

        assert!(store.remove(&track, "1"));
        assert!(!store.remove(&track, "1"));
        assert_eq!(store.list(&track).len(), 1);
        assert_eq!(store.total(), 1);
    }

    #[test]
    fn test_rename_track_moves_everything() {
        let old = TrackId::from_path("/music/A.wav");
        let new = TrackId::from_path("/music/B.wav");
        let mut store = AnnotationStore::new();
        store.insert(&old, ann("1", 1.0, 2.0));
        store.insert(&old, ann("2", 3.0, 4.0));

        assert!(store.rename_track(&old, &new));
        assert!(store.list(&old).is_empty());
        assert_eq!(store.list(&new).len(), 2);
        assert_eq!(store.iter().count(), 1);
    }

    #[test]
    fn test_rename_track_merges_into_existing_key() {
        let old = TrackId::from_path("/A.wav");
        let new = TrackId::from_path("/B.wav");
        let mut store = AnnotationStore::new();
        store.insert(&new, ann("b", 0.0, 1.0));
        store.insert(&old, ann("a", 2.0, 3.0));

        store.rename_track(&old, &new);
        let ids: Vec<_> = store.list(&new).iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
