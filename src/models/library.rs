// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The audio library: the opened folder and its file list.

use super::store::{AnnotationList, AnnotationStore};
use super::track::{AudioFile, TrackId};
use std::cmp::Ordering;

/// A folder opened in the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSelection {
    pub name: String,
    /// Folder path with forward slashes.
    pub path: String,
}

/// Folder selection plus the audio files listed for it.
#[derive(Debug, Clone, Default)]
pub struct Library {
    pub folder: Option<FolderSelection>,
    pub files: Vec<AudioFile>,
}

/// A track that has annotations, ready for display.
#[derive(Debug, Clone)]
pub struct AnnotatedTrack {
    pub track: TrackId,
    pub name: String,
    pub annotations: AnnotationList,
}

impl Library {
    pub fn new(folder: Option<FolderSelection>, files: Vec<AudioFile>) -> Self {
        Self { folder, files }
    }

    /// Name shown for a track: its file list entry, else its last path segment.
    pub fn display_name(&self, track: &TrackId) -> String {
        self.files
            .iter()
            .find(|f| &f.track_id() == track)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| track.file_name().to_string())
    }

    pub fn position(&self, track: &TrackId) -> Option<usize> {
        self.files.iter().position(|f| &f.track_id() == track)
    }

    /// The file after `track` in list order.
    pub fn next_after(&self, track: &TrackId) -> Option<TrackId> {
        let idx = self.position(track)?;
        self.files.get(idx + 1).map(AudioFile::track_id)
    }

    /// The file before `track` in list order.
    pub fn prev_before(&self, track: &TrackId) -> Option<TrackId> {
        let idx = self.position(track)?;
        idx.checked_sub(1)
            .and_then(|i| self.files.get(i))
            .map(AudioFile::track_id)
    }

    /// Whether a file with this identifier is already listed.
    pub fn contains(&self, track: &TrackId) -> bool {
        self.position(track).is_some()
    }

    /// Point the entry for `old` at a renamed file.
    pub fn rename_entry(&mut self, old: &TrackId, new_name: &str, new_path: &str) {
        if let Some(file) = self.files.iter_mut().find(|f| &f.track_id() == old) {
            file.name = new_name.to_string();
            file.path = new_path.to_string();
        }
    }

    /// Tracks with at least one annotation, sorted by display name.
    pub fn annotated_tracks(&self, store: &AnnotationStore) -> Vec<AnnotatedTrack> {
        let mut tracks: Vec<AnnotatedTrack> = store
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(track, list)| AnnotatedTrack {
                track: track.clone(),
                name: self.display_name(track),
                annotations: list.clone(),
            })
            .collect();
        tracks.sort_by(|a, b| compare_names(&a.name, &b.name));
        tracks
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
