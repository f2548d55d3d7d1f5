// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project lifecycle: library selection, annotation edits, save/load, and
//! debounced auto-save.
//!
//! A project is either untitled or bound to a file. Once bound, every change
//! to annotations, the current track, or the folder restarts a two second
//! auto-save timer. The host drives time by calling [`ProjectController::tick`]
//! once per frame.

use super::debounce::Debouncer;
use crate::error::RenameError;
use crate::io::export::{self, DEFAULT_EXPORT_NAME};
use crate::io::gateway::{FileGateway, RenameOutcome};
use crate::io::scan::{base_name, normalize_path};
use crate::io::serialization;
use crate::io::settings::{self, Settings, LAST_PROJECT_PATH};
use crate::models::annotation::Annotation;
use crate::models::history::History;
use crate::models::library::{FolderSelection, Library};
use crate::models::project::{LoadedProject, ProjectDocument};
use crate::models::store::{AnnotationList, AnnotationStore};
use crate::models::track::TrackId;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Quiet period before an auto-save.
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(2000);

/// Frames during which changes do not schedule an auto-save after a load:
/// the rest of the loading frame plus one more.
const LOAD_SUPPRESS_FRAMES: u8 = 2;

pub struct ProjectController<G: FileGateway> {
    gateway: G,
    store: AnnotationStore,
    library: Library,
    current_track: Option<TrackId>,
    /// Backing file; `None` while untitled
    project_path: Option<PathBuf>,
    history: History,
    autosave: Debouncer,
    /// Something auto-saveable changed since the last tick
    dirty: bool,
    suppress_frames: u8,
    recursive_scan: bool,
}

impl<G: FileGateway> ProjectController<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            store: AnnotationStore::new(),
            library: Library::default(),
            current_track: None,
            project_path: None,
            history: History::new(),
            autosave: Debouncer::new(AUTOSAVE_DELAY),
            dirty: false,
            suppress_frames: 0,
            recursive_scan: false,
        }
    }

    #[cfg(test)]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    #[cfg(test)]
    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn current_track(&self) -> Option<&TrackId> {
        self.current_track.as_ref()
    }

    /// Annotations of the current track.
    pub fn current_annotations(&self) -> AnnotationList {
        match &self.current_track {
            Some(track) => self.store.list(track),
            None => AnnotationList::from(Vec::new()),
        }
    }

    pub fn project_path(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }

    pub fn is_untitled(&self) -> bool {
        self.project_path.is_none()
    }

    pub fn recursive_scan(&self) -> bool {
        self.recursive_scan
    }

    pub fn set_recursive_scan(&mut self, recursive: bool) {
        self.recursive_scan = recursive;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Ask for a folder and list its audio files. `false` on cancel.
    pub fn open_folder(&mut self) -> bool {
        let Some(path) = self.gateway.open_folder_dialog() else {
            return false;
        };
        self.set_folder(&path);
        true
    }

    /// List a folder's audio files and make it the library.
    pub fn set_folder(&mut self, path: &Path) {
        let files = self.gateway.scan_folder(path, self.recursive_scan);
        let folder = FolderSelection {
            name: base_name(path),
            path: normalize_path(path),
        };
        log::info!("Opened folder {} ({} files)", folder.path, files.len());
        self.library = Library::new(Some(folder), files);
        self.current_track = None;
        self.mark_changed();
    }

    /// Ask for individual audio files and list them without a folder.
    pub fn open_files(&mut self) -> bool {
        let Some(files) = self.gateway.open_files_dialog() else {
            return false;
        };
        log::info!("Opened {} files", files.len());
        self.library = Library::new(None, files);
        self.current_track = None;
        self.mark_changed();
        true
    }

    /// Make `track` the current track. Returns `false` if it already was.
    pub fn select_track(&mut self, track: &TrackId) -> bool {
        if self.current_track.as_ref() == Some(track) {
            return false;
        }
        self.current_track = Some(track.clone());
        self.mark_changed();
        true
    }

    /// Rename a track's file on disk and move everything keyed by it.
    pub fn rename_track(&mut self, track: &TrackId, new_name: &str) -> Result<TrackId, RenameError> {
        let new_name = new_name.trim();
        if new_name.is_empty() || new_name.contains(['/', '\\']) {
            return Err(RenameError::InvalidName);
        }
        let renamed = track.with_file_name(new_name);
        if &renamed == track {
            return Ok(renamed);
        }
        if self.library.contains(&renamed) {
            return Err(RenameError::AlreadyExists(new_name.to_string()));
        }

        if let RenameOutcome::Failed(reason) = self.gateway.rename_file(&track.to_path(), &renamed.to_path()) {
            return Err(RenameError::Failed(reason));
        }

        self.store.rename_track(track, &renamed);
        self.library
            .rename_entry(track, new_name, &normalize_path(&renamed.to_path()));
        if self.current_track.as_ref() == Some(track) {
            self.current_track = Some(renamed.clone());
        }
        // Snapshots still point at the old key
        self.history.clear();
        self.mark_changed();
        log::info!("Renamed {} to {}", track, renamed);
        Ok(renamed)
    }

    pub fn create_annotation(&mut self, annotation: Annotation) -> bool {
        let Some(track) = self.current_track.clone() else {
            return false;
        };
        self.history.record(&track, self.store.list(&track));
        self.store.insert(&track, annotation);
        self.mark_changed();
        true
    }

    pub fn update_annotation_range(&mut self, id: &str, start: f64, end: f64) -> bool {
        self.edit_current(|store, track| store.update_range(track, id, start, end))
    }

    /// Change a label. Successive changes to the same label undo as one step.
    pub fn update_annotation_text(&mut self, id: &str, text: &str) -> bool {
        let Some(track) = self.current_track.clone() else {
            return false;
        };
        let before = self.store.list(&track);
        if !self.store.update_text(&track, id, text) {
            return false;
        }
        self.history.record_text_edit(&track, id, before);
        self.mark_changed();
        true
    }

    pub fn delete_annotation(&mut self, id: &str) -> bool {
        self.edit_current(|store, track| store.remove(track, id))
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo(&self.store) else {
            return false;
        };
        self.store.replace(&snapshot.track, snapshot.annotations);
        self.mark_changed();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo(&self.store) else {
            return false;
        };
        self.store.replace(&snapshot.track, snapshot.annotations);
        self.mark_changed();
        true
    }

    fn edit_current<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&mut AnnotationStore, &TrackId) -> bool,
    {
        let Some(track) = self.current_track.clone() else {
            return false;
        };
        let before = self.store.list(&track);
        if !edit(&mut self.store, &track) {
            return false;
        }
        self.history.record(&track, before);
        self.mark_changed();
        true
    }

    /// The project as it would be written to disk.
    pub fn document(&self) -> ProjectDocument {
        ProjectDocument::new(
            self.library.folder.as_ref().map(|f| f.path.clone()),
            self.current_track.clone(),
            self.store.to_map(),
        )
    }

    /// Ask for a destination and save there. The project is bound to that
    /// file afterwards.
    pub fn save(&mut self) -> bool {
        let Some(content) = self.encode() else {
            return false;
        };
        let Some(path) = self.gateway.save_project_dialog(&content) else {
            return false;
        };
        log::info!("Saved project to {}", path.display());
        self.autosave.cancel();
        self.dirty = false;
        self.bind(path);
        true
    }

    /// Ask for a project file and replace the whole session with it.
    pub fn load(&mut self) -> bool {
        let Some(loaded) = self.gateway.load_project_dialog() else {
            return false;
        };
        self.apply_loaded(loaded);
        true
    }

    /// Reopen the project remembered in the settings, if any.
    pub fn auto_load(&mut self) -> bool {
        let settings = self.gateway.get_settings();
        let Some(path) = settings::last_project_path(&settings) else {
            return false;
        };
        let Some(loaded) = self.gateway.load_from_path(&path) else {
            log::warn!("Could not reopen last project {}", path.display());
            return false;
        };
        self.apply_loaded(loaded);
        true
    }

    /// Discard everything after confirmation.
    pub fn new_project(&mut self) -> bool {
        if !self
            .gateway
            .confirm("New Project", "Discard the current project and start a new one?")
        {
            return false;
        }
        self.store.clear();
        self.library = Library::default();
        self.current_track = None;
        self.project_path = None;
        self.history.clear();
        self.autosave.cancel();
        self.dirty = false;

        let mut partial = Settings::new();
        partial.insert(LAST_PROJECT_PATH.to_string(), Value::Null);
        if !self.gateway.set_settings(partial) {
            log::warn!("Could not clear the remembered project path");
        }
        log::info!("Started a new project");
        true
    }

    /// Export all annotations as text. Returns where they were written.
    pub fn export_text(&mut self) -> Option<PathBuf> {
        let content = export::format_annotations(&self.store, &self.library, &export::export_timestamp());
        let path = self.gateway.export_text(&content, DEFAULT_EXPORT_NAME)?;
        log::info!("Exported annotations to {}", path.display());
        Some(path)
    }

    fn apply_loaded(&mut self, loaded: LoadedProject) {
        let LoadedProject { document, file_path } = loaded;

        self.library = match &document.folder_path {
            Some(folder) => {
                let path = Path::new(folder);
                let files = self.gateway.scan_folder(path, self.recursive_scan);
                Library::new(
                    Some(FolderSelection {
                        name: base_name(path),
                        path: folder.clone(),
                    }),
                    files,
                )
            }
            None => Library::default(),
        };
        self.store.replace_all(document.annotations);
        self.current_track = document.current_track;
        self.history.clear();

        // Do not write back the file we just read
        self.autosave.cancel();
        self.dirty = false;
        self.suppress_frames = LOAD_SUPPRESS_FRAMES;

        log::info!(
            "Loaded project {} ({} annotations)",
            file_path.display(),
            self.store.total()
        );
        self.bind(file_path);
    }

    fn bind(&mut self, path: PathBuf) {
        let mut partial = Settings::new();
        partial.insert(
            LAST_PROJECT_PATH.to_string(),
            Value::String(normalize_path(&path)),
        );
        if !self.gateway.set_settings(partial) {
            log::warn!("Could not remember {} for the next start", path.display());
        }
        self.project_path = Some(path);
    }

    fn encode(&self) -> Option<String> {
        match serialization::to_json(&self.document()) {
            Ok(content) => Some(content),
            Err(e) => {
                log::error!("Failed to encode project: {}", e);
                None
            }
        }
    }

    fn mark_changed(&mut self) {
        self.dirty = true;
    }

    /// Advance auto-save by one frame. Returns `true` when a write happened.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.suppress_frames > 0 {
            self.suppress_frames -= 1;
            self.dirty = false;
            return false;
        }
        if std::mem::take(&mut self.dirty) && self.project_path.is_some() {
            self.autosave.schedule(now);
        }
        if !self.autosave.fire(now) {
            return false;
        }
        self.auto_save()
    }

    /// Time until the pending auto-save, for repaint scheduling.
    pub fn autosave_due_in(&self, now: Instant) -> Option<Duration> {
        self.autosave.remaining(now)
    }

    fn auto_save(&mut self) -> bool {
        let Some(path) = self.project_path.clone() else {
            return false;
        };
        let Some(content) = self.encode() else {
            return false;
        };
        let saved = self.gateway.save_to_path(&path, &content);
        if saved {
            log::info!("Auto-saved to {}", path.display());
        }
        saved
    }
}
