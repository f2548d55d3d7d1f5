// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Native implementation of the file gateway.
//!
//! Dialogs are `rfd` native dialogs; everything else is plain file I/O.

use super::gateway::{FileGateway, RenameOutcome};
use super::scan::{self, is_audio_file, normalize_path};
use super::serialization;
use super::settings::{self, Settings};
use crate::models::project::LoadedProject;
use crate::models::track::AudioFile;
use std::path::{Path, PathBuf};

pub struct NativeGateway {
    settings_path: PathBuf,
}

impl Default for NativeGateway {
    fn default() -> Self {
        Self::new(settings::default_settings_path())
    }
}

impl NativeGateway {
    pub fn new(settings_path: PathBuf) -> Self {
        Self { settings_path }
    }

    fn project_dialog() -> rfd::FileDialog {
        rfd::FileDialog::new().add_filter("Audio Project", &["json"])
    }
}

impl FileGateway for NativeGateway {
    fn scan_folder(&mut self, path: &Path, recursive: bool) -> Vec<AudioFile> {
        scan::scan_folder(path, recursive)
    }

    fn open_folder_dialog(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new().pick_folder()
    }

    fn open_files_dialog(&mut self) -> Option<Vec<AudioFile>> {
        let paths = rfd::FileDialog::new()
            .add_filter("Audio Files", &scan::AUDIO_EXTENSIONS)
            .pick_files()?;
        let files: Vec<AudioFile> = paths
            .iter()
            .filter(|p| is_audio_file(p))
            .map(|p| AudioFile {
                name: scan::base_name(p),
                path: normalize_path(p),
            })
            .collect();
        if files.is_empty() {
            return None;
        }
        Some(files)
    }

    fn save_project_dialog(&mut self, content: &str) -> Option<PathBuf> {
        let path = Self::project_dialog().save_file()?;
        match serialization::write_project(&path, content) {
            Ok(()) => Some(path),
            Err(e) => {
                log::error!("Failed to save project: {:#}", e);
                None
            }
        }
    }

    fn load_project_dialog(&mut self) -> Option<LoadedProject> {
        let path = Self::project_dialog().pick_file()?;
        self.load_from_path(&path)
    }

    fn save_to_path(&mut self, path: &Path, content: &str) -> bool {
        match serialization::write_project(path, content) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Auto-save error: {:#}", e);
                false
            }
        }
    }

    fn load_from_path(&mut self, path: &Path) -> Option<LoadedProject> {
        match serialization::read_project(path) {
            Ok(loaded) => Some(loaded),
            Err(e) => {
                log::error!("Load from path error: {:#}", e);
                None
            }
        }
    }

    fn get_settings(&mut self) -> Settings {
        settings::load_settings(&self.settings_path)
    }

    fn set_settings(&mut self, partial: Settings) -> bool {
        match settings::merge_settings(&self.settings_path, partial) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Settings save error: {:#}", e);
                false
            }
        }
    }

    fn rename_file(&mut self, old: &Path, new: &Path) -> RenameOutcome {
        if new.exists() {
            return RenameOutcome::Failed(format!("{} already exists", new.display()));
        }
        match std::fs::rename(old, new) {
            Ok(()) => RenameOutcome::Renamed,
            Err(e) => {
                log::error!("Rename error: {}", e);
                RenameOutcome::Failed(e.to_string())
            }
        }
    }

    fn export_text(&mut self, content: &str, default_name: &str) -> Option<PathBuf> {
        let path = rfd::FileDialog::new()
            .set_file_name(default_name)
            .add_filter("Text File", &["txt"])
            .save_file()?;
        match std::fs::write(&path, content) {
            Ok(()) => Some(path),
            Err(e) => {
                log::error!("Export text error: {}", e);
                None
            }
        }
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        let answer = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::YesNo)
            .show();
        matches!(answer, rfd::MessageDialogResult::Yes)
    }
}
