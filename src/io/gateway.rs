// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Host file-system capabilities consumed by the project controller.
//!
//! Every method reports failure as `None`/`false` after logging; user
//! cancellation of a dialog is also `None` and is not an error.

use super::settings::Settings;
use crate::models::project::LoadedProject;
use crate::models::track::AudioFile;
use std::path::{Path, PathBuf};

/// Result of renaming a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    Failed(String),
}

pub trait FileGateway {
    /// List audio files in a folder.
    fn scan_folder(&mut self, path: &Path, recursive: bool) -> Vec<AudioFile>;

    /// Ask the user for a folder.
    fn open_folder_dialog(&mut self) -> Option<PathBuf>;

    /// Ask the user for one or more audio files.
    fn open_files_dialog(&mut self) -> Option<Vec<AudioFile>>;

    /// Ask for a destination and write the project there.
    fn save_project_dialog(&mut self, content: &str) -> Option<PathBuf>;

    /// Ask for a project file and read it.
    fn load_project_dialog(&mut self) -> Option<LoadedProject>;

    /// Write a project to a known path without asking.
    fn save_to_path(&mut self, path: &Path, content: &str) -> bool;

    /// Read a project from a known path without asking.
    fn load_from_path(&mut self, path: &Path) -> Option<LoadedProject>;

    fn get_settings(&mut self) -> Settings;

    /// Shallow-merge `partial` into the persisted settings.
    fn set_settings(&mut self, partial: Settings) -> bool;

    fn rename_file(&mut self, old: &Path, new: &Path) -> RenameOutcome;

    /// Ask for a destination and write a text export there.
    fn export_text(&mut self, content: &str, default_name: &str) -> Option<PathBuf>;

    /// Ask the user to confirm a destructive action.
    fn confirm(&mut self, title: &str, message: &str) -> bool;
}

#[cfg(test)]
pub mod testing {
    //! In-memory gateway with scripted dialog answers.

    use super::*;
    use crate::io::serialization;
    use std::collections::HashMap;

    #[derive(Debug, Default)]
    pub struct MemoryGateway {
        /// Files "on disk" by path
        pub files: HashMap<PathBuf, String>,
        /// Folder contents returned by `scan_folder`
        pub folders: HashMap<PathBuf, Vec<AudioFile>>,
        pub settings: Settings,
        pub folder_answer: Option<PathBuf>,
        pub files_answer: Option<Vec<AudioFile>>,
        pub save_answer: Option<PathBuf>,
        pub load_answer: Option<PathBuf>,
        pub export_answer: Option<PathBuf>,
        pub confirm_answer: bool,
        pub rename_error: Option<String>,
        /// Make `set_settings` fail without storing anything
        pub settings_fail: bool,
        /// Every write performed, in order
        pub writes: Vec<(PathBuf, String)>,
        pub renames: Vec<(PathBuf, PathBuf)>,
        pub scans: Vec<(PathBuf, bool)>,
    }

    impl MemoryGateway {
        pub fn new() -> Self {
            Self::default()
        }

        fn write(&mut self, path: &Path, content: &str) {
            self.files.insert(path.to_path_buf(), content.to_string());
            self.writes.push((path.to_path_buf(), content.to_string()));
        }

        fn read(&self, path: &Path) -> Option<LoadedProject> {
            let content = self.files.get(path)?;
            let document = serialization::from_json(content).ok()?;
            Some(LoadedProject {
                document,
                file_path: path.to_path_buf(),
            })
        }
    }

    impl FileGateway for MemoryGateway {
        fn scan_folder(&mut self, path: &Path, recursive: bool) -> Vec<AudioFile> {
            self.scans.push((path.to_path_buf(), recursive));
            self.folders.get(path).cloned().unwrap_or_default()
        }

        fn open_folder_dialog(&mut self) -> Option<PathBuf> {
            self.folder_answer.clone()
        }

        fn open_files_dialog(&mut self) -> Option<Vec<AudioFile>> {
            self.files_answer.clone()
        }

        fn save_project_dialog(&mut self, content: &str) -> Option<PathBuf> {
            let path = self.save_answer.clone()?;
            self.write(&path, content);
            Some(path)
        }

        fn load_project_dialog(&mut self) -> Option<LoadedProject> {
            let path = self.load_answer.clone()?;
            self.read(&path)
        }

        fn save_to_path(&mut self, path: &Path, content: &str) -> bool {
            self.write(path, content);
            true
        }

        fn load_from_path(&mut self, path: &Path) -> Option<LoadedProject> {
            self.read(path)
        }

        fn get_settings(&mut self) -> Settings {
            self.settings.clone()
        }

        fn set_settings(&mut self, partial: Settings) -> bool {
            if self.settings_fail {
                return false;
            }
            self.settings.extend(partial);
            true
        }

        fn rename_file(&mut self, old: &Path, new: &Path) -> RenameOutcome {
            if let Some(error) = &self.rename_error {
                return RenameOutcome::Failed(error.clone());
            }
            if self.files.contains_key(new) {
                return RenameOutcome::Failed(format!("{} already exists", new.display()));
            }
            self.renames.push((old.to_path_buf(), new.to_path_buf()));
            RenameOutcome::Renamed
        }

        fn export_text(&mut self, content: &str, _default_name: &str) -> Option<PathBuf> {
            let path = self.export_answer.clone()?;
            self.write(&path, content);
            Some(path)
        }

        fn confirm(&mut self, _title: &str, _message: &str) -> bool {
            self.confirm_answer
        }
    }
}
