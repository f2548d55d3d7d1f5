// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playlist panel: folder selection and the audio file list.

use crate::models::library::Library;
use crate::models::track::TrackId;

/// Result of playlist interaction.
pub enum PlaylistAction {
    None,
    OpenFolder,
    OpenFiles,
    SetRecursive(bool),
    Select(TrackId),
    Rename { track: TrackId, new_name: String },
}

/// In-progress rename, kept across frames by the app.
#[derive(Debug, Default)]
pub struct RenameState {
    pub track: Option<TrackId>,
    pub buffer: String,
    pub error: Option<String>,
}

impl RenameState {
    pub fn begin(&mut self, track: &TrackId) {
        self.track = Some(track.clone());
        self.buffer = track.file_name().to_string();
        self.error = None;
    }

    pub fn cancel(&mut self) {
        self.track = None;
        self.buffer.clear();
        self.error = None;
    }
}

pub fn show(
    ui: &mut egui::Ui,
    library: &Library,
    current: Option<&TrackId>,
    recursive: bool,
    rename: &mut RenameState,
) -> PlaylistAction {
    let mut action = PlaylistAction::None;

    ui.heading("Playlist");
    ui.horizontal(|ui| {
        if ui.button("📂 Folder...").clicked() {
            action = PlaylistAction::OpenFolder;
        }
        if ui.button("🎵 Files...").clicked() {
            action = PlaylistAction::OpenFiles;
        }
    });
    let mut recursive_flag = recursive;
    if ui.checkbox(&mut recursive_flag, "Include subfolders").changed() {
        action = PlaylistAction::SetRecursive(recursive_flag);
    }

    if let Some(folder) = &library.folder {
        ui.label(egui::RichText::new(&folder.name).strong())
            .on_hover_text(&folder.path);
    }
    ui.separator();

    if library.files.is_empty() {
        ui.label(egui::RichText::new("No audio files").weak());
        return action;
    }

    egui::ScrollArea::vertical()
        .id_source("playlist_scroll")
        .show(ui, |ui| {
            for file in &library.files {
                let track = file.track_id();
                let is_current = current == Some(&track);

                if rename.track.as_ref() == Some(&track) {
                    ui.horizontal(|ui| {
                        let response = ui.text_edit_singleline(&mut rename.buffer);
                        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        if ui.button("✔").clicked() || submitted {
                            action = PlaylistAction::Rename {
                                track: track.clone(),
                                new_name: rename.buffer.clone(),
                            };
                        }
                        if ui.button("✖").clicked() {
                            rename.cancel();
                        }
                    });
                    if let Some(error) = &rename.error {
                        ui.colored_label(egui::Color32::from_rgb(220, 80, 80), error);
                    }
                    continue;
                }

                ui.horizontal(|ui| {
                    let label = ui.selectable_label(is_current, &file.name).on_hover_text(&file.path);
                    if label.clicked() && !is_current {
                        action = PlaylistAction::Select(track.clone());
                    }
                    if label.double_clicked() {
                        rename.begin(&track);
                    }
                    label.context_menu(|ui| {
                        if ui.button("Rename...").clicked() {
                            rename.begin(&track);
                            ui.close_menu();
                        }
                    });
                });
            }
        });

    action
}
