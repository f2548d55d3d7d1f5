// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! Each frame runs in a fixed order: drain the waveform's events, apply them
//! to the playback session and the project, release the region sync guard,
//! draw the panels, load whatever track is now current, push the current
//! annotations to the waveform, and finally advance auto-save.

use crate::io::native::NativeGateway;
use crate::models::track::TrackId;
use crate::session::lifecycle::ProjectController;
use crate::session::playback::{PlaybackSession, SessionNotice};
use crate::session::regions::{RegionChange, RegionSync};
use crate::session::surface::InteractionMode;
use crate::ui::{annotations, overview, playlist, toolbar, transport};
use crate::ui::waveform::WaveformView;
use std::time::{Duration, Instant};

/// Repaint interval while audio is playing or loading.
const ACTIVE_REPAINT: Duration = Duration::from_millis(33);

pub struct WavejotterApp {
    project: ProjectController<NativeGateway>,
    session: PlaybackSession,
    regions: RegionSync,
    waveform: WaveformView,
    /// Start playback when a track finishes loading
    auto_play: bool,
    /// Track the waveform was last asked to load
    displayed: Option<TrackId>,
    rename: playlist::RenameState,
    /// Message shown in the status bar
    status: Option<String>,
    title: String,
}

impl Default for WavejotterApp {
    fn default() -> Self {
        Self::new()
    }
}

impl WavejotterApp {
    pub fn new() -> Self {
        let mut app = Self {
            project: ProjectController::new(NativeGateway::default()),
            session: PlaybackSession::new(),
            regions: RegionSync::new(),
            waveform: WaveformView::new(),
            auto_play: false,
            displayed: None,
            rename: playlist::RenameState::default(),
            status: None,
            title: String::new(),
        };
        app.session
            .set_interaction_mode(&mut app.waveform, InteractionMode::Navigate);
        if app.project.auto_load() {
            app.status = app
                .project
                .project_path()
                .map(|p| format!("Reopened {}", p.display()));
        }
        app
    }

    /// Load the project's current track into the waveform if it changed.
    fn sync_track(&mut self) {
        let current = self.project.current_track().cloned();
        if current == self.displayed {
            return;
        }
        match &current {
            Some(track) => self.session.load(&mut self.waveform, track, self.auto_play),
            None => self.session.unload(&mut self.waveform),
        }
        self.regions.reset();
        self.displayed = current;
    }

    fn select(&mut self, track: &TrackId) {
        self.rename.cancel();
        self.project.select_track(track);
        self.sync_track();
    }

    fn step_track(&mut self, forward: bool) {
        let Some(current) = self.project.current_track() else {
            return;
        };
        let target = if forward {
            self.project.library().next_after(current)
        } else {
            self.project.library().prev_before(current)
        };
        if let Some(track) = target {
            self.select(&track);
        }
    }

    fn drain_surface(&mut self) {
        for event in self.waveform.take_events() {
            match self.session.handle(&mut self.waveform, &event) {
                Some(SessionNotice::Finished) => {
                    if self.auto_play {
                        self.step_track(true);
                    }
                }
                Some(SessionNotice::Error(message)) => {
                    self.status = Some(format!("Could not load audio: {}", message));
                }
                Some(SessionNotice::Ready) | None => {}
            }

            match self.regions.handle(&mut self.waveform, &event) {
                Some(RegionChange::Created(annotation)) => {
                    self.project.create_annotation(annotation);
                }
                Some(RegionChange::Updated { id, start, end }) => {
                    self.project.update_annotation_range(&id, start, end);
                }
                None => {}
            }
        }
    }

    fn open_folder(&mut self) {
        if self.project.open_folder() {
            self.rename.cancel();
            self.status = None;
        }
    }

    fn open_files(&mut self) {
        if self.project.open_files() {
            self.rename.cancel();
            self.status = None;
        }
    }

    fn save(&mut self) {
        if self.project.save() {
            self.status = self
                .project
                .project_path()
                .map(|p| format!("Saved {}", p.display()));
        }
    }

    fn load(&mut self) {
        if self.project.load() {
            self.rename.cancel();
            self.status = self
                .project
                .project_path()
                .map(|p| format!("Loaded {}", p.display()));
        }
    }

    fn new_project(&mut self) {
        if self.project.new_project() {
            self.rename.cancel();
            self.status = None;
        }
    }

    fn export(&mut self) {
        if let Some(path) = self.project.export_text() {
            self.status = Some(format!("Exported to {}", path.display()));
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        // Text fields keep their keys
        if ctx.wants_keyboard_input() {
            return;
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.session.toggle_play(&mut self.waveform);
        }

        // Undo (Ctrl+Z)
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift) {
            self.project.undo();
        }

        // Redo (Ctrl+Shift+Z or Ctrl+Y)
        if ctx.input(|i| {
            (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                || (i.modifiers.command && i.key_pressed(egui::Key::Y))
        }) {
            self.project.redo();
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Project").clicked() {
                        ui.close_menu();
                        self.new_project();
                    }
                    ui.separator();
                    if ui.button("Open Folder...").clicked() {
                        ui.close_menu();
                        self.open_folder();
                    }
                    if ui.button("Open Files...").clicked() {
                        ui.close_menu();
                        self.open_files();
                    }
                    ui.separator();
                    if ui.button("Load Project...").clicked() {
                        ui.close_menu();
                        self.load();
                    }
                    if ui.button("Save Project...").clicked() {
                        ui.close_menu();
                        self.save();
                    }
                    if ui.button("Export Annotations...").clicked() {
                        ui.close_menu();
                        self.export();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui
                        .add_enabled(self.project.can_undo(), egui::Button::new("Undo (Ctrl+Z)"))
                        .clicked()
                    {
                        self.project.undo();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(self.project.can_redo(), egui::Button::new("Redo (Ctrl+Shift+Z)"))
                        .clicked()
                    {
                        self.project.redo();
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn update_title(&mut self, ctx: &egui::Context) {
        let name = if self.project.is_untitled() {
            "Untitled".to_string()
        } else {
            self.project
                .project_path()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        let title = format!("Wavejotter - {}", name);
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }
    }
}

impl eframe::App for WavejotterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_surface();
        self.regions.settle();

        self.handle_keyboard(ctx);
        self.menu_bar(ctx);
        self.update_title(ctx);

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(ui, self.session.view(), self.session.mode(), &mut self.auto_play)
            })
            .inner;
        match toolbar_action {
            toolbar::ToolbarAction::SetView(view) => self.session.set_view(&mut self.waveform, view),
            toolbar::ToolbarAction::SetMode(mode) => self.session.set_interaction_mode(&mut self.waveform, mode),
            toolbar::ToolbarAction::None => {}
        }

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(error) = self.session.error() {
                    ui.colored_label(egui::Color32::from_rgb(220, 80, 80), format!("⚠ {}", error));
                } else if let Some(status) = &self.status {
                    ui.label(status);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("{} annotations", self.project.store().total()));
                });
            });
        });

        // Playlist (left side)
        let playlist_action = egui::SidePanel::left("playlist")
            .default_width(240.0)
            .show(ctx, |ui| {
                playlist::show(
                    ui,
                    self.project.library(),
                    self.project.current_track(),
                    self.project.recursive_scan(),
                    &mut self.rename,
                )
            })
            .inner;
        match playlist_action {
            playlist::PlaylistAction::OpenFolder => self.open_folder(),
            playlist::PlaylistAction::OpenFiles => self.open_files(),
            playlist::PlaylistAction::SetRecursive(recursive) => self.project.set_recursive_scan(recursive),
            playlist::PlaylistAction::Select(track) => self.select(&track),
            playlist::PlaylistAction::Rename { track, new_name } => {
                match self.project.rename_track(&track, &new_name) {
                    Ok(renamed) => {
                        self.rename.cancel();
                        self.status = Some(format!("Renamed to {}", renamed.file_name()));
                    }
                    Err(e) => self.rename.error = Some(e.to_string()),
                }
            }
            playlist::PlaylistAction::None => {}
        }

        // Annotation lists (right side)
        let current = self.project.current_annotations();
        let annotated = self.project.library().annotated_tracks(self.project.store());
        let (annotations_action, overview_action) = egui::SidePanel::right("annotations")
            .default_width(320.0)
            .show(ctx, |ui| {
                let list_action = ui
                    .allocate_ui(egui::vec2(ui.available_width(), ui.available_height() * 0.55), |ui| {
                        annotations::show(ui, &current, self.session.position())
                    })
                    .inner;
                ui.separator();
                let overview_action = overview::show(ui, &annotated, self.project.current_track());
                (list_action, overview_action)
            })
            .inner;
        match annotations_action {
            annotations::AnnotationsAction::Seek(time) => self.session.seek(&mut self.waveform, time),
            annotations::AnnotationsAction::UpdateText { id, text } => {
                self.project.update_annotation_text(&id, &text);
            }
            annotations::AnnotationsAction::Delete(id) => {
                self.project.delete_annotation(&id);
            }
            annotations::AnnotationsAction::None => {}
        }
        if let overview::OverviewAction::Jump { track, time } = overview_action {
            self.select(&track);
            self.session.seek(&mut self.waveform, time);
        }

        // Waveform and transport (center)
        let transport_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let library = self.project.library();
                let current = self.project.current_track();
                let state = transport::TransportState {
                    ready: self.session.is_ready(),
                    playing: self.session.is_playing(),
                    position: self.session.position(),
                    duration: self.session.duration(),
                    zoom: self.session.zoom(),
                    has_previous: current.and_then(|t| library.prev_before(t)).is_some(),
                    has_next: current.and_then(|t| library.next_after(t)).is_some(),
                };

                if let Some(track) = current {
                    ui.heading(library.display_name(track));
                } else {
                    ui.heading("No track selected");
                }
                ui.add_space(4.0);

                let notches = self.waveform.show(ui, self.session.position());
                ui.add_space(8.0);
                let action = transport::show(ui, &state);
                (action, notches)
            })
            .inner;
        let (transport_action, notches) = transport_action;
        if notches != 0 {
            self.session.wheel_zoom(&mut self.waveform, notches);
        }
        match transport_action {
            transport::TransportAction::Previous => self.step_track(false),
            transport::TransportAction::TogglePlay => self.session.toggle_play(&mut self.waveform),
            transport::TransportAction::Stop => self.session.stop(&mut self.waveform),
            transport::TransportAction::Next => self.step_track(true),
            transport::TransportAction::Zoom(level) => self.session.set_zoom(&mut self.waveform, level),
            transport::TransportAction::None => {}
        }

        self.sync_track();
        let annotations = self.project.current_annotations();
        self.regions.push(&mut self.waveform, &annotations);

        let now = Instant::now();
        self.project.tick(now);

        if self.session.is_playing() || self.waveform.is_loading() {
            ctx.request_repaint_after(ACTIVE_REPAINT);
        } else if let Some(due) = self.project.autosave_due_in(now) {
            ctx.request_repaint_after(due);
        }
    }
}
