// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Transport controls: previous/play/stop/next, time display, and zoom.

use crate::session::playback::{MAX_ZOOM, MIN_ZOOM};
use crate::util::timefmt::format_centis;

/// Result of transport interaction.
pub enum TransportAction {
    None,
    Previous,
    TogglePlay,
    Stop,
    Next,
    Zoom(f64),
}

/// What the transport bar needs to draw itself.
pub struct TransportState {
    pub ready: bool,
    pub playing: bool,
    pub position: f64,
    pub duration: f64,
    pub zoom: f64,
    pub has_previous: bool,
    pub has_next: bool,
}

pub fn show(ui: &mut egui::Ui, state: &TransportState) -> TransportAction {
    let mut action = TransportAction::None;

    ui.horizontal(|ui| {
        if ui.add_enabled(state.has_previous, egui::Button::new("⏮")).on_hover_text("Previous track").clicked() {
            action = TransportAction::Previous;
        }

        let play_label = if state.playing { "⏸" } else { "▶" };
        if ui.add_enabled(state.ready, egui::Button::new(play_label)).on_hover_text("Play/Pause (Space)").clicked() {
            action = TransportAction::TogglePlay;
        }
        if ui.add_enabled(state.ready, egui::Button::new("⏹")).on_hover_text("Stop").clicked() {
            action = TransportAction::Stop;
        }
        if ui.add_enabled(state.has_next, egui::Button::new("⏭")).on_hover_text("Next track").clicked() {
            action = TransportAction::Next;
        }

        ui.separator();

        ui.label(
            egui::RichText::new(format!("{} / {}", format_centis(state.position), format_centis(state.duration)))
                .monospace(),
        );

        ui.separator();

        ui.label("Zoom:");
        let mut zoom = state.zoom;
        let slider = egui::Slider::new(&mut zoom, MIN_ZOOM..=MAX_ZOOM).suffix(" px/s");
        if ui.add_enabled(state.ready, slider).changed() {
            action = TransportAction::Zoom(zoom);
        }
    });

    action
}
