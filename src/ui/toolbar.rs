// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar: view layer, auto-play, and interaction mode.

use crate::session::surface::{InteractionMode, ViewMode};

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    SetView(ViewMode),
    SetMode(InteractionMode),
}

/// Display the toolbar. Auto-play is edited in place; it only affects the
/// next load.
pub fn show(ui: &mut egui::Ui, view: ViewMode, mode: InteractionMode, auto_play: &mut bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("View:");
        if ui.selectable_label(view == ViewMode::Waveform, "〰 Waveform").clicked() && view != ViewMode::Waveform {
            action = ToolbarAction::SetView(ViewMode::Waveform);
        }
        if ui.selectable_label(view == ViewMode::Spectrogram, "▦ Spectrogram").clicked() && view != ViewMode::Spectrogram {
            action = ToolbarAction::SetView(ViewMode::Spectrogram);
        }

        ui.separator();

        ui.checkbox(auto_play, "Auto-play");

        ui.separator();

        ui.label("Mode:");
        if ui.selectable_label(mode == InteractionMode::Navigate, "➡ Navigate").clicked() && mode != InteractionMode::Navigate {
            action = ToolbarAction::SetMode(InteractionMode::Navigate);
        }
        if ui.selectable_label(mode == InteractionMode::Annotate, "✏ Annotate").clicked() && mode != InteractionMode::Annotate {
            action = ToolbarAction::SetMode(InteractionMode::Annotate);
        }

        ui.separator();

        let hint = match mode {
            InteractionMode::Navigate => "Click the waveform to seek",
            InteractionMode::Annotate => "Drag across the waveform to add an annotation",
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
