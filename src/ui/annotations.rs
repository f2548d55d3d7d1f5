// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation list for the current track.

use crate::models::annotation::{sorted_by_start, Annotation};
use crate::util::timefmt::format_tenths;

/// Result of annotation list interaction.
pub enum AnnotationsAction {
    None,
    Seek(f64),
    UpdateText { id: String, text: String },
    Delete(String),
}

const ACTIVE_FILL: egui::Color32 = egui::Color32::from_rgb(0x1e, 0x3a, 0x3c);

/// Display the annotations of the current track, sorted by start time.
/// The entry under the playhead is highlighted.
pub fn show(ui: &mut egui::Ui, annotations: &[Annotation], position: f64) -> AnnotationsAction {
    let mut action = AnnotationsAction::None;

    ui.heading(format!("Annotations ({})", annotations.len()));
    ui.separator();

    if annotations.is_empty() {
        ui.label(egui::RichText::new("Switch to Annotate mode and drag across the waveform").weak());
        return action;
    }

    egui::ScrollArea::vertical()
        .id_source("annotations_scroll")
        .show(ui, |ui| {
            for ann in sorted_by_start(annotations) {
                ui.push_id(&ann.id, |ui| {
                    let fill = if ann.contains(position) { ACTIVE_FILL } else { egui::Color32::TRANSPARENT };
                    egui::Frame::none()
                        .fill(fill)
                        .inner_margin(egui::Margin::same(4.0))
                        .rounding(4.0)
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                let range = format!("{} - {}", format_tenths(ann.start), format_tenths(ann.end));
                                if ui.link(egui::RichText::new(range).monospace()).clicked() {
                                    action = AnnotationsAction::Seek(ann.start);
                                }

                                let mut text = ann.text.clone();
                                let edit = egui::TextEdit::singleline(&mut text)
                                    .hint_text("Label")
                                    .desired_width(ui.available_width() - 30.0);
                                if ui.add(edit).changed() {
                                    action = AnnotationsAction::UpdateText { id: ann.id.clone(), text };
                                }

                                if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                                    action = AnnotationsAction::Delete(ann.id.clone());
                                }
                            });
                        });
                });
            }
        });

    action
}
