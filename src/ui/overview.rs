// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overview of every annotated track in the project.

use crate::models::annotation::sorted_by_start;
use crate::models::library::AnnotatedTrack;
use crate::models::track::TrackId;
use crate::util::timefmt::format_tenths;

/// Result of overview interaction.
pub enum OverviewAction {
    None,
    /// Open a track and jump to a time in it
    Jump { track: TrackId, time: f64 },
}

pub fn show(ui: &mut egui::Ui, tracks: &[AnnotatedTrack], current: Option<&TrackId>) -> OverviewAction {
    let mut action = OverviewAction::None;

    ui.heading("All Annotations");
    ui.separator();

    if tracks.is_empty() {
        ui.label(egui::RichText::new("Nothing annotated yet").weak());
        return action;
    }

    egui::ScrollArea::vertical()
        .id_source("overview_scroll")
        .show(ui, |ui| {
            for entry in tracks {
                let is_current = current == Some(&entry.track);
                let title = format!("{} ({})", entry.name, entry.annotations.len());
                let header = if is_current {
                    egui::RichText::new(title).strong()
                } else {
                    egui::RichText::new(title)
                };

                egui::CollapsingHeader::new(header)
                    .id_source(entry.track.as_str())
                    .default_open(true)
                    .show(ui, |ui| {
                        for ann in sorted_by_start(&entry.annotations) {
                            let label = if ann.text.is_empty() { "(no label)" } else { ann.text.as_str() };
                            let line = format!("{}  {}", format_tenths(ann.start), label);
                            if ui.link(line).clicked() {
                                action = OverviewAction::Jump {
                                    track: entry.track.clone(),
                                    time: ann.start,
                                };
                            }
                        }
                    });
            }
        });

    action
}
