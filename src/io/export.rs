// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Human-readable annotation export.
//!
//! The text is meant for reading only; it is never parsed back.

use crate::models::annotation::sorted_by_start;
use crate::models::library::Library;
use crate::models::store::AnnotationStore;
use crate::util::timefmt::format_centis;

/// Default file name offered when exporting.
pub const DEFAULT_EXPORT_NAME: &str = "annotations.txt";

/// Current local time in the format written to the export header.
pub fn export_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Render every annotated track as text.
pub fn format_annotations(store: &AnnotationStore, library: &Library, exported_at: &str) -> String {
    let mut out = String::from("Wavejotter Annotations\n");
    out.push_str(&format!("Exported: {}\n", exported_at));

    for track in library.annotated_tracks(store) {
        out.push('\n');
        out.push_str(&format!("== {} ==\n", track.name));
        for ann in sorted_by_start(&track.annotations) {
            out.push_str(&format!(
                "[{} - {}]  {}\n",
                format_centis(ann.start),
                format_centis(ann.end),
                ann.text
            ));
        }
    }
    out
}
