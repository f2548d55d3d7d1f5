// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Audio folder scanning.

use crate::models::track::AudioFile;
use std::path::Path;
use walkdir::WalkDir;

/// Extensions recognised as audio files (compared case-insensitively).
pub const AUDIO_EXTENSIONS: [&str; 3] = ["wav", "mp3", "ogg"];

/// Whether a path has an audio extension.
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AUDIO_EXTENSIONS.iter().any(|a| ext.eq_ignore_ascii_case(a)))
        .unwrap_or(false)
}

/// List audio files under `folder`, descending into subfolders only when
/// `recursive` is set.
///
/// Unreadable entries are logged and skipped; whatever was found is returned.
pub fn scan_folder(folder: &Path, recursive: bool) -> Vec<AudioFile> {
    let mut walker = WalkDir::new(folder).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::error!("Failed to scan {}: {}", folder.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_audio_file(entry.path()) {
            continue;
        }
        files.push(AudioFile {
            name: entry.file_name().to_string_lossy().to_string(),
            path: normalize_path(entry.path()),
        });
    }

    log::info!("Scanned {}: {} audio files", folder.display(), files.len());
    files
}

/// Last component of a path, used as a display name.
pub fn base_name(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| normalize_path(folder))
}

/// Path as a string with forward slashes.
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
