// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Persisted project document.
//!
//! The on-disk form bundles the folder selection, the current track, and
//! all annotations keyed by track identifier.

use super::annotation::Annotation;
use super::track::TrackId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The only schema version written by this application.
pub const PROJECT_VERSION: u32 = 1;

fn default_version() -> u32 {
    PROJECT_VERSION
}

/// Complete project data for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_track: Option<TrackId>,
    #[serde(default)]
    pub annotations: BTreeMap<TrackId, Vec<Annotation>>,
}

impl ProjectDocument {
    pub fn new(
        folder_path: Option<String>,
        current_track: Option<TrackId>,
        annotations: BTreeMap<TrackId, Vec<Annotation>>,
    ) -> Self {
        Self {
            version: PROJECT_VERSION,
            folder_path,
            current_track,
            annotations,
        }
    }
}

/// A document just read from disk, together with where it came from.
///
/// The source path lives only here; it is never written into the document.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProject {
    pub document: ProjectDocument,
    pub file_path: PathBuf,
}
