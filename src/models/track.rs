// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Track identifiers and audio file entries.
//!
//! A track identifier is the raw file-system path (forward slashes) behind a
//! fixed `file:///` scheme marker. The same file always maps to the same key
//! whether it came from a dialog, a folder scan, or a loaded project.
//!
//! Known limitation: the path is used verbatim, so on case-insensitive file
//! systems two spellings of one file produce two identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Scheme marker prefixed to every file-system path.
pub const SCHEME: &str = "file:///";

/// Canonical key for an audio file, used by every per-track map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Build the identifier for a file-system path.
    ///
    /// Strings already carrying a `file:` scheme are kept as they are.
    pub fn from_path(path: &str) -> Self {
        if path.starts_with("file:") {
            return Self(path.to_string());
        }
        Self(format!("{}{}", SCHEME, path.replace('\\', "/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The file-system path this identifier points at.
    pub fn to_path(&self) -> PathBuf {
        let raw = self
            .0
            .strip_prefix(SCHEME)
            .or_else(|| self.0.strip_prefix("file:"))
            .unwrap_or(&self.0);
        PathBuf::from(raw)
    }

    /// Last path segment, used as the fallback display name.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().filter(|s| !s.is_empty()).unwrap_or(&self.0)
    }

    /// Identifier of a sibling file with a different name.
    pub fn with_file_name(&self, name: &str) -> Self {
        match self.0.rfind('/') {
            Some(idx) => Self(format!("{}{}", &self.0[..=idx], name)),
            None => Self(name.to_string()),
        }
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An audio file listed in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFile {
    pub name: String,
    /// File-system path with forward slashes.
    pub path: String,
}

impl AudioFile {
    pub fn track_id(&self) -> TrackId {
        TrackId::from_path(&self.path)
    }
}
