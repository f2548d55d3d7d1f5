// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project document serialization and deserialization.
//!
//! Projects are stored as pretty-printed JSON. Reading rejects any schema
//! version other than the one this application writes.

use crate::error::ProjectError;
use crate::models::project::{LoadedProject, ProjectDocument, PROJECT_VERSION};
use anyhow::{Context, Result};
use std::path::Path;

/// Encode a project document as pretty-printed JSON.
pub fn to_json(data: &ProjectDocument) -> Result<String, ProjectError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Decode a project document, checking its schema version.
pub fn from_json(json: &str) -> Result<ProjectDocument, ProjectError> {
    let data: ProjectDocument = serde_json::from_str(json)?;
    if data.version != PROJECT_VERSION {
        return Err(ProjectError::UnsupportedVersion {
            found: data.version,
            expected: PROJECT_VERSION,
        });
    }
    Ok(data)
}

/// Write already-encoded project content to a file.
pub fn write_project(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write project file: {}", path.display()))?;
    Ok(())
}

/// Read a project file and remember where it came from.
pub fn read_project(path: &Path) -> Result<LoadedProject> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read project file: {}", path.display()))?;
    let document = from_json(&json)
        .with_context(|| format!("Failed to parse project file: {}", path.display()))?;
    Ok(LoadedProject {
        document,
        file_path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::Annotation;
    use crate::models::track::TrackId;
    use std::collections::BTreeMap;

    fn sample() -> ProjectDocument {
        let mut annotations = BTreeMap::new();
        annotations.insert(
            TrackId::from_path("file:///a.wav"),
            vec![Annotation { id: "1".into(), start: 0.0, end: 1.0, text: "intro".into() }],
        );
        ProjectDocument::new(
            Some("/music".into()),
            Some(TrackId::from_path("file:///a.wav")),
            annotations,
        )
    }

    #[test]
    fn test_json_uses_camel_case_fields() {
        let json = to_json(&sample()).unwrap();
        assert!(json.contains("\"folderPath\": \"/music\""));
        assert!(json.contains("\"currentTrack\": \"file:///a.wav\""));
        assert!(json.contains("\"version\": 1"));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");

        write_project(&path, &to_json(&sample()).unwrap()).unwrap();
        let loaded = read_project(&path).unwrap();

        assert_eq!(loaded.document, sample());
        assert_eq!(loaded.file_path, path);
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let err = from_json(r#"{"version":2,"annotations":{}}"#).unwrap_err();
        assert!(matches!(err, ProjectError::UnsupportedVersion { found: 2, .. }));
    }

    #[test]
    fn test_missing_version_reads_as_current() {
        let doc = from_json(r#"{"annotations":{}}"#).unwrap();
        assert_eq!(doc.version, PROJECT_VERSION);
        assert!(doc.folder_path.is_none());
    }

    #[test]
    fn test_file_path_marker_is_not_persisted() {
        let doc = from_json(r#"{"version":1,"annotations":{},"_filePath":"/tmp/p.json"}"#).unwrap();
        let json = to_json(&doc).unwrap();
        assert!(!json.contains("_filePath"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(from_json("{not json"), Err(ProjectError::Json(_))));
    }
}
