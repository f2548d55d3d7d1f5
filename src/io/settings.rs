// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Persisted application settings.
//!
//! A flat JSON object stored in the user's config directory. Writes
//! shallow-merge into whatever is already on disk.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Settings key holding the path of the last saved or loaded project.
pub const LAST_PROJECT_PATH: &str = "lastProjectPath";

/// Key/value settings document.
pub type Settings = Map<String, Value>;

/// Default settings file location.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wavejotter")
        .join("settings.json")
}

/// Read the settings document.
///
/// Returns an empty document when the file is missing or malformed.
pub fn load_settings(path: &Path) -> Settings {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            log::debug!("No settings at {}: {}", path.display(), e);
            return Settings::new();
        }
    };
    match serde_json::from_str::<Settings>(&contents) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
            Settings::new()
        }
    }
}

/// Shallow-merge `partial` into the stored settings and write them back.
pub fn merge_settings(path: &Path, partial: Settings) -> Result<()> {
    let mut merged = load_settings(path);
    merged.extend(partial);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create settings directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&merged).context("Failed to serialize settings")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write settings file: {}", path.display()))?;
    Ok(())
}

/// Read the remembered project path, if any.
pub fn last_project_path(settings: &Settings) -> Option<PathBuf> {
    settings
        .get(LAST_PROJECT_PATH)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_file_is_empty() {
        let settings = load_settings(Path::new("/nonexistent/wavejotter/settings.json"));
        assert!(settings.is_empty());
    }

    #[test]
    fn test_merge_is_shallow() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut first = Settings::new();
        first.insert("theme".into(), json!("dark"));
        first.insert(LAST_PROJECT_PATH.into(), json!("/a.json"));
        merge_settings(&path, first).unwrap();

        let mut second = Settings::new();
        second.insert(LAST_PROJECT_PATH.into(), json!("/b.json"));
        merge_settings(&path, second).unwrap();

        let settings = load_settings(&path);
        assert_eq!(settings["theme"], json!("dark"));
        assert_eq!(last_project_path(&settings), Some(PathBuf::from("/b.json")));
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "[1, 2").unwrap();

        assert!(load_settings(&path).is_empty());
    }

    #[test]
    fn test_null_project_path_is_none() {
        let mut settings = Settings::new();
        settings.insert(LAST_PROJECT_PATH.into(), Value::Null);
        assert_eq!(last_project_path(&settings), None);
    }
}
