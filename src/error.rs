// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Typed errors for project documents.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("unsupported project version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("malformed project document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a track could not be renamed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    #[error("file name must not be empty or contain path separators")]
    InvalidName,

    #[error("a file named {0} already exists")]
    AlreadyExists(String),

    #[error("rename failed: {0}")]
    Failed(String),
}
