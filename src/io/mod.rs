// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for audio, project, and settings files.

pub mod export;
pub mod gateway;
pub mod media;
pub mod native;
pub mod scan;
pub mod serialization;
pub mod settings;
