// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: annotations, tracks, the annotation store, and projects.

pub mod annotation;
pub mod history;
pub mod library;
pub mod project;
pub mod store;
pub mod track;
