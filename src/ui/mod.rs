// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for Wavejotter.

pub mod annotations;
pub mod overview;
pub mod playlist;
pub mod toolbar;
pub mod transport;
pub mod waveform;
