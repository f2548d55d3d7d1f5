// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session logic between the data model and the display surface.
//!
//! Everything here runs on the UI thread and is driven by the host's frame
//! loop: surface events are drained and dispatched, then region sync settles,
//! then the current annotations are pushed, then auto-save ticks.

pub mod debounce;
pub mod lifecycle;
pub mod playback;
pub mod regions;
pub mod surface;
