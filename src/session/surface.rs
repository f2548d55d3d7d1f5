// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The display surface seam.
//!
//! The surface owns the audio, the waveform drawing, and the draggable
//! regions. The rest of the application talks to it through these traits and
//! hears back from it through [`SurfaceEvent`]s, drained once per frame.

use crate::models::annotation::Annotation;
use crate::models::track::TrackId;

/// A draggable, resizable time range drawn on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: String,
    pub start: f64,
    pub end: f64,
    pub label: String,
}

impl From<&Annotation> for Region {
    fn from(ann: &Annotation) -> Self {
        Self {
            id: ann.id.clone(),
            start: ann.start,
            end: ann.end,
            label: ann.text.clone(),
        }
    }
}

/// Something the surface reports back.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// A region appeared, by user gesture or by `add_region`.
    RegionCreated(Region),
    /// A region was moved or resized.
    RegionUpdated(Region),
    /// Audio for `track` is decoded and playable.
    Ready { track: TrackId, duration: f64 },
    Play,
    Pause,
    Finished,
    TimeUpdate(f64),
    Error(String),
}

/// Token for an installed drag-selection gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GestureHandle(u64);

impl GestureHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Which visual layer is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Waveform,
    Spectrogram,
}

/// What a pointer drag on the surface does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Click to seek
    #[default]
    Navigate,
    /// Drag to create regions
    Annotate,
}

pub trait RegionSurface {
    fn clear_regions(&mut self);
    fn add_region(&mut self, region: Region);
    fn remove_region(&mut self, id: &str);
}

pub trait TransportSurface {
    /// Start loading a track. Drops every region currently drawn.
    fn load(&mut self, track: &TrackId);
    /// Drop the loaded track and its regions.
    fn unload(&mut self);
    fn seek(&mut self, seconds: f64);
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn zoom(&mut self, px_per_sec: f64);
    fn set_click_to_seek(&mut self, enabled: bool);
    fn install_drag_selection(&mut self) -> GestureHandle;
    fn remove_drag_selection(&mut self, handle: GestureHandle);
    fn set_view(&mut self, view: ViewMode);
}
