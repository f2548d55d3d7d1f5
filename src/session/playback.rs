// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback session: the loaded track, transport, zoom, and interaction mode.

use super::surface::{GestureHandle, InteractionMode, SurfaceEvent, TransportSurface, ViewMode};
use crate::models::track::TrackId;

/// Zoom range in pixels per second.
pub const MIN_ZOOM: f64 = 10.0;
pub const MAX_ZOOM: f64 = 500.0;
/// Zoom change per mouse-wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No track loaded
    Empty,
    /// Load requested, surface not ready yet
    Loading,
    /// Playable
    Ready,
}

/// Something the host may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionNotice {
    Ready,
    Finished,
    Error(String),
}

#[derive(Debug)]
pub struct PlaybackSession {
    state: PlaybackState,
    playing: bool,
    track: Option<TrackId>,
    position: f64,
    duration: f64,
    zoom: f64,
    mode: InteractionMode,
    view: ViewMode,
    error: Option<String>,
    /// Start playing once the pending load is ready
    auto_start: bool,
    /// Seek requested while loading
    pending_seek: Option<f64>,
    gesture: Option<GestureHandle>,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Empty,
            playing: false,
            track: None,
            position: 0.0,
            duration: 0.0,
            zoom: MIN_ZOOM,
            mode: InteractionMode::Navigate,
            view: ViewMode::Waveform,
            error: None,
            auto_start: false,
            pending_seek: None,
            gesture: None,
        }
    }

    /// Start loading a track.
    ///
    /// `auto_play` is sampled now; toggling it later does not affect this load.
    pub fn load<S: TransportSurface + ?Sized>(&mut self, surface: &mut S, track: &TrackId, auto_play: bool) {
        log::info!("Loading {}", track);
        self.state = PlaybackState::Loading;
        self.track = Some(track.clone());
        self.error = None;
        self.playing = false;
        self.position = 0.0;
        self.duration = 0.0;
        self.auto_start = auto_play;
        self.pending_seek = None;
        surface.load(track);
    }

    /// Forget the loaded track.
    pub fn unload<S: TransportSurface + ?Sized>(&mut self, surface: &mut S) {
        if self.track.take().is_none() {
            return;
        }
        self.state = PlaybackState::Empty;
        self.playing = false;
        self.position = 0.0;
        self.duration = 0.0;
        self.auto_start = false;
        self.pending_seek = None;
        self.error = None;
        surface.unload();
    }

    /// Seek now when ready, or once the pending load is ready.
    ///
    /// Every call reaches the surface, including one for the time it is
    /// already at.
    pub fn seek<S: TransportSurface + ?Sized>(&mut self, surface: &mut S, time: f64) {
        match self.state {
            PlaybackState::Ready => {
                surface.seek(time);
                self.position = time;
            }
            PlaybackState::Loading => {
                self.pending_seek = Some(time);
            }
            PlaybackState::Empty => {}
        }
    }

    pub fn toggle_play<S: TransportSurface + ?Sized>(&mut self, surface: &mut S) {
        if self.state != PlaybackState::Ready {
            return;
        }
        if self.playing {
            surface.pause();
        } else {
            surface.play();
        }
    }

    pub fn stop<S: TransportSurface + ?Sized>(&mut self, surface: &mut S) {
        if self.state != PlaybackState::Ready {
            return;
        }
        surface.stop();
        self.position = 0.0;
    }

    /// Set the zoom level, clamped to the supported range.
    pub fn set_zoom<S: TransportSurface + ?Sized>(&mut self, surface: &mut S, level: f64) {
        self.zoom = level.clamp(MIN_ZOOM, MAX_ZOOM);
        if self.state == PlaybackState::Ready {
            surface.zoom(self.zoom);
        }
    }

    /// Apply mouse-wheel notches (positive zooms in).
    pub fn wheel_zoom<S: TransportSurface + ?Sized>(&mut self, surface: &mut S, notches: i32) {
        let level = self.zoom + f64::from(notches) * WHEEL_ZOOM_STEP;
        self.set_zoom(surface, level);
    }

    /// Switch between click-to-seek and drag-to-create.
    ///
    /// The previous drag gesture is removed before a new one is installed.
    pub fn set_interaction_mode<S: TransportSurface + ?Sized>(&mut self, surface: &mut S, mode: InteractionMode) {
        if let Some(handle) = self.gesture.take() {
            surface.remove_drag_selection(handle);
        }
        match mode {
            InteractionMode::Navigate => {
                surface.set_click_to_seek(true);
            }
            InteractionMode::Annotate => {
                surface.set_click_to_seek(false);
                self.gesture = Some(surface.install_drag_selection());
            }
        }
        self.mode = mode;
    }

    /// Show the waveform or spectrogram layer. Audio is not reloaded.
    pub fn set_view<S: TransportSurface + ?Sized>(&mut self, surface: &mut S, view: ViewMode) {
        self.view = view;
        surface.set_view(view);
    }

    /// Apply a surface event to the session state.
    pub fn handle<S: TransportSurface + ?Sized>(&mut self, surface: &mut S, event: &SurfaceEvent) -> Option<SessionNotice> {
        match event {
            SurfaceEvent::Ready { track, duration } => {
                if self.track.as_ref() != Some(track) || self.state != PlaybackState::Loading {
                    log::debug!("Ignoring stale ready event for {}", track);
                    return None;
                }
                self.state = PlaybackState::Ready;
                self.duration = *duration;
                if let Some(time) = self.pending_seek.take() {
                    surface.seek(time);
                    self.position = time;
                }
                surface.zoom(self.zoom);
                if std::mem::take(&mut self.auto_start) {
                    surface.play();
                }
                log::info!("Ready: {} ({:.2}s)", track, duration);
                Some(SessionNotice::Ready)
            }
            SurfaceEvent::Play => {
                self.playing = true;
                None
            }
            SurfaceEvent::Pause => {
                self.playing = false;
                None
            }
            SurfaceEvent::Finished => {
                self.playing = false;
                self.position = 0.0;
                Some(SessionNotice::Finished)
            }
            SurfaceEvent::TimeUpdate(time) => {
                self.position = *time;
                None
            }
            SurfaceEvent::Error(message) => {
                log::error!("Playback error: {}", message);
                self.playing = false;
                self.error = Some(message.clone());
                Some(SessionNotice::Error(message.clone()))
            }
            SurfaceEvent::RegionCreated(_) | SurfaceEvent::RegionUpdated(_) => None,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == PlaybackState::Ready
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn track(&self) -> Option<&TrackId> {
        self.track.as_ref()
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::surface::testing::{FakeSurface, SurfaceCall};

    fn ready(track: &TrackId) -> SurfaceEvent {
        SurfaceEvent::Ready { track: track.clone(), duration: 60.0 }
    }

    fn loaded_session(surface: &mut FakeSurface) -> (PlaybackSession, TrackId) {
        let track = TrackId::from_path("/music/a.wav");
        let mut session = PlaybackSession::new();
        session.load(surface, &track, false);
        session.handle(surface, &ready(&track));
        surface.calls.clear();
        (session, track)
    }

    #[test]
    fn test_load_then_ready() {
        let mut surface = FakeSurface::new();
        let track = TrackId::from_path("/music/a.wav");
        let mut session = PlaybackSession::new();
        assert_eq!(session.state(), PlaybackState::Empty);

        session.load(&mut surface, &track, false);
        assert_eq!(session.state(), PlaybackState::Loading);

        assert_eq!(session.handle(&mut surface, &ready(&track)), Some(SessionNotice::Ready));
        assert!(session.is_ready());
        assert_eq!(session.duration(), 60.0);
        assert_eq!(surface.count(|c| matches!(c, SurfaceCall::Play)), 0);
    }

    #[test]
    fn test_repeated_seek_reaches_surface_twice() {
        let mut surface = FakeSurface::new();
        let (mut session, _) = loaded_session(&mut surface);

        session.seek(&mut surface, 10.0);
        session.seek(&mut surface, 10.0);

        assert_eq!(surface.calls, vec![SurfaceCall::Seek(10.0), SurfaceCall::Seek(10.0)]);
    }

    #[test]
    fn test_queued_seek_applies_once_before_auto_start() {
        let mut surface = FakeSurface::new();
        let track = TrackId::from_path("/music/a.wav");
        let mut session = PlaybackSession::new();

        session.load(&mut surface, &track, true);
        session.seek(&mut surface, 4.0);
        session.seek(&mut surface, 7.5);
        surface.calls.clear();

        session.handle(&mut surface, &ready(&track));
        let seeks: Vec<_> = surface.calls.iter().filter(|c| matches!(c, SurfaceCall::Seek(_))).collect();
        assert_eq!(seeks, vec![&SurfaceCall::Seek(7.5)]);

        let seek_at = surface.calls.iter().position(|c| matches!(c, SurfaceCall::Seek(_))).unwrap();
        let play_at = surface.calls.iter().position(|c| matches!(c, SurfaceCall::Play)).unwrap();
        assert!(seek_at < play_at);
        assert_eq!(session.position(), 7.5);
    }

    #[test]
    fn test_auto_play_is_sampled_at_load() {
        let mut surface = FakeSurface::new();
        let track = TrackId::from_path("/music/a.wav");
        let mut session = PlaybackSession::new();

        session.load(&mut surface, &track, false);
        session.handle(&mut surface, &ready(&track));
        assert_eq!(surface.count(|c| matches!(c, SurfaceCall::Play)), 0);
    }

    #[test]
    fn test_stale_ready_is_ignored() {
        let mut surface = FakeSurface::new();
        let first = TrackId::from_path("/music/a.wav");
        let second = TrackId::from_path("/music/b.wav");
        let mut session = PlaybackSession::new();

        session.load(&mut surface, &first, true);
        session.load(&mut surface, &second, true);
        assert_eq!(session.handle(&mut surface, &ready(&first)), None);
        assert_eq!(session.state(), PlaybackState::Loading);
        assert_eq!(surface.count(|c| matches!(c, SurfaceCall::Play)), 0);

        assert_eq!(session.handle(&mut surface, &ready(&second)), Some(SessionNotice::Ready));
        assert_eq!(surface.count(|c| matches!(c, SurfaceCall::Play)), 1);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut surface = FakeSurface::new();
        let (mut session, _) = loaded_session(&mut surface);

        session.set_zoom(&mut surface, 1000.0);
        assert_eq!(session.zoom(), MAX_ZOOM);
        session.set_zoom(&mut surface, 0.0);
        assert_eq!(session.zoom(), MIN_ZOOM);

        session.wheel_zoom(&mut surface, 1);
        assert_eq!(session.zoom(), 30.0);
        session.wheel_zoom(&mut surface, -5);
        assert_eq!(session.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_mode_switch_never_stacks_gestures() {
        let mut surface = FakeSurface::new();
        let mut session = PlaybackSession::new();

        session.set_interaction_mode(&mut surface, InteractionMode::Annotate);
        session.set_interaction_mode(&mut surface, InteractionMode::Annotate);
        assert_eq!(surface.active_gestures.len(), 1);

        let remove_at = surface.calls.iter().position(|c| matches!(c, SurfaceCall::RemoveDrag(_))).unwrap();
        let second_install = surface
            .calls
            .iter()
            .rposition(|c| matches!(c, SurfaceCall::InstallDrag(_)))
            .unwrap();
        assert!(remove_at < second_install);

        session.set_interaction_mode(&mut surface, InteractionMode::Navigate);
        assert!(surface.active_gestures.is_empty());
        assert_eq!(surface.calls.last(), Some(&SurfaceCall::ClickToSeek(true)));
    }

    #[test]
    fn test_error_keeps_session_alive() {
        let mut surface = FakeSurface::new();
        let (mut session, track) = loaded_session(&mut surface);

        let notice = session.handle(&mut surface, &SurfaceEvent::Error("decode failed".into()));
        assert_eq!(notice, Some(SessionNotice::Error("decode failed".into())));
        assert_eq!(session.error(), Some("decode failed"));

        session.load(&mut surface, &track, false);
        assert_eq!(session.error(), None);
    }

    #[test]
    fn test_view_switch_does_not_reload() {
        let mut surface = FakeSurface::new();
        let (mut session, _) = loaded_session(&mut surface);

        session.set_view(&mut surface, ViewMode::Spectrogram);
        assert_eq!(surface.calls, vec![SurfaceCall::View(ViewMode::Spectrogram)]);
        assert!(session.is_ready());
    }

    #[test]
    fn test_finished_reports_and_rewinds() {
        let mut surface = FakeSurface::new();
        let (mut session, _) = loaded_session(&mut surface);
        session.handle(&mut surface, &SurfaceEvent::Play);
        session.handle(&mut surface, &SurfaceEvent::TimeUpdate(59.0));

        assert_eq!(session.handle(&mut surface, &SurfaceEvent::Finished), Some(SessionNotice::Finished));
        assert!(!session.is_playing());
        assert_eq!(session.position(), 0.0);
    }

    #[test]
    fn test_unload_discards_late_ready() {
        let mut surface = FakeSurface::new();
        let track = TrackId::from_path("/music/a.wav");
        let mut session = PlaybackSession::new();
        session.load(&mut surface, &track, true);
        session.unload(&mut surface);

        assert_eq!(session.state(), PlaybackState::Empty);
        assert!(session.track().is_none());
        assert_eq!(session.handle(&mut surface, &ready(&track)), None);
        assert_eq!(surface.count(|c| matches!(c, SurfaceCall::Play)), 0);

        // A second unload has nothing to drop
        let calls = surface.calls.len();
        session.unload(&mut surface);
        assert_eq!(surface.calls.len(), calls);
    }
}
