// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Waveform view: the display surface for playback and regions.
//!
//! This widget draws the time ruler, the regions, and the playhead, and
//! turns pointer gestures into region events. Audio goes through
//! [`AudioPlayer`]; the duration probe runs on a background thread and comes
//! back over a channel, so a ready event can arrive after the user has
//! already moved on to another track.

use crate::io::media::{self, AudioPlayer};
use crate::models::track::TrackId;
use crate::session::surface::{
    GestureHandle, Region, RegionSurface, SurfaceEvent, TransportSurface, ViewMode,
};
use crate::util::timefmt::format_centis;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::{Duration, Instant};

/// Minimum interval between time updates.
const TIME_UPDATE_INTERVAL: Duration = Duration::from_millis(100);
/// Pointer distance (pixels) that grabs a region edge.
const EDGE_GRAB: f32 = 6.0;
/// Drags shorter than this (pixels) count as clicks.
const MIN_DRAG: f32 = 3.0;
const VIEW_HEIGHT: f32 = 250.0;
const RULER_HEIGHT: f32 = 20.0;

const REGION_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(0, 48, 51, 51);
const DRAFT_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(0, 96, 102, 102);
const CURSOR_COLOR: egui::Color32 = egui::Color32::WHITE;
const WAVE_COLOR: egui::Color32 = egui::Color32::from_rgb(0x4d, 0x4d, 0xff);
const PROGRESS_COLOR: egui::Color32 = egui::Color32::from_rgb(0x00, 0xf0, 0xff);

/// Result of the background duration probe.
struct ProbeResult {
    track: TrackId,
    duration: Result<f64, String>,
}

/// What an in-progress pointer drag is doing.
#[derive(Debug, Clone)]
enum DragState {
    /// Drawing a new region from `anchor`
    Creating { anchor: f64, current: f64 },
    /// Moving a whole region
    Moving { id: String, grab_offset: f64 },
    /// Dragging one edge of a region
    Resizing { id: String, start_edge: bool },
}

pub struct WaveformView {
    player: AudioPlayer,
    loader: Option<Receiver<ProbeResult>>,
    track: Option<TrackId>,
    duration: f64,
    regions: Vec<Region>,
    events: Vec<SurfaceEvent>,
    px_per_sec: f64,
    scroll_offset: f32,
    click_to_seek: bool,
    drag_selection: Option<GestureHandle>,
    next_gesture: u64,
    next_region: u64,
    drag: Option<DragState>,
    view: ViewMode,
    last_time_update: Option<Instant>,
    loading: bool,
}

impl Default for WaveformView {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveformView {
    pub fn new() -> Self {
        Self {
            player: AudioPlayer::new(),
            loader: None,
            track: None,
            duration: 0.0,
            regions: Vec::new(),
            events: Vec::new(),
            px_per_sec: 10.0,
            scroll_offset: 0.0,
            click_to_seek: true,
            drag_selection: None,
            next_gesture: 0,
            next_region: 0,
            drag: None,
            view: ViewMode::Waveform,
            last_time_update: None,
            loading: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Collect everything that happened since the last call.
    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        self.poll_loader();
        self.poll_playback();
        std::mem::take(&mut self.events)
    }

    fn poll_loader(&mut self) {
        let Some(receiver) = &self.loader else {
            return;
        };
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                // The probe thread died without reporting
                self.loader = None;
                self.loading = false;
                if let Some(track) = &self.track {
                    log::error!("Duration probe for {} stopped unexpectedly", track);
                    self.events
                        .push(SurfaceEvent::Error(format!("Failed to read {}", track.file_name())));
                }
                return;
            }
        };
        self.loader = None;

        let is_current = self.track.as_ref() == Some(&result.track);
        match result.duration {
            Ok(duration) => {
                if is_current {
                    if let Err(e) = self.player.attach(&result.track) {
                        self.loading = false;
                        self.events.push(SurfaceEvent::Error(format!("{:#}", e)));
                        return;
                    }
                    self.duration = duration;
                    self.loading = false;
                }
                self.events.push(SurfaceEvent::Ready {
                    track: result.track,
                    duration,
                });
            }
            Err(e) => {
                if is_current {
                    self.loading = false;
                    self.events.push(SurfaceEvent::Error(e));
                }
            }
        }
    }

    fn poll_playback(&mut self) {
        if self.player.take_finished() {
            // Re-queue the track so it can be played again from the start
            if let Some(track) = self.track.clone() {
                if let Err(e) = self.player.attach(&track) {
                    log::warn!("Failed to rewind {}: {:#}", track, e);
                }
            }
            self.events.push(SurfaceEvent::Pause);
            self.events.push(SurfaceEvent::Finished);
            return;
        }
        if !self.player.is_playing() {
            return;
        }
        let now = Instant::now();
        let due = self
            .last_time_update
            .map(|last| now.duration_since(last) >= TIME_UPDATE_INTERVAL)
            .unwrap_or(true);
        if due {
            self.last_time_update = Some(now);
            self.events.push(SurfaceEvent::TimeUpdate(self.player.position()));
        }
    }

    fn time_at(&self, x: f32, rect: egui::Rect) -> f64 {
        let secs = f64::from(x - rect.min.x + self.scroll_offset) / self.px_per_sec;
        secs.clamp(0.0, self.duration.max(0.0))
    }

    fn x_at(&self, time: f64, rect: egui::Rect) -> f32 {
        rect.min.x + (time * self.px_per_sec) as f32 - self.scroll_offset
    }

    /// Region hit by the pointer, and whether an edge was grabbed.
    fn hit_region(&self, x: f32, rect: egui::Rect) -> Option<(usize, Option<bool>)> {
        // Topmost (last drawn) first
        self.regions.iter().enumerate().rev().find_map(|(idx, r)| {
            let left = self.x_at(r.start, rect);
            let right = self.x_at(r.end, rect);
            if (x - left).abs() <= EDGE_GRAB {
                Some((idx, Some(true)))
            } else if (x - right).abs() <= EDGE_GRAB {
                Some((idx, Some(false)))
            } else if x > left && x < right {
                Some((idx, None))
            } else {
                None
            }
        })
    }

    /// Draw the view and handle pointer input. Returns the number of mouse
    /// wheel notches scrolled over it (positive zooms in).
    pub fn show(&mut self, ui: &mut egui::Ui, position: f64) -> i32 {
        let width = ui.available_width();
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(width, VIEW_HEIGHT + RULER_HEIGHT),
            egui::Sense::click_and_drag(),
        );
        let lane = egui::Rect::from_min_max(rect.min, egui::pos2(rect.max.x, rect.max.y - RULER_HEIGHT));

        // Fill the width when the track is short, like a fill-parent waveform
        let content = (self.duration * self.px_per_sec) as f32;
        if self.duration > 0.0 && content < lane.width() {
            self.px_per_sec = f64::from(lane.width()) / self.duration;
        }
        let content = (self.duration * self.px_per_sec) as f32;
        let max_scroll = (content - lane.width()).max(0.0);

        // Keep the playhead in view while playing
        if self.player.is_playing() {
            let head = (position * self.px_per_sec) as f32;
            if head < self.scroll_offset || head > self.scroll_offset + lane.width() {
                self.scroll_offset = head - lane.width() * 0.1;
            }
        }
        self.scroll_offset = self.scroll_offset.clamp(0.0, max_scroll);

        let mut notches = 0;
        if response.hovered() {
            let (scroll, shift) = ui.input(|i| (i.raw_scroll_delta, i.modifiers.shift));
            if shift || scroll.x.abs() > scroll.y.abs() {
                let delta = if scroll.x != 0.0 { scroll.x } else { scroll.y };
                self.scroll_offset = (self.scroll_offset - delta).clamp(0.0, max_scroll);
            } else if scroll.y > 0.0 {
                notches = 1;
            } else if scroll.y < 0.0 {
                notches = -1;
            }
        }

        self.handle_pointer(&response, lane);
        self.paint(ui, rect, lane, position);
        notches
    }

    fn handle_pointer(&mut self, response: &egui::Response, lane: egui::Rect) {
        if self.duration <= 0.0 {
            return;
        }
        let pointer = response.interact_pointer_pos();

        if response.drag_started() {
            if let Some(pos) = pointer {
                let time = self.time_at(pos.x, lane);
                self.drag = match self.hit_region(pos.x, lane) {
                    Some((idx, Some(start_edge))) => Some(DragState::Resizing {
                        id: self.regions[idx].id.clone(),
                        start_edge,
                    }),
                    Some((idx, None)) => Some(DragState::Moving {
                        id: self.regions[idx].id.clone(),
                        grab_offset: time - self.regions[idx].start,
                    }),
                    None if self.drag_selection.is_some() => Some(DragState::Creating {
                        anchor: time,
                        current: time,
                    }),
                    None => None,
                };
            }
        }

        if response.dragged() {
            if let (Some(pos), Some(drag)) = (pointer, self.drag.as_mut()) {
                let time = {
                    let secs = f64::from(pos.x - lane.min.x + self.scroll_offset) / self.px_per_sec;
                    secs.clamp(0.0, self.duration)
                };
                let duration = self.duration;
                match drag {
                    DragState::Creating { current, .. } => *current = time,
                    DragState::Moving { id, grab_offset } => {
                        if let Some(region) = self.regions.iter_mut().find(|r| r.id == *id) {
                            let length = region.end - region.start;
                            let start = (time - *grab_offset).clamp(0.0, (duration - length).max(0.0));
                            region.start = start;
                            region.end = start + length;
                        }
                    }
                    DragState::Resizing { id, start_edge } => {
                        if let Some(region) = self.regions.iter_mut().find(|r| r.id == *id) {
                            if *start_edge {
                                region.start = time.min(region.end);
                            } else {
                                region.end = time.max(region.start);
                            }
                        }
                    }
                }
            }
        }

        if response.drag_stopped() {
            match self.drag.take() {
                Some(DragState::Creating { anchor, current }) => {
                    let (start, end) = if anchor <= current { (anchor, current) } else { (current, anchor) };
                    let wide_enough = ((end - start) * self.px_per_sec) as f32 >= MIN_DRAG;
                    if wide_enough {
                        self.next_region += 1;
                        let region = Region {
                            id: format!("region-{}", self.next_region),
                            start,
                            end,
                            label: String::new(),
                        };
                        self.regions.push(region.clone());
                        self.events.push(SurfaceEvent::RegionCreated(region));
                    }
                }
                Some(DragState::Moving { id, .. }) | Some(DragState::Resizing { id, .. }) => {
                    if let Some(region) = self.regions.iter().find(|r| r.id == id) {
                        self.events.push(SurfaceEvent::RegionUpdated(region.clone()));
                    }
                }
                None => {}
            }
        }

        if response.clicked() && self.click_to_seek {
            if let Some(pos) = pointer {
                let time = self.time_at(pos.x, lane);
                self.seek(time);
                self.events.push(SurfaceEvent::TimeUpdate(time));
            }
        }
    }

    fn paint(&self, ui: &egui::Ui, rect: egui::Rect, lane: egui::Rect, position: f64) {
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 4.0, egui::Color32::from_rgb(0x0a, 0x0a, 0x0e));

        if self.track.is_none() {
            painter.text(
                lane.center(),
                egui::Align2::CENTER_CENTER,
                "Select a track to start",
                egui::FontId::proportional(14.0),
                egui::Color32::from_gray(130),
            );
            return;
        }
        if self.loading {
            painter.text(
                lane.center(),
                egui::Align2::CENTER_CENTER,
                "Loading...",
                egui::FontId::proportional(14.0),
                egui::Color32::from_gray(180),
            );
        }

        // Both layers are always laid out; only one is drawn
        match self.view {
            ViewMode::Waveform => self.paint_waveform_layer(&painter, lane, position),
            ViewMode::Spectrogram => self.paint_spectrogram_layer(&painter, lane),
        }

        self.paint_ruler(&painter, rect, lane);

        for region in &self.regions {
            let left = self.x_at(region.start, lane);
            let right = self.x_at(region.end, lane);
            let region_rect = egui::Rect::from_min_max(egui::pos2(left, lane.min.y), egui::pos2(right.max(left + 1.0), lane.max.y));
            painter.rect_filled(region_rect, 0.0, REGION_FILL);
            painter.line_segment(
                [region_rect.left_top(), region_rect.left_bottom()],
                egui::Stroke::new(1.0, PROGRESS_COLOR),
            );
            painter.line_segment(
                [region_rect.right_top(), region_rect.right_bottom()],
                egui::Stroke::new(1.0, PROGRESS_COLOR),
            );
            if !region.label.is_empty() {
                painter.text(
                    region_rect.left_top() + egui::vec2(4.0, 4.0),
                    egui::Align2::LEFT_TOP,
                    &region.label,
                    egui::FontId::proportional(12.0),
                    egui::Color32::WHITE,
                );
            }
        }

        if let Some(DragState::Creating { anchor, current }) = &self.drag {
            let a = self.x_at(*anchor, lane);
            let b = self.x_at(*current, lane);
            let draft = egui::Rect::from_x_y_ranges(a.min(b)..=a.max(b), lane.y_range());
            painter.rect_filled(draft, 0.0, DRAFT_FILL);
        }

        let head = self.x_at(position, lane);
        painter.line_segment(
            [egui::pos2(head, lane.min.y), egui::pos2(head, lane.max.y)],
            egui::Stroke::new(1.5, CURSOR_COLOR),
        );
    }

    fn paint_waveform_layer(&self, painter: &egui::Painter, lane: egui::Rect, position: f64) {
        let mid = lane.center().y;
        let head = self.x_at(position, lane).clamp(lane.min.x, lane.max.x);
        let end = self.x_at(self.duration, lane).clamp(lane.min.x, lane.max.x);
        painter.line_segment(
            [egui::pos2(lane.min.x, mid), egui::pos2(head, mid)],
            egui::Stroke::new(2.0, PROGRESS_COLOR),
        );
        painter.line_segment(
            [egui::pos2(head, mid), egui::pos2(end, mid)],
            egui::Stroke::new(2.0, WAVE_COLOR),
        );
    }

    fn paint_spectrogram_layer(&self, painter: &egui::Painter, lane: egui::Rect) {
        let end = self.x_at(self.duration, lane).clamp(lane.min.x, lane.max.x);
        let bands = 8;
        let band_height = lane.height() / bands as f32;
        for band in 0..bands {
            let shade = 20 + (band * 6) as u8;
            let y = lane.min.y + band as f32 * band_height;
            painter.rect_filled(
                egui::Rect::from_min_max(egui::pos2(lane.min.x, y), egui::pos2(end, y + band_height)),
                0.0,
                egui::Color32::from_rgb(shade, 0, shade + 20),
            );
        }
    }

    fn paint_ruler(&self, painter: &egui::Painter, rect: egui::Rect, lane: egui::Rect) {
        // Label every 10s, tick every 5s, tighter when zoomed in
        let (tick, label_every) = if self.px_per_sec >= 100.0 { (1.0, 5) } else { (5.0, 2) };
        let first = (f64::from(self.scroll_offset) / self.px_per_sec / tick).floor() as i64;
        let last = ((f64::from(self.scroll_offset + lane.width())) / self.px_per_sec / tick).ceil() as i64;
        for n in first.max(0)..=last {
            let time = n as f64 * tick;
            if time > self.duration {
                break;
            }
            let x = self.x_at(time, lane);
            let labeled = n % label_every == 0;
            let tick_height = if labeled { 8.0 } else { 4.0 };
            painter.line_segment(
                [egui::pos2(x, lane.max.y), egui::pos2(x, lane.max.y + tick_height)],
                egui::Stroke::new(1.0, egui::Color32::from_gray(0x88)),
            );
            if labeled {
                painter.text(
                    egui::pos2(x + 2.0, rect.max.y - 2.0),
                    egui::Align2::LEFT_BOTTOM,
                    format_centis(time),
                    egui::FontId::proportional(10.0),
                    egui::Color32::from_gray(0x88),
                );
            }
        }
    }
}

impl RegionSurface for WaveformView {
    fn clear_regions(&mut self) {
        self.regions.clear();
    }

    fn add_region(&mut self, region: Region) {
        self.regions.push(region.clone());
        self.events.push(SurfaceEvent::RegionCreated(region));
    }

    fn remove_region(&mut self, id: &str) {
        self.regions.retain(|r| r.id != id);
    }
}

impl TransportSurface for WaveformView {
    fn load(&mut self, track: &TrackId) {
        self.player.detach();
        self.regions.clear();
        self.drag = None;
        self.duration = 0.0;
        self.scroll_offset = 0.0;
        self.track = Some(track.clone());
        self.loading = true;

        let (sender, receiver) = channel();
        self.loader = Some(receiver);
        let track = track.clone();
        std::thread::spawn(move || {
            let duration = media::probe_duration(&track.to_path()).map_err(|e| format!("{:#}", e));
            let _ = sender.send(ProbeResult { track, duration });
        });
    }

    fn unload(&mut self) {
        self.player.detach();
        self.loader = None;
        self.track = None;
        self.loading = false;
        self.regions.clear();
        self.drag = None;
        self.duration = 0.0;
        self.scroll_offset = 0.0;
    }

    fn seek(&mut self, seconds: f64) {
        self.player.seek(seconds);
    }

    fn play(&mut self) {
        if self.player.loaded().is_some() {
            self.player.play();
            self.events.push(SurfaceEvent::Play);
        }
    }

    fn pause(&mut self) {
        self.player.pause();
        self.events.push(SurfaceEvent::Pause);
    }

    fn stop(&mut self) {
        self.player.pause();
        self.player.seek(0.0);
        self.events.push(SurfaceEvent::Pause);
        self.events.push(SurfaceEvent::TimeUpdate(0.0));
    }

    fn zoom(&mut self, px_per_sec: f64) {
        self.px_per_sec = px_per_sec;
    }

    fn set_click_to_seek(&mut self, enabled: bool) {
        self.click_to_seek = enabled;
    }

    fn install_drag_selection(&mut self) -> GestureHandle {
        if let Some(previous) = self.drag_selection {
            log::warn!("Replacing drag selection {:?} that was never removed", previous);
        }
        self.next_gesture += 1;
        let handle = GestureHandle::new(self.next_gesture);
        self.drag_selection = Some(handle);
        handle
    }

    fn remove_drag_selection(&mut self, handle: GestureHandle) {
        if self.drag_selection == Some(handle) {
            self.drag_selection = None;
            if matches!(self.drag, Some(DragState::Creating { .. })) {
                self.drag = None;
            }
        }
    }

    fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::Sender;

    /// A view that is loading `track`, fed by the returned sender.
    fn loading_view(track: &TrackId) -> (WaveformView, Sender<ProbeResult>) {
        let mut view = WaveformView::new();
        let (sender, receiver) = channel();
        view.track = Some(track.clone());
        view.loader = Some(receiver);
        view.loading = true;
        (view, sender)
    }

    #[test]
    fn test_dead_probe_reports_error() {
        let track = TrackId::from_path("/music/a.wav");
        let (mut view, sender) = loading_view(&track);
        drop(sender);

        let events = view.take_events();
        assert!(matches!(events.as_slice(), [SurfaceEvent::Error(_)]));
        assert!(!view.is_loading());
        assert!(view.loader.is_none());
        assert!(view.take_events().is_empty());
    }

    #[test]
    fn test_pending_probe_keeps_loading() {
        let track = TrackId::from_path("/music/a.wav");
        let (mut view, _sender) = loading_view(&track);

        assert!(view.take_events().is_empty());
        assert!(view.is_loading());
    }

    #[test]
    fn test_stale_probe_result_is_passed_on_without_attaching() {
        let old = TrackId::from_path("/music/old.wav");
        let current = TrackId::from_path("/music/new.wav");
        let (mut view, sender) = loading_view(&current);
        sender
            .send(ProbeResult { track: old.clone(), duration: Ok(12.0) })
            .unwrap();

        let events = view.take_events();
        assert_eq!(events, vec![SurfaceEvent::Ready { track: old, duration: 12.0 }]);
        assert!(view.is_loading());
        assert!(view.player.loaded().is_none());
        assert_eq!(view.duration, 0.0);
    }

    #[test]
    fn test_stale_probe_error_is_dropped() {
        let old = TrackId::from_path("/music/old.wav");
        let current = TrackId::from_path("/music/new.wav");
        let (mut view, sender) = loading_view(&current);
        sender
            .send(ProbeResult { track: old, duration: Err("bad file".into()) })
            .unwrap();

        assert!(view.take_events().is_empty());
        assert!(view.is_loading());
    }

    #[test]
    fn test_current_probe_error_is_reported() {
        let track = TrackId::from_path("/music/a.wav");
        let (mut view, sender) = loading_view(&track);
        sender
            .send(ProbeResult { track, duration: Err("bad file".into()) })
            .unwrap();

        assert_eq!(view.take_events(), vec![SurfaceEvent::Error("bad file".into())]);
        assert!(!view.is_loading());
    }

    #[test]
    fn test_unload_drops_pending_probe() {
        let track = TrackId::from_path("/music/a.wav");
        let (mut view, sender) = loading_view(&track);
        view.add_region(Region { id: "x".into(), start: 1.0, end: 2.0, label: String::new() });
        view.take_events();

        view.unload();
        drop(sender);
        assert!(view.take_events().is_empty());
        assert!(view.regions.is_empty());
        assert!(!view.is_loading());
    }

    #[test]
    fn test_added_region_raises_created() {
        let mut view = WaveformView::new();
        let region = Region { id: "x".into(), start: 1.0, end: 2.0, label: "intro".into() };
        view.add_region(region.clone());

        assert_eq!(view.take_events(), vec![SurfaceEvent::RegionCreated(region)]);
        view.remove_region("x");
        assert!(view.regions.is_empty());
    }

    #[test]
    fn test_drag_selection_only_removed_by_its_handle() {
        let mut view = WaveformView::new();
        let first = view.install_drag_selection();
        view.remove_drag_selection(first);
        let second = view.install_drag_selection();

        view.remove_drag_selection(first);
        assert_eq!(view.drag_selection, Some(second));
        view.remove_drag_selection(second);
        assert!(view.drag_selection.is_none());
    }
}
