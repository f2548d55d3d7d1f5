// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Keeps the surface's regions in step with the stored annotations.
//!
//! Store to surface: [`RegionSync::push`] replaces every region whenever the
//! annotation list for the displayed track actually changed. Surface to
//! store: [`RegionSync::handle`] turns user gestures into [`RegionChange`]s.
//!
//! A push makes the surface raise creation events of its own, either while
//! the push runs or on a later frame. Every region event that arrives while
//! the sync flag is set is dropped. The flag is released by
//! [`RegionSync::settle`], which the host calls once per frame after draining
//! surface events and before pushing, so a push from frame N stays guarded
//! through the event drain of frame N+1.

use super::surface::{Region, RegionSurface, SurfaceEvent};
use crate::models::annotation::Annotation;
use std::collections::HashSet;

/// A store mutation requested by the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionChange {
    /// The user drew a new region.
    Created(Annotation),
    /// The user moved or resized an existing region. Never carries a label.
    Updated { id: String, start: f64, end: f64 },
}

#[derive(Debug, Default)]
pub struct RegionSync {
    /// Programmatic sync in progress
    syncing: bool,
    /// The list most recently pushed to the surface
    last_pushed: Vec<Annotation>,
    /// Ids of regions this adapter created
    known_ids: HashSet<String>,
}

impl RegionSync {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_syncing(&self) -> bool {
        self.syncing
    }

    /// Mirror `annotations` on the surface.
    ///
    /// Skipped when the list matches the last pushed one position by
    /// position. Returns whether the surface was touched.
    pub fn push<S>(&mut self, surface: &mut S, annotations: &[Annotation]) -> bool
    where
        S: RegionSurface + ?Sized,
    {
        if annotations == self.last_pushed.as_slice() {
            return false;
        }

        self.syncing = true;
        self.last_pushed = annotations.to_vec();
        self.known_ids = annotations.iter().map(|a| a.id.clone()).collect();

        surface.clear_regions();
        for region in region_set(annotations) {
            surface.add_region(region);
        }
        log::debug!("Pushed {} regions to the surface", self.known_ids.len());
        true
    }

    /// Release the sync flag set by the previous frame's push.
    pub fn settle(&mut self) {
        if self.syncing {
            self.syncing = false;
            log::debug!("Region sync settled");
        }
    }

    /// Forget what was pushed. Call when the surface dropped its regions,
    /// e.g. because a new track started loading.
    pub fn reset(&mut self) {
        self.last_pushed.clear();
        self.known_ids.clear();
    }

    /// Translate a surface event into a store change, if it is one.
    pub fn handle<S>(&mut self, surface: &mut S, event: &SurfaceEvent) -> Option<RegionChange>
    where
        S: RegionSurface + ?Sized,
    {
        match event {
            SurfaceEvent::RegionCreated(region) => {
                if self.syncing {
                    log::debug!("Ignoring region {} created during sync", region.id);
                    return None;
                }
                if self.known_ids.contains(&region.id) {
                    return None;
                }
                let annotation = Annotation::new(region.start, region.end);
                log::info!(
                    "New annotation {} ({:.2}s - {:.2}s)",
                    annotation.id,
                    annotation.start,
                    annotation.end
                );
                // The permanent region comes back with the next push
                surface.remove_region(&region.id);
                Some(RegionChange::Created(annotation))
            }
            SurfaceEvent::RegionUpdated(region) => {
                if self.syncing {
                    log::debug!("Ignoring region {} updated during sync", region.id);
                    return None;
                }
                if !self.known_ids.contains(&region.id) {
                    return None;
                }
                Some(RegionChange::Updated {
                    id: region.id.clone(),
                    start: region.start,
                    end: region.end,
                })
            }
            _ => None,
        }
    }
}

/// One region per id; for duplicate ids the last annotation wins.
fn region_set(annotations: &[Annotation]) -> Vec<Region> {
    let mut regions: Vec<Region> = Vec::with_capacity(annotations.len());
    for ann in annotations {
        let region = Region::from(ann);
        match regions.iter_mut().find(|r| r.id == region.id) {
            Some(existing) => *existing = region,
            None => regions.push(region),
        }
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::surface::testing::{FakeSurface, SurfaceCall};

    fn ann(id: &str, start: f64, end: f64, text: &str) -> Annotation {
        Annotation { id: id.into(), start, end, text: text.into() }
    }

    fn region(id: &str, start: f64, end: f64) -> Region {
        Region { id: id.into(), start, end, label: String::new() }
    }

    /// Drain the surface the way the host does at the top of a frame.
    fn drain(sync: &mut RegionSync, surface: &mut FakeSurface) -> Vec<RegionChange> {
        let events = surface.take_events();
        let changes = events.iter().filter_map(|e| sync.handle(surface, e)).collect();
        sync.settle();
        changes
    }

    #[test]
    fn test_push_then_identical_push_is_skipped() {
        let mut surface = FakeSurface::new();
        let mut sync = RegionSync::new();
        let list = vec![ann("x", 1.0, 2.0, "")];

        assert!(sync.push(&mut surface, &list));
        assert_eq!(surface.count(|c| matches!(c, SurfaceCall::AddRegion(_))), 1);

        let calls_before = surface.calls.len();
        assert!(!sync.push(&mut surface, &list.clone()));
        assert_eq!(surface.calls.len(), calls_before);
    }

    #[test]
    fn test_push_events_do_not_feed_back() {
        let mut surface = FakeSurface::new();
        let mut sync = RegionSync::new();

        sync.push(&mut surface, &[ann("x", 1.0, 2.0, "")]);
        assert!(sync.is_syncing());

        // The fake raised a creation event for the programmatic region
        let changes = drain(&mut sync, &mut surface);
        assert!(changes.is_empty());
        assert_eq!(surface.regions.len(), 1);
        assert!(!sync.is_syncing());
    }

    #[test]
    fn test_any_event_during_sync_is_discarded() {
        let mut surface = FakeSurface::new();
        let mut sync = RegionSync::new();
        sync.push(&mut surface, &[ann("x", 1.0, 2.0, "")]);
        surface.take_events();

        let created = SurfaceEvent::RegionCreated(region("region-7", 3.0, 4.0));
        let updated = SurfaceEvent::RegionUpdated(region("x", 5.0, 6.0));
        assert_eq!(sync.handle(&mut surface, &created), None);
        assert_eq!(sync.handle(&mut surface, &updated), None);
        assert_eq!(surface.count(|c| matches!(c, SurfaceCall::RemoveRegion(_))), 0);
    }

    #[test]
    fn test_user_drag_creates_annotation_and_drops_transient_region() {
        let mut surface = FakeSurface::new();
        let mut sync = RegionSync::new();

        let event = SurfaceEvent::RegionCreated(region("region-1", 3.5, 4.25));
        let change = sync.handle(&mut surface, &event);

        let Some(RegionChange::Created(created)) = change else {
            panic!("expected a created annotation, got {:?}", change);
        };
        assert_ne!(created.id, "region-1");
        assert_eq!(created.start, 3.5);
        assert_eq!(created.end, 4.25);
        assert_eq!(created.text, "");
        assert_eq!(surface.calls, vec![SurfaceCall::RemoveRegion("region-1".into())]);
    }

    #[test]
    fn test_created_event_for_known_region_is_ignored() {
        let mut surface = FakeSurface::new();
        let mut sync = RegionSync::new();
        sync.push(&mut surface, &[ann("x", 1.0, 2.0, "")]);
        drain(&mut sync, &mut surface);

        let event = SurfaceEvent::RegionCreated(region("x", 1.0, 2.0));
        assert_eq!(sync.handle(&mut surface, &event), None);
    }

    #[test]
    fn test_drag_of_known_region_reports_range_only() {
        let mut surface = FakeSurface::new();
        let mut sync = RegionSync::new();
        sync.push(&mut surface, &[ann("x", 1.0, 2.0, "intro")]);
        drain(&mut sync, &mut surface);

        let event = SurfaceEvent::RegionUpdated(Region {
            id: "x".into(),
            start: 1.5,
            end: 2.5,
            label: "something else".into(),
        });
        assert_eq!(
            sync.handle(&mut surface, &event),
            Some(RegionChange::Updated { id: "x".into(), start: 1.5, end: 2.5 })
        );

        let unknown = SurfaceEvent::RegionUpdated(region("ghost", 0.0, 1.0));
        assert_eq!(sync.handle(&mut surface, &unknown), None);
    }

    #[test]
    fn test_duplicate_ids_last_wins() {
        let mut surface = FakeSurface::new();
        let mut sync = RegionSync::new();
        sync.push(
            &mut surface,
            &[ann("x", 1.0, 2.0, "first"), ann("y", 3.0, 4.0, ""), ann("x", 5.0, 6.0, "second")],
        );

        assert_eq!(surface.regions.len(), 2);
        assert_eq!(surface.regions[0].label, "second");
        assert_eq!(surface.regions[0].start, 5.0);
    }

    #[test]
    fn test_degenerate_range_passes_through() {
        let mut surface = FakeSurface::new();
        let mut sync = RegionSync::new();
        sync.push(&mut surface, &[ann("x", 2.0, 2.0, "")]);
        assert_eq!(surface.regions[0].start, surface.regions[0].end);
    }

    #[test]
    fn test_reordered_list_is_resynced() {
        let mut surface = FakeSurface::new();
        let mut sync = RegionSync::new();
        let a = ann("a", 1.0, 2.0, "");
        let b = ann("b", 3.0, 4.0, "");

        sync.push(&mut surface, &[a.clone(), b.clone()]);
        assert!(sync.push(&mut surface, &[b, a]));
    }

    #[test]
    fn test_label_change_is_resynced() {
        let mut surface = FakeSurface::new();
        let mut sync = RegionSync::new();
        sync.push(&mut surface, &[ann("a", 1.0, 2.0, "")]);
        assert!(sync.push(&mut surface, &[ann("a", 1.0, 2.0, "verse")]));
        assert_eq!(surface.regions[0].label, "verse");
    }

    #[test]
    fn test_reset_forces_next_push() {
        let mut surface = FakeSurface::new();
        let mut sync = RegionSync::new();
        let list = vec![ann("a", 1.0, 2.0, "")];
        sync.push(&mut surface, &list);

        sync.reset();
        assert!(sync.push(&mut surface, &list));
    }

    #[test]
    fn test_created_then_pushed_roundtrip() {
        let mut surface = FakeSurface::new();
        let mut sync = RegionSync::new();
        let mut stored: Vec<Annotation> = Vec::new();

        // Frame 1: the user draws a region
        surface.events.push(SurfaceEvent::RegionCreated(region("region-1", 3.5, 4.25)));
        for change in drain(&mut sync, &mut surface) {
            if let RegionChange::Created(a) = change {
                stored.push(a);
            }
        }
        sync.push(&mut surface, &stored);

        // Frame 2: the echo of the push is swallowed
        assert!(drain(&mut sync, &mut surface).is_empty());
        assert_eq!(stored.len(), 1);
        assert_eq!(surface.regions.len(), 1);
        assert_eq!(surface.regions[0].id, stored[0].id);
    }
}
