//! The map surface the engine draws onto.
//!
//! Rendering belongs to whatever implements [`MapEngineAdapter`]; the engine
//! only places markers, toggles their visibility and moves the camera.
//! [`HeadlessMap`] keeps that state in memory for the CLI and for tests.

use crate::geo::Position;
use crate::icon::IconDescriptor;
use std::collections::BTreeMap;
use tracing::debug;

/// Padding, in pixels, used when fitting the camera to all markers.
pub const FIT_BOUNDS_PADDING: u32 = 60;

/// Zoom level a favorite is shown at, unless the map is already closer.
pub const FOCUS_ZOOM: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerHandle(pub u64);

/// Capabilities consumed from the map provider. Pointer events are delivered
/// by the presentation layer through the controller's `on_hover`/`on_click`.
pub trait MapEngineAdapter {
    fn create_marker(
        &mut self,
        position: Position,
        icon: &IconDescriptor,
        title: &str,
    ) -> MarkerHandle;
    fn remove_marker(&mut self, handle: MarkerHandle);
    fn set_visible(&mut self, handle: MarkerHandle, visible: bool);
    fn pan_to(&mut self, position: Position);
    fn set_zoom(&mut self, level: u8);
    fn zoom(&self) -> u8;
    fn fit_bounds(&mut self, positions: &[Position], padding: u32);
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub position: Position,
    pub icon: IconDescriptor,
    pub title: String,
    pub visible: bool,
}

/// The rectangle a `fit_bounds` call asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedBounds {
    pub south_west: Position,
    pub north_east: Position,
    pub padding: u32,
}

#[derive(Debug, Clone)]
pub struct HeadlessMap {
    markers: BTreeMap<MarkerHandle, PlacedMarker>,
    next_handle: u64,
    center: Position,
    zoom: u8,
    fitted: Option<FittedBounds>,
}

impl HeadlessMap {
    pub fn new(center: Position, zoom: u8) -> Self {
        Self {
            markers: BTreeMap::new(),
            next_handle: 1,
            center,
            zoom,
            fitted: None,
        }
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&PlacedMarker> {
        self.markers.get(&handle)
    }

    pub fn markers(&self) -> impl Iterator<Item = (&MarkerHandle, &PlacedMarker)> {
        self.markers.iter()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn visible_count(&self) -> usize {
        self.markers.values().filter(|m| m.visible).count()
    }

    pub fn center(&self) -> Position {
        self.center
    }

    pub fn fitted(&self) -> Option<FittedBounds> {
        self.fitted
    }
}

impl MapEngineAdapter for HeadlessMap {
    fn create_marker(
        &mut self,
        position: Position,
        icon: &IconDescriptor,
        title: &str,
    ) -> MarkerHandle {
        let handle = MarkerHandle(self.next_handle);
        self.next_handle += 1;
        self.markers.insert(
            handle,
            PlacedMarker {
                position,
                icon: icon.clone(),
                title: title.to_string(),
                visible: true,
            },
        );
        handle
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.markers.remove(&handle);
    }

    fn set_visible(&mut self, handle: MarkerHandle, visible: bool) {
        if let Some(marker) = self.markers.get_mut(&handle) {
            marker.visible = visible;
        }
    }

    fn pan_to(&mut self, position: Position) {
        self.center = position;
    }

    fn set_zoom(&mut self, level: u8) {
        self.zoom = level;
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn fit_bounds(&mut self, positions: &[Position], padding: u32) {
        let Some(first) = positions.first() else {
            return;
        };
        let mut south_west = *first;
        let mut north_east = *first;
        for p in &positions[1..] {
            south_west.lat = south_west.lat.min(p.lat);
            south_west.lng = south_west.lng.min(p.lng);
            north_east.lat = north_east.lat.max(p.lat);
            north_east.lng = north_east.lng.max(p.lng);
        }
        self.center = Position {
            lat: (south_west.lat + north_east.lat) / 2.0,
            lng: (south_west.lng + north_east.lng) / 2.0,
        };
        debug!(?south_west, ?north_east, padding, "fit bounds");
        self.fitted = Some(FittedBounds {
            south_west,
            north_east,
            padding,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Position {
        Position { lat: 33.9, lng: 35.5 }
    }

    #[test]
    fn test_markers_lifecycle() {
        let mut map = HeadlessMap::new(origin(), 9);
        let a = map.create_marker(origin(), &IconDescriptor::dot(), "A");
        let b = map.create_marker(origin(), &IconDescriptor::dot(), "B");
        assert_ne!(a, b);
        assert_eq!(map.visible_count(), 2);

        map.set_visible(a, false);
        assert_eq!(map.visible_count(), 1);
        assert!(!map.marker(a).unwrap().visible);

        map.remove_marker(a);
        assert_eq!(map.marker_count(), 1);
        assert!(map.marker(a).is_none());
    }

    #[test]
    fn test_fit_bounds_covers_positions() {
        let mut map = HeadlessMap::new(origin(), 9);
        map.fit_bounds(
            &[
                Position { lat: 33.0, lng: 35.2 },
                Position { lat: 34.0, lng: 36.0 },
                Position { lat: 33.5, lng: 35.1 },
            ],
            FIT_BOUNDS_PADDING,
        );
        let fitted = map.fitted().unwrap();
        assert_eq!(fitted.south_west, Position { lat: 33.0, lng: 35.1 });
        assert_eq!(fitted.north_east, Position { lat: 34.0, lng: 36.0 });
        assert_eq!(fitted.padding, 60);
        assert_eq!(map.center(), Position { lat: 33.5, lng: 35.55 });
    }

    #[test]
    fn test_fit_bounds_empty_is_noop() {
        let mut map = HeadlessMap::new(origin(), 9);
        map.fit_bounds(&[], FIT_BOUNDS_PADDING);
        assert!(map.fitted().is_none());
        assert_eq!(map.center(), origin());
    }
}
