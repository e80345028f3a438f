//! Map provider without a screen
//!
//! Keeps the marker set and viewport in memory and logs every call, so the
//! command line can report what a browser map would show.

use hhmap_core::{
    Coordinates, InfoWindowContent, MapOptions, MapProvider, MarkerHandle, MarkerVariant,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Marker as drawn on the headless map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlessMarker {
    pub handle: MarkerHandle,
    pub title: String,
    pub position: Coordinates,
    pub variant: MarkerVariant,
    pub visible: bool,
}

/// In-memory map surface
#[derive(Debug, Default)]
pub struct HeadlessMap {
    next_handle: u64,
    markers: BTreeMap<MarkerHandle, HeadlessMarker>,
    view: Option<(Coordinates, u8)>,
    popup: Option<(MarkerHandle, InfoWindowContent)>,
}

impl HeadlessMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers currently shown
    pub fn visible_markers(&self) -> impl Iterator<Item = &HeadlessMarker> {
        self.markers.values().filter(|m| m.visible)
    }

    #[must_use]
    pub fn view(&self) -> Option<(Coordinates, u8)> {
        self.view
    }

    /// The open popup and the marker it is anchored to
    #[must_use]
    pub fn popup(&self) -> Option<&(MarkerHandle, InfoWindowContent)> {
        self.popup.as_ref()
    }
}

impl MapProvider for HeadlessMap {
    fn create_map(&mut self, options: &MapOptions) {
        tracing::debug!(
            lat = options.center.lat,
            lng = options.center.lng,
            zoom = options.zoom,
            map_id = %options.map_id,
            "map created"
        );
        self.view = Some((options.center, options.zoom));
    }

    fn create_marker(
        &mut self,
        position: Coordinates,
        title: &str,
        variant: MarkerVariant,
    ) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        tracing::trace!(%handle, title, ?variant, "marker created");
        self.markers.insert(
            handle,
            HeadlessMarker {
                handle,
                title: title.to_string(),
                position,
                variant,
                visible: true,
            },
        );
        handle
    }

    fn set_marker_visibility(&mut self, handle: MarkerHandle, visible: bool) {
        match self.markers.get_mut(&handle) {
            Some(marker) => marker.visible = visible,
            None => tracing::warn!(%handle, "visibility change for unknown marker"),
        }
    }

    fn set_marker_content(&mut self, handle: MarkerHandle, variant: MarkerVariant) {
        if let Some(marker) = self.markers.get_mut(&handle) {
            tracing::trace!(%handle, ?variant, "marker restyled");
            marker.variant = variant;
        }
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        tracing::debug!(lat = center.lat, lng = center.lng, zoom, "view moved");
        self.view = Some((center, zoom));
    }

    fn open_info_window(&mut self, anchor: MarkerHandle, content: &InfoWindowContent) {
        tracing::debug!(%anchor, title = %content.title, "popup opened");
        self.popup = Some((anchor, content.clone()));
    }

    fn close_info_window(&mut self) {
        if self.popup.take().is_some() {
            tracing::debug!("popup closed");
        }
    }
}
