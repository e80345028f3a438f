//! Marker registry
//!
//! Owns one marker per mappable place. Filter changes only toggle
//! attachment; markers are created again only when a new batch of places
//! arrives through [`MarkerRegistry::rebuild`].

use crate::map::{MapProvider, MarkerHandle, MarkerVariant};
use crate::place::{Coordinates, Place, PlaceKey};
use crate::store::PlaceStore;
use std::collections::HashMap;

/// A registered marker and its visual state
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerEntry {
    pub handle: MarkerHandle,
    pub key: PlaceKey,
    pub position: Coordinates,
    pub visible: bool,
    pub highlighted: bool,
}

impl MarkerEntry {
    fn variant(&self) -> MarkerVariant {
        if self.highlighted {
            MarkerVariant::Highlighted
        } else {
            MarkerVariant::Default
        }
    }
}

/// Mapping from place identity to on-map marker
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    entries: Vec<MarkerEntry>,
    by_key: HashMap<PlaceKey, usize>,
    by_handle: HashMap<MarkerHandle, usize>,
}

impl MarkerRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every marker and create fresh ones for `places`
    ///
    /// Old markers are detached from the map. Places without coordinates get
    /// no marker. New markers start visible and not highlighted.
    pub fn rebuild<M: MapProvider>(&mut self, places: &[Place], map: &mut M) {
        for entry in &self.entries {
            map.set_marker_visibility(entry.handle, false);
        }
        self.entries.clear();
        self.by_key.clear();
        self.by_handle.clear();

        for place in places {
            let Some(position) = place.coordinates else {
                continue;
            };
            let handle = map.create_marker(position, place.name(), MarkerVariant::Default);
            let idx = self.entries.len();
            self.by_key.insert(place.key.clone(), idx);
            self.by_handle.insert(handle, idx);
            self.entries.push(MarkerEntry {
                handle,
                key: place.key.clone(),
                position,
                visible: true,
                highlighted: false,
            });
        }

        tracing::debug!(markers = self.entries.len(), "rebuilt marker registry");
    }

    /// Attach markers whose place satisfies `predicate`, detach the rest
    ///
    /// The provider is only called for markers whose attachment changes, so
    /// repeating the same predicate is free. Returns the number of visible
    /// markers.
    pub fn set_visibility<M, F>(&mut self, store: &PlaceStore, map: &mut M, mut predicate: F) -> usize
    where
        M: MapProvider,
        F: FnMut(&Place) -> bool,
    {
        let mut visible = 0;
        for entry in &mut self.entries {
            let want = store.get(entry.key.as_str()).is_some_and(&mut predicate);
            if want != entry.visible {
                map.set_marker_visibility(entry.handle, want);
                entry.visible = want;
            }
            if want {
                visible += 1;
            }
        }
        visible
    }

    /// Highlight the marker of `key` and reset every other marker
    ///
    /// Passing `None`, or a key without a marker, leaves no marker
    /// highlighted. Returns whether a marker is highlighted afterwards.
    pub fn set_highlight<M: MapProvider>(&mut self, key: Option<&str>, map: &mut M) -> bool {
        let mut any = false;
        for entry in &mut self.entries {
            let want = key == Some(entry.key.as_str());
            if want != entry.highlighted {
                entry.highlighted = want;
                map.set_marker_content(entry.handle, entry.variant());
            }
            any |= want;
        }
        any
    }

    /// Place behind a marker, used to route marker clicks
    #[inline]
    #[must_use]
    pub fn place_for(&self, handle: MarkerHandle) -> Option<&PlaceKey> {
        self.by_handle.get(&handle).map(|&i| &self.entries[i].key)
    }

    /// Marker of a place
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MarkerEntry> {
        self.by_key.get(key).map(|&i| &self.entries[i])
    }

    /// Currently highlighted place, if any
    #[must_use]
    pub fn highlighted(&self) -> Option<&PlaceKey> {
        self.entries.iter().find(|e| e.highlighted).map(|e| &e.key)
    }

    /// Number of markers currently attached
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.entries.iter().filter(|e| e.visible).count()
    }

    /// Iterate over all markers
    pub fn iter(&self) -> impl Iterator<Item = &MarkerEntry> {
        self.entries.iter()
    }

    /// Number of registered markers
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no markers are registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapOptions;
    use crate::map::InfoWindowContent;

    #[derive(Default)]
    struct CountingMap {
        next: u64,
        created: usize,
        visibility_calls: usize,
        content_calls: usize,
    }

    impl MapProvider for CountingMap {
        fn create_map(&mut self, _options: &MapOptions) {}

        fn create_marker(&mut self, _p: Coordinates, _t: &str, _v: MarkerVariant) -> MarkerHandle {
            self.next += 1;
            self.created += 1;
            MarkerHandle(self.next)
        }

        fn set_marker_visibility(&mut self, _h: MarkerHandle, _visible: bool) {
            self.visibility_calls += 1;
        }

        fn set_marker_content(&mut self, _h: MarkerHandle, _v: MarkerVariant) {
            self.content_calls += 1;
        }

        fn set_view(&mut self, _c: Coordinates, _z: u8) {}

        fn open_info_window(&mut self, _a: MarkerHandle, _c: &InfoWindowContent) {}
        fn close_info_window(&mut self) {}
    }

    fn store() -> PlaceStore {
        let mut store = PlaceStore::new();
        store.replace_places(vec![
            Place::new("A").with_category("Until 19:00").with_coordinates(1.0, 1.0),
            Place::new("B").with_category("WEEKENDS"),
            Place::new("C").with_category("WEEKENDS").with_coordinates(2.0, 2.0),
        ]);
        store
    }

    #[test]
    fn rebuild_skips_places_without_coordinates() {
        let store = store();
        let mut map = CountingMap::default();
        let mut registry = MarkerRegistry::new();

        registry.rebuild(store.all(), &mut map);

        assert_eq!(registry.len(), 2);
        assert!(registry.get("B").is_none());
        assert_eq!(registry.visible_count(), 2);
    }

    #[test]
    fn rebuild_detaches_old_markers() {
        let store = store();
        let mut map = CountingMap::default();
        let mut registry = MarkerRegistry::new();

        registry.rebuild(store.all(), &mut map);
        let old = registry.get("A").unwrap().handle;
        registry.rebuild(store.all(), &mut map);

        assert_eq!(map.visibility_calls, 2);
        assert_eq!(map.created, 4);
        assert_ne!(registry.get("A").unwrap().handle, old);
        assert!(registry.place_for(old).is_none());
    }

    #[test]
    fn visibility_only_touches_changed_markers() {
        let store = store();
        let mut map = CountingMap::default();
        let mut registry = MarkerRegistry::new();
        registry.rebuild(store.all(), &mut map);

        let weekends = |p: &Place| p.category.as_deref() == Some("WEEKENDS");
        assert_eq!(registry.set_visibility(&store, &mut map, weekends), 1);
        assert_eq!(map.visibility_calls, 1);

        registry.set_visibility(&store, &mut map, weekends);
        assert_eq!(map.visibility_calls, 1);
        assert_eq!(map.created, 2);
        assert!(!registry.get("A").unwrap().visible);
    }

    #[test]
    fn highlight_is_exclusive() {
        let store = store();
        let mut map = CountingMap::default();
        let mut registry = MarkerRegistry::new();
        registry.rebuild(store.all(), &mut map);

        assert!(registry.set_highlight(Some("A"), &mut map));
        assert!(registry.set_highlight(Some("C"), &mut map));

        assert_eq!(registry.highlighted().map(PlaceKey::as_str), Some("C"));
        assert_eq!(registry.iter().filter(|e| e.highlighted).count(), 1);
    }

    #[test]
    fn highlight_of_unmapped_place_clears_all() {
        let store = store();
        let mut map = CountingMap::default();
        let mut registry = MarkerRegistry::new();
        registry.rebuild(store.all(), &mut map);
        registry.set_highlight(Some("A"), &mut map);

        assert!(!registry.set_highlight(Some("B"), &mut map));
        assert!(registry.highlighted().is_none());
    }

    #[test]
    fn place_for_routes_handles() {
        let store = store();
        let mut map = CountingMap::default();
        let mut registry = MarkerRegistry::new();
        registry.rebuild(store.all(), &mut map);

        let handle = registry.get("C").unwrap().handle;
        assert_eq!(registry.place_for(handle).map(PlaceKey::as_str), Some("C"));
        assert!(registry.place_for(MarkerHandle(999)).is_none());
    }
}
