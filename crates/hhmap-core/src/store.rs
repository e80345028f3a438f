//! Place store
//!
//! Holds the most recent fetched batch. The batch is never edited in place;
//! a new fetch replaces it wholesale through [`PlaceStore::replace`].

use crate::place::{Place, PlaceKey, PlaceRecord};
use std::collections::HashMap;

/// What happened to a batch of records on its way into the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Places accepted into the store
    pub accepted: usize,
    /// Accepted places that have coordinates
    pub mappable: usize,
    /// Rows dropped for having no name
    pub unnamed: usize,
    /// Rows dropped because an earlier row had the same name
    pub duplicates: usize,
}

/// The full set of fetched places
#[derive(Debug, Default)]
pub struct PlaceStore {
    places: Vec<Place>,
    index: HashMap<PlaceKey, usize>,
    loaded: bool,
}

impl PlaceStore {
    /// Create an empty, not yet loaded store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a freshly fetched batch of records
    ///
    /// Rows without a name are skipped; for repeated names the first row
    /// wins so the key stays unique.
    pub fn replace(&mut self, records: Vec<PlaceRecord>) -> LoadReport {
        let mut report = LoadReport::default();
        let mut places = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());

        for record in records {
            let Some(place) = record.into_place() else {
                report.unnamed += 1;
                continue;
            };
            if index.contains_key(&place.key) {
                tracing::warn!(place = %place.key, "duplicate place name, keeping first row");
                report.duplicates += 1;
                continue;
            }
            if place.is_mappable() {
                report.mappable += 1;
            }
            index.insert(place.key.clone(), places.len());
            places.push(place);
        }

        if report.unnamed > 0 {
            tracing::warn!(count = report.unnamed, "skipped rows without a name");
        }

        report.accepted = places.len();
        self.places = places;
        self.index = index;
        self.loaded = true;
        report
    }

    /// Replace the contents with already-built places
    pub fn replace_places(&mut self, places: Vec<Place>) -> LoadReport {
        let records = places
            .into_iter()
            .map(|p| PlaceRecord {
                name: Some(p.key.as_str().to_string()),
                category: p.category,
                latitude: p.coordinates.map(|c| c.lat),
                longitude: p.coordinates.map(|c| c.lng),
                description: p.description,
                address: p.address,
                image_url: p.image_url,
                instagram_url: p.instagram_url,
                reservation_url: p.reservation_url,
            })
            .collect();
        self.replace(records)
    }

    /// Whether at least one fetch has succeeded
    #[inline]
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// All places in fetch order
    #[inline]
    #[must_use]
    pub fn all(&self) -> &[Place] {
        &self.places
    }

    /// Look up a place by key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Place> {
        self.index.get(key).map(|&i| &self.places[i])
    }

    /// Check if a key is present
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Places matching a predicate, in fetch order
    pub fn filtered<'a, F>(&'a self, mut predicate: F) -> Vec<&'a Place>
    where
        F: FnMut(&Place) -> bool,
    {
        self.places.iter().filter(|p| predicate(p)).collect()
    }

    /// Number of places
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Check if store holds no places
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}
