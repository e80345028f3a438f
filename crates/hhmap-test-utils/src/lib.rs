//! Testing utilities for the hhmap workspace
//!
//! Shared fixtures, a map provider that records every call, and scripted
//! place sources, geolocation providers and submission sinks.

#![allow(missing_docs)]

use async_trait::async_trait;
use hhmap_core::{
    AppConfig, Coordinates, FetchError, GeolocationError, GeolocationProvider, InfoWindowContent,
    MapApp, MapOptions, MapProvider, MarkerHandle, MarkerVariant, PlaceRecord, PlaceSource,
    SubmissionDraft, SubmissionResponse, SubmissionSink, SubmitError,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};

/// Call made on [`RecordingMap`]
#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    CreateMap,
    CreateMarker { handle: MarkerHandle, title: String, variant: MarkerVariant },
    SetVisibility { handle: MarkerHandle, visible: bool },
    SetContent { handle: MarkerHandle, variant: MarkerVariant },
    SetView { center: Coordinates, zoom: u8 },
    OpenInfoWindow { anchor: MarkerHandle, content: InfoWindowContent },
    CloseInfoWindow,
}

/// Marker as the recording map sees it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMarker {
    pub title: String,
    pub position: Coordinates,
    pub variant: MarkerVariant,
    pub attached: bool,
}

/// Map provider that keeps every marker and call for inspection
#[derive(Debug, Default)]
pub struct RecordingMap {
    next_handle: u64,
    pub markers: BTreeMap<MarkerHandle, RecordedMarker>,
    pub calls: Vec<MapCall>,
    pub view: Option<(Coordinates, u8)>,
    pub info_window: Option<(MarkerHandle, InfoWindowContent)>,
}

impl RecordingMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers currently attached to the map
    pub fn attached(&self) -> impl Iterator<Item = (&MarkerHandle, &RecordedMarker)> {
        self.markers.iter().filter(|(_, m)| m.attached)
    }

    /// Titles of attached markers drawn with `variant`
    #[must_use]
    pub fn attached_titles(&self, variant: MarkerVariant) -> Vec<String> {
        self.attached()
            .filter(|(_, m)| m.variant == variant)
            .map(|(_, m)| m.title.clone())
            .collect()
    }

    /// Number of markers ever created
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, MapCall::CreateMarker { .. }))
            .count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl MapProvider for RecordingMap {
    fn create_map(&mut self, options: &MapOptions) {
        self.view = Some((options.center, options.zoom));
        self.calls.push(MapCall::CreateMap);
    }

    fn create_marker(
        &mut self,
        position: Coordinates,
        title: &str,
        variant: MarkerVariant,
    ) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        self.markers.insert(
            handle,
            RecordedMarker {
                title: title.to_string(),
                position,
                variant,
                attached: true,
            },
        );
        self.calls.push(MapCall::CreateMarker {
            handle,
            title: title.to_string(),
            variant,
        });
        handle
    }

    fn set_marker_visibility(&mut self, handle: MarkerHandle, visible: bool) {
        if let Some(marker) = self.markers.get_mut(&handle) {
            marker.attached = visible;
        }
        self.calls.push(MapCall::SetVisibility { handle, visible });
    }

    fn set_marker_content(&mut self, handle: MarkerHandle, variant: MarkerVariant) {
        if let Some(marker) = self.markers.get_mut(&handle) {
            marker.variant = variant;
        }
        self.calls.push(MapCall::SetContent { handle, variant });
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        self.view = Some((center, zoom));
        self.calls.push(MapCall::SetView { center, zoom });
    }

    fn open_info_window(&mut self, anchor: MarkerHandle, content: &InfoWindowContent) {
        self.info_window = Some((anchor, content.clone()));
        self.calls.push(MapCall::OpenInfoWindow {
            anchor,
            content: content.clone(),
        });
    }

    fn close_info_window(&mut self) {
        self.info_window = None;
        self.calls.push(MapCall::CloseInfoWindow);
    }
}

/// Place source answering from a script, one entry per fetch
///
/// When the script runs out the last answer is repeated.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Vec<PlaceRecord>, FetchError>>>,
    last: Mutex<Option<Vec<PlaceRecord>>>,
    fetches: Mutex<usize>,
}

impl ScriptedSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn then_ok(self, records: Vec<PlaceRecord>) -> Self {
        self.script.lock().push_back(Ok(records));
        self
    }

    #[must_use]
    pub fn then_err(self, error: FetchError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    #[must_use]
    pub fn fetch_count(&self) -> usize {
        *self.fetches.lock()
    }
}

#[async_trait]
impl PlaceSource for ScriptedSource {
    async fn fetch_places(&self) -> Result<Vec<PlaceRecord>, FetchError> {
        *self.fetches.lock() += 1;
        match self.script.lock().pop_front() {
            Some(Ok(records)) => {
                *self.last.lock() = Some(records.clone());
                Ok(records)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last.lock().clone().unwrap_or_default()),
        }
    }
}

/// Geolocation provider with a fixed answer
#[derive(Debug, Clone)]
pub struct FixedGeolocation(pub Result<Coordinates, GeolocationError>);

impl FixedGeolocation {
    #[must_use]
    pub fn at(lat: f64, lng: f64) -> Self {
        Self(Ok(Coordinates::new(lat, lng)))
    }

    #[must_use]
    pub fn failing(error: GeolocationError) -> Self {
        Self(Err(error))
    }
}

#[async_trait]
impl GeolocationProvider for FixedGeolocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.0.clone()
    }
}

/// Submission sink that records drafts and answers from a script
#[derive(Debug, Default)]
pub struct RecordingSink {
    answers: Mutex<VecDeque<Result<SubmissionResponse, SubmitError>>>,
    pub received: Mutex<Vec<SubmissionDraft>>,
}

impl RecordingSink {
    #[must_use]
    pub fn accepting() -> Self {
        Self::default().then(Ok(SubmissionResponse { success: true }))
    }

    #[must_use]
    pub fn then(self, answer: Result<SubmissionResponse, SubmitError>) -> Self {
        self.answers.lock().push_back(answer);
        self
    }

    #[must_use]
    pub fn received_count(&self) -> usize {
        self.received.lock().len()
    }
}

#[async_trait]
impl SubmissionSink for RecordingSink {
    async fn submit(&self, draft: &SubmissionDraft) -> Result<SubmissionResponse, SubmitError> {
        self.received.lock().push(draft.clone());
        self.answers
            .lock()
            .pop_front()
            .unwrap_or(Ok(SubmissionResponse { success: true }))
    }
}

/// Build a place record
#[must_use]
pub fn record(name: &str, category: Option<&str>, coords: Option<(f64, f64)>) -> PlaceRecord {
    PlaceRecord {
        name: Some(name.to_string()),
        category: category.map(str::to_string),
        latitude: coords.map(|c| c.0),
        longitude: coords.map(|c| c.1),
        ..PlaceRecord::default()
    }
}

/// A small Tel Aviv batch covering every category bucket
#[must_use]
pub fn tel_aviv_places() -> Vec<PlaceRecord> {
    let mut bellboy = record("Bellboy", Some("Until 19:00"), Some((32.0636, 34.7711)));
    bellboy.description = Some("1+1 on cocktails".to_string());
    bellboy.instagram_url = Some("https://instagram.com/bellboybar".to_string());
    bellboy.reservation_url = Some("https://tabitisrael.co.il/bellboy".to_string());

    let mut port_said = record("Port Said", Some("Until 20:00"), Some((32.0622, 34.7708)));
    port_said.address = Some("Har Sinai 5, Tel Aviv".to_string());

    vec![
        bellboy,
        port_said,
        record("Imperial", Some("until 19:30"), Some((32.0795, 34.7678))),
        record("Romano", Some("After 20:00"), Some((32.0605, 34.7721))),
        record("Shila", Some("WEEKENDS"), Some((32.0861, 34.7752))),
        record("Jaffa Port Pop-up", Some("WEEKENDS"), None),
        record("Haifa Brewery", Some("Not TLV"), Some((32.8191, 34.9983))),
        record("Mystery Bar", None, Some((32.07, 34.78))),
    ]
}

/// Map app over a recording map with startup geolocation turned off
#[must_use]
pub fn setup_test_app() -> MapApp<RecordingMap> {
    MapApp::new(
        AppConfig::default().with_locate_on_start(false),
        RecordingMap::new(),
    )
}
