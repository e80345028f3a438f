//! Application controller
//!
//! [`MapApp`] owns all mutable state of the map page: the place store, the
//! category filter, the marker registry, the selection, the locate button
//! and the submission form. The view layer calls its `on_*` methods (or
//! [`MapApp::dispatch`]) for every user event and reads view models back.
//!
//! Handlers run to completion one at a time. Before the first successful
//! fetch every interaction handler is a no-op returning
//! [`Reaction::Ignored`].

use crate::category::{compute_categories, CategoryFilter, CategoryOption};
use crate::config::{AppConfig, LocateFailurePolicy};
use crate::error::{AppError, FetchError, GeolocationError, SubmitError};
use crate::locate::{GeolocationProvider, LocateControl, LocateState};
use crate::map::{MapProvider, MarkerHandle, MarkerVariant};
use crate::notify::{Notification, NotificationQueue};
use crate::place::{Coordinates, Place, PlaceKey, PlaceRecord};
use crate::registry::MarkerRegistry;
use crate::selection::{SelectionController, SelectionEvent, SelectionSource, SelectionState};
use crate::source::PlaceSource;
use crate::store::{LoadReport, PlaceStore};
use crate::submission::{SubmissionControl, SubmissionSink};
use crate::view::{
    info_window_content, render_details, render_place_list, PlaceDetailsView, PlaceListView,
    SidebarMode, SidebarView, ViewAction,
};

const USER_MARKER_TITLE: &str = "Your Location";
const LOCATE_FAILED_MESSAGE: &str = "Error: The Geolocation service failed.";
const SUBMIT_OK_MESSAGE: &str = "Thanks! Your happy hour was submitted.";
const SUBMIT_FAILED_MESSAGE: &str = "Submission failed, please try again.";

/// Outcome of a user event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// State changed and views should be re-read
    Applied,
    /// Event arrived before places were loaded, nothing happened
    Ignored,
    /// Host should open this URL; selection is untouched
    OpenUrl(String),
    /// Host should run [`MapApp::locate_user`]
    LocateRequested,
}

/// The map page
#[derive(Debug)]
pub struct MapApp<M: MapProvider> {
    config: AppConfig,
    map: M,
    store: PlaceStore,
    categories: Vec<CategoryOption>,
    filter: CategoryFilter,
    registry: MarkerRegistry,
    selection: SelectionController,
    sidebar: SidebarMode,
    locate: LocateControl,
    user_marker: Option<MarkerHandle>,
    submission: SubmissionControl,
    notifications: NotificationQueue,
    stale: bool,
}

impl<M: MapProvider> MapApp<M> {
    /// Create the map and an empty application state
    pub fn new(config: AppConfig, mut map: M) -> Self {
        map.create_map(&config.map);
        let categories = compute_categories(&[], &config.categories);
        Self {
            config,
            map,
            store: PlaceStore::new(),
            categories,
            filter: CategoryFilter::All,
            registry: MarkerRegistry::new(),
            selection: SelectionController::new(),
            sidebar: SidebarMode::List,
            locate: LocateControl::new(),
            user_marker: None,
            submission: SubmissionControl::new(),
            notifications: NotificationQueue::default(),
            stale: false,
        }
    }

    /// Load places, then centre on the user if configured to
    ///
    /// # Errors
    /// Returns the fetch error; geolocation failures are handled by the
    /// configured policy and never fail startup.
    pub async fn start<S, G>(&mut self, source: &S, geolocation: Option<&G>) -> Result<LoadReport, AppError>
    where
        S: PlaceSource + ?Sized,
        G: GeolocationProvider + ?Sized,
    {
        let loaded = self.load_places(source).await;
        if self.config.locate_on_start {
            if let Some(provider) = geolocation {
                if let Err(e) = self.locate_user(provider).await {
                    tracing::debug!(error = %e, "startup locate did not succeed");
                }
            }
        }
        loaded
    }

    /// Fetch places from `source` and apply the result
    ///
    /// # Errors
    /// Returns the fetch error; the previous state is kept.
    pub async fn load_places<S: PlaceSource + ?Sized>(&mut self, source: &S) -> Result<LoadReport, AppError> {
        let fetched = source.fetch_places().await;
        self.apply_places(fetched)
    }

    /// Apply the outcome of a fetch
    ///
    /// On success the store is replaced, categories recomputed and markers
    /// rebuilt. A filter whose category disappeared falls back to "all"; a
    /// selection whose place disappeared is cleared.
    ///
    /// # Errors
    /// Returns the fetch error unchanged after logging it.
    pub fn apply_places(&mut self, fetched: Result<Vec<PlaceRecord>, FetchError>) -> Result<LoadReport, AppError> {
        let records = match fetched {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "error loading places");
                return Err(e.into());
            }
        };

        let report = self.store.replace(records);
        self.categories = compute_categories(self.store.all(), &self.config.categories);

        if let CategoryFilter::Only(value) = &self.filter {
            if !self.categories.iter().any(|o| &o.value == value) {
                tracing::info!(category = %value, "filtered category no longer exists, showing all");
                self.filter = CategoryFilter::All;
            }
        }

        let still_present = self
            .selection
            .selected()
            .is_some_and(|k| self.store.contains(k.as_str()));
        self.selection.apply(&SelectionEvent::PlacesReplaced {
            selected_still_present: still_present,
        });
        if let SidebarMode::Details(key) = &self.sidebar {
            if !self.store.contains(key.as_str()) {
                self.sidebar = SidebarMode::List;
            }
        }

        self.registry.rebuild(self.store.all(), &mut self.map);
        let filter = &self.filter;
        self.registry
            .set_visibility(&self.store, &mut self.map, |p| filter.matches(p));
        let selected = self.selection.selected().map(PlaceKey::as_str);
        self.registry.set_highlight(selected, &mut self.map);
        // old handles are gone, so the popup moves to the rebuilt marker
        let anchored = selected.and_then(|k| Some((self.registry.get(k)?, self.store.get(k)?)));
        match anchored {
            Some((marker, place)) => self
                .map
                .open_info_window(marker.handle, &info_window_content(place)),
            None => self.map.close_info_window(),
        }
        self.stale = false;

        tracing::info!(
            places = report.accepted,
            markers = self.registry.len(),
            categories = self.categories.len() - 1,
            "places loaded"
        );
        Ok(report)
    }

    /// React to a dropdown change
    ///
    /// Marker visibility and the list follow the new filter; the selection,
    /// its highlight and its popup are left as they are even if the selected
    /// place is filtered out.
    pub fn on_filter_change(&mut self, value: &str) -> Reaction {
        if !self.store.is_loaded() {
            tracing::debug!(value, "filter change before places loaded, ignoring");
            return Reaction::Ignored;
        }

        self.filter = CategoryFilter::from_value(value);
        self.selection.apply(&SelectionEvent::FilterChanged);
        let filter = &self.filter;
        let visible = self
            .registry
            .set_visibility(&self.store, &mut self.map, |p| filter.matches(p));
        self.sidebar = SidebarMode::List;

        tracing::info!(filter = self.filter.value(), visible_markers = visible, "filter changed");
        Reaction::Applied
    }

    /// React to a click on a sidebar list entry
    ///
    /// # Errors
    /// [`AppError::UnknownPlace`] when `key` is not in the store.
    pub fn on_list_item_click(&mut self, key: &str) -> Result<Reaction, AppError> {
        self.select(key, SelectionSource::ListItem)
    }

    /// React to a click on a marker
    ///
    /// # Errors
    /// [`AppError::UnknownMarker`] for a handle the registry does not know,
    /// e.g. one from a previous batch.
    pub fn on_marker_click(&mut self, handle: MarkerHandle) -> Result<Reaction, AppError> {
        if !self.store.is_loaded() {
            return Ok(Reaction::Ignored);
        }
        let key = self
            .registry
            .place_for(handle)
            .cloned()
            .ok_or(AppError::UnknownMarker(handle.0))?;
        self.select(key.as_str(), SelectionSource::Marker)
    }

    /// Select a place and show its details panel
    ///
    /// # Errors
    /// [`AppError::UnknownPlace`] when `key` is not in the store.
    pub fn open_details(&mut self, key: &str) -> Result<Reaction, AppError> {
        let reaction = self.select(key, SelectionSource::Details)?;
        if reaction == Reaction::Applied {
            self.sidebar = SidebarMode::Details(PlaceKey::new(key));
        }
        Ok(reaction)
    }

    /// Return the sidebar to the list; the selection stays
    pub fn back_to_list(&mut self) -> Reaction {
        self.sidebar = SidebarMode::List;
        Reaction::Applied
    }

    /// Route a view action to its handler
    ///
    /// # Errors
    /// Whatever the routed handler returns.
    pub fn dispatch(&mut self, action: ViewAction) -> Result<Reaction, AppError> {
        match action {
            ViewAction::SelectPlace(key) => self.on_list_item_click(key.as_str()),
            ViewAction::OpenDetails(key) => self.open_details(key.as_str()),
            ViewAction::BackToList => Ok(self.back_to_list()),
            ViewAction::OpenExternal(url) => {
                tracing::debug!(%url, "opening external link");
                Ok(Reaction::OpenUrl(url))
            }
            ViewAction::ChangeFilter(value) => Ok(self.on_filter_change(&value)),
            ViewAction::Locate => {
                if self.locate.is_enabled() {
                    Ok(Reaction::LocateRequested)
                } else {
                    Err(GeolocationError::Busy.into())
                }
            }
        }
    }

    fn select(&mut self, key: &str, source: SelectionSource) -> Result<Reaction, AppError> {
        if !self.store.is_loaded() {
            tracing::debug!(key, "selection before places loaded, ignoring");
            return Ok(Reaction::Ignored);
        }
        let place = self
            .store
            .get(key)
            .ok_or_else(|| AppError::UnknownPlace(key.to_string()))?;

        self.selection.apply(&SelectionEvent::Clicked {
            key: place.key.clone(),
            source,
        });
        self.registry.set_highlight(Some(key), &mut self.map);

        if let Some(marker) = self.registry.get(key) {
            self.map.set_view(marker.position, self.config.map.focus_zoom);
            self.map
                .open_info_window(marker.handle, &info_window_content(place));
        } else {
            self.map.close_info_window();
        }

        tracing::info!(place = key, ?source, "place selected");
        Ok(Reaction::Applied)
    }

    /// Start a geolocation request
    ///
    /// # Errors
    /// [`GeolocationError::Busy`] while a request is outstanding.
    pub fn begin_locate(&mut self) -> Result<(), AppError> {
        self.locate.begin().map_err(AppError::from)
    }

    /// Apply the outcome of the outstanding geolocation request
    ///
    /// On success the user marker is replaced and the map centred on it. On
    /// failure the button is reset and, under
    /// [`LocateFailurePolicy::Notify`], an error notification is queued.
    ///
    /// # Errors
    /// Returns the geolocation error after applying the failure policy.
    pub fn finish_locate(&mut self, outcome: Result<Coordinates, GeolocationError>) -> Result<Coordinates, AppError> {
        self.locate.finish(&outcome);
        match outcome {
            Ok(position) => {
                if let Some(old) = self.user_marker.take() {
                    self.map.set_marker_visibility(old, false);
                }
                let handle =
                    self.map
                        .create_marker(position, USER_MARKER_TITLE, MarkerVariant::UserLocation);
                self.user_marker = Some(handle);
                self.map.set_view(position, self.config.map.user_zoom);
                tracing::info!(lat = position.lat, lng = position.lng, "centred on user");
                Ok(position)
            }
            Err(e) => {
                tracing::warn!(error = %e, "geolocation failed");
                if self.config.locate_failure == LocateFailurePolicy::Notify {
                    self.notifications.push(Notification::error(LOCATE_FAILED_MESSAGE));
                }
                Err(e.into())
            }
        }
    }

    /// Ask `provider` for the user's position and centre on it
    ///
    /// # Errors
    /// [`GeolocationError::Busy`] or the provider's failure.
    pub async fn locate_user<G: GeolocationProvider + ?Sized>(&mut self, provider: &G) -> Result<Coordinates, AppError> {
        self.begin_locate()?;
        let outcome = provider.current_position().await;
        self.finish_locate(outcome)
    }

    /// Send the current draft to `sink`
    ///
    /// Every outcome queues a notification. A rejected or failed submission
    /// keeps the draft; an accepted one clears it and marks places stale.
    ///
    /// # Errors
    /// Form validation, in-flight, transport or rejection errors.
    pub async fn submit<K: SubmissionSink + ?Sized>(&mut self, sink: &K) -> Result<(), AppError> {
        let draft = match self.submission.begin(&self.store) {
            Ok(draft) => draft,
            Err(e) => {
                self.notifications.push(Notification::error(e.to_string()));
                return Err(e);
            }
        };

        let result = match sink.submit(&draft).await {
            Ok(response) if response.success => Ok(()),
            Ok(_) => Err(SubmitError::Rejected),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.submission.finish(true);
                self.stale = true;
                self.notifications.push(Notification::success(SUBMIT_OK_MESSAGE));
                tracing::info!("submission accepted");
                Ok(())
            }
            Err(e) => {
                self.submission.finish(false);
                self.notifications.push(Notification::error(SUBMIT_FAILED_MESSAGE));
                tracing::warn!(error = %e, "submission failed");
                Err(e.into())
            }
        }
    }

    /// Submit, then refetch places when configured to
    ///
    /// A failed refetch is logged and does not fail the submission.
    ///
    /// # Errors
    /// Same as [`MapApp::submit`].
    pub async fn submit_and_refresh<K, S>(&mut self, sink: &K, source: &S) -> Result<(), AppError>
    where
        K: SubmissionSink + ?Sized,
        S: PlaceSource + ?Sized,
    {
        self.submit(sink).await?;
        if self.config.refresh_after_submit {
            if let Err(e) = self.load_places(source).await {
                tracing::warn!(error = %e, "refresh after submission failed");
            }
        }
        Ok(())
    }

    /// Places passing the current filter, in fetch order
    #[must_use]
    pub fn visible_places(&self) -> Vec<&Place> {
        self.store.filtered(|p| self.filter.matches(p))
    }

    /// Sidebar list for the current filter and selection
    #[must_use]
    pub fn list_view(&self) -> PlaceListView {
        render_place_list(
            &self.visible_places(),
            self.selection.selected(),
            self.config.list.snippet_chars,
        )
    }

    /// Details panel of a place
    #[must_use]
    pub fn details_view(&self, key: &str) -> Option<PlaceDetailsView> {
        self.store.get(key).map(render_details)
    }

    /// Whatever the sidebar currently shows
    #[must_use]
    pub fn sidebar_view(&self) -> SidebarView {
        match &self.sidebar {
            SidebarMode::Details(key) => match self.details_view(key.as_str()) {
                Some(details) => SidebarView::Details(details),
                None => SidebarView::List(self.list_view()),
            },
            SidebarMode::List => SidebarView::List(self.list_view()),
        }
    }

    /// Dropdown options
    #[inline]
    #[must_use]
    pub fn categories(&self) -> &[CategoryOption] {
        &self.categories
    }

    /// Current filter
    #[inline]
    #[must_use]
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Current selection
    #[inline]
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    /// Marker registry
    #[inline]
    #[must_use]
    pub fn markers(&self) -> &MarkerRegistry {
        &self.registry
    }

    /// Place store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &PlaceStore {
        &self.store
    }

    /// Locate button state
    #[inline]
    #[must_use]
    pub fn locate_state(&self) -> LocateState {
        self.locate.state()
    }

    /// The marker showing the user's position
    #[inline]
    #[must_use]
    pub fn user_marker(&self) -> Option<MarkerHandle> {
        self.user_marker
    }

    /// Submission form
    #[inline]
    #[must_use]
    pub fn submission(&self) -> &SubmissionControl {
        &self.submission
    }

    /// Submission form, for edits
    #[inline]
    pub fn submission_mut(&mut self) -> &mut SubmissionControl {
        &mut self.submission
    }

    /// Whether places changed server-side since the last fetch
    #[inline]
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Take pending notifications
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Map provider
    #[inline]
    #[must_use]
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Map provider, for hosts that pump provider events
    #[inline]
    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }
}
