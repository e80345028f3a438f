//! hhmap core - happy-hour map synchronization
//!
//! Keeps the category filter, the marker set, the sidebar list and the
//! selected place consistent with each other:
//! - [`PlaceStore`] holds the last fetched batch of places
//! - [`compute_categories`] derives the dropdown options
//! - [`MarkerRegistry`] owns one marker per mappable place
//! - [`SelectionController`] tracks the single selected place
//! - [`render_place_list`] maps places and selection to the sidebar list
//! - [`MapApp`] owns all of the above and reacts to user events
//!
//! # Example
//!
//! ```rust,ignore
//! use hhmap_core::{AppConfig, MapApp, StaticPlaceSource};
//!
//! # async fn example(map: impl hhmap_core::MapProvider) -> Result<(), hhmap_core::AppError> {
//! let source = StaticPlaceSource::from_json(br#"[{"Name": "Bellboy", "Category": "Until 19:00"}]"#)?;
//! let mut app = MapApp::new(AppConfig::default(), map);
//! app.load_places(&source).await?;
//! app.on_list_item_click("Bellboy")?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod app;
pub mod category;
pub mod config;
pub mod error;
pub mod locate;
pub mod map;
pub mod notify;
pub mod place;
pub mod registry;
pub mod selection;
pub mod source;
pub mod store;
pub mod submission;
pub mod view;

// Re-exports for convenience
pub use app::{MapApp, Reaction};
pub use category::{compute_categories, CategoryFilter, CategoryOption, ALL_VALUE};
pub use config::{AppConfig, CategoryConfig, ListConfig, LocateFailurePolicy, MapOptions};
pub use error::{
    AppError, AppResult, ConfigError, FetchError, FormError, GeolocationError, SubmitError,
};
pub use locate::{GeolocationProvider, LocateControl, LocateState};
pub use map::{InfoWindowContent, MapProvider, MarkerHandle, MarkerVariant, PinStyle};
pub use notify::{Notification, NotificationLevel};
pub use place::{decode_records, Coordinates, Place, PlaceKey, PlaceRecord};
pub use registry::{MarkerEntry, MarkerRegistry};
pub use selection::{SelectionController, SelectionEvent, SelectionSource, SelectionState};
pub use source::{PlaceSource, StaticPlaceSource};
pub use store::{LoadReport, PlaceStore};
pub use submission::{
    FormMode, SubmissionControl, SubmissionDraft, SubmissionResponse, SubmissionSink, Weekday,
};
pub use view::{
    render_details, render_place_list, PlaceDetailsView, PlaceListItem, PlaceListView,
    SidebarView, ViewAction,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for hosting the map page
    pub use crate::{
        AppConfig, AppError, Coordinates, GeolocationProvider, MapApp, MapProvider,
        MarkerHandle, PlaceSource, Reaction, SubmissionSink, ViewAction,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
