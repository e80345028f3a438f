//! View models
//!
//! Pure mappings from places and selection to what the sidebar and popup
//! show. Rendering them is left to whatever UI layer hosts the map.

use crate::map::InfoWindowContent;
use crate::place::{Place, PlaceKey};
use serde::Serialize;

/// Something the user can do from the view layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum ViewAction {
    /// Select a place and keep showing the list
    SelectPlace(PlaceKey),
    /// Select a place and switch the sidebar to its details
    OpenDetails(PlaceKey),
    /// Return the sidebar to the list
    BackToList,
    /// Follow an external link; never touches the selection
    OpenExternal(String),
    /// Pick a dropdown value
    ChangeFilter(String),
    /// Centre on the user
    Locate,
}

/// Kind of external link on a list entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Reservation,
    Instagram,
}

/// External link on a list entry
///
/// Its action is [`ViewAction::OpenExternal`], so a click on it does not
/// bubble into selecting the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalLink {
    pub kind: LinkKind,
    pub url: String,
    pub action: ViewAction,
}

impl ExternalLink {
    fn new(kind: LinkKind, url: &str) -> Self {
        Self {
            kind,
            url: url.to_string(),
            action: ViewAction::OpenExternal(url.to_string()),
        }
    }
}

/// One sidebar list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceListItem {
    pub key: PlaceKey,
    pub title: String,
    pub snippet: Option<String>,
    pub links: Vec<ExternalLink>,
    pub selected: bool,
    pub on_click: ViewAction,
}

/// The sidebar list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PlaceListView {
    pub items: Vec<PlaceListItem>,
}

impl PlaceListView {
    /// Entries marked selected
    pub fn selected(&self) -> impl Iterator<Item = &PlaceListItem> {
        self.items.iter().filter(|i| i.selected)
    }

    /// Check if the list has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Render the list for a set of places and the current selection
#[must_use]
pub fn render_place_list(
    places: &[&Place],
    selected: Option<&PlaceKey>,
    snippet_chars: usize,
) -> PlaceListView {
    let items = places
        .iter()
        .map(|place| {
            let mut links = Vec::new();
            if let Some(url) = &place.reservation_url {
                links.push(ExternalLink::new(LinkKind::Reservation, url));
            }
            if let Some(url) = &place.instagram_url {
                links.push(ExternalLink::new(LinkKind::Instagram, url));
            }
            PlaceListItem {
                key: place.key.clone(),
                title: place.name().to_string(),
                snippet: place
                    .description
                    .as_deref()
                    .map(|d| snippet(d, snippet_chars)),
                links,
                selected: selected == Some(&place.key),
                on_click: ViewAction::SelectPlace(place.key.clone()),
            }
        })
        .collect();
    PlaceListView { items }
}

/// Shorten text to at most `max_chars` characters, ending with an ellipsis
/// when something was cut
#[must_use]
pub fn snippet(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

/// Details panel for one place
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceDetailsView {
    pub key: PlaceKey,
    pub title: String,
    pub image_url: Option<String>,
    pub instagram: Option<ExternalLink>,
    pub reservation: Option<ExternalLink>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub back: ViewAction,
}

/// Render the details panel
#[must_use]
pub fn render_details(place: &Place) -> PlaceDetailsView {
    PlaceDetailsView {
        key: place.key.clone(),
        title: place.name().to_string(),
        image_url: place.image_url.clone(),
        instagram: place
            .instagram_url
            .as_deref()
            .map(|u| ExternalLink::new(LinkKind::Instagram, u)),
        reservation: place
            .reservation_url
            .as_deref()
            .map(|u| ExternalLink::new(LinkKind::Reservation, u)),
        description: place.description.clone(),
        address: place.address.clone(),
        back: ViewAction::BackToList,
    }
}

/// Popup contents for a place's marker
#[must_use]
pub fn info_window_content(place: &Place) -> InfoWindowContent {
    InfoWindowContent {
        title: place.name().to_string(),
        address: place.address.clone(),
        body: place.description.clone().or_else(|| place.category.clone()),
        instagram_url: place.instagram_url.clone(),
    }
}

/// Which panel the sidebar shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SidebarMode {
    #[default]
    List,
    Details(PlaceKey),
}

/// Rendered sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SidebarView {
    List(PlaceListView),
    Details(PlaceDetailsView),
}
