//! Map provider capability
//!
//! The core never talks to a concrete map library. It drives whatever
//! implements [`MapProvider`]: a browser binding, a native widget, or the
//! recording provider used in tests.

use crate::config::MapOptions;
use crate::place::Coordinates;
use serde::Serialize;
use std::fmt;

/// Opaque handle to a marker created by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MarkerHandle(pub u64);

impl fmt::Display for MarkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// Visual variant of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MarkerVariant {
    /// Regular place pin
    Default,
    /// The selected place
    Highlighted,
    /// The user's own position
    UserLocation,
}

impl MarkerVariant {
    /// Pin styling for this variant
    #[must_use]
    pub fn style(self) -> PinStyle {
        match self {
            Self::Default => PinStyle {
                background: "#FF6B6B",
                border: "#FFFFFF",
                glyph: "#FFFFFF",
                scale: 1.1,
                z_index: None,
            },
            Self::Highlighted => PinStyle {
                background: "#2E86DE",
                border: "#FFFFFF",
                glyph: "#FFFFFF",
                scale: 1.3,
                z_index: Some(999),
            },
            Self::UserLocation => PinStyle {
                background: "#4285F4",
                border: "#FFFFFF",
                glyph: "#4285F4",
                scale: 1.0,
                z_index: Some(1000),
            },
        }
    }
}

/// Concrete pin appearance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PinStyle {
    pub background: &'static str,
    pub border: &'static str,
    pub glyph: &'static str,
    pub scale: f32,
    pub z_index: Option<i32>,
}

/// Contents of the popup anchored to a marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoWindowContent {
    pub title: String,
    pub address: Option<String>,
    /// Description, or the category when there is none
    pub body: Option<String>,
    pub instagram_url: Option<String>,
}

/// Minimal capability the core needs from a map library
pub trait MapProvider {
    /// Create the map surface
    fn create_map(&mut self, options: &MapOptions);

    /// Create a marker attached to the map
    fn create_marker(
        &mut self,
        position: Coordinates,
        title: &str,
        variant: MarkerVariant,
    ) -> MarkerHandle;

    /// Attach (`true`) or detach (`false`) a marker without destroying it
    fn set_marker_visibility(&mut self, handle: MarkerHandle, visible: bool);

    /// Swap a marker's pin
    fn set_marker_content(&mut self, handle: MarkerHandle, variant: MarkerVariant);

    /// Move the viewport
    fn set_view(&mut self, center: Coordinates, zoom: u8);

    /// Fill and open the popup over a marker
    fn open_info_window(&mut self, anchor: MarkerHandle, content: &InfoWindowContent);

    /// Close the popup if one is open
    fn close_info_window(&mut self);
}

impl<M: MapProvider + ?Sized> MapProvider for &mut M {
    fn create_map(&mut self, options: &MapOptions) {
        (**self).create_map(options);
    }

    fn create_marker(
        &mut self,
        position: Coordinates,
        title: &str,
        variant: MarkerVariant,
    ) -> MarkerHandle {
        (**self).create_marker(position, title, variant)
    }

    fn set_marker_visibility(&mut self, handle: MarkerHandle, visible: bool) {
        (**self).set_marker_visibility(handle, visible);
    }

    fn set_marker_content(&mut self, handle: MarkerHandle, variant: MarkerVariant) {
        (**self).set_marker_content(handle, variant);
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        (**self).set_view(center, zoom);
    }

    fn open_info_window(&mut self, anchor: MarkerHandle, content: &InfoWindowContent) {
        (**self).open_info_window(anchor, content);
    }

    fn close_info_window(&mut self) {
        (**self).close_info_window();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlighted_pin_is_larger_and_on_top() {
        let normal = MarkerVariant::Default.style();
        let selected = MarkerVariant::Highlighted.style();

        assert!(selected.scale > normal.scale);
        assert_eq!(selected.z_index, Some(999));
        assert_eq!(normal.z_index, None);
        assert_ne!(selected.background, normal.background);
    }

    #[test]
    fn handle_display() {
        assert_eq!(MarkerHandle(7).to_string(), "marker#7");
    }
}
