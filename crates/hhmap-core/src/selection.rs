//! Selection state machine
//!
//! At most one place is selected. Clicks on a list entry or a marker move to
//! `Selected(key)`; filter changes leave the state alone. There is no event
//! that leads back to `Unselected`.

use crate::place::PlaceKey;

/// Selection state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// Nothing selected yet
    #[default]
    Unselected,
    /// One place selected
    Selected(PlaceKey),
}

impl SelectionState {
    /// Selected key, if any
    #[inline]
    #[must_use]
    pub fn key(&self) -> Option<&PlaceKey> {
        match self {
            Self::Unselected => None,
            Self::Selected(k) => Some(k),
        }
    }

    /// Check if `key` is the selected place
    #[inline]
    #[must_use]
    pub fn is_selected(&self, key: &str) -> bool {
        self.key().is_some_and(|k| k.as_str() == key)
    }
}

/// Where a selection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    ListItem,
    Marker,
    Details,
}

/// Events the selection machine reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// A place was clicked in the list, marker layer or details link
    Clicked {
        key: PlaceKey,
        source: SelectionSource,
    },
    /// The category filter changed
    FilterChanged,
    /// A new batch of places replaced the store
    PlacesReplaced {
        /// Whether the selected key survived the reload
        selected_still_present: bool,
    },
}

/// Compute the next state
///
/// A reload that drops the selected place is the only way back to
/// `Unselected`; no user event leads there.
#[must_use]
pub fn next_state(current: &SelectionState, event: &SelectionEvent) -> SelectionState {
    match event {
        SelectionEvent::Clicked { key, .. } => SelectionState::Selected(key.clone()),
        SelectionEvent::FilterChanged => current.clone(),
        SelectionEvent::PlacesReplaced {
            selected_still_present,
        } => {
            if *selected_still_present {
                current.clone()
            } else {
                SelectionState::Unselected
            }
        }
    }
}

/// Owner of the current selection
#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    /// Start unselected
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Selected key, if any
    #[inline]
    #[must_use]
    pub fn selected(&self) -> Option<&PlaceKey> {
        self.state.key()
    }

    /// Feed an event and return whether the state changed
    pub fn apply(&mut self, event: &SelectionEvent) -> bool {
        let next = next_state(&self.state, event);
        let changed = next != self.state;
        if changed {
            tracing::debug!(from = ?self.state, to = ?next, "selection changed");
        }
        self.state = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(key: &str, source: SelectionSource) -> SelectionEvent {
        SelectionEvent::Clicked {
            key: PlaceKey::new(key),
            source,
        }
    }

    #[test]
    fn starts_unselected() {
        let controller = SelectionController::new();
        assert_eq!(controller.state(), &SelectionState::Unselected);
        assert!(controller.selected().is_none());
    }

    #[test]
    fn list_and_marker_clicks_select() {
        let mut c = SelectionController::new();
        assert!(c.apply(&click("A", SelectionSource::ListItem)));
        assert!(c.state().is_selected("A"));

        assert!(c.apply(&click("B", SelectionSource::Marker)));
        assert!(c.state().is_selected("B"));
        assert!(!c.state().is_selected("A"));
    }

    #[test]
    fn reselecting_same_place_is_not_a_change() {
        let mut c = SelectionController::new();
        c.apply(&click("A", SelectionSource::ListItem));
        assert!(!c.apply(&click("A", SelectionSource::Marker)));
    }

    #[test]
    fn filter_change_keeps_selection() {
        let mut c = SelectionController::new();
        c.apply(&click("A", SelectionSource::ListItem));
        assert!(!c.apply(&SelectionEvent::FilterChanged));
        assert!(c.state().is_selected("A"));
    }

    #[test]
    fn filter_change_from_unselected_stays_unselected() {
        let state = next_state(&SelectionState::Unselected, &SelectionEvent::FilterChanged);
        assert_eq!(state, SelectionState::Unselected);
    }

    #[test]
    fn reload_without_selected_place_clears() {
        let mut c = SelectionController::new();
        c.apply(&click("A", SelectionSource::ListItem));

        c.apply(&SelectionEvent::PlacesReplaced {
            selected_still_present: true,
        });
        assert!(c.state().is_selected("A"));

        c.apply(&SelectionEvent::PlacesReplaced {
            selected_still_present: false,
        });
        assert_eq!(c.state(), &SelectionState::Unselected);
    }
}
