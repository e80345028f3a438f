//! User geolocation
//!
//! Only one position request may be outstanding. The locate button is
//! disabled between [`LocateControl::begin`] and [`LocateControl::finish`].

use crate::error::GeolocationError;
use crate::place::Coordinates;
use async_trait::async_trait;

/// Source of the user's current position
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Ask for the current position
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Locate button state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocateState {
    /// Button shows its arrow and accepts clicks
    #[default]
    Idle,
    /// Button shows a spinner and ignores clicks
    Locating,
}

/// Serializes geolocation requests
#[derive(Debug, Default)]
pub struct LocateControl {
    state: LocateState,
    last_fix: Option<Coordinates>,
}

impl LocateControl {
    /// Create idle control
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> LocateState {
        self.state
    }

    /// Whether the button accepts clicks
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state == LocateState::Idle
    }

    /// Last successfully obtained position
    #[inline]
    #[must_use]
    pub fn last_fix(&self) -> Option<Coordinates> {
        self.last_fix
    }

    /// Start a request
    ///
    /// # Errors
    /// [`GeolocationError::Busy`] while another request is outstanding.
    pub fn begin(&mut self) -> Result<(), GeolocationError> {
        match self.state {
            LocateState::Idle => {
                self.state = LocateState::Locating;
                Ok(())
            }
            LocateState::Locating => Err(GeolocationError::Busy),
        }
    }

    /// Record the outcome of the outstanding request and return to idle
    pub fn finish(&mut self, outcome: &Result<Coordinates, GeolocationError>) {
        if let Ok(position) = outcome {
            self.last_fix = Some(*position);
        }
        self.state = LocateState::Idle;
    }
}
