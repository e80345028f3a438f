//! Geolocation for hosts without a positioning device

use async_trait::async_trait;
use hhmap_core::{Coordinates, GeolocationError, GeolocationProvider};

/// Position given on the command line, if any
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPosition(Option<Coordinates>);

impl FixedPosition {
    /// Position from optional latitude and longitude arguments
    ///
    /// Both halves are required; one without the other counts as unknown.
    #[must_use]
    pub fn from_args(lat: Option<f64>, lng: Option<f64>) -> Self {
        Self(Coordinates::from_parts(lat, lng))
    }
}

#[async_trait]
impl GeolocationProvider for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.0.ok_or(GeolocationError::Unsupported)
    }
}
