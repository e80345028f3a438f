//! Error types for the map core
//!
//! Every failure here is recoverable: the application state stays where it
//! was and the view layer is told through a notification or a log line.

use std::path::PathBuf;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Fetching places failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Submitting a new place failed
    #[error("submission failed: {0}")]
    Submit(#[from] SubmitError),

    /// Submission form did not validate
    #[error("invalid form: {0}")]
    Form(#[from] FormError),

    /// Geolocation request failed or was rejected
    #[error("geolocation failed: {0}")]
    Geolocation(#[from] GeolocationError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A click referenced a place that is not in the store
    #[error("unknown place: {0}")]
    UnknownPlace(String),

    /// A click referenced a marker that is not registered
    #[error("unknown marker: {0}")]
    UnknownMarker(u64),
}

impl AppError {
    /// Check if the failed operation may succeed when the user tries again
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_retryable(),
            Self::Submit(e) => e.is_retryable(),
            Self::Geolocation(e) => !matches!(
                e,
                GeolocationError::Unsupported | GeolocationError::PermissionDenied
            ),
            _ => false,
        }
    }

    /// Check if the error should be shown to the user rather than only logged
    #[inline]
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Submit(_) | Self::Form(_) | Self::Geolocation(_))
    }
}

/// Errors while loading the place list
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport failure (connection refused, DNS, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("server returned status {status}")]
    Status { status: u16 },

    /// Body was not a JSON array of place records
    #[error("malformed response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status } => *status >= 500,
            Self::Decode(_) => false,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Errors while submitting a happy-hour form
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("server returned status {status}")]
    Status { status: u16 },

    /// Server processed the request and answered `success: false`
    #[error("submission rejected by server")]
    Rejected,

    /// Response body could not be decoded
    #[error("malformed response: {0}")]
    Decode(String),

    /// A submission is already waiting for an answer
    #[error("a submission is already in flight")]
    InFlight,
}

impl SubmitError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Rejected | Self::InFlight)
            || matches!(self, Self::Status { status } if *status >= 500)
    }
}

/// Submission form validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// New place without any name
    #[error("a place name in Hebrew or English is required")]
    MissingName,

    /// Update of an existing place without choosing which one
    #[error("choose the existing place to update")]
    MissingExistingPlace,

    /// Update targets a place that is not on the map
    #[error("'{0}' is not a known place")]
    UnknownExistingPlace(String),
}

/// Geolocation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    /// Host has no geolocation capability
    #[error("geolocation is not supported")]
    Unsupported,

    /// User refused the permission prompt
    #[error("permission denied")]
    PermissionDenied,

    /// Position could not be determined
    #[error("position unavailable: {0}")]
    Unavailable(String),

    /// Provider did not answer in time
    #[error("timed out")]
    Timeout,

    /// A request is already outstanding
    #[error("a location request is already in progress")]
    Busy,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::AppConfig`]
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but are inconsistent
    #[error("invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create validation error
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Result alias used across the crate
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_display() {
        let err = AppError::UnknownPlace("Bar".to_string());
        assert!(err.to_string().contains("unknown place"));
    }

    #[test]
    fn fetch_error_is_retryable() {
        assert!(FetchError::Network("refused".into()).is_retryable());
        assert!(FetchError::Status { status: 503 }.is_retryable());
        assert!(!FetchError::Status { status: 404 }.is_retryable());
        assert!(!FetchError::Decode("eof".into()).is_retryable());
    }

    #[test]
    fn submit_error_is_retryable() {
        assert!(SubmitError::Rejected.is_retryable());
        assert!(SubmitError::Status { status: 502 }.is_retryable());
        assert!(!SubmitError::Status { status: 400 }.is_retryable());
        assert!(!SubmitError::Decode("x".into()).is_retryable());
    }

    #[test]
    fn geolocation_permission_is_final() {
        let err = AppError::from(GeolocationError::PermissionDenied);
        assert!(!err.is_retryable());
        assert!(err.is_user_facing());

        let err = AppError::from(GeolocationError::Timeout);
        assert!(err.is_retryable());
    }

    #[test]
    fn fetch_is_not_user_facing() {
        let err = AppError::from(FetchError::Network("down".into()));
        assert!(!err.is_user_facing());
    }
}
