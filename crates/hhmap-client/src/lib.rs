//! HTTP backend for the happy-hour map
//!
//! [`ApiClient`] talks to the map backend:
//! - `GET {base}/api/places` answers a JSON array of place records
//! - `POST {base}/api/submit-happy-hour` takes a submission draft and
//!   answers `{"success": bool}`
//!
//! It implements both [`PlaceSource`] and [`SubmissionSink`], so one client
//! can be handed to [`hhmap_core::MapApp::submit_and_refresh`].

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;

pub use error::{ClientError, Result};

use async_trait::async_trait;
use hhmap_core::{
    decode_records, AppConfig, FetchError, PlaceRecord, PlaceSource, SubmissionDraft,
    SubmissionResponse, SubmissionSink, SubmitError,
};
use std::time::Duration;

const PLACES_PATH: &str = "/api/places";
const SUBMIT_PATH: &str = "/api/submit-happy-hour";

/// HTTP client for the map backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request timeout
    ///
    /// # Errors
    /// [`ClientError::InvalidBaseUrl`] unless the URL is http(s) with a host.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim();
        let valid = reqwest::Url::parse(trimmed).is_ok_and(|url| {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        });
        if !valid {
            return Err(ClientError::InvalidBaseUrl(trimmed.to_string()));
        }
        let base_url = trimmed.trim_end_matches('/');

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Create a client from the application configuration
    ///
    /// # Errors
    /// Same as [`ApiClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn places_url(&self) -> String {
        format!("{}{PLACES_PATH}", self.base_url)
    }

    #[must_use]
    pub fn submit_url(&self) -> String {
        format!("{}{SUBMIT_PATH}", self.base_url)
    }
}

#[async_trait]
impl PlaceSource for ApiClient {
    async fn fetch_places(&self) -> std::result::Result<Vec<PlaceRecord>, FetchError> {
        let url = self.places_url();
        tracing::debug!(%url, "fetching places");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| error::fetch_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "places request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| error::fetch_transport(&e))?;
        let records = decode_records(&body)?;
        tracing::debug!(records = records.len(), "places fetched");
        Ok(records)
    }
}

#[async_trait]
impl SubmissionSink for ApiClient {
    async fn submit(
        &self,
        draft: &SubmissionDraft,
    ) -> std::result::Result<SubmissionResponse, SubmitError> {
        let url = self.submit_url();
        tracing::debug!(%url, mode = ?draft.form_mode, "posting submission");

        let response = self
            .client
            .post(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| error::submit_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "submission request failed");
            return Err(SubmitError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<SubmissionResponse>()
            .await
            .map_err(|e| error::submit_transport(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped() {
        let client = ApiClient::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.places_url(), "http://localhost:5000/api/places");
        assert_eq!(
            client.submit_url(),
            "http://localhost:5000/api/submit-happy-hour"
        );
    }

    #[test]
    fn non_http_base_is_rejected() {
        assert!(matches!(
            ApiClient::new("ftp://example.com", Duration::from_secs(1)),
            Err(ClientError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("", Duration::from_secs(1)),
            Err(ClientError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn base_without_host_is_rejected() {
        for base in ["http://", "https://", "http//example.com"] {
            assert!(
                matches!(
                    ApiClient::new(base, Duration::from_secs(1)),
                    Err(ClientError::InvalidBaseUrl(_))
                ),
                "{base} accepted"
            );
        }
        let client = ApiClient::new(" http://127.0.0.1:5000 ", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:5000");
    }

    #[test]
    fn built_from_config() {
        let config = AppConfig::default().with_api_base_url("https://hh.example.com");
        let client = ApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://hh.example.com");
    }
}
