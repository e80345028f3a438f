//! Application configuration
//!
//! Everything has a default matching the production deployment, so an empty
//! TOML file is a valid configuration.

use crate::error::ConfigError;
use crate::place::Coordinates;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the backend serving `/api/places`
    pub api_base_url: String,
    /// Map viewport settings
    pub map: MapOptions,
    /// Category ordering and labels
    pub categories: CategoryConfig,
    /// Sidebar list settings
    pub list: ListConfig,
    /// Ask for the user's position as soon as the map is up
    pub locate_on_start: bool,
    /// What to do when geolocation fails
    pub locate_failure: LocateFailurePolicy,
    /// Refetch places after an accepted submission
    pub refresh_after_submit: bool,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Fails on malformed TOML or inconsistent values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Fails when the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::invalid("api_base_url", "must not be empty"));
        }
        if self.map.focus_zoom < self.map.zoom {
            return Err(ConfigError::invalid(
                "map.focus_zoom",
                format!(
                    "{} is below the initial zoom {}",
                    self.map.focus_zoom, self.map.zoom
                ),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid("request_timeout_secs", "must be positive"));
        }
        Ok(())
    }

    /// With API base URL
    #[inline]
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// With geolocation failure policy
    #[inline]
    #[must_use]
    pub fn with_locate_failure(mut self, policy: LocateFailurePolicy) -> Self {
        self.locate_failure = policy;
        self
    }

    /// With locate-on-start flag
    #[inline]
    #[must_use]
    pub fn with_locate_on_start(mut self, enabled: bool) -> Self {
        self.locate_on_start = enabled;
        self
    }

    /// With refresh-after-submit flag
    #[inline]
    #[must_use]
    pub fn with_refresh_after_submit(mut self, enabled: bool) -> Self {
        self.refresh_after_submit = enabled;
        self
    }

    /// With category configuration
    #[inline]
    #[must_use]
    pub fn with_categories(mut self, categories: CategoryConfig) -> Self {
        self.categories = categories;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".to_string(),
            map: MapOptions::default(),
            categories: CategoryConfig::default(),
            list: ListConfig::default(),
            locate_on_start: true,
            locate_failure: LocateFailurePolicy::Silent,
            refresh_after_submit: true,
            request_timeout_secs: 10,
        }
    }
}

/// Options handed to the map provider when the map is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// Initial centre
    pub center: Coordinates,
    /// Initial zoom
    pub zoom: u8,
    /// Zoom used when a place is selected
    pub focus_zoom: u8,
    /// Zoom used when centring on the user
    pub user_zoom: u8,
    /// Provider map style id
    pub map_id: String,
    /// Hide the provider's built-in controls
    pub disable_default_ui: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: Coordinates::new(32.075, 34.775),
            zoom: 14,
            focus_zoom: 16,
            user_zoom: 17,
            map_id: "DEMO_MAP_ID".to_string(),
            disable_default_ui: true,
        }
    }
}

/// Category ordering and display labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Categories listed first, in this order (matched case-insensitively)
    pub priority: Vec<String>,
    /// Display label per category value
    pub labels: IndexMap<String, String>,
    /// Label of the synthetic "all" entry
    pub all_label: String,
}

impl CategoryConfig {
    /// Hebrew labels, as shown on the production site
    #[must_use]
    pub fn hebrew() -> Self {
        let labels = [
            ("Until 19:00", "עד 19:00"),
            ("until 19:30", "עד 19:30"),
            ("Until 20:00", "עד 20:00"),
            ("After 20:00", "אחרי 20:00"),
            ("WEEKENDS", "סופ״ש"),
            ("Not TLV", "מחוץ לת״א"),
        ];
        Self {
            priority: labels.iter().map(|(k, _)| (*k).to_string()).collect(),
            labels: labels
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            all_label: "כל השעות".to_string(),
        }
    }

    /// English labels: categories are shown as stored
    #[must_use]
    pub fn english() -> Self {
        Self {
            labels: IndexMap::new(),
            all_label: "All times".to_string(),
            ..Self::hebrew()
        }
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self::hebrew()
    }
}

/// Sidebar list settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Maximum characters of description shown under a list entry
    pub snippet_chars: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self { snippet_chars: 90 }
    }
}

/// How a failed geolocation request is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocateFailurePolicy {
    /// Only reset the locate button
    #[default]
    Silent,
    /// Reset the button and queue an error notification
    Notify,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let config = AppConfig::from_toml_str(
            r#"
            api_base_url = "https://ofoodiez.example"
            locate_failure = "notify"

            [map]
            focus_zoom = 18

            [categories]
            all_label = "All times"
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://ofoodiez.example");
        assert_eq!(config.locate_failure, LocateFailurePolicy::Notify);
        assert_eq!(config.map.focus_zoom, 18);
        assert_eq!(config.map.zoom, 14);
        assert_eq!(config.categories.all_label, "All times");
        assert_eq!(config.categories.priority.len(), 6);
    }

    #[test]
    fn focus_zoom_below_initial_is_rejected() {
        let err = AppConfig::from_toml_str("[map]\nzoom = 15\nfocus_zoom = 12\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "map.focus_zoom", .. }));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = AppConfig::from_toml_str("api_base_url = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = AppConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_reads_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "refresh_after_submit = false\n\n[list]\nsnippet_chars = 40").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert!(!config.refresh_after_submit);
        assert_eq!(config.list.snippet_chars, 40);
    }

    #[test]
    fn english_keeps_priority() {
        let en = CategoryConfig::english();
        assert_eq!(en.priority, CategoryConfig::hebrew().priority);
        assert!(en.labels.is_empty());
    }
}
