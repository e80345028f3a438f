//! Place model and record decoding
//!
//! The places endpoint serves rows straight out of a spreadsheet where empty
//! cells come back as `""`. [`PlaceRecord`] accepts that wire shape and
//! [`Place`] is the cleaned-up value the rest of the crate works with.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;

/// Identity of a place (its display name)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceKey(String);

impl PlaceKey {
    /// Create a key from a place name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Key as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PlaceKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlaceKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Geographic position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl Coordinates {
    /// Create coordinates
    #[inline]
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build coordinates only when both halves are usable
    ///
    /// Zero is treated as missing, matching how the spreadsheet backend
    /// reports cells nobody geocoded.
    #[must_use]
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng))
                if lat.is_finite() && lng.is_finite() && lat != 0.0 && lng != 0.0 =>
            {
                Some(Self { lat, lng })
            }
            _ => None,
        }
    }
}

/// Venue with a happy-hour deal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    /// Unique display name
    pub key: PlaceKey,
    /// Time bucket such as "Until 19:00"
    pub category: Option<String>,
    /// Position on the map, if geocoded
    pub coordinates: Option<Coordinates>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub image_url: Option<String>,
    pub instagram_url: Option<String>,
    pub reservation_url: Option<String>,
}

impl Place {
    /// Create a bare place with only a name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            key: PlaceKey::new(name),
            category: None,
            coordinates: None,
            description: None,
            address: None,
            image_url: None,
            instagram_url: None,
            reservation_url: None,
        }
    }

    /// With category
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// With coordinates
    #[inline]
    #[must_use]
    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Some(Coordinates::new(lat, lng));
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With address
    #[inline]
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// With image URL
    #[inline]
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// With Instagram profile URL
    #[inline]
    #[must_use]
    pub fn with_instagram(mut self, url: impl Into<String>) -> Self {
        self.instagram_url = Some(url.into());
        self
    }

    /// With reservation URL
    #[inline]
    #[must_use]
    pub fn with_reservation(mut self, url: impl Into<String>) -> Self {
        self.reservation_url = Some(url.into());
        self
    }

    /// Display name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.key.as_str()
    }

    /// Whether this place can carry a marker
    #[inline]
    #[must_use]
    pub fn is_mappable(&self) -> bool {
        self.coordinates.is_some()
    }
}

/// One row of `GET /api/places` as the backend sends it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceRecord {
    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "Category", default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(rename = "Latitude", default, deserialize_with = "lenient_number")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", default, deserialize_with = "lenient_number")]
    pub longitude: Option<f64>,
    #[serde(rename = "Description", default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(rename = "Address", default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(rename = "ImageURL", default, deserialize_with = "lenient_string")]
    pub image_url: Option<String>,
    #[serde(rename = "InstagramURL", default, deserialize_with = "lenient_string")]
    pub instagram_url: Option<String>,
    #[serde(rename = "ReservationLink", default, deserialize_with = "lenient_string")]
    pub reservation_url: Option<String>,
}

impl PlaceRecord {
    /// Convert into a [`Place`], or `None` when the row has no name
    ///
    /// Text fields are trimmed and blank ones dropped, whether the record
    /// was decoded from the backend or built in code.
    #[must_use]
    pub fn into_place(self) -> Option<Place> {
        let name = non_blank(self.name)?;
        Some(Place {
            key: PlaceKey::new(name),
            category: non_blank(self.category),
            coordinates: Coordinates::from_parts(self.latitude, self.longitude),
            description: non_blank(self.description),
            address: non_blank(self.address),
            image_url: non_blank(self.image_url),
            instagram_url: non_blank(self.instagram_url),
            reservation_url: non_blank(self.reservation_url),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

/// Decode a `GET /api/places` body
///
/// # Errors
/// Fails when the body is not a JSON array of objects.
pub fn decode_records(body: &[u8]) -> Result<Vec<PlaceRecord>, serde_json::Error> {
    serde_json::from_slice(body)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_decodes_full_row() {
        let body = br#"[{
            "Name": "Bellboy",
            "Category": "Until 19:00",
            "Latitude": 32.07,
            "Longitude": 34.77,
            "Description": "1+1 on cocktails",
            "Address": "Berdichevsky 14",
            "ImageURL": "https://img/1.jpg",
            "InstagramURL": "https://instagram.com/bellboy",
            "ReservationLink": "https://tabit/bellboy"
        }]"#;

        let records = decode_records(body).unwrap();
        let place = records.into_iter().next().unwrap().into_place().unwrap();

        assert_eq!(place.name(), "Bellboy");
        assert_eq!(place.category.as_deref(), Some("Until 19:00"));
        assert_eq!(place.coordinates, Some(Coordinates::new(32.07, 34.77)));
        assert_eq!(place.reservation_url.as_deref(), Some("https://tabit/bellboy"));
    }

    #[test]
    fn empty_cells_become_none() {
        let body = br#"[{"Name": "Port Said", "Category": "", "Latitude": "", "Longitude": "", "Description": "  "}]"#;
        let place = decode_records(body).unwrap().remove(0).into_place().unwrap();

        assert!(place.category.is_none());
        assert!(place.coordinates.is_none());
        assert!(place.description.is_none());
    }

    #[test]
    fn zero_coordinates_are_missing() {
        let body = br#"[{"Name": "A", "Latitude": 0, "Longitude": 34.7}]"#;
        let place = decode_records(body).unwrap().remove(0).into_place().unwrap();
        assert!(!place.is_mappable());
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let body = br#"[{"Name": "A", "Latitude": "32.1", "Longitude": " 34.8 "}]"#;
        let place = decode_records(body).unwrap().remove(0).into_place().unwrap();
        assert_eq!(place.coordinates, Some(Coordinates::new(32.1, 34.8)));
    }

    #[test]
    fn nameless_row_is_dropped() {
        let body = br#"[{"Name": "", "Category": "WEEKENDS"}, {"Category": "WEEKENDS"}]"#;
        let places: Vec<_> = decode_records(body)
            .unwrap()
            .into_iter()
            .filter_map(PlaceRecord::into_place)
            .collect();
        assert!(places.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let body = br#"[{"Name": "A", "Unnamed: 0": 3, "Rating": 4.5}]"#;
        assert_eq!(decode_records(body).unwrap().len(), 1);
    }

    #[test]
    fn non_array_body_fails() {
        assert!(decode_records(br#"{"error": "Data file not found"}"#).is_err());
    }

    #[test]
    fn place_key_borrows_as_str() {
        let mut set = std::collections::HashSet::new();
        set.insert(PlaceKey::new("A"));
        assert!(set.contains("A"));
    }
}
