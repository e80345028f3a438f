//! Place sources

use crate::error::FetchError;
use crate::place::PlaceRecord;
use async_trait::async_trait;

/// Where the place list comes from
#[async_trait]
pub trait PlaceSource: Send + Sync {
    /// Fetch the full list of place records
    async fn fetch_places(&self) -> Result<Vec<PlaceRecord>, FetchError>;
}

/// Source serving a fixed list, for offline use and tests
#[derive(Debug, Clone, Default)]
pub struct StaticPlaceSource {
    records: Vec<PlaceRecord>,
}

impl StaticPlaceSource {
    /// Serve these records on every fetch
    #[inline]
    #[must_use]
    pub fn new(records: Vec<PlaceRecord>) -> Self {
        Self { records }
    }

    /// Decode a JSON body once and serve it on every fetch
    ///
    /// # Errors
    /// Fails when the body is not a JSON array of place records.
    pub fn from_json(body: &[u8]) -> Result<Self, FetchError> {
        Ok(Self::new(crate::place::decode_records(body)?))
    }
}

#[async_trait]
impl PlaceSource for StaticPlaceSource {
    async fn fetch_places(&self) -> Result<Vec<PlaceRecord>, FetchError> {
        Ok(self.records.clone())
    }
}
