//! Forward geocoding: free-text place query to candidate coordinates.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::UpstreamError;
use crate::http;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/";

/// A geographical location matched by a search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub place_id: i64,
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

/// Parameters of a search.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Free-text query, e.g. `boston,USA`.
    pub query: String,
    /// Response encoding, e.g. `json`.
    pub format: String,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Candidate places for a query, best match first.
    async fn search(&self, opts: &SearchOptions) -> Result<Vec<Place>, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: Url,
}

impl NominatimClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: http::build_client(user_agent, timeout)?,
            base_url: http::parse_base_url(NOMINATIM_URL)?,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, UpstreamError> {
        self.base_url = http::parse_base_url(base_url)?;
        Ok(self)
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    #[instrument(skip(self), level = "debug")]
    async fn search(&self, opts: &SearchOptions) -> Result<Vec<Place>, UpstreamError> {
        let mut url = http::join(&self.base_url, "search")?;
        url.query_pairs_mut()
            .append_pair("q", &opts.query)
            .append_pair("format", &opts.format);

        let places: Vec<Place> = http::get_json(&self.client, url, "application/json").await?;
        debug!(candidates = places.len(), "geocoded query");
        Ok(places)
    }
}
