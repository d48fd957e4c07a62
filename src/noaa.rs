//! api.weather.gov client.
//!
//! A forecast takes two hops: `/points/{lat},{lon}` yields the forecast URL of
//! the grid cell, and that URL yields the forecast periods.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::UpstreamError;
use crate::http;

const BASE_URL: &str = "https://api.weather.gov/";
const GEO_JSON: &str = "application/geo+json";

/// Geo coordinates of a place, as text-encoded decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub lat: String,
    pub lon: String,
}

pub mod points {
    use super::*;

    #[derive(Deserialize, Debug, Default, Clone)]
    pub struct Points {
        #[serde(default)]
        pub id: String,

        pub properties: Properties,
    }

    impl Points {
        pub fn forecast_url(&self) -> &str {
            &self.properties.forecast
        }
    }

    #[derive(Deserialize, Debug, Default, Clone)]
    pub struct Properties {
        #[serde(default)]
        pub forecast: String,
    }
}

pub mod forecast {
    use super::*;

    #[derive(Deserialize, Debug, Default, Clone)]
    pub struct Forecast {
        pub properties: Properties,
    }

    #[derive(Deserialize, Debug, Default, Clone)]
    pub struct Properties {
        #[serde(default)]
        pub periods: Vec<Period>,
    }

    #[derive(Deserialize, Debug, Clone)]
    pub struct Period {
        #[serde(default)]
        pub name: String,

        #[serde(rename = "startTime", with = "crate::time3339")]
        pub start_time: DateTime<FixedOffset>,

        #[serde(rename = "endTime", with = "crate::time3339")]
        pub end_time: DateTime<FixedOffset>,

        #[serde(rename = "isDaytime", default)]
        pub is_daytime: bool,

        #[serde(rename = "detailedForecast", default)]
        pub detailed_forecast: String,
    }
}

use forecast::Forecast;
use points::Points;

/// Weather lookups the aggregator depends on.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// Metadata for the grid point covering `coord`.
    async fn points(&self, coord: &Coordinates) -> Result<Points, UpstreamError>;

    /// Forecast periods behind a forecast URL returned by [`WeatherApi::points`].
    async fn forecast(&self, forecast_url: &str) -> Result<Forecast, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct NoaaClient {
    client: Client,
    base_url: Url,
}

impl NoaaClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: http::build_client(user_agent, timeout)?,
            base_url: http::parse_base_url(BASE_URL)?,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, UpstreamError> {
        self.base_url = http::parse_base_url(base_url)?;
        Ok(self)
    }
}

#[async_trait]
impl WeatherApi for NoaaClient {
    #[instrument(skip(self), level = "debug")]
    async fn points(&self, coord: &Coordinates) -> Result<Points, UpstreamError> {
        let url = http::join(&self.base_url, &format!("points/{},{}", coord.lat, coord.lon))?;
        let points: Points = http::get_json(&self.client, url, GEO_JSON).await?;
        debug!(forecast = %points.forecast_url(), "resolved weather point");
        Ok(points)
    }

    #[instrument(skip(self), level = "debug")]
    async fn forecast(&self, forecast_url: &str) -> Result<Forecast, UpstreamError> {
        if forecast_url.is_empty() {
            return Err(UpstreamError::MissingReference);
        }
        let url = http::join(&self.base_url, forecast_url)?;
        let forecast: Forecast = http::get_json(&self.client, url, GEO_JSON).await?;
        debug!(periods = forecast.properties.periods.len(), "fetched forecast");
        Ok(forecast)
    }
}
