//! Per-city forecast resolution: cache, geocode, weather point, forecast.
//!
//! Cities are resolved one after another in request order. A city that cannot
//! be resolved is left out of the response, except when geocoding itself fails:
//! that is taken as an upstream outage and aborts the whole request.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::cache::ForecastCache;
use crate::error::{AggregateError, UpstreamError};
use crate::geocode::{Geocoder, SearchOptions};
use crate::noaa::{forecast::Period, Coordinates, WeatherApi};
use crate::weather::{Detail, Forecast, ListWeatherResponse};

pub const DEFAULT_COUNTRY: &str = "USA";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_FORMAT: &str = "json";
const FORECAST_HORIZON_DAYS: i64 = 2;

pub struct ForecastAggregator {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherApi>,
    cache: Arc<ForecastCache>,
    country: String,
    timeout: Duration,
}

impl ForecastAggregator {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherApi>,
        cache: Arc<ForecastCache>,
    ) -> Self {
        Self {
            geocoder,
            weather,
            cache,
            country: DEFAULT_COUNTRY.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Deadline shared by every upstream call of one request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache(&self) -> &ForecastCache {
        &self.cache
    }

    pub async fn list_forecasts(
        &self,
        cities: &[String],
    ) -> Result<ListWeatherResponse, AggregateError> {
        // A timeout too large to represent means no deadline at all.
        let deadline = Instant::now().checked_add(self.timeout);
        debug!(?cities, "getting forecasts");

        let mut forecasts = Vec::with_capacity(cities.len());
        for city in cities {
            if let Some(forecast) = self.forecast_for(city, deadline).await? {
                forecasts.push(forecast);
            }
        }

        Ok(ListWeatherResponse {
            forecast: forecasts,
        })
    }

    /// `Ok(None)` means the city was skipped.
    async fn forecast_for(
        &self,
        city: &str,
        deadline: Option<Instant>,
    ) -> Result<Option<Arc<Forecast>>, AggregateError> {
        if let Some(cached) = self.cache.get(city) {
            debug!(city, "serving forecast from cache");
            return Ok(Some(cached));
        }

        let opts = SearchOptions {
            query: format!("{},{}", city, self.country),
            format: DEFAULT_FORMAT.to_string(),
        };
        let places = match bounded(deadline, self.geocoder.search(&opts)).await {
            Ok(places) => places,
            Err(e) => {
                error!(city, error = %e, "failed to retrieve coordinates for city");
                return Err(AggregateError::Geocode {
                    city: city.to_string(),
                    source: e,
                });
            }
        };

        // Only the best match is used.
        let Some(place) = places.into_iter().next() else {
            warn!(city, "no place found for city");
            return Ok(None);
        };

        let coord = Coordinates {
            lat: place.lat,
            lon: place.lon,
        };
        let points = match bounded(deadline, self.weather.points(&coord)).await {
            Ok(points) => points,
            Err(e) => {
                warn!(city, error = %e, "failed to retrieve weather point details");
                return Ok(None);
            }
        };

        let upstream = match bounded(deadline, self.weather.forecast(points.forecast_url())).await {
            Ok(forecast) => forecast,
            Err(e) => {
                warn!(city, error = %e, "failed to retrieve forecast for city");
                return Ok(None);
            }
        };

        let forecast = Arc::new(Forecast {
            name: title_case(city),
            detail: filter_periods(&upstream.properties.periods, Utc::now()),
        });
        self.cache.set(city, Arc::clone(&forecast));

        Ok(Some(forecast))
    }
}

/// Runs `call` unless `deadline` has already passed. `timeout_at` polls the call
/// once before looking at the clock, so the check has to come first.
async fn bounded<T>(
    deadline: Option<Instant>,
    call: impl Future<Output = Result<T, UpstreamError>>,
) -> Result<T, UpstreamError> {
    let Some(deadline) = deadline else {
        return call.await;
    };
    if Instant::now() >= deadline {
        return Err(UpstreamError::Timeout);
    }
    tokio::time::timeout_at(deadline, call)
        .await
        .unwrap_or_else(|_| Err(UpstreamError::Timeout))
}

/// Keeps periods up to, not including, the first daytime period that starts
/// more than two days after `now`. Periods are assumed chronological.
pub fn filter_periods(periods: &[Period], now: DateTime<Utc>) -> Vec<Detail> {
    let horizon = now + chrono::Duration::days(FORECAST_HORIZON_DAYS);
    periods
        .iter()
        .take_while(|p| !(p.is_daytime && p.start_time > horizon))
        .map(|p| Detail {
            start_time: p.start_time,
            end_time: p.end_time,
            description: p.detailed_forecast.clone(),
        })
        .collect()
}

/// English title case: each word starts upper case, the rest is lower case.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    for c in s.chars() {
        if word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        word_start = !(c.is_alphanumeric() || c == '\'');
    }
    out
}

/// Splits the `city` query value. Segments are kept verbatim since they double
/// as cache keys.
///
/// Blank segments are dropped rather than geocoded as a bare `,USA`, so
/// `boston,,` asks for one city and `,` for none.
pub fn split_cities(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .collect()
}
