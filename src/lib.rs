//! Weather forecast service for US cities.
//!
//! Resolves city names to coordinates through Nominatim, fetches forecasts from
//! api.weather.gov and keeps recently assembled forecasts in memory.

pub mod aggregator;
pub mod cache;
pub mod cli;
pub mod error;
pub mod geocode;
pub mod http;
pub mod noaa;
pub mod server;
pub mod time3339;
pub mod weather;

pub use aggregator::ForecastAggregator;
pub use cache::ForecastCache;
pub use error::{AggregateError, ApiError, UpstreamError};
pub use geocode::{Geocoder, NominatimClient};
pub use noaa::{NoaaClient, WeatherApi};
pub use weather::{Detail, Forecast, ListWeatherResponse};
