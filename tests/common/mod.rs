//! Shared fixtures: in-process fakes for the upstream APIs and a server harness.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, SubsecRound, Utc};
use tokio::sync::oneshot;

use wx_forecast::geocode::{Geocoder, Place, SearchOptions};
use wx_forecast::noaa::{forecast, points, Coordinates, WeatherApi};
use wx_forecast::server::{self, AppState};
use wx_forecast::{ForecastAggregator, ForecastCache, UpstreamError};

pub const FORECAST_URL: &str = "https://api.weather.gov/gridpoints/OKX/33,35/forecast";

/// What the fake geocoder answers for a given query.
#[derive(Clone)]
pub enum GeoReply {
    Places(Vec<Place>),
    Fail,
}

/// Geocoder answering from a fixed table. Unknown queries match nothing.
#[derive(Default)]
pub struct FakeGeocoder {
    replies: HashMap<String, GeoReply>,
    pub calls: AtomicUsize,
}

impl FakeGeocoder {
    pub fn with(mut self, query: &str, reply: GeoReply) -> Self {
        self.replies.insert(query.to_string(), reply);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn search(&self, opts: &SearchOptions) -> Result<Vec<Place>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.replies.get(&opts.query) {
            Some(GeoReply::Places(places)) => Ok(places.clone()),
            Some(GeoReply::Fail) => Err(UpstreamError::Status {
                status: 502,
                url: "search".to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

/// Weather API returning the same periods for every point.
#[derive(Default)]
pub struct FakeWeather {
    pub periods: Vec<forecast::Period>,
    pub points_calls: AtomicUsize,
    pub forecast_calls: AtomicUsize,
}

impl FakeWeather {
    pub fn new(periods: Vec<forecast::Period>) -> Self {
        Self {
            periods,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.points_calls.load(Ordering::SeqCst) + self.forecast_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherApi for FakeWeather {
    async fn points(&self, _coord: &Coordinates) -> Result<points::Points, UpstreamError> {
        self.points_calls.fetch_add(1, Ordering::SeqCst);
        Ok(points::Points {
            id: "https://api.weather.gov/points/40.7127,-74.006".to_string(),
            properties: points::Properties {
                forecast: FORECAST_URL.to_string(),
            },
        })
    }

    async fn forecast(&self, forecast_url: &str) -> Result<forecast::Forecast, UpstreamError> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(forecast_url, FORECAST_URL);
        Ok(forecast::Forecast {
            properties: forecast::Properties {
                periods: self.periods.clone(),
            },
        })
    }
}

pub fn new_york() -> Place {
    Place {
        place_id: 366998854,
        lat: "40.7127281".to_string(),
        lon: "-74.0060152".to_string(),
        display_name: "City of New York, New York, United States".to_string(),
    }
}

pub fn period(start: DateTime<FixedOffset>, is_daytime: bool, text: &str) -> forecast::Period {
    forecast::Period {
        name: text.to_string(),
        start_time: start,
        end_time: start + chrono::Duration::hours(1),
        is_daytime,
        detailed_forecast: text.to_string(),
    }
}

/// A daytime period starting now, truncated to whole seconds like the wire format.
pub fn period_now(text: &str) -> forecast::Period {
    period(Utc::now().fixed_offset().trunc_subsecs(0), true, text)
}

/// Router bound to an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub cache: Arc<ForecastCache>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start(geocoder: Arc<FakeGeocoder>, weather: Arc<FakeWeather>) -> Self {
        let cache = Arc::new(ForecastCache::new());
        let aggregator = ForecastAggregator::new(geocoder, weather, cache.clone());
        let app = server::router(AppState {
            aggregator: Arc::new(aggregator),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(server::serve(listener, app, async move {
            let _ = rx.await;
        }));

        Self {
            addr,
            cache,
            shutdown: Some(tx),
        }
    }

    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }

    pub async fn get(&self, path_and_query: &str) -> (u16, serde_json::Value) {
        let resp = reqwest::get(self.url(path_and_query)).await.unwrap();
        let status = resp.status().as_u16();
        let body = resp.json().await.unwrap_or(serde_json::Value::Null);
        (status, body)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
