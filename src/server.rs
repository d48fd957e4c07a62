//! HTTP surface.

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;

use crate::aggregator::{split_cities, ForecastAggregator};
use crate::error::ApiError;
use crate::weather::ListWeatherResponse;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<ForecastAggregator>,
}

/// First `city` value of the query string. Later repeats are ignored.
fn city_param(params: &[(String, String)]) -> &str {
    params
        .iter()
        .find(|(key, _)| key == "city")
        .map(|(_, value)| value.as_str())
        .unwrap_or_default()
}

/// GET /v1/weather?city=new%20york,boston
async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ListWeatherResponse>, ApiError> {
    let cities = split_cities(city_param(&params));
    if cities.is_empty() {
        return Err(ApiError::MissingCity);
    }

    let resp = state.aggregator.list_forecasts(&cities).await?;
    tracing::info!(
        requested = cities.len(),
        resolved = resp.forecast.len(),
        "served forecasts"
    );
    Ok(Json(resp))
}

/// GET /health
async fn health_check() -> &'static str {
    "ok"
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/weather", get(get_forecast))
        .with_state(state)
}

/// Serves `app` until `shutdown` resolves, then drains in-flight requests.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "HTTP server listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
