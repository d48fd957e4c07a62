//! Error types for the upstream clients, the aggregator and the HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::weather::ErrorResponse;

pub const MISSING_CITY_MESSAGE: &str = "Query param 'city' missing.";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Unable to retrieve weather forecast";

/// Failure of a single call to Nominatim or api.weather.gov.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("sending http request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected http status code {status} from {url}")]
    Status { status: u16, url: String },

    #[error("decoding json response: {0}")]
    Decode(String),

    #[error("request deadline elapsed")]
    Timeout,

    #[error("no forecast reference to fetch")]
    MissingReference,

    #[error("invalid url: {0}")]
    Url(String),
}

/// Failure that aborts a whole forecast request.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("failed to retrieve coordinates for {city:?}: {source}")]
    Geocode {
        city: String,
        #[source]
        source: UpstreamError,
    },
}

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing city query parameter")]
    MissingCity,

    #[error(transparent)]
    Upstream(#[from] AggregateError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingCity => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller. Upstream detail stays in the logs.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingCity => MISSING_CITY_MESSAGE,
            Self::Upstream(_) => UPSTREAM_FAILURE_MESSAGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            message: self.message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
