use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One forecast window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    #[serde(rename = "startTime", with = "crate::time3339")]
    pub start_time: DateTime<FixedOffset>,

    #[serde(rename = "endTime", with = "crate::time3339")]
    pub end_time: DateTime<FixedOffset>,

    pub description: String,
}

/// The current forecast and the forecasts for the next two days for a city.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub name: String,

    #[serde(default)]
    pub detail: Vec<Detail>,
}

impl Forecast {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: Vec::new(),
        }
    }
}

/// Body of `GET /v1/weather`. Entries are the snapshots held by the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListWeatherResponse {
    pub forecast: Vec<Arc<Forecast>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let start = DateTime::parse_from_rfc3339("2023-06-29T17:00:00-04:00").unwrap();
        let end = DateTime::parse_from_rfc3339("2023-06-29T18:00:00-04:00").unwrap();
        let resp = ListWeatherResponse {
            forecast: vec![Arc::new(Forecast {
                name: "New York".to_string(),
                detail: vec![Detail {
                    start_time: start,
                    end_time: end,
                    description: "Haze.".to_string(),
                }],
            })],
        };

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "forecast": [{
                    "name": "New York",
                    "detail": [{
                        "startTime": "2023-06-29T17:00:00-04:00",
                        "endTime": "2023-06-29T18:00:00-04:00",
                        "description": "Haze."
                    }]
                }]
            })
        );
    }

    #[test]
    fn test_empty_detail_serializes_as_array() {
        let value = serde_json::to_value(Forecast::new("Boston")).unwrap();
        assert_eq!(value["detail"], serde_json::json!([]));
    }
}
