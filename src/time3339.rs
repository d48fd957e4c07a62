//! Serde codec for RFC 3339 timestamps at second precision.
//!
//! The upstream offset is kept as-is, so `2023-06-29T17:00:00-04:00` comes back
//! out exactly as it went in. UTC is written as `Z`.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{de, Deserialize, Deserializer, Serializer};

pub fn format(t: &DateTime<FixedOffset>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn serialize<S>(t: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(t))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&s).map_err(|e| {
        de::Error::custom(format!("failed to parse {s:?} as an RFC 3339 time: {e}"))
    })
}
