use std::net::SocketAddr;
use std::time::Duration;

use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;

use crate::http::DEFAULT_USER_AGENT;

const ABOUT: &str = "City weather forecast service";

const LONG_ABOUT: &str = "
HTTP service returning multi-day forecasts for US cities, sourced from NOAA.

Cities are geocoded with OpenStreetMap Nominatim and forecasts fetched from api.weather.gov.
Query it with `GET /v1/weather?city=new%20york,boston`.

Every option can also be set through the environment variable shown next to it.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

const MAX_TIMEOUT_SECS: u64 = 3600;
const MAX_CACHE_EXPIRY_HOURS: i64 = 24 * 365;

#[derive(Parser, Debug, Clone)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(long, env = "WX_LISTEN", default_value = "0.0.0.0:8080", help = "Address to listen on")]
    pub listen: SocketAddr,

    #[arg(
        long,
        env = "WX_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS),
        help = "Deadline in seconds for all upstream calls of one request"
    )]
    pub timeout_secs: u64,

    #[arg(
        long,
        env = "WX_CACHE_EXPIRY_HOURS",
        default_value_t = 5,
        value_parser = clap::value_parser!(i64).range(1..=MAX_CACHE_EXPIRY_HOURS),
        help = "Hours after its first period starts that a cached forecast is served"
    )]
    pub cache_expiry_hours: i64,

    #[arg(
        long,
        env = "WX_COUNTRY",
        default_value = "USA",
        help = "Country appended to every geocoding query"
    )]
    pub country: String,

    #[arg(
        long,
        env = "WX_NOMINATIM_URL",
        default_value = "https://nominatim.openstreetmap.org/",
        help = "Base URL of the Nominatim API"
    )]
    pub nominatim_url: String,

    #[arg(
        long,
        env = "WX_WEATHER_URL",
        default_value = "https://api.weather.gov/",
        help = "Base URL of the NOAA weather API"
    )]
    pub weather_url: String,

    #[arg(
        long,
        env = "WX_USER_AGENT",
        default_value = DEFAULT_USER_AGENT,
        help = "User-Agent sent upstream (api.weather.gov rejects requests without one)"
    )]
    pub user_agent: String,

    #[arg(long, env = "WX_LOG_JSON", help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl Args {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `None` when the value does not fit a `TimeDelta`, which the parser's
    /// range already rules out.
    pub fn cache_expiry(&self) -> Option<chrono::TimeDelta> {
        chrono::TimeDelta::try_hours(self.cache_expiry_hours)
    }
}
