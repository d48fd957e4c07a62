use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wx_forecast::cli::Args;
use wx_forecast::server::{self, AppState};
use wx_forecast::{ForecastAggregator, ForecastCache, NoaaClient, NominatimClient};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let geocoder = NominatimClient::new(&args.user_agent, args.timeout())
        .and_then(|c| c.with_base_url(&args.nominatim_url))
        .context("building geocoding client")?;
    let weather = NoaaClient::new(&args.user_agent, args.timeout())
        .and_then(|c| c.with_base_url(&args.weather_url))
        .context("building weather client")?;
    let expiry = args.cache_expiry().with_context(|| {
        format!("cache expiry of {} hours is out of range", args.cache_expiry_hours)
    })?;
    let cache = Arc::new(ForecastCache::with_expiry(expiry));

    let aggregator = ForecastAggregator::new(Arc::new(geocoder), Arc::new(weather), cache)
        .with_country(args.country.clone())
        .with_timeout(args.timeout());
    let app = server::router(AppState {
        aggregator: Arc::new(aggregator),
    });

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("binding {}", args.listen))?;

    server::serve(listener, app, shutdown_signal()).await?;

    tracing::info!("Server exiting");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    let _ = ctrl_c.await;

    tracing::info!("Shutting down server...");
}
