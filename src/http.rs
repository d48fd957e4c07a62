//! Plumbing shared by the upstream JSON clients.

use std::time::Duration;

use reqwest::{header::ACCEPT, Client, Url};
use serde::de::DeserializeOwned;

use crate::error::UpstreamError;

pub const DEFAULT_USER_AGENT: &str = concat!("wx-forecast/", env!("CARGO_PKG_VERSION"));

/// `timeout` bounds each call. It should match the request deadline so the
/// client never cuts a call short of it.
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, UpstreamError> {
    Ok(Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?)
}

/// Parses a base URL, making sure relative joins land below its path.
pub fn parse_base_url(base: &str) -> Result<Url, UpstreamError> {
    let mut base = base.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base).map_err(|e| UpstreamError::Url(format!("{base}: {e}")))
}

pub fn join(base: &Url, path: &str) -> Result<Url, UpstreamError> {
    base.join(path)
        .map_err(|e| UpstreamError::Url(format!("{path}: {e}")))
}

pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: Url,
    accept: &str,
) -> Result<T, UpstreamError> {
    let resp = client.get(url.clone()).header(ACCEPT, accept).send().await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = resp.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
}
