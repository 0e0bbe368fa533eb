use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response};
use std::time::Duration;

pub const USER_AGENT: &str = "fcirank/1.0";

/// HTTP client shared by the providers. Every request is bounded by `timeout`
/// and attempted once.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Turns non-2xx responses into errors carrying the status and request URL.
pub fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(anyhow!("Request to {} failed with status {}", response.url(), status))
    }
}
