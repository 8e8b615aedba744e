//! HTTP collaborators: current weather and place search.

pub mod geocoding;
pub mod weather;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

pub use geocoding::GeocodingClient;
pub use weather::WeatherClient;

fn http_client(timeout: Duration, user_agent: &str) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .context("Failed to create HTTP client")
}
