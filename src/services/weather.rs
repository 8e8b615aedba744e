use anyhow::{Context, Result, anyhow};
use itinera_core::model::Position;
use itinera_core::weather::{WeatherReport, WeatherSlot};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::http_client;
use crate::config::WeatherConfig;

/// Open-Meteo current conditions.
#[derive(Clone)]
pub struct WeatherClient {
    http: Client,
    forecast_url: Url,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: u16,
}

impl From<CurrentWeather> for WeatherReport {
    fn from(current: CurrentWeather) -> Self {
        WeatherReport {
            temperature: current.temperature,
            weather_code: current.weathercode,
        }
    }
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let forecast_url = Url::parse(&format!(
            "{}/v1/forecast",
            config.base_url.trim_end_matches('/')
        ))
        .with_context(|| format!("Invalid weather base_url {:?}", config.base_url))?;

        Ok(Self {
            http: http_client(config.timeout(), concat!("itinera/", env!("CARGO_PKG_VERSION")))?,
            forecast_url,
        })
    }

    fn request_url(&self, position: Position) -> Url {
        let mut url = self.forecast_url.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &position.lat.to_string())
            .append_pair("longitude", &position.lng.to_string())
            .append_pair("current_weather", "true");
        url
    }

    pub async fn current(&self, position: Position) -> Result<WeatherReport> {
        let url = self.request_url(position);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to reach weather service")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Weather service returned {status}"));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .context("Failed to parse weather response")?;
        Ok(body.current_weather.into())
    }

    /// Card badge for `position`; lookup failures hide the badge.
    pub async fn slot(&self, position: Position) -> WeatherSlot {
        match self.current(position).await {
            Ok(report) => report.into(),
            Err(e) => {
                tracing::warn!(error = %e, lat = position.lat, lng = position.lng, "Weather lookup failed");
                WeatherSlot::Hidden
            }
        }
    }
}
