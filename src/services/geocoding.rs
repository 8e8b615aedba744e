use anyhow::{Context, Result, anyhow};
use itinera_core::model::Position;
use itinera_core::search::GeocodeMatch;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::http_client;
use crate::config::GeocodingConfig;

/// Nominatim place search.
#[derive(Clone)]
pub struct GeocodingClient {
    http: Client,
    search_url: Url,
}

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: String,
}

impl TryFrom<Place> for GeocodeMatch {
    type Error = anyhow::Error;

    fn try_from(place: Place) -> Result<Self> {
        let lat: f64 = place
            .lat
            .parse()
            .with_context(|| format!("Invalid latitude {:?}", place.lat))?;
        let lng: f64 = place
            .lon
            .parse()
            .with_context(|| format!("Invalid longitude {:?}", place.lon))?;

        Ok(GeocodeMatch {
            position: Position::new(lat, lng)?,
            name: place.display_name,
        })
    }
}

impl GeocodingClient {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let search_url = Url::parse(&format!("{}/search", config.base_url.trim_end_matches('/')))
            .with_context(|| format!("Invalid geocoding base_url {:?}", config.base_url))?;

        Ok(Self {
            http: http_client(config.timeout(), &config.user_agent)?,
            search_url,
        })
    }

    fn request_url(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("limit", "1")
            .append_pair("q", query);
        url
    }

    /// Best match for `query`, `None` when nothing matches.
    pub async fn search(&self, query: &str) -> Result<Option<GeocodeMatch>> {
        let response = self
            .http
            .get(self.request_url(query))
            .send()
            .await
            .with_context(|| format!("Failed to search for {query:?}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Geocoding service returned {status}"));
        }

        let places: Vec<Place> = response
            .json()
            .await
            .context("Failed to parse geocoding response")?;
        best_match(places)
    }
}

fn best_match(places: Vec<Place>) -> Result<Option<GeocodeMatch>> {
    places.into_iter().next().map(GeocodeMatch::try_from).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeocodingClient {
        GeocodingClient::new(&GeocodingConfig {
            base_url: "https://geo.example".to_string(),
            user_agent: "itinera-test".to_string(),
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_query_is_encoded() {
        let url = client().request_url("São Paulo & co");
        assert_eq!(url.path(), "/search");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("format".to_string(), "json".to_string()),
                ("limit".to_string(), "1".to_string()),
                ("q".to_string(), "São Paulo & co".to_string()),
            ]
        );
    }

    #[test]
    fn test_best_match() {
        let places: Vec<Place> = serde_json::from_str(
            r#"[
                {"place_id": 1, "lat": "38.7077507", "lon": "-9.1365919", "display_name": "Lisboa, Portugal"},
                {"place_id": 2, "lat": "0", "lon": "0", "display_name": "Elsewhere"}
            ]"#,
        )
        .unwrap();

        let found = best_match(places).unwrap().unwrap();
        assert_eq!(found.name, "Lisboa, Portugal");
        assert_eq!(
            found.position,
            Position {
                lat: 38.7077507,
                lng: -9.1365919
            }
        );
    }

    #[test]
    fn test_no_match_and_bad_coordinates() {
        assert!(best_match(Vec::new()).unwrap().is_none());

        let bad = vec![Place {
            lat: "north".to_string(),
            lon: "0".to_string(),
            display_name: "x".to_string(),
        }];
        assert!(best_match(bad).is_err());
    }
}
