use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::config::GeocodingConfig;
use crate::errors::FetchError;
use crate::models::profile::GeoLocation;
use crate::models::upstream::NominatimPlace;

/// Free-text place name → coordinates. `Ok(None)` means no match.
pub trait Geocoder {
    fn geocode(&self, place_name: &str) -> impl Future<Output = Result<Option<GeoLocation>, FetchError>> + Send;
}

/// OpenStreetMap Nominatim search client.
#[derive(Clone, Debug)]
pub struct NominatimClient {
    base_url: String,
    client: Client,
}

impl NominatimClient {
    pub fn new(config: &GeocodingConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl Geocoder for NominatimClient {
    async fn geocode(&self, place_name: &str) -> Result<Option<GeoLocation>, FetchError> {
        let url = format!("{}/search", self.base_url);
        debug!("[GEOCODE] Looking up '{}'", place_name);

        let response = self
            .client
            .get(&url)
            .query(&[("q", place_name), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        let Some(place) = places.into_iter().next() else {
            info!("[GEOCODE] No match for '{}'", place_name);
            return Ok(None);
        };

        let latitude = parse_coordinate("lat", &place.lat)?;
        let longitude = parse_coordinate("lon", &place.lon)?;
        debug!(
            "[GEOCODE] '{}' → {:.4}, {:.4} ({})",
            place_name,
            latitude,
            longitude,
            place.display_name.as_deref().unwrap_or("-")
        );

        Ok(Some(GeoLocation { latitude, longitude }))
    }
}

fn parse_coordinate(field: &str, raw: &str) -> Result<f64, FetchError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FetchError::Malformed(format!("{field} '{raw}' is not a number")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(url: String) -> NominatimClient {
        NominatimClient::new(&GeocodingConfig {
            base_url: url,
            user_agent: "solar-viability-sim-tests".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_geocode_first_hit() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/search".to_string()))
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Feira de Santana, BA".into()),
                Matcher::UrlEncoded("format".into(), "json".into()),
                Matcher::UrlEncoded("limit".into(), "1".into()),
            ]))
            .match_header("user-agent", "solar-viability-sim-tests")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([{
                    "lat": "-12.2664",
                    "lon": "-38.9663",
                    "display_name": "Feira de Santana, Bahia, Brasil"
                }])
                .to_string(),
            )
            .create_async()
            .await;

        let location = client_for(server.url())
            .geocode("Feira de Santana, BA")
            .await
            .unwrap()
            .expect("location should be found");

        assert_eq!(location.latitude, -12.2664);
        assert_eq!(location.longitude, -38.9663);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_geocode_no_match_is_none() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/search".to_string()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let result = client_for(server.url()).geocode("Nowhere at all").await.unwrap();
        assert_eq!(result, None);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_geocode_server_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Regex(r"^/search".to_string()))
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let result = client_for(server.url()).geocode("Salvador, BA").await;
        assert!(matches!(result, Err(FetchError::Status(s)) if s.as_u16() == 503));
    }

    #[tokio::test]
    async fn test_geocode_bad_coordinate() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Regex(r"^/search".to_string()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!([{ "lat": "north", "lon": "1.0" }]).to_string())
            .create_async()
            .await;

        let result = client_for(server.url()).geocode("Somewhere").await;
        assert!(matches!(result, Err(FetchError::Malformed(m)) if m.contains("north")));
    }
}
