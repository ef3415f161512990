//! Google Maps backend
//!
//! `GoogleMapsClient` is a small typed client for the Geocoding and Places
//! Nearby Search web services. HTTP failures and malformed bodies are errors.
//! Geocoding behaves like the official client libraries: error statuses
//! (`REQUEST_DENIED`, `OVER_QUERY_LIMIT`, ...) are errors and `ZERO_RESULTS`
//! is an empty answer. Nearby Search hands back the body whatever its status.
//! `GoogleMapsProvider` adapts it to `PlacesProvider`.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::{PlacesError, PlacesResult};
use crate::provider::PlacesProvider;
use crate::types::Coordinate;

pub const GOOGLE_MAPS_BASE_URL: &str = "https://maps.googleapis.com";

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: Option<String>,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceSummary>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceSummary {
    pub name: String,
    pub vicinity: Option<String>,
}

/// Typed client for the Google Maps web services
#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl GoogleMapsClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_http_client(Client::new(), api_key)
    }

    pub fn with_http_client(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: GOOGLE_MAPS_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Geocodes a free-text address. An address Google cannot resolve yields
    /// an empty list.
    pub async fn geocode(&self, address: &str) -> PlacesResult<Vec<GeocodeResult>> {
        let response: GeocodeResponse = self
            .get_json("/maps/api/geocode/json", &[("address", address.to_string())])
            .await?;

        match response.status.as_str() {
            STATUS_OK | STATUS_ZERO_RESULTS => Ok(response.results),
            other => Err(PlacesError::Api {
                status: other.to_string(),
                message: response.error_message.unwrap_or_default(),
            }),
        }
    }

    /// Runs a Nearby Search around `location`. The body is returned for any
    /// `status`, so the caller decides what a non-`OK` answer means.
    pub async fn places_nearby(
        &self,
        location: Coordinate,
        radius_meters: u32,
        place_type: &str,
    ) -> PlacesResult<NearbySearchResponse> {
        self.get_json(
            "/maps/api/place/nearbysearch/json",
            &[
                ("location", location.to_string()),
                ("radius", radius_meters.to_string()),
                ("type", place_type.to_string()),
            ],
        )
        .await
    }

    async fn get_json<T>(&self, endpoint: &str, params: &[(&str, String)]) -> PlacesResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, "Calling Google Maps");

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PlacesError::Http {
                status_code: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| PlacesError::Parsing(format!("Failed to parse {}: {}", endpoint, e)))
    }
}

/// `PlacesProvider` backed by `GoogleMapsClient`
#[derive(Debug, Clone)]
pub struct GoogleMapsProvider {
    client: GoogleMapsClient,
}

impl GoogleMapsProvider {
    pub fn new(client: GoogleMapsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PlacesProvider for GoogleMapsProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn geocode(&self, location: &str) -> PlacesResult<Option<Coordinate>> {
        let results = self.client.geocode(location).await?;
        Ok(results
            .first()
            .map(|result| Coordinate::new(result.geometry.location.lat, result.geometry.location.lng)))
    }

    async fn search_nearby(
        &self,
        at: Coordinate,
        radius_meters: u32,
        place_type: &str,
    ) -> PlacesResult<Option<Vec<String>>> {
        let response = self.client.places_nearby(at, radius_meters, place_type).await?;
        if response.status != STATUS_OK {
            warn!(
                status = %response.status,
                error_message = response.error_message.as_deref().unwrap_or_default(),
                place_type,
                "Nearby search was not successful"
            );
            return Ok(None);
        }

        Ok(Some(response.results.into_iter().map(|place| place.name).collect()))
    }
}
