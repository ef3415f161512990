//! Raw-HTTP places backend
//!
//! Talks to a REST maps provider with two endpoints:
//!
//! - `GET {base}/geocode?address=..&key=..` answering
//!   `{"code": <int>, "results": [{"lat": .., "lng": ..}]}`
//! - `GET {base}/place/search?query=..&circle=<lng>,<lat>,<radius>&sort=distance&key=..`
//!   answering `{"results": [{"name": ..}]}`
//!
//! Any geocoding answer other than HTTP 200 with the success code and at least
//! one result counts as "not found". A search answer other than HTTP 200 with a
//! `results` field counts as "no places".

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::{PlacesError, PlacesResult};
use crate::provider::PlacesProvider;
use crate::types::Coordinate;

pub const DEFAULT_SUCCESS_CODE: i64 = 0;

#[derive(Debug, Deserialize)]
struct GeocodeBody {
    code: Option<i64>,
    #[serde(default)]
    results: Vec<RestLocation>,
}

#[derive(Debug, Deserialize)]
struct RestLocation {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    results: Option<Vec<RestPlace>>,
}

#[derive(Debug, Deserialize)]
struct RestPlace {
    name: String,
}

/// `PlacesProvider` issuing plain HTTP requests
#[derive(Debug, Clone)]
pub struct RestPlacesProvider {
    http: Client,
    base_url: String,
    api_key: String,
    success_code: i64,
}

impl RestPlacesProvider {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Self {
        Self::with_http_client(Client::new(), base_url, api_key)
    }

    pub fn with_http_client(http: Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            success_code: DEFAULT_SUCCESS_CODE,
        }
    }

    pub fn with_success_code(mut self, code: i64) -> Self {
        self.success_code = code;
        self
    }

    /// The `circle` search parameter: longitude first, then latitude, then radius
    fn circle(at: Coordinate, radius_meters: u32) -> String {
        format!("{},{},{}", at.lng, at.lat, radius_meters)
    }
}

fn parse_body<'a, T: Deserialize<'a>>(endpoint: &str, body: &'a str) -> PlacesResult<T> {
    serde_json::from_str(body)
        .map_err(|e| PlacesError::Parsing(format!("Failed to parse {} response: {}", endpoint, e)))
}

#[async_trait]
impl PlacesProvider for RestPlacesProvider {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn geocode(&self, location: &str) -> PlacesResult<Option<Coordinate>> {
        let url = format!("{}/geocode", self.base_url);
        debug!(url = %url, "Calling REST geocoder");

        let response = self
            .http
            .get(&url)
            .query(&[("address", location), ("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Geocoding request was not successful");
            return Ok(None);
        }

        let body = response.text().await?;
        let parsed: GeocodeBody = parse_body("geocode", &body)?;
        if parsed.code != Some(self.success_code) {
            warn!(code = ?parsed.code, "Geocoder reported failure");
            return Ok(None);
        }

        Ok(parsed
            .results
            .first()
            .map(|location| Coordinate::new(location.lat, location.lng)))
    }

    async fn search_nearby(
        &self,
        at: Coordinate,
        radius_meters: u32,
        place_type: &str,
    ) -> PlacesResult<Option<Vec<String>>> {
        let url = format!("{}/place/search", self.base_url);
        debug!(url = %url, "Calling REST place search");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("query", place_type.to_string()),
                ("circle", Self::circle(at, radius_meters)),
                ("sort", "distance".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Place search request was not successful");
            return Ok(None);
        }

        let body = response.text().await?;
        let parsed: SearchBody = parse_body("place search", &body)?;
        Ok(parsed
            .results
            .map(|places| places.into_iter().map(|place| place.name).collect()))
    }
}
