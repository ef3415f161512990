use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::PlacesResult;
use crate::provider::PlacesProvider;
use crate::types::PlaceQuery;

/// Turns a place query into a reply for the user, using whichever provider it was given
#[derive(Clone)]
pub struct PlacesLookup {
    provider: Arc<dyn PlacesProvider>,
}

impl PlacesLookup {
    pub fn new(provider: Arc<dyn PlacesProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Geocodes `location_text` and lists `place_type` places around it.
    ///
    /// Not-found outcomes come back as `Ok` with a user-facing message; only
    /// transport and parsing faults are errors. The nearby search is skipped
    /// when geocoding finds nothing.
    pub async fn lookup(
        &self,
        location_text: &str,
        place_type: &str,
        radius_meters: u32,
    ) -> PlacesResult<String> {
        info!(
            provider = self.provider.name(),
            location = location_text,
            place_type,
            radius_meters,
            "Looking up places"
        );

        let Some(coordinate) = self.provider.geocode(location_text).await? else {
            warn!(location = location_text, "Location could not be geocoded");
            return Ok(location_not_found(location_text));
        };

        let names = self
            .provider
            .search_nearby(coordinate, radius_meters, place_type)
            .await?;

        match names {
            Some(names) if !names.is_empty() => Ok(format!(
                "Here are some {}s near {}: {}",
                place_type,
                location_text,
                names.join(", ")
            )),
            _ => Ok(format!(
                "Sorry, I couldn't find any {}s near {}.",
                place_type, location_text
            )),
        }
    }

    pub async fn lookup_query(&self, query: &PlaceQuery) -> PlacesResult<String> {
        self.lookup(&query.location_text, &query.place_type, query.radius_meters)
            .await
    }
}

fn location_not_found(location_text: &str) -> String {
    format!("Sorry, I couldn't find the location: {}.", location_text)
}
