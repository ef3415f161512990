use async_trait::async_trait;

use crate::errors::PlacesResult;
use crate::types::Coordinate;

/// A maps backend able to geocode free text and list places around a point
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Resolves a free-text location. `Ok(None)` means the provider found nothing.
    async fn geocode(&self, location: &str) -> PlacesResult<Option<Coordinate>>;

    /// Names of places of `place_type` within `radius_meters` of `at`, in
    /// provider order. `Ok(None)` means the provider did not report success.
    async fn search_nearby(
        &self,
        at: Coordinate,
        radius_meters: u32,
        place_type: &str,
    ) -> PlacesResult<Option<Vec<String>>>;
}
