// Nearby-places lookup for TravelMitra:
// - PlacesProvider capability trait
// - Google Maps backend (typed client) and raw REST backend
// - PlacesLookup, which renders the reply text
// - Configuration and errors

pub mod config;
pub use config::{PlacesConfig, PlacesProviderKind};

pub mod errors;
pub use errors::*;

pub mod google;
pub use google::{GoogleMapsClient, GoogleMapsProvider};

pub mod lookup;
pub use lookup::PlacesLookup;

pub mod provider;
pub use provider::PlacesProvider;

pub mod rest;
pub use rest::RestPlacesProvider;

pub mod types;
pub use types::*;
