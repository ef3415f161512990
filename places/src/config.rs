use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::{PlacesError, PlacesResult};
use crate::google::{GoogleMapsClient, GoogleMapsProvider};
use crate::provider::PlacesProvider;
use crate::rest::RestPlacesProvider;
use crate::types::DEFAULT_RADIUS_METERS;

/// Which maps backend answers lookups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacesProviderKind {
    #[default]
    Google,
    Rest,
}

impl FromStr for PlacesProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "rest" => Ok(Self::Rest),
            other => Err(format!(
                "unknown places provider '{}', expected 'google' or 'rest'",
                other
            )),
        }
    }
}

impl fmt::Display for PlacesProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => f.write_str("google"),
            Self::Rest => f.write_str("rest"),
        }
    }
}

/// Configuration for the places lookup
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PlacesConfig {
    pub provider: Option<PlacesProviderKind>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub radius_meters: Option<u32>,
    /// Geocoding `code` that the REST provider uses to signal success
    pub success_code: Option<i64>,
    pub timeout_secs: Option<u64>,
}

impl PlacesConfig {
    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            provider: other.provider.or(self.provider),
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
            radius_meters: other.radius_meters.or(self.radius_meters),
            success_code: other.success_code.or(self.success_code),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius_meters.unwrap_or(DEFAULT_RADIUS_METERS)
    }

    /// Builds the configured provider. A missing API key is not rejected here;
    /// the provider's calls will fail instead.
    pub fn build_provider(&self) -> PlacesResult<Arc<dyn PlacesProvider>> {
        let mut builder = Client::builder();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;
        let api_key = self.api_key.clone().unwrap_or_default();

        match self.provider.unwrap_or_default() {
            PlacesProviderKind::Google => {
                let mut client = GoogleMapsClient::with_http_client(http, api_key);
                if let Some(base_url) = &self.base_url {
                    client = client.with_base_url(base_url);
                }
                Ok(Arc::new(GoogleMapsProvider::new(client)))
            }
            PlacesProviderKind::Rest => {
                let base_url = self.base_url.as_deref().ok_or_else(|| {
                    PlacesError::Config("the rest places provider requires a base_url".to_string())
                })?;
                let mut provider = RestPlacesProvider::with_http_client(http, base_url, api_key);
                if let Some(code) = self.success_code {
                    provider = provider.with_success_code(code);
                }
                Ok(Arc::new(provider))
            }
        }
    }
}
