use thiserror::Error;

/// Faults raised while talking to a maps provider.
///
/// "Nothing found" is not an error; providers report it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("Request Error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP Error: {status_code} - {message}")]
    Http { status_code: u16, message: String },

    #[error("API Error: {status} - {message}")]
    Api { status: String, message: String },

    #[error("Parsing Error: {0}")]
    Parsing(String),

    #[error("Configuration Error: {0}")]
    Config(String),
}

/// Result type for places operations
pub type PlacesResult<T> = Result<T, PlacesError>;
