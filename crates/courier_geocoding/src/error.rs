use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Search text must contain at least 3 characters, got {0}")]
    QueryTooShort(usize),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Missing geocoding API key, set ORS_API_KEY")]
    MissingApiKey,
}
