use courier_routing::response::AddressStart;
use geojson::FeatureCollection;
use tracing::{debug, instrument};

use crate::{
    error::GeocodingError,
    places::{PlaceSuggestion, parse_geojson, parse_places, parse_reverse_geocode},
};

pub const API_KEY_ENV_VAR: &str = "ORS_API_KEY";
pub const API_URL_ENV_VAR: &str = "ORS_API_URL";
pub const COUNTRY_ENV_VAR: &str = "ORS_BOUNDARY_COUNTRY";

pub const DEFAULT_API_URL: &str = "https://api.openrouteservice.org";
pub const DEFAULT_COUNTRY: &str = "FI";

pub const REVERSE_API_PATH: &str = "/geocode/reverse";
pub const SEARCH_API_PATH: &str = "/geocode/search";
pub const AUTOCOMPLETE_API_PATH: &str = "/geocode/autocomplete";

pub const MIN_QUERY_LENGTH: usize = 3;
const SEARCH_SIZE: usize = 500;
const AUTOCOMPLETE_SIZE: usize = 25;

pub struct GeocodingClientParams {
    pub api_key: String,
    pub base_url: String,
    /// ISO country code results are restricted to
    pub country: String,
}

impl GeocodingClientParams {
    pub fn from_env() -> Result<Self, GeocodingError> {
        let api_key = std::env::var(API_KEY_ENV_VAR).map_err(|_| GeocodingError::MissingApiKey)?;

        Ok(GeocodingClientParams {
            api_key,
            base_url: std::env::var(API_URL_ENV_VAR)
                .unwrap_or_else(|_| String::from(DEFAULT_API_URL)),
            country: std::env::var(COUNTRY_ENV_VAR)
                .unwrap_or_else(|_| String::from(DEFAULT_COUNTRY)),
        })
    }
}

/// OpenRouteService geocoding client.
pub struct GeocodingClient {
    params: GeocodingClientParams,
    client: reqwest::Client,
}

impl GeocodingClient {
    pub fn new(params: GeocodingClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    /// Street address at a point, `None` when the service knows nothing there.
    #[instrument(skip(self), level = "debug")]
    pub async fn reverse(&self, lon: f64, lat: f64) -> Result<Option<AddressStart>, GeocodingError> {
        let collection = self
            .get_features(
                REVERSE_API_PATH,
                &[
                    ("point.lon", lon.to_string()),
                    ("point.lat", lat.to_string()),
                ],
            )
            .await?;

        Ok(parse_reverse_geocode(&collection))
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn search(&self, text: &str) -> Result<Vec<PlaceSuggestion>, GeocodingError> {
        self.find_places(SEARCH_API_PATH, text, SEARCH_SIZE).await
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn autocomplete(&self, text: &str) -> Result<Vec<PlaceSuggestion>, GeocodingError> {
        self.find_places(AUTOCOMPLETE_API_PATH, text, AUTOCOMPLETE_SIZE)
            .await
    }

    /// Same query as [`GeocodingClient::search`], answered as a trimmed FeatureCollection.
    #[instrument(skip(self), level = "debug")]
    pub async fn search_geojson(&self, text: &str) -> Result<FeatureCollection, GeocodingError> {
        let collection = self.search_features(SEARCH_API_PATH, text, SEARCH_SIZE).await?;

        Ok(parse_geojson(&collection))
    }

    async fn find_places(
        &self,
        path: &str,
        text: &str,
        size: usize,
    ) -> Result<Vec<PlaceSuggestion>, GeocodingError> {
        let collection = self.search_features(path, text, size).await?;

        Ok(parse_places(&collection))
    }

    async fn search_features(
        &self,
        path: &str,
        text: &str,
        size: usize,
    ) -> Result<FeatureCollection, GeocodingError> {
        let text = validate_query(text)?;

        self.get_features(
            path,
            &[
                ("text", text.to_owned()),
                ("size", size.to_string()),
                ("boundary.country", self.params.country.clone()),
            ],
        )
        .await
    }

    async fn get_features(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<FeatureCollection, GeocodingError> {
        let url = format!("{}{}", self.params.base_url.trim_end_matches('/'), path);

        let response = self
            .client
            .get(url)
            .query(&[("api_key", &self.params.api_key)])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodingError::Api { status, message });
        }

        let body = response.text().await?;
        let collection: FeatureCollection = serde_json::from_str(&body)?;

        debug!(
            "GeocodingClient: {} returned {} features",
            path,
            collection.features.len()
        );

        Ok(collection)
    }
}

fn validate_query(text: &str) -> Result<&str, GeocodingError> {
    let text = text.trim();
    let length = text.chars().count();

    if length < MIN_QUERY_LENGTH {
        return Err(GeocodingError::QueryTooShort(length));
    }

    Ok(text)
}
