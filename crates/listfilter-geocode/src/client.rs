//! HTTP client for the address geocoding endpoint.
//!
//! Wraps `reqwest` with query construction, status checking, and typed
//! response parsing. Every call issues exactly one GET: there is no retry and
//! no cancellation, so callers decide what a failure means.

use std::time::Duration;

use listfilter_core::AppConfig;
use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::geocoder::Geocoder;
use crate::types::{Coordinates, GeocodeResponse};

const DEFAULT_USER_AGENT: &str = "listfilter/0.1 (distance-filter)";

/// Client for a Google-compatible geocoding JSON endpoint.
///
/// The API key travels with each request rather than living in the client,
/// because it is configured per control group.
pub struct GeocodeClient {
    client: Client,
    base_url: Url,
}

impl GeocodeClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if the
    /// configured endpoint does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, GeocodeError> {
        Self::with_base_url(
            &config.geocode_base_url,
            config.geocode_timeout_secs.map(Duration::from_secs),
            &config.user_agent,
        )
    }

    /// Creates a client pointed at `base_url` (a mock server in tests).
    ///
    /// `timeout` of `None` leaves requests unbounded.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout: Option<Duration>,
        user_agent: &str,
    ) -> Result<Self, GeocodeError> {
        let user_agent = if user_agent.trim().is_empty() {
            DEFAULT_USER_AGENT
        } else {
            user_agent
        };
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = Url::parse(base_url).map_err(|e| GeocodeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Resolves `address` to the first result's coordinates.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::EmptyAddress`] / [`GeocodeError::MissingApiKey`]
    ///   before any request is made.
    /// - [`GeocodeError::Http`] on network failure or non-2xx HTTP status.
    /// - [`GeocodeError::Deserialize`] if the body is not the expected shape.
    /// - [`GeocodeError::ApiStatus`] if `status` is not `"OK"`.
    /// - [`GeocodeError::NoResults`] if `status` is `"OK"` but nothing matched.
    pub async fn lookup(&self, address: &str, api_key: &str) -> Result<Coordinates, GeocodeError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        if api_key.trim().is_empty() {
            return Err(GeocodeError::MissingApiKey);
        }

        let url = self.build_url(address, api_key);
        let body = self.request_text(&url).await?;
        let response: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("geocode(address={address})"),
                source: e,
            })?;
        tracing::debug!(
            address,
            status = %response.status,
            results = response.results.len(),
            "geocode response received"
        );

        Self::first_location(response, address)
    }

    /// Builds the request URL with `address` and `key` percent-encoded as
    /// query parameters, keeping any query already on the base URL.
    fn build_url(&self, address: &str, api_key: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("address", address)
            .append_pair("key", api_key);
        url
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and returns the body.
    async fn request_text(&self, url: &Url) -> Result<String, GeocodeError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }

    fn first_location(
        response: GeocodeResponse,
        address: &str,
    ) -> Result<Coordinates, GeocodeError> {
        if response.status != "OK" {
            return Err(GeocodeError::ApiStatus {
                message: response
                    .error_message
                    .unwrap_or_else(|| "no error message".to_string()),
                status: response.status,
            });
        }
        response
            .results
            .into_iter()
            .next()
            .map(|result| result.geometry.location)
            .ok_or_else(|| GeocodeError::NoResults {
                address: address.to_string(),
            })
    }
}

impl Geocoder for GeocodeClient {
    async fn geocode(&self, address: &str, api_key: &str) -> Result<Coordinates, GeocodeError> {
        self.lookup(address, api_key).await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
