use thiserror::Error;

/// Errors returned by the geocoding client.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The service answered with a status other than `"OK"`.
    #[error("geocoding API returned status {status}: {message}")]
    ApiStatus { status: String, message: String },

    /// Status was `"OK"` but the result list was empty.
    #[error("geocoding API returned no results for '{address}'")]
    NoResults { address: String },

    #[error("no geocoding API key configured")]
    MissingApiKey,

    #[error("address is empty")]
    EmptyAddress,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
