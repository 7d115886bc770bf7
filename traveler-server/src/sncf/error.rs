//! Connection manager error types.

/// Errors from the journeys API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Response decoded but could not be converted to domain types
    #[error("conversion error: {message}")]
    Conversion { message: String },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// No journey matched the query
    #[error("no journey found between {from} and {to}")]
    NoJourneyFound { from: String, to: String },

    /// Rate limited by the API
    #[error("rate limited by journeys API")]
    RateLimited,

    /// Invalid API key or unauthorized
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// Client-side configuration problem
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    /// Returns true if a later retry of the same query could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Http(_) | ApiError::RateLimited | ApiError::Api { .. }
        )
    }
}
