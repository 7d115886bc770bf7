//! Journeys API HTTP client.
//!
//! Provides async methods for querying a Navitia-style journeys endpoint.
//! Handles authentication, bounded concurrency, and conversion to domain
//! types.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{Local, NaiveDateTime};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tokio::sync::Semaphore;

use crate::domain::{Journey, StopArea, format_compact};

use super::api::JourneyApi;
use super::convert::convert_response;
use super::error::ApiError;
use super::types::JourneysResponse;

/// Default base URL for the SNCF journeys API.
const DEFAULT_BASE_URL: &str = "https://api.sncf.com/v1";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Configuration for the connection manager.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Base URL for the API
    pub base_url: String,
    /// API key, sent as Basic auth username with empty password
    pub api_key: String,
    /// Coverage region path segment (e.g. "sncf", "fr-idf")
    pub region: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ConnectionConfig {
    /// Create a new config for the given key and region.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            region: region.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Config pointing at the production API.
    pub fn production(api_key: impl Into<String>, region: impl Into<String>) -> Self {
        Self::new(DEFAULT_BASE_URL, api_key, region)
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Journeys API client.
///
/// One instance is shared by all coordinators of a configuration entry.
/// Uses a semaphore to limit concurrent requests so that two coordinators
/// plus manual refreshes cannot stampede the remote API.
#[derive(Debug, Clone)]
pub struct ApiConnectionManager {
    http: reqwest::Client,
    base_url: String,
    region: String,
    semaphore: Arc<Semaphore>,
}

impl ApiConnectionManager {
    /// Create a new connection manager with the given configuration.
    pub fn new(config: ConnectionConfig) -> Result<Self, ApiError> {
        if config.api_key.chars().any(|c| c.is_control()) {
            return Err(ApiError::InvalidConfig(
                "API key must not contain control characters".into(),
            ));
        }

        let mut headers = HeaderMap::new();

        // Navitia-style auth: API key as Basic auth username, empty password
        let credential = BASE64.encode(format!("{}:", config.api_key));
        let auth = HeaderValue::from_str(&format!("Basic {credential}"))
            .map_err(|_| ApiError::InvalidConfig("API key is not a valid header value".into()))?;
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            region: config.region,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Run one journeys query and convert the response.
    async fn journeys_query(
        &self,
        from: &StopArea,
        to: &StopArea,
        datetime: NaiveDateTime,
        represents: &str,
        count: u8,
    ) -> Result<Vec<Journey>, ApiError> {
        let _permit = self.semaphore.acquire().await.map_err(|_| ApiError::Api {
            status: 0,
            message: "Semaphore closed".to_string(),
        })?;

        let url = format!("{}/coverage/{}/journeys", self.base_url, self.region);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("from", from.as_str().to_string()),
                ("to", to.as_str().to_string()),
                ("datetime", format_compact(datetime)),
                ("datetime_represents", represents.to_string()),
                ("count", count.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ApiError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let decoded: JourneysResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Json {
                message: e.to_string(),
            })?;

        Ok(convert_response(&decoded))
    }
}

#[async_trait]
impl JourneyApi for ApiConnectionManager {
    async fn next_journeys(
        &self,
        from: &StopArea,
        to: &StopArea,
        count: u8,
    ) -> Result<Vec<Journey>, ApiError> {
        let now = Local::now().naive_local();
        self.journeys_query(from, to, now, "departure", count).await
    }

    async fn last_journey(&self, from: &StopArea, to: &StopArea) -> Result<Journey, ApiError> {
        // Last of the service day: bound the arrival by end-of-day and
        // take the latest departure the API offers.
        let end_of_day = Local::now()
            .date_naive()
            .and_hms_opt(23, 59, 59)
            .unwrap_or_else(|| Local::now().naive_local());

        let journeys = self
            .journeys_query(from, to, end_of_day, "arrival", 1)
            .await?;

        journeys
            .into_iter()
            .max_by_key(Journey::departure)
            .ok_or_else(|| ApiError::NoJourneyFound {
                from: from.to_string(),
                to: to.to_string(),
            })
    }
}
