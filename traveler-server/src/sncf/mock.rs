//! Mock connection manager for testing without API access.
//!
//! Serves programmable journey fixtures behind the same [`JourneyApi`]
//! interface as the real client, with failure injection and per-operation
//! call counting so tests can assert how coordinators drive the manager.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::RwLock;

use crate::domain::{DisruptionStatus, Journey, Section, SectionKind, StopArea};

use super::api::JourneyApi;
use super::error::ApiError;

/// Mock journeys API backed by in-memory fixtures.
pub struct MockJourneyApi {
    journeys: RwLock<Vec<Journey>>,
    failing: AtomicBool,
    next_calls: AtomicUsize,
    last_calls: AtomicUsize,
}

impl MockJourneyApi {
    /// Create a mock serving no journeys.
    pub fn new() -> Self {
        Self {
            journeys: RwLock::new(Vec::new()),
            failing: AtomicBool::new(false),
            next_calls: AtomicUsize::new(0),
            last_calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock serving the given journeys.
    pub fn with_journeys(journeys: Vec<Journey>) -> Self {
        Self {
            journeys: RwLock::new(journeys),
            failing: AtomicBool::new(false),
            next_calls: AtomicUsize::new(0),
            last_calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock from a directory of `*.json` journeys-response
    /// fixtures, as returned by the real API.
    ///
    /// Useful for development against recorded responses without API
    /// credentials.
    pub fn from_dir(data_dir: impl AsRef<std::path::Path>) -> Result<Self, ApiError> {
        let data_dir = data_dir.as_ref();
        let mut journeys = Vec::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            ApiError::InvalidConfig(format!("failed to read fixture directory: {e}"))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                ApiError::InvalidConfig(format!("failed to read directory entry: {e}"))
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let json = std::fs::read_to_string(&path).map_err(|e| {
                ApiError::InvalidConfig(format!("failed to read {path:?}: {e}"))
            })?;

            let response: super::types::JourneysResponse =
                serde_json::from_str(&json).map_err(|e| ApiError::Json {
                    message: format!("failed to parse {path:?}: {e}"),
                })?;

            journeys.extend(super::convert::convert_response(&response));
        }

        if journeys.is_empty() {
            return Err(ApiError::InvalidConfig(format!(
                "no journey fixtures found in {data_dir:?}"
            )));
        }

        Ok(Self::with_journeys(journeys))
    }

    /// Replace the served journeys.
    pub async fn set_journeys(&self, journeys: Vec<Journey>) {
        *self.journeys.write().await = journeys;
    }

    /// Make subsequent queries fail with a 503 until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `next_journeys` calls made so far.
    pub fn next_calls(&self) -> usize {
        self.next_calls.load(Ordering::SeqCst)
    }

    /// Number of `last_journey` calls made so far.
    pub fn last_calls(&self) -> usize {
        self.last_calls.load(Ordering::SeqCst)
    }

    /// Total query calls of either kind.
    pub fn total_calls(&self) -> usize {
        self.next_calls() + self.last_calls()
    }

    fn check_failing(&self) -> Result<(), ApiError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Api {
                status: 503,
                message: "mock failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockJourneyApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JourneyApi for MockJourneyApi {
    async fn next_journeys(
        &self,
        _from: &StopArea,
        _to: &StopArea,
        count: u8,
    ) -> Result<Vec<Journey>, ApiError> {
        self.next_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;

        let journeys = self.journeys.read().await;
        Ok(journeys.iter().take(count as usize).cloned().collect())
    }

    async fn last_journey(&self, from: &StopArea, to: &StopArea) -> Result<Journey, ApiError> {
        self.last_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;

        let journeys = self.journeys.read().await;
        journeys
            .iter()
            .max_by_key(|j| j.departure())
            .cloned()
            .ok_or_else(|| ApiError::NoJourneyFound {
                from: from.to_string(),
                to: to.to_string(),
            })
    }
}

/// Build a single-ride fixture journey departing at the given hour/minute.
pub fn fixture_journey(hour: u32, minute: u32) -> Journey {
    fn dt(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 29)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    let arrival_hour = (hour + 2).min(23);
    Journey::new(
        vec![Section {
            kind: SectionKind::PublicTransport {
                line: "TER 17412".into(),
                direction: Some("Lyon Part-Dieu".into()),
            },
            from: "Paris Gare de Lyon".into(),
            to: "Lyon Part-Dieu".into(),
            departure: dt(hour, minute),
            arrival: dt(arrival_hour, minute),
        }],
        DisruptionStatus::Normal,
    )
    .unwrap()
}
