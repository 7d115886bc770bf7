//! Journey polling coordinator.
//!
//! A coordinator owns the cached state for one query (next journeys or
//! last journey of the day), refreshed on a timer and on demand. A failed
//! refresh marks the state unavailable but keeps the last-known-good
//! journeys, so consumers can keep showing slightly stale data during
//! transient API trouble.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::domain::{Journey, StopArea};
use crate::entry::ConfigEntry;
use crate::sncf::{ApiError, JourneyApi};

/// Whether a coordinator tracks the next journeys or the last of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JourneyMode {
    /// Upcoming journeys, departing now or later.
    NextJourney,
    /// The final journey of the current service day.
    LastJourney,
}

impl JourneyMode {
    /// Registry key for this mode.
    pub fn key(self) -> &'static str {
        match self {
            JourneyMode::NextJourney => "next_journey",
            JourneyMode::LastJourney => "last_journey",
        }
    }
}

/// Point-in-time copy of a coordinator's state.
#[derive(Debug, Clone, Default)]
pub struct JourneySnapshot {
    /// Most recently fetched journeys (last-known-good across failures).
    pub journeys: Vec<Journey>,

    /// When the last successful refresh completed.
    pub last_success: Option<DateTime<Utc>>,

    /// Message from the most recent failed refresh, cleared on success.
    pub last_error: Option<String>,

    /// False while the most recent refresh failed.
    pub available: bool,
}

struct Inner {
    connection: Arc<dyn JourneyApi>,
    mode: JourneyMode,
    from: StopArea,
    to: StopArea,
    count: u8,
    state: RwLock<JourneySnapshot>,
}

impl Inner {
    async fn refresh(&self) -> Result<(), ApiError> {
        let result = match self.mode {
            JourneyMode::NextJourney => {
                self.connection
                    .next_journeys(&self.from, &self.to, self.count)
                    .await
            }
            JourneyMode::LastJourney => self
                .connection
                .last_journey(&self.from, &self.to)
                .await
                .map(|j| vec![j]),
        };

        let mut state = self.state.write().await;
        match result {
            Ok(journeys) => {
                state.journeys = journeys;
                state.last_success = Some(Utc::now());
                state.last_error = None;
                state.available = true;
                Ok(())
            }
            Err(e) => {
                // Keep the last-known-good journeys; only flag staleness.
                state.last_error = Some(e.to_string());
                state.available = false;
                Err(e)
            }
        }
    }
}

/// Polling wrapper around one journeys query.
///
/// Created per configuration entry and mode; both coordinators of an
/// entry share one connection manager.
pub struct JourneyCoordinator {
    inner: Arc<Inner>,
    interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl JourneyCoordinator {
    /// Create a coordinator for `entry` in the given mode.
    ///
    /// The coordinator does not poll until [`start`](Self::start) is
    /// called; setup performs the first refresh explicitly so that a
    /// failure can fail the whole entry setup.
    pub fn new(connection: Arc<dyn JourneyApi>, entry: &ConfigEntry, mode: JourneyMode) -> Self {
        Self {
            inner: Arc::new(Inner {
                connection,
                mode,
                from: entry.from.clone(),
                to: entry.to.clone(),
                count: entry.journey_count,
                state: RwLock::new(JourneySnapshot::default()),
            }),
            interval: Duration::from_secs(entry.refresh_interval_secs),
            task: Mutex::new(None),
        }
    }

    /// The mode this coordinator was created with.
    pub fn mode(&self) -> JourneyMode {
        self.inner.mode
    }

    /// Perform the initial blocking refresh.
    ///
    /// Unlike later refreshes, the failure of this one propagates: a
    /// coordinator that cannot fetch once at setup fails the entry setup.
    pub async fn first_refresh(&self) -> Result<(), ApiError> {
        self.inner.refresh().await
    }

    /// Request an asynchronous refresh.
    ///
    /// Fire-and-forget: the refresh runs on a spawned task and its
    /// outcome is recorded in the coordinator state, not returned. A
    /// failure here never surfaces to the caller.
    pub fn request_refresh(&self) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            if let Err(e) = inner.refresh().await {
                tracing::warn!(mode = inner.mode.key(), error = %e, "requested refresh failed");
            }
        });
    }

    /// Start the periodic polling task. Calling `start` twice is a no-op.
    pub fn start(&self) {
        let mut guard = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_some() {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let interval = self.interval;
        *guard = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // First tick is immediate, skip it
            loop {
                ticker.tick().await;
                if let Err(e) = inner.refresh().await {
                    tracing::warn!(mode = inner.mode.key(), error = %e, "periodic refresh failed");
                }
            }
        }));
    }

    /// Whether the polling task is running.
    pub fn is_running(&self) -> bool {
        let guard = self.task.lock().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the polling task. Idempotent.
    pub fn shutdown(&self) {
        let mut guard = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(task) = guard.take() {
            task.abort();
        }
    }

    /// Point-in-time copy of the coordinator state.
    pub async fn snapshot(&self) -> JourneySnapshot {
        self.inner.state.read().await.clone()
    }
}

impl Drop for JourneyCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}
