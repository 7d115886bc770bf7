//! Platforms: entity-type modules forwarded setup and unload calls.
//!
//! The entry point forwards each configured entry to every declared
//! platform. The `sensor` platform holds each entry's coordinators and
//! derives journey readouts from their current snapshots.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::coordinator::JourneyCoordinator;
use crate::entry::ConfigEntry;
use crate::registry::EntryCoordinators;

/// Error from a platform setup or unload call.
#[derive(Debug, Clone, thiserror::Error)]
#[error("platform {platform}: {message}")]
pub struct PlatformError {
    /// Name of the failing platform.
    pub platform: String,
    /// What went wrong.
    pub message: String,
}

impl PlatformError {
    /// Build an error for the named platform.
    pub fn new(platform: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            message: message.into(),
        }
    }
}

/// An entity-type module that consumes coordinators.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Platform name (e.g. "sensor").
    fn name(&self) -> &str;

    /// Create this platform's entities for an entry.
    async fn setup_entry(
        &self,
        entry: &ConfigEntry,
        coordinators: &EntryCoordinators,
    ) -> Result<(), PlatformError>;

    /// Tear down this platform's entities for an entry.
    async fn unload_entry(&self, entry: &ConfigEntry) -> Result<(), PlatformError>;
}

/// One sensor readout derived from a coordinator snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SensorReadout {
    /// Which coordinator this reads from ("next_journey" / "last_journey").
    pub kind: String,

    /// Departure of the first journey, RFC 3339-ish local time.
    pub departure: Option<String>,

    /// Arrival of the first journey.
    pub arrival: Option<String>,

    /// Whether the coordinator's last refresh succeeded.
    pub available: bool,
}

/// The sensor platform: live per-entry journey readouts.
///
/// Holds the coordinators of every set-up entry and derives readouts from
/// their current snapshots on demand, so periodic and manual refreshes are
/// visible without a push path.
#[derive(Default)]
pub struct SensorPlatform {
    store: RwLock<HashMap<String, EntryCoordinators>>,
}

impl SensorPlatform {
    /// Create an empty sensor platform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current readouts for an entry, if set up.
    pub async fn readouts(&self, entry_id: &str) -> Option<Vec<SensorReadout>> {
        let coordinators = {
            let guard = self.store.read().await;
            guard.get(entry_id).cloned()
        }?;

        let mut readouts = Vec::with_capacity(2);
        readouts.push(Self::readout(&coordinators.next_journey).await);
        if let Some(last) = &coordinators.last_journey {
            readouts.push(Self::readout(last).await);
        }
        Some(readouts)
    }

    async fn readout(coordinator: &JourneyCoordinator) -> SensorReadout {
        let snapshot = coordinator.snapshot().await;
        let first = snapshot.journeys.first();
        SensorReadout {
            kind: coordinator.mode().key().to_string(),
            departure: first.map(|j| j.departure().to_string()),
            arrival: first.map(|j| j.arrival().to_string()),
            available: snapshot.available,
        }
    }
}

#[async_trait]
impl Platform for SensorPlatform {
    fn name(&self) -> &str {
        "sensor"
    }

    async fn setup_entry(
        &self,
        entry: &ConfigEntry,
        coordinators: &EntryCoordinators,
    ) -> Result<(), PlatformError> {
        let mut guard = self.store.write().await;
        guard.insert(entry.entry_id.clone(), coordinators.clone());

        tracing::info!(entry_id = %entry.entry_id, "sensor platform set up");
        Ok(())
    }

    async fn unload_entry(&self, entry: &ConfigEntry) -> Result<(), PlatformError> {
        let mut guard = self.store.write().await;
        guard.remove(&entry.entry_id);
        Ok(())
    }
}
