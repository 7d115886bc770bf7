//! Configuration entries.
//!
//! A `ConfigEntry` is one configured instance of the integration: which
//! API to talk to and which origin/destination pair to monitor. Entries
//! are validated before setup touches the network.

use serde::{Deserialize, Serialize};

use crate::domain::StopArea;

/// One configured journey-monitoring instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Unique identifier of this entry.
    pub entry_id: String,

    /// Base URL of the journeys API.
    pub url: String,

    /// API key (Basic auth username).
    pub api_key: String,

    /// Coverage region (e.g. "sncf").
    pub region: String,

    /// Origin stop area.
    pub from: StopArea,

    /// Destination stop area.
    pub to: StopArea,

    /// Whether to also monitor the last journey of the day.
    #[serde(default)]
    pub last_journey: bool,

    /// Polling interval in seconds.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// How many upcoming journeys to fetch per refresh.
    #[serde(default = "default_journey_count")]
    pub journey_count: u8,
}

const fn default_refresh_interval_secs() -> u64 {
    120
}

const fn default_journey_count() -> u8 {
    1
}

impl ConfigEntry {
    /// Validate the entry.
    ///
    /// Setup runs this before constructing the connection manager, so a
    /// malformed entry never triggers network activity.
    pub fn validate(&self) -> Result<(), String> {
        if self.entry_id.is_empty() {
            return Err("entry_id must not be empty".to_string());
        }

        if self.url.is_empty() {
            return Err("url must not be empty".to_string());
        }

        if self.api_key.is_empty() {
            return Err("api_key must not be empty".to_string());
        }

        if self.region.is_empty() {
            return Err("region must not be empty".to_string());
        }

        if self.refresh_interval_secs == 0 {
            return Err("refresh_interval_secs must be greater than 0".to_string());
        }

        if self.journey_count == 0 {
            return Err("journey_count must be greater than 0".to_string());
        }

        Ok(())
    }

    /// An entry suitable for tests: short interval, mock-friendly values.
    pub fn for_testing(entry_id: &str, last_journey: bool) -> Self {
        Self {
            entry_id: entry_id.to_string(),
            url: "https://api.example/sncf".to_string(),
            api_key: "k".to_string(),
            region: "FR".to_string(),
            from: StopArea::parse("stop_area:SNCF:87686006").unwrap(),
            to: StopArea::parse("stop_area:SNCF:87722025").unwrap(),
            last_journey,
            refresh_interval_secs: 1,
            journey_count: 1,
        }
    }
}
