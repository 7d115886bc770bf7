//! Application state for the web layer.

use std::sync::Arc;

use crate::integration::Integration;
use crate::platform::SensorPlatform;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The integration runtime (registry + services).
    pub integration: Arc<Integration>,

    /// The sensor platform whose readouts are served.
    pub sensors: Arc<SensorPlatform>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(integration: Arc<Integration>, sensors: Arc<SensorPlatform>) -> Self {
        Self {
            integration,
            sensors,
        }
    }
}
