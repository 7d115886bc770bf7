//! Query trait implemented by the connection manager.

use async_trait::async_trait;

use crate::domain::{Journey, StopArea};

use super::error::ApiError;

/// The query operations a connection manager exposes to coordinators.
///
/// Implemented by [`ApiConnectionManager`](super::ApiConnectionManager)
/// for the real API, by [`CachedConnection`](crate::cache::CachedConnection)
/// to add a response cache, and by the mock in [`mock`](super::mock) for
/// tests.
#[async_trait]
pub trait JourneyApi: Send + Sync {
    /// Journeys from `from` to `to` departing now or later, best first,
    /// at most `count` results.
    async fn next_journeys(
        &self,
        from: &StopArea,
        to: &StopArea,
        count: u8,
    ) -> Result<Vec<Journey>, ApiError>;

    /// The last journey of the current service day from `from` to `to`.
    async fn last_journey(&self, from: &StopArea, to: &StopArea) -> Result<Journey, ApiError>;
}
