//! Response cache for the journeys API.
//!
//! Two coordinators (next journey and last journey) share one connection
//! manager, and manual refreshes can pile on top of the polling timer.
//! Caching responses here is the request-coalescing point: identical
//! queries inside one time bucket hit the cache instead of the API.
//!
//! Time bucketing (5-minute buckets) bounds cache cardinality while
//! keeping results reasonably fresh.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDate, Timelike};
use moka::future::Cache as MokaCache;

use crate::domain::{Journey, StopArea};
use crate::sncf::{ApiError, JourneyApi};

/// Cache key for next-journey queries: (from, to, count, date, time bucket).
type NextKey = (StopArea, StopArea, u8, NaiveDate, u16);

/// Cache key for last-journey queries: (from, to, date). The answer is
/// stable for a service day, so no time bucket is needed; the TTL still
/// bounds staleness.
type LastKey = (StopArea, StopArea, NaiveDate);

/// Configuration for the response cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per cache.
    pub max_capacity: u64,

    /// Time bucket size in minutes.
    pub bucket_mins: u16,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 256,
            bucket_mins: 5,
        }
    }
}

/// Compute the time bucket for a minutes-from-midnight value. A zero
/// bucket size is treated as one-minute buckets rather than dividing by
/// zero.
fn time_bucket(bucket_mins: u16, current_mins: u16) -> u16 {
    (current_mins % 1440) / bucket_mins.max(1)
}

/// A `JourneyApi` with a TTL response cache in front.
///
/// Wraps any inner `JourneyApi` (normally the real connection manager)
/// and caches query responses.
pub struct CachedConnection {
    inner: Arc<dyn JourneyApi>,
    next: MokaCache<NextKey, Arc<Vec<Journey>>>,
    last: MokaCache<LastKey, Journey>,
    bucket_mins: u16,
}

impl CachedConnection {
    /// Create a new cached connection around `inner`.
    pub fn new(inner: Arc<dyn JourneyApi>, config: &CacheConfig) -> Self {
        let next = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let last = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            next,
            last,
            bucket_mins: config.bucket_mins,
        }
    }

    /// Number of cached next-journey entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.next.entry_count() + self.last.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.next.invalidate_all();
        self.last.invalidate_all();
    }
}

#[async_trait]
impl JourneyApi for CachedConnection {
    async fn next_journeys(
        &self,
        from: &StopArea,
        to: &StopArea,
        count: u8,
    ) -> Result<Vec<Journey>, ApiError> {
        let now = Local::now();
        let current_mins = (now.time().hour() * 60 + now.time().minute()) as u16;
        let bucket = time_bucket(self.bucket_mins, current_mins);
        let key = (from.clone(), to.clone(), count, now.date_naive(), bucket);

        if let Some(cached) = self.next.get(&key).await {
            return Ok(cached.as_ref().clone());
        }

        let journeys = self.inner.next_journeys(from, to, count).await?;
        self.next.insert(key, Arc::new(journeys.clone())).await;

        Ok(journeys)
    }

    async fn last_journey(&self, from: &StopArea, to: &StopArea) -> Result<Journey, ApiError> {
        let key = (from.clone(), to.clone(), Local::now().date_naive());

        if let Some(cached) = self.last.get(&key).await {
            return Ok(cached);
        }

        let journey = self.inner.last_journey(from, to).await?;
        self.last.insert(key, journey.clone()).await;

        Ok(journey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sncf::mock::{MockJourneyApi, fixture_journey};

    fn stops() -> (StopArea, StopArea) {
        (
            StopArea::parse("stop_area:SNCF:1").unwrap(),
            StopArea::parse("stop_area:SNCF:2").unwrap(),
        )
    }

    #[test]
    fn time_bucket_calculation() {
        // 10:00 = 600 mins, bucket size 5 -> bucket 120
        assert_eq!(time_bucket(5, 600), 120);

        // 10:04 = 604 mins -> still bucket 120
        assert_eq!(time_bucket(5, 604), 120);

        // 10:05 = 605 mins -> bucket 121
        assert_eq!(time_bucket(5, 605), 121);

        // Zero bucket size degrades to one-minute buckets
        assert_eq!(time_bucket(0, 605), 605);
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.max_capacity, 256);
        assert_eq!(config.bucket_mins, 5);
    }

    #[tokio::test]
    async fn repeated_next_query_hits_cache() {
        let mock = Arc::new(MockJourneyApi::with_journeys(vec![fixture_journey(10, 0)]));
        let cached = CachedConnection::new(mock.clone(), &CacheConfig::default());

        let (from, to) = stops();
        let first = cached.next_journeys(&from, &to, 1).await.unwrap();
        let second = cached.next_journeys(&from, &to, 1).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(mock.next_calls(), 1);
    }

    #[tokio::test]
    async fn different_count_misses_cache() {
        let mock = Arc::new(MockJourneyApi::with_journeys(vec![
            fixture_journey(10, 0),
            fixture_journey(11, 0),
        ]));
        let cached = CachedConnection::new(mock.clone(), &CacheConfig::default());

        let (from, to) = stops();
        cached.next_journeys(&from, &to, 1).await.unwrap();
        cached.next_journeys(&from, &to, 2).await.unwrap();

        assert_eq!(mock.next_calls(), 2);
    }

    #[tokio::test]
    async fn last_journey_cached_per_day() {
        let mock = Arc::new(MockJourneyApi::with_journeys(vec![fixture_journey(21, 0)]));
        let cached = CachedConnection::new(mock.clone(), &CacheConfig::default());

        let (from, to) = stops();
        cached.last_journey(&from, &to).await.unwrap();
        cached.last_journey(&from, &to).await.unwrap();

        assert_eq!(mock.last_calls(), 1);
    }

    #[tokio::test]
    async fn zero_bucket_config_queries_without_panicking() {
        let mock = Arc::new(MockJourneyApi::with_journeys(vec![fixture_journey(10, 0)]));
        let config = CacheConfig {
            bucket_mins: 0,
            ..CacheConfig::default()
        };
        let cached = CachedConnection::new(mock.clone(), &config);

        let (from, to) = stops();
        let journeys = cached.next_journeys(&from, &to, 1).await.unwrap();
        assert_eq!(journeys.len(), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let mock = Arc::new(MockJourneyApi::with_journeys(vec![fixture_journey(10, 0)]));
        let cached = CachedConnection::new(mock.clone(), &CacheConfig::default());

        let (from, to) = stops();
        mock.set_failing(true);
        assert!(cached.next_journeys(&from, &to, 1).await.is_err());

        mock.set_failing(false);
        assert!(cached.next_journeys(&from, &to, 1).await.is_ok());
        assert_eq!(mock.next_calls(), 2);
    }

    #[tokio::test]
    async fn invalidate_all_clears_entries() {
        let mock = Arc::new(MockJourneyApi::with_journeys(vec![fixture_journey(10, 0)]));
        let cached = CachedConnection::new(mock.clone(), &CacheConfig::default());

        let (from, to) = stops();
        cached.next_journeys(&from, &to, 1).await.unwrap();
        cached.invalidate_all();
        cached.next_journeys(&from, &to, 1).await.unwrap();

        assert_eq!(mock.next_calls(), 2);
    }
}
