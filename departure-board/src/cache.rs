//! Caching layer for station name resolution.
//!
//! Station records change rarely, while a board that refreshes every few
//! seconds would otherwise repeat the same name checks. Results are cached
//! per query; failures are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::{StationQuery, StationRecord};
use crate::gti::{GtiClient, GtiError, Session, Transport};

/// Cached name check result.
type StationEntry = Arc<Vec<StationRecord>>;

/// Configuration for the station cache.
#[derive(Debug, Clone)]
pub struct StationCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for StationCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_capacity: 256,
        }
    }
}

/// Station resolver with caching.
///
/// Wraps a `GtiClient` and caches `find_station` results.
pub struct CachedStationResolver<'c, T> {
    client: &'c GtiClient<T>,
    cache: MokaCache<StationQuery, StationEntry>,
}

impl<'c, T: Transport> CachedStationResolver<'c, T> {
    pub fn new(client: &'c GtiClient<T>, config: &StationCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        Self { client, cache }
    }

    /// Resolve a name, using the cache if available.
    pub async fn find_station(
        &self,
        session: &Session,
        query: &StationQuery,
    ) -> Result<StationEntry, GtiError> {
        if let Some(cached) = self.cache.get(query).await {
            trace!(name = %query.name, "station cache hit");
            return Ok(cached);
        }

        let stations = Arc::new(self.client.find_station(session, query).await?);
        self.cache.insert(query.clone(), stations.clone()).await;
        Ok(stations)
    }
}
