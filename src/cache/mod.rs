//! Keyed store of resolved family networks.
//!
//! Entries are created on first resolution, overwritten by later writes and
//! only removed on request; they never expire. Concurrent requests for one
//! family share a single in-flight resolution, and a background worker
//! prefetches the families that follow the current one in corpus order.

mod prefetch;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::PrefetchConfig;
use crate::errors::Result;
use crate::network::FamilyNetwork;
use crate::registry::normalize;
use crate::resolution::FamilyResolver;

pub use prefetch::CacheStatus;

type SharedResolution = Shared<BoxFuture<'static, Result<Arc<FamilyNetwork>>>>;

/// A cached network with the time its resolution took.
#[derive(Debug, Clone)]
pub struct CachedNetwork {
    pub network: Arc<FamilyNetwork>,
    pub extraction_time: Duration,
    /// UNIX timestamp in seconds when the entry was written.
    pub cached_at: u64,
}

/// Aggregate numbers over the cache contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub cached_families: usize,
    pub session_resolutions: u64,
    pub total_extraction_ms: u64,
    pub average_extraction_ms: u64,
}

struct CacheInner {
    resolver: Arc<FamilyResolver>,
    prefetch: PrefetchConfig,
    resolve_cross_references: bool,
    entries: Mutex<HashMap<String, CachedNetwork>>,
    in_flight: Mutex<HashMap<String, SharedResolution>>,
    state: Mutex<prefetch::PrefetchState>,
    worker: Mutex<Option<prefetch::Worker>>,
    generation: AtomicU64,
    session_resolutions: AtomicU64,
}

/// Cache of resolved networks keyed by normalized family identifier.
///
/// Cloning yields another handle to the same cache.
#[derive(Clone)]
pub struct FamilyNetworkCache {
    inner: Arc<CacheInner>,
}

/// Locks a mutex, recovering the data if a holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the current UNIX timestamp in seconds.
fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

impl FamilyNetworkCache {
    pub fn new(
        resolver: Arc<FamilyResolver>,
        prefetch: PrefetchConfig,
        resolve_cross_references: bool,
    ) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                resolver,
                prefetch,
                resolve_cross_references,
                entries: Mutex::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
                state: Mutex::new(prefetch::PrefetchState::default()),
                worker: Mutex::new(None),
                generation: AtomicU64::new(0),
                session_resolutions: AtomicU64::new(0),
            }),
        }
    }

    pub fn resolver(&self) -> &Arc<FamilyResolver> {
        &self.inner.resolver
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    /// Stores a network under its main family identifier, replacing any
    /// earlier entry.
    pub fn cache_network(&self, network: FamilyNetwork, extraction_time: Duration) {
        let id = network.family_id();
        self.store(id, Arc::new(network), extraction_time);
    }

    fn store(&self, id: String, network: Arc<FamilyNetwork>, extraction_time: Duration) {
        debug!(family_id = %id, ?extraction_time, "caching family network");
        lock(&self.inner.entries).insert(
            id,
            CachedNetwork {
                network,
                extraction_time,
                cached_at: current_timestamp(),
            },
        );
    }

    pub fn get_cached_network(&self, family_id: &str) -> Option<Arc<FamilyNetwork>> {
        self.get_cached_entry(family_id).map(|entry| entry.network)
    }

    pub fn get_cached_entry(&self, family_id: &str) -> Option<CachedNetwork> {
        lock(&self.inner.entries).get(&normalize(family_id)).cloned()
    }

    pub fn is_cached(&self, family_id: &str) -> bool {
        lock(&self.inner.entries).contains_key(&normalize(family_id))
    }

    /// Evicts one entry. Returns whether it was present.
    pub fn remove_from_cache(&self, family_id: &str) -> bool {
        lock(&self.inner.entries)
            .remove(&normalize(family_id))
            .is_some()
    }

    pub fn clear_cache(&self) {
        lock(&self.inner.entries).clear();
    }

    /// Cached identifiers, sorted.
    pub fn cached_family_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = lock(&self.inner.entries).keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        lock(&self.inner.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let entries = lock(&self.inner.entries);
        let total: u64 = entries
            .values()
            .map(|e| e.extraction_time.as_millis() as u64)
            .sum();
        let count = entries.len();
        CacheStats {
            cached_families: count,
            session_resolutions: self.session_resolutions(),
            total_extraction_ms: total,
            average_extraction_ms: if count == 0 { 0 } else { total / count as u64 },
        }
    }

    /// Successful resolutions performed through this cache since creation.
    pub fn session_resolutions(&self) -> u64 {
        self.inner.session_resolutions.load(Ordering::Relaxed)
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    /// Returns `true` while a resolution for `family_id` is in flight.
    pub fn is_resolving(&self, family_id: &str) -> bool {
        lock(&self.inner.in_flight).contains_key(&normalize(family_id))
    }

    /// Returns the cached network, joins an in-flight resolution of the same
    /// family, or starts one.
    ///
    /// The resolution caches its own result, so it completes even when the
    /// caller that started it goes away while another caller still waits.
    pub async fn get_or_resolve(&self, family_id: &str) -> Result<Arc<FamilyNetwork>> {
        let id = normalize(family_id);
        if let Some(network) = self.get_cached_network(&id) {
            return Ok(network);
        }

        let resolution = {
            let mut in_flight = lock(&self.inner.in_flight);
            // A resolution finishing between the check above and this lock
            // has already cached its network.
            if let Some(network) = self.get_cached_network(&id) {
                return Ok(network);
            }
            match in_flight.get(&id) {
                Some(existing) => {
                    debug!(family_id = %id, "joining in-flight resolution");
                    existing.clone()
                }
                None => {
                    let resolution = self.resolution(id.clone()).shared();
                    in_flight.insert(id.clone(), resolution.clone());
                    resolution
                }
            }
        };

        resolution.await
    }

    fn resolution(&self, id: String) -> BoxFuture<'static, Result<Arc<FamilyNetwork>>> {
        let cache = self.clone();
        async move {
            let started = Instant::now();
            let outcome = cache
                .inner
                .resolver
                .resolve_family(&id, cache.inner.resolve_cross_references)
                .await;

            let result = match outcome {
                Ok(network) => {
                    let network = Arc::new(network);
                    cache.store(id.clone(), Arc::clone(&network), started.elapsed());
                    cache
                        .inner
                        .session_resolutions
                        .fetch_add(1, Ordering::Relaxed);
                    Ok(network)
                }
                Err(e) => {
                    warn!(family_id = %id, error = %e, "family resolution failed");
                    Err(e)
                }
            };

            lock(&cache.inner.in_flight).remove(&id);
            result
        }
        .boxed()
    }
}
