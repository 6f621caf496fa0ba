use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::registry::normalize;

use super::{lock, FamilyNetworkCache};

/// Snapshot of the cache and its background worker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStatus {
    /// Family the last prefetch started from.
    pub current_family_id: Option<String>,
    pub is_processing: bool,
    /// Family the worker is prefetching or last prefetched.
    pub next_family_id: Option<String>,
    /// `next_family_id` has a cached network.
    pub next_family_ready: bool,
    pub status_message: String,
    pub session_resolutions: u64,
    pub cached_count: usize,
}

/// Worker-owned part of the status.
#[derive(Debug, Default)]
pub(super) struct PrefetchState {
    current_family_id: Option<String>,
    is_processing: bool,
    next_family_id: Option<String>,
    next_family_ready: bool,
    status_message: String,
}

pub(super) struct Worker {
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl FamilyNetworkCache {
    /// Starts prefetching the families after `current_id` in corpus order.
    ///
    /// Any running worker is asked to stop; the new worker waits for it to
    /// finish its current family before starting, so at most one runs at a
    /// time. Must be called from within a tokio runtime.
    pub fn start_background_processing(&self, current_id: &str) {
        let start = normalize(current_id);
        let mut worker = lock(&self.inner.worker);

        let previous = worker.take();
        if let Some(previous) = &previous {
            previous.cancel.store(true, Ordering::SeqCst);
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = lock(&self.inner.state);
            *state = PrefetchState {
                current_family_id: Some(start.clone()),
                is_processing: true,
                next_family_id: None,
                next_family_ready: false,
                status_message: format!("Prefetching families after {}", start),
            };
        }

        info!(family_id = %start, generation, "starting background prefetch");
        let cancel = Arc::new(AtomicBool::new(false));
        let task_cancel = Arc::clone(&cancel);
        let cache = self.clone();
        let handle = tokio::spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.handle.await;
            }
            cache.run_prefetch(start, generation, task_cancel).await;
        });

        *worker = Some(Worker { cancel, handle });
    }

    /// Asks the running worker to stop before its next family. Families
    /// already cached stay cached.
    pub fn stop_background_processing(&self) {
        if let Some(worker) = lock(&self.inner.worker).as_ref() {
            debug!("cancelling background prefetch");
            worker.cancel.store(true, Ordering::SeqCst);
        }
    }

    /// Waits until the current worker, if any, has finished.
    pub async fn wait_for_background(&self) {
        let worker = lock(&self.inner.worker).take();
        if let Some(worker) = worker {
            let _ = worker.handle.await;
        }
    }

    pub fn is_processing(&self) -> bool {
        lock(&self.inner.state).is_processing
    }

    pub fn next_family_id(&self) -> Option<String> {
        lock(&self.inner.state).next_family_id.clone()
    }

    pub fn next_family_ready(&self) -> bool {
        lock(&self.inner.state).next_family_ready
    }

    pub fn status_message(&self) -> String {
        lock(&self.inner.state).status_message.clone()
    }

    pub fn status(&self) -> CacheStatus {
        let cached_count = self.len();
        let session_resolutions = self.session_resolutions();
        let state = lock(&self.inner.state);
        CacheStatus {
            current_family_id: state.current_family_id.clone(),
            is_processing: state.is_processing,
            next_family_id: state.next_family_id.clone(),
            next_family_ready: state.next_family_ready,
            status_message: state.status_message.clone(),
            session_resolutions,
            cached_count,
        }
    }

    /// Applies a state change unless a newer worker has taken over.
    fn update_state(&self, generation: u64, apply: impl FnOnce(&mut PrefetchState)) {
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            return;
        }
        let mut state = lock(&self.inner.state);
        apply(&mut *state);
    }

    /// Next identifier in corpus order that the registry can address.
    async fn next_addressable_after(&self, family_id: &str) -> Option<String> {
        let resolver = &self.inner.resolver;
        let mut current = family_id.to_string();
        loop {
            let next = resolver.locator().find_next_family_id(&current).await?;
            if resolver.registry().is_valid(&next) {
                return Some(normalize(&next));
            }
            debug!(family_id = %next, "prefetch skipping pseudo family");
            current = next;
        }
    }

    async fn run_prefetch(&self, start: String, generation: u64, cancel: Arc<AtomicBool>) {
        let max_families = self.inner.prefetch.max_families;
        let delay = Duration::from_millis(self.inner.prefetch.delay_ms);
        let mut current = start;
        let mut processed = 0usize;

        let message = loop {
            if cancel.load(Ordering::SeqCst) {
                break "Background processing cancelled".to_string();
            }
            if max_families.is_some_and(|max| processed >= max) {
                break format!("Prefetched {} families", processed);
            }
            let Some(next) = self.next_addressable_after(&current).await else {
                break "Reached the end of the corpus".to_string();
            };

            let already_cached = self.is_cached(&next);
            self.update_state(generation, |state| {
                state.next_family_id = Some(next.clone());
                state.next_family_ready = already_cached;
                state.status_message = format!("Processing {}", next);
            });

            if !already_cached {
                match self.get_or_resolve(&next).await {
                    Ok(_) => self.update_state(generation, |state| {
                        state.next_family_ready = true;
                        state.status_message = format!("{} ready", next);
                    }),
                    Err(e) => {
                        warn!(family_id = %next, error = %e, "prefetch failed");
                        self.update_state(generation, |state| {
                            state.status_message = format!("Failed to prefetch {}", next);
                        });
                    }
                }
            }

            processed += 1;
            current = next;

            tokio::task::yield_now().await;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        };

        info!(generation, processed, "background prefetch finished");
        self.update_state(generation, |state| {
            state.is_processing = false;
            state.status_message = message;
        });
    }
}
