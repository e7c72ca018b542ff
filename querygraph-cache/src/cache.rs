//! The response cache.

use crate::error::{CacheError, Result};
use crate::transport::Transport;
use querygraph_datasource::RequestDescriptor;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Default bound on stored entries.
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

/// Shared slot the fetching task fills in for waiters on the same signature.
type SharedResult = Arc<tokio::sync::Mutex<Option<Result<Arc<Value>>>>>;

/// The fetching task's exclusive hold on its slot, taken before the
/// in-flight marker becomes visible.
type FetchGuard = tokio::sync::OwnedMutexGuard<Option<Result<Arc<Value>>>>;

enum CacheEntry {
    /// A completed fetch with its storage timestamp for TTL expiry.
    Ready {
        payload: Arc<Value>,
        stored_at: Instant,
    },
    /// A fetch in progress. Waiters block on the mutex instead of issuing a
    /// duplicate network operation.
    InFlight(SharedResult),
}

impl std::fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheEntry::Ready { stored_at, .. } => {
                f.debug_struct("Ready").field("stored_at", stored_at).finish()
            }
            CacheEntry::InFlight(_) => f.debug_tuple("InFlight").finish(),
        }
    }
}

/// In-memory, TTL-bounded store mapping a normalized request signature to a
/// previously fetched response.
///
/// **Deduplication**: if multiple fetches come in for the same signature
/// while one is in flight, they all share that fetch; no duplicate I/O.
/// Concurrent fetches with *different* signatures race independently.
///
/// Entries are never evicted proactively on expiry; a stale entry is
/// superseded in place by the next fetch with its signature. A bounded
/// entry count keeps memory in check, evicting an arbitrary completed entry
/// when full.
///
/// Failures are never stored; the next call with the same signature retries
/// from scratch.
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    default_ttl: Duration,
    max_entries: usize,
}

enum Action {
    Hit(Arc<Value>),
    WaitOnInFlight(SharedResult),
    DoFetch(FetchGuard),
}

/// Publish an in-flight marker whose slot is already locked by the caller.
///
/// Locking before the marker becomes visible means a waiter that acquires
/// the slot lock always finds the fetch outcome, never an empty slot from a
/// fetcher that has not started yet. The empty-slot case is then reliably an
/// orphaned marker from a dropped fetch.
fn publish_in_flight(entries: &mut HashMap<String, CacheEntry>, signature: &str) -> FetchGuard {
    let slot: SharedResult = Arc::new(tokio::sync::Mutex::new(None));
    let guard = slot
        .clone()
        .try_lock_owned()
        .expect("freshly created mutex is unlocked");
    entries.insert(signature.to_string(), CacheEntry::InFlight(slot));
    guard
}

impl ResponseCache {
    /// Create a cache with the given process-wide default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }

    /// Override the entry bound.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    /// The process-wide default TTL.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Fetch the response for a request, consulting the cache first.
    ///
    /// `ttl` of `None` uses the process-wide default; `Some(Duration::ZERO)`
    /// bypasses the cache read (always re-fetches) but still stores the
    /// result for later non-zero-TTL calls.
    ///
    /// Transport failures surface as-is and leave no cache entry behind.
    pub async fn fetch(
        &self,
        request: &RequestDescriptor,
        ttl: Option<Duration>,
        transport: &dyn Transport,
    ) -> Result<Arc<Value>> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let signature = request.signature();

        loop {
            // Phase 1: inspect cache state under the map lock. The lock is
            // never held across an await point.
            let action = {
                let mut entries = self.entries.write().unwrap();

                match entries.get(&signature) {
                    Some(CacheEntry::Ready { payload, stored_at })
                        if !ttl.is_zero() && stored_at.elapsed() <= ttl =>
                    {
                        trace!(%signature, "cache hit");
                        Action::Hit(payload.clone())
                    }
                    Some(CacheEntry::Ready { .. }) => {
                        // Stale, or a zero TTL forcing a re-fetch: supersede
                        // in place.
                        debug!(%signature, "stale entry, re-fetching");
                        Action::DoFetch(publish_in_flight(&mut entries, &signature))
                    }
                    Some(CacheEntry::InFlight(slot)) => {
                        trace!(%signature, "joining in-flight fetch");
                        Action::WaitOnInFlight(slot.clone())
                    }
                    None => {
                        debug!(%signature, "cache miss");
                        if entries.len() >= self.max_entries {
                            let ready_key = entries
                                .iter()
                                .find(|(_, v)| matches!(v, CacheEntry::Ready { .. }))
                                .map(|(k, _)| k.clone());
                            if let Some(old_key) = ready_key {
                                entries.remove(&old_key);
                            }
                        }
                        Action::DoFetch(publish_in_flight(&mut entries, &signature))
                    }
                }
            };

            // Phase 2: act outside the map lock.
            match action {
                Action::Hit(payload) => return Ok(payload),
                Action::WaitOnInFlight(slot) => {
                    // The fetching task held the slot lock before the
                    // marker became visible, so acquiring it means the
                    // fetch is settled or its task is gone.
                    let guard = slot.lock().await;
                    match guard.as_ref() {
                        Some(Ok(payload)) => return Ok(payload.clone()),
                        Some(Err(e)) => return Err(e.clone()),
                        None => {
                            // Orphaned in-flight: the fetching task was
                            // dropped before filling the slot. Clear the
                            // marker (if it is still ours) and retry.
                            drop(guard);
                            let mut entries = self.entries.write().unwrap();
                            let orphaned = matches!(
                                entries.get(&signature),
                                Some(CacheEntry::InFlight(s)) if Arc::ptr_eq(s, &slot)
                            );
                            if orphaned {
                                entries.remove(&signature);
                            }
                            continue;
                        }
                    }
                }
                Action::DoFetch(mut guard) => {
                    let result = transport.perform(request).await.map(Arc::new);
                    *guard = Some(result.clone());
                    drop(guard);

                    let mut entries = self.entries.write().unwrap();
                    match result {
                        Ok(payload) => {
                            entries.insert(
                                signature,
                                CacheEntry::Ready {
                                    payload: payload.clone(),
                                    stored_at: Instant::now(),
                                },
                            );
                            return Ok(payload);
                        }
                        Err(e) => {
                            // Failures are not cached; drop the marker so
                            // the next call retries from scratch.
                            entries.remove(&signature);
                            return Err(e);
                        }
                    }
                }
            }
        }
    }

    /// Remove the entry for a signature, returning its payload if complete.
    pub fn remove(&self, signature: &str) -> Option<Arc<Value>> {
        match self.entries.write().unwrap().remove(signature) {
            Some(CacheEntry::Ready { payload, .. }) => Some(payload),
            _ => None,
        }
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    /// Number of completed entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap()
            .values()
            .filter(|v| matches!(v, CacheEntry::Ready { .. }))
            .count()
    }

    /// Whether the cache holds no completed entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("len", &self.len())
            .field("default_ttl", &self.default_ttl)
            .field("max_entries", &self.max_entries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Transport fixture that counts invocations and can be told to fail or
    /// stall.
    struct MockTransport {
        calls: AtomicUsize,
        fail_first: AtomicUsize,
        delay: Duration,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        fn failing_first(count: usize) -> Self {
            let transport = Self::new();
            transport.fail_first.store(count, Ordering::SeqCst);
            transport
        }

        fn slow(delay: Duration) -> Self {
            let mut transport = Self::new();
            transport.delay = delay;
            transport
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn perform(&self, request: &RequestDescriptor) -> Result<Value> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if call < self.fail_first.load(Ordering::SeqCst) {
                return Err(CacheError::fetch("mock transport failure"));
            }
            Ok(json!({ "url": request.url, "call": call }))
        }
    }

    fn request(url: &str) -> RequestDescriptor {
        RequestDescriptor {
            method: "GET".to_string(),
            url: url.to_string(),
            headers: BTreeMap::from([(
                "Accept".to_string(),
                "application/json".to_string(),
            )]),
            mode: Some("cors".to_string()),
            credentials: None,
            cache: None,
        }
    }

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_identical_requests_hit_the_transport_once() {
        let cache = ResponseCache::new(TTL);
        let transport = MockTransport::new();
        let req = request("https://data.example.org/sparql?query=a");

        let first = cache.fetch(&req, None, &transport).await.unwrap();
        let second = cache.fetch(&req, None, &transport).await.unwrap();

        assert_eq!(transport.calls(), 1);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let cache = ResponseCache::new(TTL);
        let transport = MockTransport::new();
        let req = request("https://data.example.org/sparql?query=a");
        let ttl = Some(Duration::from_millis(20));

        cache.fetch(&req, ttl, &transport).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        cache.fetch(&req, ttl, &transport).await.unwrap();

        assert_eq!(transport.calls(), 2);
        // The stale entry was superseded in place, not duplicated.
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_bypasses_read_but_populates() {
        let cache = ResponseCache::new(TTL);
        let transport = MockTransport::new();
        let req = request("https://data.example.org/sparql?query=a");

        cache
            .fetch(&req, Some(Duration::ZERO), &transport)
            .await
            .unwrap();
        cache
            .fetch(&req, Some(Duration::ZERO), &transport)
            .await
            .unwrap();
        assert_eq!(transport.calls(), 2);

        // A later call with a live TTL reuses the stored result.
        cache.fetch(&req, Some(TTL), &transport).await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = ResponseCache::new(TTL);
        let transport = MockTransport::failing_first(1);
        let req = request("https://data.example.org/sparql?query=a");

        let err = cache.fetch(&req, None, &transport).await.unwrap_err();
        assert!(matches!(err, CacheError::Fetch { .. }));
        assert!(cache.is_empty());

        // The retry goes back to the transport and succeeds.
        cache.fetch(&req, None, &transport).await.unwrap();
        assert_eq!(transport.calls(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_identical_fetches_are_deduplicated() {
        let cache = ResponseCache::new(TTL);
        let transport = MockTransport::slow(Duration::from_millis(30));
        let req = request("https://data.example.org/sparql?query=a");

        let (a, b, c) = tokio::join!(
            cache.fetch(&req, None, &transport),
            cache.fetch(&req, None, &transport),
            cache.fetch(&req, None, &transport),
        );

        assert_eq!(transport.calls(), 1);
        let a = a.unwrap();
        assert_eq!(a, b.unwrap());
        assert_eq!(a, c.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_waiters_racing_marker_publication_do_not_duplicate_fetch() {
        // An instant transport makes the window between publishing the
        // in-flight marker and settling the slot as narrow as it gets; a
        // waiter that sneaks in must still find the slot locked, not
        // mistake it for an orphan and re-fetch.
        let cache = Arc::new(ResponseCache::new(TTL));
        let transport = Arc::new(MockTransport::new());
        let req = request("https://data.example.org/sparql?query=a");

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let cache = cache.clone();
                let transport = transport.clone();
                let req = req.clone();
                tokio::spawn(async move { cache.fetch(&req, None, transport.as_ref()).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(transport.calls(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_different_signatures_race_independently() {
        let cache = ResponseCache::new(TTL);
        let transport = MockTransport::slow(Duration::from_millis(10));
        let req_a = request("https://data.example.org/sparql?query=a");
        let req_b = request("https://data.example.org/sparql?query=b");

        let (a, b) = tokio::join!(
            cache.fetch(&req_a, None, &transport),
            cache.fetch(&req_b, None, &transport),
        );

        assert_eq!(transport.calls(), 2);
        assert_ne!(a.unwrap(), b.unwrap());
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_waiters_see_the_failure_then_retry_fresh() {
        let cache = ResponseCache::new(TTL);
        let transport = MockTransport::failing_first(1);
        // One transport call shared by both: both see the same error.
        let req = request("https://data.example.org/sparql?query=a");

        let slow_transport = MockTransport::slow(Duration::from_millis(20));
        slow_transport.fail_first.store(1, Ordering::SeqCst);
        let (a, b) = tokio::join!(
            cache.fetch(&req, None, &slow_transport),
            cache.fetch(&req, None, &slow_transport),
        );
        assert_eq!(slow_transport.calls(), 1);
        assert!(a.is_err());
        assert!(b.is_err());
        assert!(cache.is_empty());

        // A later call is a clean miss.
        cache.fetch(&req, None, &transport).await.unwrap_err();
        cache.fetch(&req, None, &transport).await.unwrap();
    }

    #[tokio::test]
    async fn test_bounded_entries_evict_completed_entries() {
        let cache = ResponseCache::new(TTL).with_max_entries(2);
        let transport = MockTransport::new();

        for i in 0..3 {
            let req = request(&format!("https://data.example.org/sparql?query={}", i));
            cache.fetch(&req, None, &transport).await.unwrap();
        }

        assert_eq!(transport.calls(), 3);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_maintenance_ops() {
        let cache = ResponseCache::new(TTL);
        let transport = MockTransport::new();
        let req = request("https://data.example.org/sparql?query=a");

        cache.fetch(&req, None, &transport).await.unwrap();
        assert_eq!(cache.len(), 1);

        assert!(cache.remove(&req.signature()).is_some());
        assert!(cache.is_empty());

        cache.fetch(&req, None, &transport).await.unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
