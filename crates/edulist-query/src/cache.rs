//! Keyed response cache with in-flight request de-duplication.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;
use tracing::{debug, instrument, trace, warn};

use edulist_core::error::InvalidInputError;
use edulist_core::{Error, QueryKey, Resource, Result};

use crate::config::QueryConfig;

type Erased = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<Erased>>>;

/// Response cache shared by every list view of an application.
///
/// The cache is the only shared mutable state in the loading pipeline. It is
/// cheap to clone (clones share storage) and is meant to be created once at
/// startup and handed to each [`crate::ListController`].
///
/// Guarantees:
/// - at most one request per key is in flight; concurrent callers share it,
/// - a resolved key is served from memory until it is older than the stale
///   time or explicitly invalidated,
/// - entries past the stale time and invalidated values are flushed, except
///   while a request for their key is in flight,
/// - a failed request records its error, which is kept for one stale time;
///   an invalidated value is dropped once its refetch settles.
///
/// No request is ever retried automatically.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    stale_time: Duration,
    state: Mutex<CacheState>,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<QueryKey, Entry>,
    in_flight: HashMap<QueryKey, InFlight>,
    next_ticket: u64,
    stats: CacheStats,
}

#[derive(Default)]
struct Entry {
    data: Option<Erased>,
    fetched_at: Option<Instant>,
    settled_at: Option<Instant>,
    invalidated: bool,
    error: Option<Error>,
}

struct InFlight {
    ticket: u64,
    fetch: SharedFetch,
}

/// Counters describing how requests were served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests handed to a fetcher.
    pub requests: u64,
    /// Calls answered from a fresh entry.
    pub hits: u64,
    /// Calls that joined a request already in flight.
    pub joined: u64,
    /// Requests that resolved to an error.
    pub failures: u64,
}

impl Entry {
    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.invalidated
            && self.data.is_some()
            && self
                .fetched_at
                .is_some_and(|at| at.elapsed() < stale_time)
    }

    fn is_expired(&self, stale_time: Duration) -> bool {
        let aged = self
            .settled_at
            .is_none_or(|at| at.elapsed() >= stale_time);
        aged || (self.invalidated && self.error.is_none())
    }
}

impl CacheInner {
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CacheState {
    fn settle(&mut self, key: &QueryKey, ticket: u64, result: &Result<Erased>) {
        if self
            .in_flight
            .get(key)
            .is_some_and(|flight| flight.ticket == ticket)
        {
            self.in_flight.remove(key);
        }

        let now = Instant::now();
        let entry = self.entries.entry(key.clone()).or_default();
        entry.settled_at = Some(now);
        match result {
            Ok(data) => {
                entry.data = Some(Arc::clone(data));
                entry.fetched_at = Some(now);
                entry.invalidated = false;
                entry.error = None;
            }
            Err(err) => {
                self.stats.failures += 1;
                entry.error = Some(err.clone());
                if entry.invalidated {
                    entry.data = None;
                }
            }
        }
    }

    /// Drop expired entries whose key has no request in flight.
    fn sweep(&mut self, stale_time: Duration) -> usize {
        let before = self.entries.len();
        let in_flight = &self.in_flight;
        self.entries
            .retain(|key, entry| in_flight.contains_key(key) || !entry.is_expired(stale_time));
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, "flushed expired entries");
        }
        removed
    }
}

impl QueryCache {
    pub fn new(config: &QueryConfig) -> Self {
        Self::with_stale_time(config.stale_time)
    }

    pub fn with_stale_time(stale_time: Duration) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                stale_time,
                state: Mutex::new(CacheState::default()),
            }),
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.inner.stale_time
    }

    /// Return the value for `key`, calling `fetcher` only if no fresh value
    /// is cached and no request for `key` is already in flight.
    ///
    /// # Errors
    ///
    /// Returns the fetcher's error, shared with every caller that joined the
    /// same request.
    #[instrument(skip(self, fetcher), fields(%key))]
    pub async fn fetch<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let shared = {
            let mut state = self.inner.lock();

            let fresh = state
                .entries
                .get(key)
                .filter(|entry| entry.is_fresh(self.inner.stale_time))
                .and_then(|entry| entry.data.clone());
            if let Some(data) = fresh {
                state.stats.hits += 1;
                trace!("cache hit");
                return downcast(key, data);
            }

            let fetch = if let Some(flight) = state.in_flight.get(key) {
                let fetch = flight.fetch.clone();
                state.stats.joined += 1;
                debug!("joining in-flight request");
                fetch
            } else {
                self.start(&mut state, key.clone(), fetcher())
            };
            state.sweep(self.inner.stale_time);
            fetch
        };

        downcast(key, shared.await?)
    }

    /// Like [`QueryCache::fetch`] but ignores any cached value for `key`.
    /// The old value stays readable until the new request settles.
    pub async fn refetch<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        if let Some(entry) = self.inner.lock().entries.get_mut(key) {
            entry.invalidated = true;
        }
        self.fetch(key, fetcher).await
    }

    fn start<T, Fut>(&self, state: &mut CacheState, key: QueryKey, request: Fut) -> SharedFetch
    where
        T: Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let ticket = state.next_ticket;
        state.next_ticket += 1;
        state.stats.requests += 1;
        debug!(ticket, "starting request");

        let cache: Weak<CacheInner> = Arc::downgrade(&self.inner);
        let settle_key = key.clone();
        let fetch = async move {
            let result = request.await.map(|value| Arc::new(value) as Erased);
            if let Err(ref err) = result {
                warn!(key = %settle_key, error = %err, "request failed");
            }
            if let Some(cache) = cache.upgrade() {
                cache.lock().settle(&settle_key, ticket, &result);
            }
            result
        }
        .boxed()
        .shared();

        state.in_flight.insert(
            key,
            InFlight {
                ticket,
                fetch: fetch.clone(),
            },
        );
        fetch
    }

    /// Last successfully fetched value for `key`, fresh or not.
    pub fn get<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let data = self.inner.lock().entries.get(key)?.data.clone()?;
        data.downcast::<T>().ok()
    }

    /// Value for `key` only if it would be served without a network call.
    pub fn get_fresh<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let state = self.inner.lock();
        let entry = state.entries.get(key)?;
        if !entry.is_fresh(self.inner.stale_time) {
            return None;
        }
        entry.data.clone()?.downcast::<T>().ok()
    }

    /// Error from the most recent request for `key`, if it failed.
    pub fn error(&self, key: &QueryKey) -> Option<Error> {
        self.inner.lock().entries.get(key)?.error.clone()
    }

    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        self.inner
            .lock()
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_fresh(self.inner.stale_time))
    }

    pub fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.inner.lock().in_flight.contains_key(key)
    }

    /// Force the next fetch of `key` to go to the network.
    pub fn invalidate(&self, key: &QueryKey) {
        self.invalidate_where(|cached| cached == key);
    }

    /// Invalidate every page cached for the list `key` names.
    pub fn invalidate_list(&self, key: &QueryKey) {
        self.invalidate_where(|cached| cached.same_list(key));
    }

    /// Invalidate every entry for `resource`.
    pub fn invalidate_resource(&self, resource: Resource) {
        self.invalidate_where(|cached| cached.resource() == resource);
    }

    fn invalidate_where(&self, predicate: impl Fn(&QueryKey) -> bool) {
        let mut state = self.inner.lock();
        let mut count = 0;
        for (key, entry) in state.entries.iter_mut() {
            if predicate(key) {
                entry.invalidated = true;
                count += 1;
            }
        }
        debug!(count, "invalidated cache entries");
        state.sweep(self.inner.stale_time);
    }

    /// Flush expired entries now. Returns how many were dropped.
    pub fn gc(&self) -> usize {
        self.inner.lock().sweep(self.inner.stale_time)
    }

    /// Drop all settled entries. Requests in flight are unaffected.
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(&QueryConfig::default())
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("QueryCache")
            .field("stale_time", &self.inner.stale_time)
            .field("entries", &state.entries.len())
            .field("in_flight", &state.in_flight.len())
            .finish()
    }
}

fn downcast<T: Send + Sync + 'static>(key: &QueryKey, data: Erased) -> Result<Arc<T>> {
    data.downcast::<T>().map_err(|_| {
        Error::from(InvalidInputError::Other {
            message: format!("cache entry {} holds a different type", key),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use edulist_core::error::TransportError;
    use edulist_core::{FilterState, Page};

    fn key(resource: Resource, search: &str) -> QueryKey {
        QueryKey::page(resource, &FilterState::new().with_search(search))
    }

    fn counting(
        calls: &Arc<AtomicUsize>,
        value: Vec<&'static str>,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<Page<&'static str>>> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok::<_, Error>(Page::whole(value))
            }
            .boxed()
        }
    }

    fn failing() -> impl FnOnce() -> BoxFuture<'static, Result<Page<&'static str>>> {
        || {
            let err = Error::from(TransportError::Connection {
                message: "offline".into(),
            });
            async move { Err::<Page<&'static str>, Error>(err) }.boxed()
        }
    }

    #[tokio::test]
    async fn concurrent_identical_requests_share_one_call() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = key(Resource::Colleges, "iit");

        let (a, b) = tokio::join!(
            cache.fetch(&key, counting(&calls, vec!["a"])),
            cache.fetch(&key, counting(&calls, vec!["b"])),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.unwrap().items, vec!["a"]);
        assert_eq!(b.unwrap().items, vec!["a"]);
        assert_eq!(cache.stats().joined, 1);
        assert!(!cache.is_in_flight(&key));
    }

    #[tokio::test]
    async fn repeated_fetch_is_served_from_cache() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = key(Resource::Colleges, "iit");

        let first = cache.fetch(&key, counting(&calls, vec!["a"])).await.unwrap();
        let second = cache.fetch(&key, counting(&calls, vec!["b"])).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_entries_are_refetched() {
        let cache = QueryCache::with_stale_time(Duration::from_secs(300));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = key(Resource::Blogs, "");

        cache.fetch(&key, counting(&calls, vec!["a"])).await.unwrap();
        tokio::time::advance(Duration::from_secs(299)).await;
        cache.fetch(&key, counting(&calls, vec!["b"])).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!cache.is_fresh(&key));
        let page = cache.fetch(&key, counting(&calls, vec!["b"])).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(page.items, vec!["b"]);
    }

    #[tokio::test]
    async fn refetch_bypasses_fresh_entry() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = key(Resource::Exams, "");

        cache.fetch(&key, counting(&calls, vec!["a"])).await.unwrap();
        let page = cache.refetch(&key, counting(&calls, vec!["b"])).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(page.items, vec!["b"]);
    }

    #[tokio::test]
    async fn refetch_keeps_value_until_it_settles() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = key(Resource::Colleges, "");

        cache.fetch(&key, counting(&calls, vec!["old"])).await.unwrap();
        let refetch = cache.refetch(&key, counting(&calls, vec!["new"]));
        tokio::pin!(refetch);
        assert!(futures_util::poll!(&mut refetch).is_pending());

        assert!(cache.is_in_flight(&key));
        assert_eq!(cache.gc(), 0);
        let kept = cache.get::<Page<&'static str>>(&key).unwrap();
        assert_eq!(kept.items, vec!["old"]);

        assert_eq!(refetch.await.unwrap().items, vec!["new"]);
        assert!(cache.is_fresh(&key));
    }

    #[tokio::test]
    async fn failed_refetch_drops_invalidated_value() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = key(Resource::Colleges, "");

        cache.fetch(&key, counting(&calls, vec!["good"])).await.unwrap();
        let err = cache.refetch(&key, failing()).await.unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(cache.error(&key).map(|e| e.to_string()), Some(err.to_string()));
        assert!(cache.get::<Page<&'static str>>(&key).is_none());
        assert_eq!(cache.stats().failures, 1);
        // The error stays visible until the next attempt.
        assert_eq!(cache.gc(), 0);
        assert_eq!(cache.len(), 1);

        cache.fetch(&key, counting(&calls, vec!["again"])).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.error(&key).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_and_invalidated_entries_are_flushed() {
        let cache = QueryCache::with_stale_time(Duration::from_secs(300));
        let calls = Arc::new(AtomicUsize::new(0));

        for n in 0..1000 {
            let key = key(Resource::Colleges, &format!("college {n}"));
            cache.fetch(&key, counting(&calls, vec!["x"])).await.unwrap();
        }
        assert_eq!(cache.len(), 1000);

        tokio::time::advance(Duration::from_secs(3600)).await;
        let fresh = key(Resource::Colleges, "new");
        cache.fetch(&fresh, counting(&calls, vec!["y"])).await.unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.is_fresh(&fresh));

        for search in ["a", "b", "c"] {
            cache
                .fetch(&key(Resource::Colleges, search), counting(&calls, vec!["x"]))
                .await
                .unwrap();
        }
        let exam = key(Resource::Exams, "a");
        cache.fetch(&exam, counting(&calls, vec!["x"])).await.unwrap();
        assert_eq!(cache.len(), 5);

        cache.invalidate_resource(Resource::Colleges);
        assert_eq!(cache.len(), 1);
        assert!(cache.is_fresh(&exam));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_entries_expire_after_stale_time() {
        let cache = QueryCache::with_stale_time(Duration::from_secs(60));
        let key = key(Resource::Blogs, "");

        cache.fetch(&key, failing()).await.unwrap_err();
        assert_eq!(cache.gc(), 0);
        assert!(cache.error(&key).is_some());

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.gc(), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn resources_do_not_share_entries() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let colleges = key(Resource::Colleges, "main");
        let exams = key(Resource::Exams, "main");

        cache.fetch(&colleges, counting(&calls, vec!["college"])).await.unwrap();
        let page = cache.fetch(&exams, counting(&calls, vec!["exam"])).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(page.items, vec!["exam"]);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn invalidate_list_covers_every_page() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let filter = FilterState::new().with_search("iit");
        let page1 = QueryKey::page(Resource::Colleges, &filter);
        let page2 = QueryKey::page(Resource::Colleges, &filter.with_page(2));
        let other = key(Resource::Colleges, "nit");

        for key in [&page1, &page2, &other] {
            cache.fetch(key, counting(&calls, vec!["x"])).await.unwrap();
        }
        cache.invalidate_list(&page1.list_key());

        assert!(!cache.is_fresh(&page1));
        assert!(!cache.is_fresh(&page2));
        assert!(cache.is_fresh(&other));
        assert!(cache.get_fresh::<Page<&'static str>>(&other).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn type_mismatch_is_an_error() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = key(Resource::Blogs, "");

        cache.fetch(&key, counting(&calls, vec!["x"])).await.unwrap();
        let err = cache
            .fetch(&key, || async { Ok::<u32, Error>(42) })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("different type"));
    }
}
