//! Query cache in front of the gateway.
//!
//! - Results are cached per [`QueryKey`] for the staleness window.
//! - Concurrent queries for one key share a single fetch.
//! - A failed fetch is retried once; failures are never cached.
//! - A successful mutation evicts every key under the prefixes it names.
//!
//! Values of any `Clone + Send + Sync` type can be cached side by side; the
//! caller's type is recovered with a downcast.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use moka::future::Cache;
use tracing::{debug, instrument, warn};

use crate::config::QueryConfig;

/// A fetched value and the generation of its key when the fetch started.
struct Loaded {
    generation: u64,
    value: Arc<dyn Any + Send + Sync>,
}

type Entry = Arc<Loaded>;

/// Hierarchical cache key, e.g. `["projects"]` or `["projects", id]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn root(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// This key with one more segment appended.
    #[must_use]
    pub fn with(mut self, segment: impl ToString) -> Self {
        self.0.push(segment.to_string());
        self
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether `prefix` names this key or one of its ancestors.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

impl From<&str> for QueryKey {
    fn from(segment: &str) -> Self {
        Self::root(segment)
    }
}

impl<const N: usize> From<[&str; N]> for QueryKey {
    fn from(segments: [&str; N]) -> Self {
        Self::new(segments)
    }
}

/// Where a key is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Nothing cached and nothing in flight.
    Idle,
    Loading,
    /// A fresh result is cached.
    Success,
    /// The last fetch failed (after its retry) within the staleness window.
    Error,
}

/// Side effects of a mutation.
pub struct MutationOptions<T, E> {
    invalidate: Vec<QueryKey>,
    on_success: Option<Box<dyn FnOnce(&T) + Send>>,
    on_error: Option<Box<dyn FnOnce(&E) + Send>>,
}

impl<T, E> Default for MutationOptions<T, E> {
    fn default() -> Self {
        Self {
            invalidate: Vec::new(),
            on_success: None,
            on_error: None,
        }
    }
}

impl<T, E> MutationOptions<T, E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evict this key and everything under it on success.
    #[must_use]
    pub fn invalidate(mut self, key: impl Into<QueryKey>) -> Self {
        self.invalidate.push(key.into());
        self
    }

    #[must_use]
    pub fn on_success(mut self, f: impl FnOnce(&T) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_error(mut self, f: impl FnOnce(&E) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}

/// Shared query cache. Cloning is cheap and clones share entries.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<QueryClientInner>,
}

struct QueryClientInner {
    cache: Cache<QueryKey, Entry>,
    stale_time: Duration,
    /// Keys that are loading or failed; successes live in `cache`.
    pending: Mutex<HashMap<QueryKey, (QueryStatus, Instant)>>,
    /// Bumped on every invalidation so fetches already running can tell
    /// their result is out of date.
    generations: Mutex<HashMap<QueryKey, u64>>,
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("stale_time", &self.inner.stale_time)
            .field("entries", &self.inner.cache.entry_count())
            .finish()
    }
}

impl QueryClient {
    #[must_use]
    pub fn new(config: &QueryConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.stale_time)
            .build();

        Self {
            inner: Arc::new(QueryClientInner {
                cache,
                stale_time: config.stale_time,
                pending: Mutex::new(HashMap::new()),
                generations: Mutex::new(HashMap::new()),
            }),
        }
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<QueryKey, (QueryStatus, Instant)>> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn generations(&self) -> MutexGuard<'_, HashMap<QueryKey, u64>> {
        self.inner
            .generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// How many times `key` has been invalidated.
    fn generation(&self, key: &QueryKey) -> u64 {
        *self.generations().entry(key.clone()).or_insert(0)
    }

    fn mark(&self, key: &QueryKey, status: QueryStatus) {
        let stale_time = self.inner.stale_time;
        let mut pending = self.pending();
        pending.retain(|_, (state, at)| *state != QueryStatus::Error || at.elapsed() < stale_time);
        if status == QueryStatus::Success {
            pending.remove(key);
        } else {
            pending.insert(key.clone(), (status, Instant::now()));
        }
    }

    /// Evict `key` if what is cached was loaded before its last invalidation.
    async fn evict_if_stale(&self, key: &QueryKey) {
        if let Some(entry) = self.inner.cache.get(key).await {
            let current = self.generation(key);
            if entry.generation != current {
                self.inner.cache.invalidate(key).await;
            }
        }
    }

    /// Current lifecycle state of `key`.
    #[must_use]
    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        if self.inner.cache.contains_key(key) {
            return QueryStatus::Success;
        }
        match self.pending().get(key) {
            Some((QueryStatus::Error, at)) if at.elapsed() >= self.inner.stale_time => {
                QueryStatus::Idle
            }
            Some((status, _)) => *status,
            None => QueryStatus::Idle,
        }
    }

    /// Cached value for `key`, or the result of `fetch`.
    ///
    /// A fetch that was already running when `key` got invalidated is
    /// discarded and run again, for its own caller and for every caller that
    /// joined it.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, shared between every caller that was
    /// waiting on the same fetch.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn query<T, E, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, Arc<E>>
    where
        T: Clone + Send + Sync + 'static,
        E: fmt::Display + Send + Sync + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        loop {
            let generation = self.generation(&key);
            if let Some(entry) = self.inner.cache.get(&key).await {
                if entry.generation != generation {
                    debug!("Cached value predates an invalidation, refetching");
                    self.evict_if_stale(&key).await;
                } else if let Some(value) = entry.value.downcast_ref::<T>() {
                    debug!("Query cache hit");
                    return Ok(value.clone());
                } else {
                    warn!("Cached value has a different type, refetching");
                    self.inner.cache.invalidate(&key).await;
                }
            }

            self.mark(&key, QueryStatus::Loading);
            let init = async {
                let value = Self::fetch_with_retry(&key, &fetch).await?;
                Ok::<Entry, E>(Arc::new(Loaded {
                    generation,
                    value: Arc::new(value),
                }))
            };

            let loaded = self.inner.cache.try_get_with(key.clone(), init).await;
            let current = self.generation(&key);
            match loaded {
                Ok(entry) if entry.generation != current => {
                    debug!("Fetch overlapped an invalidation, refetching");
                    self.evict_if_stale(&key).await;
                }
                Ok(entry) => {
                    self.mark(&key, QueryStatus::Success);
                    if let Some(value) = entry.value.downcast_ref::<T>() {
                        return Ok(value.clone());
                    }
                    // A concurrent query stored another type under this key.
                    warn!("Shared fetch produced a different type, fetching directly");
                    return Self::fetch_with_retry(&key, &fetch).await.map_err(Arc::new);
                }
                Err(e) => {
                    self.mark(&key, QueryStatus::Error);
                    return Err(e);
                }
            }
        }
    }

    async fn fetch_with_retry<T, E, F, Fut>(key: &QueryKey, fetch: &F) -> Result<T, E>
    where
        E: fmt::Display,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        debug!(%key, "Fetching");
        match fetch().await {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(%key, error = %e, "Query failed, retrying once");
                fetch().await
            }
        }
    }

    /// Run a write. On success, evict the configured keys and call
    /// `on_success`; on failure call `on_error` and leave the cache alone.
    /// Mutations are never retried.
    ///
    /// # Errors
    ///
    /// Returns the mutation's own error.
    pub async fn mutate<T, E, Fut>(
        &self,
        mutation: Fut,
        options: MutationOptions<T, E>,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        let MutationOptions {
            invalidate,
            on_success,
            on_error,
        } = options;

        match mutation.await {
            Ok(value) => {
                for key in &invalidate {
                    self.invalidate(key).await;
                }
                if let Some(f) = on_success {
                    f(&value);
                }
                Ok(value)
            }
            Err(e) => {
                if let Some(f) = on_error {
                    f(&e);
                }
                Err(e)
            }
        }
    }

    /// Evict `prefix` and every key below it.
    pub async fn invalidate(&self, prefix: &QueryKey) {
        for (key, generation) in self.generations().iter_mut() {
            if key.starts_with(prefix) {
                *generation += 1;
            }
        }
        let keys: Vec<QueryKey> = self
            .inner
            .cache
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| QueryKey::clone(&key))
            .collect();
        for key in &keys {
            self.inner.cache.invalidate(key).await;
        }
        self.pending()
            .retain(|key, (status, _)| *status == QueryStatus::Loading || !key.starts_with(prefix));
        debug!(%prefix, evicted = keys.len(), "Invalidated queries");
    }

    /// Drop every cached result.
    pub fn clear(&self) {
        for generation in self.generations().values_mut() {
            *generation += 1;
        }
        self.inner.cache.invalidate_all();
        self.pending().clear();
    }
}
