//! Pod Tracker
//!
//! The public entry point: a pod lookup served from the cache, with a direct
//! cluster lookup on a miss, and the background subscription that keeps the
//! cache warm.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{BoundedCache, CacheStats, DEFAULT_MAX_ENTRIES};
use crate::client::{ClusterClient, WatchParams, DEFAULT_RESYNC_PERIOD};
use crate::error::Result;
use crate::filter::TrackFilter;
use crate::models::{PodKey, PodRecord};
use crate::tasks::{spawn_event_subscriber, EventSubscriber, UntrackPolicy};

// == Tracker Options ==
/// Construction parameters for a [`Tracker`].
#[derive(Debug, Clone)]
pub struct TrackerOptions {
    /// Only cache pods scheduled on this node; None caches every scheduled pod
    pub node_name: Option<String>,
    /// Maximum number of cached pods, must be greater than zero
    pub max_entries: usize,
    /// Handling of updates that make a cached pod untrackable
    pub untrack_policy: UntrackPolicy,
    /// Apply the trackability filter to fallback results before caching them
    pub filter_fallback: bool,
    /// Interval between full resyncs of the watch
    pub resync_period: Duration,
    /// Namespace to watch; None watches all namespaces
    pub watch_namespace: Option<String>,
    /// Server-side field selector for the watch
    pub field_selector: Option<String>,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            node_name: None,
            max_entries: DEFAULT_MAX_ENTRIES,
            untrack_policy: UntrackPolicy::default(),
            filter_fallback: false,
            resync_period: DEFAULT_RESYNC_PERIOD,
            watch_namespace: None,
            field_selector: None,
        }
    }
}

// == Tracker Stats ==
/// Cache statistics plus fallback lookup counters.
#[derive(Debug, Clone, Serialize)]
pub struct TrackerStats {
    #[serde(flatten)]
    pub cache: CacheStats,
    /// Cluster lookups performed on a cache miss
    pub fetches: u64,
    /// Cluster lookups that returned no pod
    pub fetch_failures: u64,
}

// == Tracker ==
/// Resolves `(namespace, name)` to pod metadata.
///
/// Share it behind an `Arc`; every method takes `&self`.
pub struct Tracker {
    client: Arc<dyn ClusterClient>,
    cache: BoundedCache,
    filter: TrackFilter,
    options: TrackerOptions,
    subscriber: OnceLock<JoinHandle<()>>,
    fetches: AtomicU64,
    fetch_failures: AtomicU64,
}

impl Tracker {
    // == Constructor ==
    /// Creates a tracker scoped to `node_name` with room for `max_entries` pods.
    ///
    /// Fails with [`TrackerError::InvalidCapacity`](crate::error::TrackerError)
    /// when `max_entries` is zero.
    pub fn new(
        client: Arc<dyn ClusterClient>,
        node_name: Option<String>,
        max_entries: usize,
    ) -> Result<Self> {
        Self::with_options(
            client,
            TrackerOptions {
                node_name,
                max_entries,
                ..TrackerOptions::default()
            },
        )
    }

    /// Creates a tracker from the full set of options.
    pub fn with_options(client: Arc<dyn ClusterClient>, options: TrackerOptions) -> Result<Self> {
        let cache = BoundedCache::new(options.max_entries)?;
        let filter = TrackFilter::new(options.node_name.clone());

        Ok(Self {
            client,
            cache,
            filter,
            options,
            subscriber: OnceLock::new(),
            fetches: AtomicU64::new(0),
            fetch_failures: AtomicU64::new(0),
        })
    }

    // == Start Watching ==
    /// Starts the background event subscriber.
    ///
    /// Must be called from within a Tokio runtime. Only the first call has an
    /// effect; it returns true, later calls return false. There is no stop.
    pub fn start_watching(&self) -> bool {
        let mut started = false;
        self.subscriber.get_or_init(|| {
            started = true;
            let subscriber = EventSubscriber::new(
                self.cache.clone(),
                self.filter.clone(),
                self.options.untrack_policy,
            );
            let params = WatchParams {
                namespace: self.options.watch_namespace.clone(),
                field_selector: self.options.field_selector.clone(),
                resync_period: self.options.resync_period,
            };
            spawn_event_subscriber(Arc::clone(&self.client), subscriber, params)
        });

        if started {
            info!(
                max_entries = self.options.max_entries,
                untrack_policy = %self.options.untrack_policy,
                "Pod tracker watching for changes"
            );
        }
        started
    }

    /// Returns true once [`start_watching`](Self::start_watching) has been called.
    pub fn is_watching(&self) -> bool {
        self.subscriber.get().is_some()
    }

    // == Get ==
    /// Looks up a pod, falling back to the cluster on a cache miss.
    ///
    /// A fallback result is cached only if no entry appeared for the key in
    /// the meantime, but the caller always receives the fetched record.
    /// Returns None when the pod does not exist or the lookup failed.
    pub async fn get(&self, namespace: &str, name: &str) -> Option<Arc<PodRecord>> {
        let key = PodKey::new(namespace, name);
        if let Some(pod) = self.cache.get(&key) {
            return Some(pod);
        }

        self.fetches.fetch_add(1, Ordering::Relaxed);
        match self.client.get(namespace, name).await {
            Ok(pod) => {
                if self.options.filter_fallback && !self.filter.can_track(&pod) {
                    debug!(%key, "Fetched untrackable pod, not caching");
                } else if self.cache.contains_or_add(key.clone(), Arc::clone(&pod)) {
                    debug!(%key, "Cached fetched pod");
                } else {
                    debug!(%key, "Pod was cached while fetching, keeping cached value");
                }
                Some(pod)
            }
            Err(error) => {
                self.fetch_failures.fetch_add(1, Ordering::Relaxed);
                debug!(%key, %error, "Pod lookup failed");
                None
            }
        }
    }

    // == Accessors ==
    /// The underlying cache, shared with the event subscriber.
    pub fn cache(&self) -> &BoundedCache {
        &self.cache
    }

    pub fn filter(&self) -> &TrackFilter {
        &self.filter
    }

    pub fn stats(&self) -> TrackerStats {
        TrackerStats {
            cache: self.cache.stats(),
            fetches: self.fetches.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::error::TrackerError;
    use crate::models::PodEvent;
    use async_trait::async_trait;
    use futures::stream::{self, BoxStream, StreamExt};
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    /// Serves lookups from a fixed map and never emits watch events.
    struct StaticClient {
        pods: HashMap<PodKey, Arc<PodRecord>>,
        watches: AtomicUsize,
    }

    impl StaticClient {
        fn with(pods: &[PodRecord]) -> Arc<Self> {
            Arc::new(Self {
                pods: pods
                    .iter()
                    .map(|pod| (pod.key(), Arc::new(pod.clone())))
                    .collect(),
                watches: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ClusterClient for StaticClient {
        fn list_and_watch(&self, _params: WatchParams) -> BoxStream<'static, PodEvent> {
            self.watches.fetch_add(1, Ordering::SeqCst);
            stream::pending().boxed()
        }

        async fn get(
            &self,
            namespace: &str,
            name: &str,
        ) -> std::result::Result<Arc<PodRecord>, ClientError> {
            let key = PodKey::new(namespace, name);
            self.pods
                .get(&key)
                .cloned()
                .ok_or(ClientError::NotFound(key))
        }
    }

    #[test]
    fn test_zero_capacity_is_a_configuration_error() {
        let result = Tracker::new(StaticClient::with(&[]), None, 0);
        assert!(matches!(result, Err(TrackerError::InvalidCapacity(0))));
    }

    #[tokio::test]
    async fn test_hit_does_not_call_client() {
        let tracker = Tracker::new(StaticClient::with(&[]), None, 4).unwrap();
        let pod = Arc::new(PodRecord::new("ns", "a", "node-a"));
        tracker.cache().add(pod.key(), Arc::clone(&pod));

        assert_eq!(tracker.get("ns", "a").await, Some(pod));
        assert_eq!(tracker.stats().fetches, 0);
        assert_eq!(tracker.stats().cache.hits, 1);
    }

    #[tokio::test]
    async fn test_miss_fetches_and_caches() {
        let client = StaticClient::with(&[PodRecord::new("ns", "a", "node-a")]);
        let tracker = Tracker::new(client, None, 4).unwrap();

        let pod = tracker.get("ns", "a").await.unwrap();

        assert_eq!(pod.node_name, "node-a");
        assert_eq!(tracker.cache().peek(&PodKey::new("ns", "a")), Some(pod));
        assert_eq!(tracker.stats().fetches, 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_not_found() {
        let tracker = Tracker::new(StaticClient::with(&[]), None, 4).unwrap();

        assert_eq!(tracker.get("ns", "missing").await, None);
        assert_eq!(tracker.get("ns", "missing").await, None);

        let stats = tracker.stats();
        assert_eq!(stats.fetches, 2);
        assert_eq!(stats.fetch_failures, 2);
        assert!(tracker.cache().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_caches_untrackable_pods_by_default() {
        let client = StaticClient::with(&[PodRecord::new("ns", "a", "node-b")]);
        let tracker = Tracker::new(client, Some("node-a".to_string()), 4).unwrap();

        assert!(tracker.get("ns", "a").await.is_some());
        assert_eq!(tracker.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_filtered_fallback_returns_but_does_not_cache() {
        let client = StaticClient::with(&[PodRecord::new("ns", "a", "node-b")]);
        let options = TrackerOptions {
            node_name: Some("node-a".to_string()),
            filter_fallback: true,
            ..TrackerOptions::default()
        };
        let tracker = Tracker::with_options(client, options).unwrap();

        assert!(tracker.get("ns", "a").await.is_some());
        assert!(tracker.cache().is_empty());
    }

    #[tokio::test]
    async fn test_start_watching_is_idempotent() {
        let client = StaticClient::with(&[]);
        let tracker = Tracker::new(client.clone(), None, 4).unwrap();
        assert!(!tracker.is_watching());

        assert!(tracker.start_watching());
        assert!(!tracker.start_watching());
        assert!(tracker.is_watching());

        // Let the subscriber task subscribe
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(client.watches.load(Ordering::SeqCst), 1);
    }
}
