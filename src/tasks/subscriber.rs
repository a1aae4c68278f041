//! Event Subscriber Task
//!
//! Background task that applies pod change events from the cluster watch to
//! the cache.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::cache::BoundedCache;
use crate::client::{ClusterClient, WatchParams};
use crate::filter::TrackFilter;
use crate::models::PodEvent;

/// Pause before resubscribing after the event stream ends
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

// == Untrack Policy ==
/// What an update does when it turns a trackable pod into an untrackable
/// one, for example after it was rescheduled to another node.
///
/// Updates of pods that were never trackable leave the cache alone under
/// either policy, so entries cached by a fallback lookup survive them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UntrackPolicy {
    /// Remove the entry. This is the default.
    #[default]
    Evict,
    /// Leave the last trackable state in the cache until it is deleted or
    /// evicted. This matches the behavior of the system this tracker replaces.
    Retain,
}

impl FromStr for UntrackPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "evict" => Ok(Self::Evict),
            "retain" => Ok(Self::Retain),
            other => Err(format!("unknown untrack policy: {}", other)),
        }
    }
}

impl fmt::Display for UntrackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evict => f.write_str("evict"),
            Self::Retain => f.write_str("retain"),
        }
    }
}

// == Event Subscriber ==
/// Applies pod events to the cache, one at a time.
#[derive(Debug, Clone)]
pub struct EventSubscriber {
    cache: BoundedCache,
    filter: TrackFilter,
    policy: UntrackPolicy,
}

impl EventSubscriber {
    pub fn new(cache: BoundedCache, filter: TrackFilter, policy: UntrackPolicy) -> Self {
        Self {
            cache,
            filter,
            policy,
        }
    }

    /// Applies a single event.
    ///
    /// Adds and updates overwrite the cached value when the new state is
    /// trackable. An update from a trackable to an untrackable state removes
    /// the entry under [`UntrackPolicy::Evict`]. Deletions are always honored,
    /// trackable or not.
    pub fn handle(&self, event: PodEvent) {
        let key = event.key();
        let kind = event.kind();

        match event {
            PodEvent::Added(pod) => {
                if self.filter.can_track(&pod) {
                    self.cache.add(key.clone(), pod);
                    debug!(kind, %key, "Cached pod");
                } else {
                    trace!(kind, %key, "Ignoring untrackable pod");
                }
            }
            PodEvent::Updated { old, new } => {
                if self.filter.can_track(&new) {
                    self.cache.add(key.clone(), new);
                    debug!(kind, %key, "Cached pod");
                } else if self.policy == UntrackPolicy::Evict
                    && self.filter.can_track(&old)
                    && self.cache.remove(&key)
                {
                    debug!(kind, %key, "Evicted pod that is no longer trackable");
                } else {
                    trace!(kind, %key, "Ignoring untrackable pod");
                }
            }
            PodEvent::Deleted(_) | PodEvent::DeletedFinalStateUnknown(_) => {
                if self.cache.remove(&key) {
                    debug!(kind, %key, "Removed pod");
                } else {
                    trace!(kind, %key, "Deleted pod was not cached");
                }
            }
        }
    }
}

/// Spawns the background task that keeps the cache in sync with the cluster.
///
/// The task runs for the lifetime of the process. If the event stream ever
/// ends it resubscribes after [`RETRY_DELAY`].
pub fn spawn_event_subscriber(
    client: Arc<dyn ClusterClient>,
    subscriber: EventSubscriber,
    params: WatchParams,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            namespace = params.namespace.as_deref().unwrap_or("<all>"),
            field_selector = params.field_selector.as_deref().unwrap_or("<none>"),
            node = subscriber.filter.node_name().unwrap_or("<all>"),
            resync_secs = params.resync_period.as_secs(),
            "Starting pod event subscriber"
        );

        loop {
            let mut events = client.list_and_watch(params.clone());
            while let Some(event) = events.next().await {
                subscriber.handle(event);
            }

            warn!(
                "Pod event stream ended, resubscribing in {}s",
                RETRY_DELAY.as_secs()
            );
            tokio::time::sleep(RETRY_DELAY).await;
        }
    })
}
