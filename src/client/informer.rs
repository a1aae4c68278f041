//! Informer: turns raw watcher notifications into [`PodEvent`]s.
//!
//! The Kubernetes watch only reports the new state of an object and, after a
//! desync, re-lists everything. The informer remembers the last state of
//! every pod it has seen so it can report `Updated { old, new }`, detect pods
//! that vanished during a relist, and replay the full set on resync.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use k8s_openapi::api::core::v1::Pod;
use kube::runtime::watcher;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

use crate::models::{PodEvent, PodKey, PodRecord};

/// Last known state of every watched pod.
#[derive(Debug, Default)]
pub struct Informer {
    known: HashMap<PodKey, Arc<PodRecord>>,
    /// Keys seen since the current relist started
    relisted: Option<HashSet<PodKey>>,
}

impl Informer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pods currently known.
    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Applies one watcher notification and returns the resulting events.
    pub fn apply(&mut self, event: watcher::Event<Pod>) -> Vec<PodEvent> {
        match event {
            watcher::Event::Apply(pod) => self.upsert(&pod).into_iter().collect(),
            watcher::Event::Delete(pod) => self.delete(&pod).into_iter().collect(),
            watcher::Event::Init => {
                debug!(known = self.known.len(), "Pod relist started");
                self.relisted = Some(HashSet::new());
                Vec::new()
            }
            watcher::Event::InitApply(pod) => {
                let event = self.upsert(&pod);
                if let (Some(event), Some(seen)) = (&event, self.relisted.as_mut()) {
                    seen.insert(event.key());
                }
                event.into_iter().collect()
            }
            watcher::Event::InitDone => self.finish_relist(),
        }
    }

    /// Replays every known pod as an update with identical old and new state.
    pub fn resync(&self) -> Vec<PodEvent> {
        self.known
            .values()
            .map(|pod| PodEvent::Updated {
                old: Arc::clone(pod),
                new: Arc::clone(pod),
            })
            .collect()
    }

    fn upsert(&mut self, pod: &Pod) -> Option<PodEvent> {
        let Some(key) = PodKey::from_pod(pod) else {
            trace!("Dropping pod notification without a name");
            return None;
        };
        let new = Arc::new(PodRecord::from(pod));

        Some(match self.known.insert(key, Arc::clone(&new)) {
            Some(old) => PodEvent::Updated { old, new },
            None => PodEvent::Added(new),
        })
    }

    fn delete(&mut self, pod: &Pod) -> Option<PodEvent> {
        let Some(key) = PodKey::from_pod(pod) else {
            trace!("Dropping pod deletion without a name");
            return None;
        };
        self.known.remove(&key);
        Some(PodEvent::Deleted(Arc::new(PodRecord::from(pod))))
    }

    fn finish_relist(&mut self) -> Vec<PodEvent> {
        let Some(seen) = self.relisted.take() else {
            return Vec::new();
        };

        let vanished: Vec<PodKey> = self
            .known
            .keys()
            .filter(|key| !seen.contains(*key))
            .cloned()
            .collect();

        debug!(
            listed = seen.len(),
            vanished = vanished.len(),
            "Pod relist finished"
        );

        vanished
            .into_iter()
            .map(|key| {
                self.known.remove(&key);
                PodEvent::DeletedFinalStateUnknown(key)
            })
            .collect()
    }
}

/// Feeds a watcher stream through an [`Informer`] and forwards the resulting
/// events to `tx`, interleaving a full resync every `resync_period`.
///
/// Returns when the watcher stream ends or the receiver is dropped.
pub async fn run<S>(stream: S, tx: mpsc::Sender<PodEvent>, resync_period: Duration)
where
    S: Stream<Item = watcher::Result<watcher::Event<Pod>>>,
{
    tokio::pin!(stream);
    let mut informer = Informer::new();

    let period = resync_period.max(Duration::from_secs(1));
    let mut resync = time::interval_at(Instant::now() + period, period);
    resync.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let events = tokio::select! {
            result = stream.next() => match result {
                Some(Ok(event)) => informer.apply(event),
                Some(Err(error)) => {
                    warn!(%error, "Pod watcher received an error, retrying");
                    continue;
                }
                None => {
                    warn!("Pod watcher stream ended");
                    return;
                }
            },
            _ = resync.tick() => {
                debug!(pods = informer.len(), "Resyncing pods");
                informer.resync()
            }
        };

        for event in events {
            if tx.send(event).await.is_err() {
                debug!("Pod event receiver dropped, stopping watcher");
                return;
            }
        }
    }
}
