//! Shared test helpers: an in-memory cluster client.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use pod_tracker::client::{ClientError, ClusterClient, WatchParams};
use pod_tracker::{PodEvent, PodKey, PodRecord};
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Cluster client whose watch stream is fed by the test and whose lookups
/// are answered from an in-memory map.
pub struct FakeClusterClient {
    pods: Mutex<HashMap<PodKey, Arc<PodRecord>>>,
    events: Mutex<Option<mpsc::UnboundedReceiver<PodEvent>>>,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    watches: AtomicUsize,
    lookups: AtomicUsize,
}

impl FakeClusterClient {
    /// Returns the client and the sender feeding its first watch stream.
    pub fn new() -> (Arc<Self>, mpsc::UnboundedSender<PodEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = Self {
            pods: Mutex::new(HashMap::new()),
            events: Mutex::new(Some(rx)),
            gate: Mutex::new(None),
            watches: AtomicUsize::new(0),
            lookups: AtomicUsize::new(0),
        };
        (Arc::new(client), tx)
    }

    /// Makes `pod` visible to point lookups.
    pub fn insert(&self, pod: PodRecord) {
        self.pods
            .lock()
            .unwrap()
            .insert(pod.key(), Arc::new(pod));
    }

    /// Blocks the next lookup until the returned sender fires.
    pub fn hold_next_lookup(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn watches(&self) -> usize {
        self.watches.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClusterClient for FakeClusterClient {
    fn list_and_watch(&self, _params: WatchParams) -> BoxStream<'static, PodEvent> {
        self.watches.fetch_add(1, Ordering::SeqCst);
        match self.events.lock().unwrap().take() {
            Some(rx) => UnboundedReceiverStream::new(rx).boxed(),
            None => stream::pending().boxed(),
        }
    }

    async fn get(&self, namespace: &str, name: &str) -> Result<Arc<PodRecord>, ClientError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let key = PodKey::new(namespace, name);
        let pod = self.pods.lock().unwrap().get(&key).cloned();
        pod.ok_or(ClientError::NotFound(key))
    }
}

pub fn pod(namespace: &str, name: &str, node: &str) -> PodRecord {
    PodRecord::new(namespace, name, node)
}

pub fn shared(pod: PodRecord) -> Arc<PodRecord> {
    Arc::new(pod)
}

/// Polls `condition` until it holds, panicking after a few seconds.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met in time");
}
