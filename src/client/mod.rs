//! Cluster Client Module
//!
//! The seam between the tracker and the orchestrator: a list+watch event
//! stream for pods and a point lookup by namespace and name.

pub mod informer;
pub mod kubernetes;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::models::{PodEvent, PodKey, PodRecord};

pub use kubernetes::KubeClusterClient;
pub use informer::Informer;

// == Public Constants ==
/// How often the full pod list is replayed to mask missed notifications
pub const DEFAULT_RESYNC_PERIOD: Duration = Duration::from_secs(30 * 60);

// == Watch Params ==
/// Scope and cadence of a list+watch subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchParams {
    /// Namespace to watch; None watches all namespaces
    pub namespace: Option<String>,
    /// Server-side field selector, e.g. `spec.nodeName=node-a`
    pub field_selector: Option<String>,
    /// Interval between full resyncs
    pub resync_period: Duration,
}

impl Default for WatchParams {
    fn default() -> Self {
        Self {
            namespace: None,
            field_selector: None,
            resync_period: DEFAULT_RESYNC_PERIOD,
        }
    }
}

// == Client Error ==
/// Failure of a point lookup.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("pod {0} does not exist")]
    NotFound(PodKey),

    #[error("Kubernetes API request failed: {0}")]
    Api(#[from] kube::Error),
}

// == Cluster Client ==
/// Read-only access to pod state in the cluster.
#[async_trait]
pub trait ClusterClient: Send + Sync + 'static {
    /// Starts a subscription: an initial listing delivered as events,
    /// followed by incremental changes and periodic resyncs.
    ///
    /// Events for the same pod are yielded in delivery order. The stream is
    /// not expected to end; callers resubscribe if it does.
    fn list_and_watch(&self, params: WatchParams) -> BoxStream<'static, PodEvent>;

    /// Looks up a single pod.
    async fn get(&self, namespace: &str, name: &str) -> Result<Arc<PodRecord>, ClientError>;
}
