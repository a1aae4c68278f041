//! [`ClusterClient`] backed by the Kubernetes API via `kube`.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use k8s_openapi::api::core::v1::Pod;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::runtime::{watcher, WatchStreamExt};
use kube::{Api, Client, Config};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

use super::{informer, ClientError, ClusterClient, WatchParams};
use crate::error::{Result, TrackerError};
use crate::models::{PodEvent, PodKey, PodRecord};

/// Buffered pod events between the watcher task and the subscriber
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Pod access through a shared `kube::Client`.
#[derive(Clone)]
pub struct KubeClusterClient {
    client: Client,
}

impl KubeClusterClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from a kubeconfig file, or infers the configuration
    /// (in-cluster service account, then the default kubeconfig) when no path
    /// is given.
    pub async fn from_kubeconfig(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let kubeconfig = Kubeconfig::read_from(path).map_err(|err| {
                    TrackerError::ClientConfig(format!(
                        "failed to read kubeconfig {}: {}",
                        path.display(),
                        err
                    ))
                })?;
                Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                    .await
                    .map_err(|err| TrackerError::ClientConfig(err.to_string()))?
            }
            None => Config::infer()
                .await
                .map_err(|err| TrackerError::ClientConfig(err.to_string()))?,
        };

        info!(cluster_url = %config.cluster_url, "Kubernetes client configured");

        let client =
            Client::try_from(config).map_err(|err| TrackerError::ClientConfig(err.to_string()))?;
        Ok(Self::new(client))
    }

    fn pods(&self, namespace: Option<&str>) -> Api<Pod> {
        match namespace {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::all(self.client.clone()),
        }
    }
}

#[async_trait]
impl ClusterClient for KubeClusterClient {
    /// Spawns the watcher on the current runtime; it stops once the returned
    /// stream is dropped.
    fn list_and_watch(&self, params: WatchParams) -> BoxStream<'static, PodEvent> {
        let mut config = watcher::Config::default();
        if let Some(selector) = params.field_selector.as_deref() {
            config = config.fields(selector);
        }

        let stream = watcher(self.pods(params.namespace.as_deref()), config).default_backoff();
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        tokio::spawn(informer::run(stream, tx, params.resync_period));

        ReceiverStream::new(rx).boxed()
    }

    async fn get(
        &self,
        namespace: &str,
        name: &str,
    ) -> std::result::Result<Arc<PodRecord>, ClientError> {
        match self.pods(Some(namespace)).get_opt(name).await? {
            Some(pod) => Ok(Arc::new(PodRecord::from(&pod))),
            None => Err(ClientError::NotFound(PodKey::new(namespace, name))),
        }
    }
}
