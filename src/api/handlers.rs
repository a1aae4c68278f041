//! API Handlers
//!
//! HTTP request handlers for the tracker introspection endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{Result, TrackerError};
use crate::models::{HealthResponse, PodKey, PodResponse, StatsResponse};
use crate::tracker::Tracker;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The shared pod tracker
    pub tracker: Arc<Tracker>,
}

impl AppState {
    /// Creates a new AppState around the given tracker.
    pub fn new(tracker: Arc<Tracker>) -> Self {
        Self { tracker }
    }
}

/// Handler for GET /pods/:namespace/:name
///
/// Resolves a pod through the tracker, which falls back to the cluster on a
/// cache miss.
pub async fn get_pod_handler(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
) -> Result<Json<PodResponse>> {
    match state.tracker.get(&namespace, &name).await {
        Some(pod) => Ok(Json(PodResponse::new((*pod).clone()))),
        None => Err(TrackerError::NotFound(
            PodKey::new(namespace, name).to_string(),
        )),
    }
}

/// Handler for GET /stats
///
/// Returns cache and fallback lookup statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.tracker.stats();
    let max_entries = state.tracker.cache().capacity();

    Json(StatsResponse::new(&stats, max_entries))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.tracker.is_watching()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, ClusterClient, WatchParams};
    use crate::models::{PodEvent, PodRecord};
    use async_trait::async_trait;
    use futures::stream::{self, BoxStream, StreamExt};

    /// Knows exactly one pod, `default/known`.
    struct SinglePodClient;

    #[async_trait]
    impl ClusterClient for SinglePodClient {
        fn list_and_watch(&self, _params: WatchParams) -> BoxStream<'static, PodEvent> {
            stream::empty().boxed()
        }

        async fn get(
            &self,
            namespace: &str,
            name: &str,
        ) -> std::result::Result<Arc<PodRecord>, ClientError> {
            if namespace == "default" && name == "known" {
                Ok(Arc::new(PodRecord::new(namespace, name, "node-a")))
            } else {
                Err(ClientError::NotFound(PodKey::new(namespace, name)))
            }
        }
    }

    fn state() -> AppState {
        let tracker = Tracker::new(Arc::new(SinglePodClient), None, 10).unwrap();
        AppState::new(Arc::new(tracker))
    }

    #[tokio::test]
    async fn test_get_pod_handler() {
        let state = state();

        let response = get_pod_handler(
            State(state.clone()),
            Path(("default".to_string(), "known".to_string())),
        )
        .await
        .unwrap();

        assert_eq!(response.key, "default_known");
        assert_eq!(response.pod.node_name, "node-a");
        assert_eq!(state.tracker.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_get_pod_handler_not_found() {
        let result = get_pod_handler(
            State(state()),
            Path(("default".to_string(), "unknown".to_string())),
        )
        .await;

        assert!(matches!(result, Err(TrackerError::NotFound(key)) if key == "default_unknown"));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let response = stats_handler(State(state())).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.max_entries, 10);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler(State(state())).await;
        assert_eq!(response.status, "healthy");
        assert!(!response.watching);
    }
}
