//! Pod Tracker - A node-scoped cache of Kubernetes pod metadata
//!
//! Keeps a bounded LRU cache of pods in sync with the cluster through a watch
//! subscription, and falls back to a direct lookup on a cache miss.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod tasks;
pub mod tracker;

pub use api::AppState;
pub use cache::BoundedCache;
pub use client::{ClusterClient, KubeClusterClient, WatchParams};
pub use config::Config;
pub use error::TrackerError;
pub use models::{PodEvent, PodKey, PodRecord};
pub use tracker::{Tracker, TrackerOptions};
