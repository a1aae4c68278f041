//! Configuration Module
//!
//! Handles loading the tracker configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_MAX_ENTRIES;
use crate::client::DEFAULT_RESYNC_PERIOD;
use crate::tasks::UntrackPolicy;
use crate::tracker::TrackerOptions;

/// Tracker and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of pods the cache can hold
    pub max_entries: usize,
    /// Node whose pods are tracked; None tracks every scheduled pod
    pub node_name: Option<String>,
    /// Kubeconfig file; None infers the configuration
    pub kubeconfig_path: Option<PathBuf>,
    /// Full resync interval in seconds
    pub resync_interval: u64,
    /// Namespace to watch; None watches all namespaces
    pub watch_namespace: Option<String>,
    /// Server-side field selector for the watch
    pub field_selector: Option<String>,
    /// Handling of pods that stop being trackable
    pub untrack_policy: UntrackPolicy,
    /// Filter fallback lookups the same way as watch events
    pub filter_fallback: bool,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cached pods (default: 1000)
    /// - `NODE_NAME` - Track only pods on this node (default: unset, all nodes)
    /// - `KUBECONFIG_PATH` - Kubeconfig file (default: unset, inferred)
    /// - `RESYNC_INTERVAL` - Full resync interval in seconds (default: 1800)
    /// - `WATCH_NAMESPACE` - Namespace to watch (default: unset, all)
    /// - `FIELD_SELECTOR` - Watch field selector (default: unset)
    /// - `UNTRACK_POLICY` - `evict` or `retain` (default: evict)
    /// - `FILTER_FALLBACK` - `true` or `false` (default: false)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    ///
    /// Values that fail to parse fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            node_name: string_var("NODE_NAME"),
            kubeconfig_path: string_var("KUBECONFIG_PATH").map(PathBuf::from),
            resync_interval: parse_var("RESYNC_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.resync_interval),
            watch_namespace: string_var("WATCH_NAMESPACE"),
            field_selector: string_var("FIELD_SELECTOR"),
            untrack_policy: parse_var("UNTRACK_POLICY").unwrap_or(defaults.untrack_policy),
            filter_fallback: parse_var("FILTER_FALLBACK").unwrap_or(defaults.filter_fallback),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Builds the tracker options described by this configuration.
    pub fn tracker_options(&self) -> TrackerOptions {
        TrackerOptions {
            node_name: self.node_name.clone(),
            max_entries: self.max_entries,
            untrack_policy: self.untrack_policy,
            filter_fallback: self.filter_fallback,
            resync_period: Duration::from_secs(self.resync_interval),
            watch_namespace: self.watch_namespace.clone(),
            field_selector: self.field_selector.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            node_name: None,
            kubeconfig_path: None,
            resync_interval: DEFAULT_RESYNC_PERIOD.as_secs(),
            watch_namespace: None,
            field_selector: None,
            untrack_policy: UntrackPolicy::default(),
            filter_fallback: false,
            server_port: 3000,
        }
    }
}

/// Reads a non-empty environment variable.
fn string_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    string_var(name).and_then(|value| value.trim().parse().ok())
}
