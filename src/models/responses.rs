//! Response DTOs for the tracker API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::models::PodRecord;
use crate::tracker::TrackerStats;

/// Response body for a pod lookup (GET /pods/:namespace/:name)
#[derive(Debug, Clone, Serialize)]
pub struct PodResponse {
    /// Cache key of the pod
    pub key: String,
    /// The resolved metadata
    pub pod: PodRecord,
}

impl PodResponse {
    /// Creates a new PodResponse
    pub fn new(pod: PodRecord) -> Self {
        Self {
            key: pod.key().to_string(),
            pod,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of LRU evictions
    pub evictions: u64,
    /// Number of entries removed by delete events
    pub removals: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Configured maximum number of entries
    pub max_entries: usize,
    /// Cluster lookups made on a cache miss
    pub fetches: u64,
    /// Cluster lookups that found nothing
    pub fetch_failures: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from tracker statistics
    pub fn new(stats: &TrackerStats, max_entries: usize) -> Self {
        Self {
            hits: stats.cache.hits,
            misses: stats.cache.misses,
            evictions: stats.cache.evictions,
            removals: stats.cache.removals,
            total_entries: stats.cache.total_entries,
            max_entries,
            fetches: stats.fetches,
            fetch_failures: stats.fetch_failures,
            hit_rate: stats.cache.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Whether the event subscriber has been started
    pub watching: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(watching: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            watching,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStats;

    #[test]
    fn test_pod_response_serialize() {
        let resp = PodResponse::new(PodRecord::new("shop", "web-0", "node-a"));
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["key"], "shop_web-0");
        assert_eq!(json["pod"]["node_name"], "node-a");
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = TrackerStats {
            cache: CacheStats {
                hits: 80,
                misses: 20,
                ..CacheStats::default()
            },
            fetches: 20,
            fetch_failures: 3,
        };
        let resp = StatsResponse::new(&stats, 100);

        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.fetch_failures, 3);
        assert_eq!(resp.max_entries, 100);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy(true);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
        assert!(json.contains("\"watching\":true"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("Something went wrong"));
    }
}
