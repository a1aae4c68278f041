//! Trackability filter: which pods the event path is allowed to cache.

use crate::models::PodRecord;

/// Restricts caching to scheduled pods, optionally on a single node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackFilter {
    node_name: Option<String>,
}

impl TrackFilter {
    /// Creates a filter scoped to `node_name`. An empty name means no scoping.
    pub fn new(node_name: Option<String>) -> Self {
        Self {
            node_name: node_name.filter(|name| !name.is_empty()),
        }
    }

    /// Returns the node this filter is scoped to, if any.
    pub fn node_name(&self) -> Option<&str> {
        self.node_name.as_deref()
    }

    /// A pod is trackable when it is scheduled and, if a node is configured,
    /// scheduled on that node.
    pub fn can_track(&self, pod: &PodRecord) -> bool {
        if !pod.is_scheduled() {
            return false;
        }
        match &self.node_name {
            Some(node) => pod.node_name == *node,
            None => true,
        }
    }
}
