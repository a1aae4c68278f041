//! Pod change notifications as delivered by a cluster watch.

use std::sync::Arc;

use super::pod::{PodKey, PodRecord};

/// One change notification for a pod.
///
/// `DeletedFinalStateUnknown` is a tombstone: the pod disappeared while the
/// watch was not looking, so only its identity survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodEvent {
    Added(Arc<PodRecord>),
    Updated {
        old: Arc<PodRecord>,
        new: Arc<PodRecord>,
    },
    Deleted(Arc<PodRecord>),
    DeletedFinalStateUnknown(PodKey),
}

impl PodEvent {
    /// Key of the pod this event refers to.
    pub fn key(&self) -> PodKey {
        match self {
            PodEvent::Added(pod) | PodEvent::Deleted(pod) => pod.key(),
            PodEvent::Updated { new, .. } => new.key(),
            PodEvent::DeletedFinalStateUnknown(key) => key.clone(),
        }
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PodEvent::Added(_) => "add",
            PodEvent::Updated { .. } => "update",
            PodEvent::Deleted(_) => "delete",
            PodEvent::DeletedFinalStateUnknown(_) => "delete_unknown",
        }
    }
}
