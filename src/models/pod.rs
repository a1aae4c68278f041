//! Pod Metadata Model
//!
//! Defines the cached pod record and the composite key it is indexed by.

use std::collections::BTreeMap;
use std::fmt;

use k8s_openapi::api::core::v1::Pod;
use serde::Serialize;

// == Pod Key ==
/// Identity of a pod within one cluster: `(namespace, name)`.
///
/// This is the only index of the cache. It renders as `namespace_name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PodKey {
    pub namespace: String,
    pub name: String,
}

impl PodKey {
    /// Creates a key from a namespace and pod name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Builds the key for a raw API object.
    ///
    /// Returns None when the object carries no name, which no valid pod does.
    pub fn from_pod(pod: &Pod) -> Option<Self> {
        let name = pod.metadata.name.clone()?;
        let namespace = pod.metadata.namespace.clone().unwrap_or_default();
        Some(Self { namespace, name })
    }
}

impl fmt::Display for PodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.namespace, self.name)
    }
}

// == Container Info ==
/// Name and image of one container in the pod spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    pub name: String,
    pub image: Option<String>,
}

// == Pod Record ==
/// Descriptive metadata for a single pod, as held in the cache.
///
/// An empty `node_name` means the pod has not been scheduled yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PodRecord {
    pub namespace: String,
    pub name: String,
    pub uid: String,
    pub node_name: String,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub phase: Option<String>,
    pub pod_ip: Option<String>,
    pub host_ip: Option<String>,
    pub resource_version: Option<String>,
    pub containers: Vec<ContainerInfo>,
}

impl PodRecord {
    // == Constructor ==
    /// Creates a minimal record with identity and node assignment only.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        node_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            node_name: node_name.into(),
            ..Self::default()
        }
    }

    /// Returns the cache key of this record.
    pub fn key(&self) -> PodKey {
        PodKey::new(self.namespace.clone(), self.name.clone())
    }

    /// Returns true if the pod has been assigned to a node.
    pub fn is_scheduled(&self) -> bool {
        !self.node_name.is_empty()
    }
}

impl From<&Pod> for PodRecord {
    fn from(pod: &Pod) -> Self {
        let meta = &pod.metadata;
        let spec = pod.spec.as_ref();
        let status = pod.status.as_ref();

        Self {
            namespace: meta.namespace.clone().unwrap_or_default(),
            name: meta.name.clone().unwrap_or_default(),
            uid: meta.uid.clone().unwrap_or_default(),
            node_name: spec
                .and_then(|spec| spec.node_name.clone())
                .unwrap_or_default(),
            labels: meta.labels.clone().unwrap_or_default(),
            annotations: meta.annotations.clone().unwrap_or_default(),
            phase: status.and_then(|status| status.phase.clone()),
            pod_ip: status.and_then(|status| status.pod_ip.clone()),
            host_ip: status.and_then(|status| status.host_ip.clone()),
            resource_version: meta.resource_version.clone(),
            containers: spec
                .map(|spec| {
                    spec.containers
                        .iter()
                        .map(|container| ContainerInfo {
                            name: container.name.clone(),
                            image: container.image.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}
