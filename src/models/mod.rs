//! Data models for the pod tracker
//!
//! This module defines the cached pod record, the change events applied to
//! the cache, and the DTOs serialized by the HTTP API.

pub mod event;
pub mod pod;
pub mod responses;

// Re-export commonly used types
pub use event::PodEvent;
pub use pod::{ContainerInfo, PodKey, PodRecord};
pub use responses::{ErrorResponse, HealthResponse, PodResponse, StatsResponse};
