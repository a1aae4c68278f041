//! Background Tasks Module
//!
//! Contains the long-lived tasks started by the tracker.
//!
//! # Tasks
//! - Event subscriber: applies pod watch events to the cache

mod subscriber;

pub use subscriber::{spawn_event_subscriber, EventSubscriber, UntrackPolicy, RETRY_DELAY};
