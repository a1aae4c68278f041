//! API Module
//!
//! HTTP handlers and routing for inspecting the tracker.
//!
//! # Endpoints
//! - `GET /pods/:namespace/:name` - Resolve pod metadata
//! - `GET /stats` - Cache and lookup statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
