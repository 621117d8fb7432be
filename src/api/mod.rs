//! API Module
//!
//! HTTP handlers and routing for the coaching dashboard REST API.
//!
//! # Endpoints
//! - `/coaches`, `/clients`, `/alerts`, `/pricing` - Cached reads, invalidating writes
//! - `GET /cache/stats` - Cache counters
//! - `GET /cache/entries/:key` - Inspect one entry
//! - `POST /cache/clear-expired` - Sweep stale entries
//! - `POST /session/logout` - Drop the whole session cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
