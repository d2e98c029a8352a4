//! API Module
//!
//! HTTP handlers and routing for the data layer REST API.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /cache/stats` - Cache statistics
//! - `POST /cache/invalidate` - Drop cached reads matching a pattern
//! - `POST /cache/cleanup` - Sweep expired entries
//! - `DELETE /cache` - Clear the cache
//! - `POST /sanitize` - Sanitize a JSON payload
//! - `POST /validate` - Validate data against a schema
//! - `GET|POST|PATCH|DELETE /collections/:name` - Row access through the cache

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
