//! API Module
//!
//! HTTP handlers and routing for the cache server.
//!
//! # Endpoints
//! - `PUT /set/:key?ttl=<secs>` - Store a value (raw body)
//! - `GET /get/:key` - Retrieve a value (raw body)
//! - `DELETE /del/:key` - Delete a key
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
