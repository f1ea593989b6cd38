//! API Module
//!
//! HTTP handlers and routing for the cache REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a JSON value under a key
//! - `GET /get/:key` - Retrieve a fresh value by key
//! - `DELETE /del/:key` - Delete a key
//! - `DELETE /flush` - Delete every key
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
