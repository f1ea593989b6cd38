//! Request and Response models for the cache HTTP API

pub mod requests;
pub mod responses;

pub use requests::SetRequest;
pub use responses::{ErrorResponse, GetResponse, HealthResponse, WriteResponse};
