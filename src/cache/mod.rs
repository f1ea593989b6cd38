//! Cache Module
//!
//! Typed, TTL-aware caching on top of a byte store. Values are wrapped in an
//! envelope carrying their TTL and creation time, and expired or unreadable
//! entries are evicted when read.

mod codable;
mod envelope;
mod key;
mod ttl;


// Re-export public types
pub use codable::CodableCache;
pub use envelope::{Envelope, EnvelopeCodec};
pub use key::Keyable;
pub use ttl::{Ttl, DEFAULT_TTL_SECONDS};
