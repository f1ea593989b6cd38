//! Envelope Module
//!
//! Wraps a cached value together with its TTL and creation time, and
//! decides when that value has gone stale.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::cache::Ttl;
use crate::error::{CacheError, Result};

// == Envelope ==
/// A cached value plus the metadata needed to expire it.
///
/// Serialized as `{"ttl": ..., "created": "<RFC 3339>", "object": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Freshness policy
    pub ttl: Ttl,
    /// When the value was stored (UTC)
    pub created: DateTime<Utc>,
    /// The cached value
    pub object: T,
}

impl<T> Envelope<T> {
    /// Creates a new envelope.
    pub fn new(object: T, ttl: Ttl, created: DateTime<Utc>) -> Self {
        Self {
            ttl,
            created,
            object,
        }
    }

    // == Is Stale ==
    /// Checks whether the envelope is stale at `now`.
    ///
    /// Boundary condition: an entry is stale only when strictly more than
    /// its TTL has elapsed. At exactly the TTL it is still fresh.
    ///
    /// # Returns
    /// - `false` for `Ttl::Never`
    /// - `true` if `now - created > ttl`
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        match self.ttl {
            Ttl::Never => false,
            Ttl::Seconds(seconds) => match self.ttl.as_time_delta() {
                Some(ttl) => now.signed_duration_since(self.created) > ttl,
                // Out of chrono's range: far past or far future
                None => seconds < 0.0,
            },
        }
    }

    /// Checks whether the envelope is stale right now.
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Utc::now())
    }
}

// == Envelope Codec ==
/// JSON codec for envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeCodec;

impl EnvelopeCodec {
    /// Creates a new codec.
    pub fn new() -> Self {
        Self
    }

    // == Encode ==
    /// Serializes `value` inside an envelope.
    ///
    /// # Errors
    /// `CacheError::Serialization` if `value` cannot be serialized.
    pub fn encode<T>(&self, value: &T, ttl: Ttl, created: DateTime<Utc>) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_vec(&Envelope::new(value, ttl, created)).map_err(CacheError::Serialization)
    }

    // == Decode ==
    /// Deserializes an envelope holding a `T`.
    ///
    /// # Errors
    /// `CacheError::Deserialization` if the bytes are not an envelope, the
    /// date cannot be parsed, or the object is not a `T`.
    pub fn decode<T>(&self, bytes: &[u8]) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(bytes).map_err(CacheError::Deserialization)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use serde_json::Value;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        age: u32,
        tags: Vec<String>,
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 30, 12, 0, 0).unwrap() + TimeDelta::nanoseconds(123_456_789)
    }

    fn sample_profile() -> Profile {
        Profile {
            name: "Ada".to_string(),
            age: 36,
            tags: vec!["math".to_string(), "engines".to_string()],
        }
    }

    #[test]
    fn test_encode_decode_struct() {
        let codec = EnvelopeCodec::new();
        let created = fixed_time();

        let bytes = codec.encode(&sample_profile(), Ttl::seconds(60), created).unwrap();
        let envelope: Envelope<Profile> = codec.decode(&bytes).unwrap();

        assert_eq!(envelope.object, sample_profile());
        assert_eq!(envelope.ttl, Ttl::seconds(60));
        assert_eq!(envelope.created, created);
    }

    #[test]
    fn test_encode_decode_never() {
        let codec = EnvelopeCodec::new();

        let bytes = codec.encode("value", Ttl::Never, fixed_time()).unwrap();
        let envelope: Envelope<String> = codec.decode(&bytes).unwrap();

        assert_eq!(envelope.ttl, Ttl::Never);
        assert_eq!(envelope.object, "value");
    }

    #[test]
    fn test_wire_shape() {
        let codec = EnvelopeCodec::new();

        let bytes = codec.encode(&42u32, Ttl::seconds(10), fixed_time()).unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["ttl"], 10);
        assert_eq!(json["object"], 42);
        let created = json["created"].as_str().unwrap();
        assert!(created.starts_with("2024-03-30T12:00:00.123456789"));
        assert!(created.ends_with('Z'));
    }

    #[test]
    fn test_decode_garbage() {
        let codec = EnvelopeCodec::new();

        let result = codec.decode::<String>(b"not json at all");
        assert!(matches!(result, Err(CacheError::Deserialization(_))));
    }

    #[test]
    fn test_decode_missing_fields() {
        let codec = EnvelopeCodec::new();

        let result = codec.decode::<String>(br#"{"ttl": 10, "object": "v"}"#);
        assert!(matches!(result, Err(CacheError::Deserialization(_))));
    }

    #[test]
    fn test_decode_bad_date() {
        let codec = EnvelopeCodec::new();

        let result =
            codec.decode::<String>(br#"{"ttl": 10, "created": "yesterday", "object": "v"}"#);
        assert!(matches!(result, Err(CacheError::Deserialization(_))));
    }

    #[test]
    fn test_decode_wrong_type() {
        let codec = EnvelopeCodec::new();

        let bytes = codec.encode(&sample_profile(), Ttl::Never, fixed_time()).unwrap();
        let result = codec.decode::<Vec<u8>>(&bytes);
        assert!(matches!(result, Err(CacheError::Deserialization(_))));
    }

    #[test]
    fn test_encode_unserializable() {
        let codec = EnvelopeCodec::new();

        // JSON object keys must be strings
        let mut map = HashMap::new();
        map.insert(vec![1u8, 2], "value");

        let result = codec.encode(&map, Ttl::Never, fixed_time());
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }

    #[test]
    fn test_staleness_boundary() {
        let created = fixed_time();
        let envelope = Envelope::new("v", Ttl::seconds(60), created);

        assert!(!envelope.is_stale_at(created));
        assert!(!envelope.is_stale_at(created + TimeDelta::seconds(60)));
        assert!(envelope.is_stale_at(created + TimeDelta::seconds(60) + TimeDelta::nanoseconds(1)));
    }

    #[test]
    fn test_decode_fractional_ttl() {
        let codec = EnvelopeCodec::new();

        let envelope = codec
            .decode::<String>(br#"{"ttl": 1.5, "created": "2024-03-30T12:00:00Z", "object": "v"}"#)
            .unwrap();

        assert_eq!(envelope.ttl, Ttl::Seconds(1.5));
        let boundary = envelope.created + TimeDelta::milliseconds(1_500);
        assert!(!envelope.is_stale_at(boundary));
        assert!(envelope.is_stale_at(boundary + TimeDelta::nanoseconds(1)));
    }

    #[test]
    fn test_zero_ttl_stale_after_any_time() {
        let created = fixed_time();
        let envelope = Envelope::new("v", Ttl::seconds(0), created);

        assert!(!envelope.is_stale_at(created));
        assert!(envelope.is_stale_at(created + TimeDelta::nanoseconds(1)));
    }

    #[test]
    fn test_negative_ttl_always_stale() {
        let created = fixed_time();
        let envelope = Envelope::new("v", Ttl::seconds(-1), created);

        assert!(envelope.is_stale_at(created));
    }

    #[test]
    fn test_never_is_never_stale() {
        let created = fixed_time();
        let envelope = Envelope::new("v", Ttl::Never, created);

        assert!(!envelope.is_stale_at(created + TimeDelta::days(365 * 100)));
        assert!(!envelope.is_stale());
    }

    #[test]
    fn test_out_of_range_ttl() {
        let created = fixed_time();

        let huge = Envelope::new("v", Ttl::Seconds(1e30), created);
        assert!(!huge.is_stale_at(created + TimeDelta::days(365 * 1000)));

        let tiny = Envelope::new("v", Ttl::Seconds(-1e30), created);
        assert!(tiny.is_stale_at(created));
    }
}
