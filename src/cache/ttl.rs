//! TTL Module
//!
//! Time-to-live policy attached to every cached value.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

// == Public Constants ==
/// Default TTL in seconds (one day)
pub const DEFAULT_TTL_SECONDS: i64 = 86_400;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

// == TTL ==
/// How long a cached value stays fresh.
///
/// Serialized as a number of seconds (whole or fractional), or the string
/// `"never"`. Negative durations are accepted as-is and produce entries that
/// are already stale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "TtlRepr", into = "TtlRepr")]
pub enum Ttl {
    /// Stale once more than this many seconds have passed since creation
    Seconds(f64),
    /// Never stale
    Never,
}

impl Ttl {
    pub fn seconds(seconds: i64) -> Self {
        Ttl::Seconds(seconds as f64)
    }

    pub fn minutes(minutes: i64) -> Self {
        Ttl::Seconds(minutes as f64 * 60.0)
    }

    pub fn hours(hours: i64) -> Self {
        Ttl::Seconds(hours as f64 * 3_600.0)
    }

    pub fn days(days: i64) -> Self {
        Ttl::Seconds(days as f64 * 86_400.0)
    }

    /// Returns the TTL as a time delta, to nanosecond precision.
    ///
    /// `None` for `Never`, and for durations chrono cannot hold.
    pub fn as_time_delta(&self) -> Option<TimeDelta> {
        match *self {
            Ttl::Seconds(seconds) if seconds.is_finite() => {
                let whole = seconds.trunc();
                if whole.abs() >= i64::MAX as f64 {
                    return None;
                }
                let nanos = (seconds.fract() * NANOS_PER_SECOND).round() as i64;
                TimeDelta::try_seconds(whole as i64)?.checked_add(&TimeDelta::nanoseconds(nanos))
            }
            Ttl::Seconds(_) | Ttl::Never => None,
        }
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Ttl::seconds(DEFAULT_TTL_SECONDS)
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::Seconds(seconds) => write!(f, "{}s", seconds),
            Ttl::Never => f.write_str("never"),
        }
    }
}

impl FromStr for Ttl {
    type Err = String;

    /// Parses `never` or a number of seconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("never") {
            return Ok(Ttl::Never);
        }
        s.parse::<f64>()
            .ok()
            .filter(|seconds| seconds.is_finite())
            .map(Ttl::Seconds)
            .ok_or_else(|| format!("invalid TTL '{}': expected seconds or 'never'", s))
    }
}

// == Wire Representation ==
// Whole seconds are written as integers so common TTLs read naturally.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TtlRepr {
    Whole(i64),
    Fractional(f64),
    Never(NeverTag),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NeverTag {
    Never,
}

impl From<TtlRepr> for Ttl {
    fn from(repr: TtlRepr) -> Self {
        match repr {
            TtlRepr::Whole(seconds) => Ttl::Seconds(seconds as f64),
            TtlRepr::Fractional(seconds) => Ttl::Seconds(seconds),
            TtlRepr::Never(NeverTag::Never) => Ttl::Never,
        }
    }
}

impl From<Ttl> for TtlRepr {
    fn from(ttl: Ttl) -> Self {
        match ttl {
            Ttl::Seconds(seconds)
                if seconds.fract() == 0.0 && seconds.abs() < (1u64 << 53) as f64 =>
            {
                TtlRepr::Whole(seconds as i64)
            }
            Ttl::Seconds(seconds) => TtlRepr::Fractional(seconds),
            Ttl::Never => TtlRepr::Never(NeverTag::Never),
        }
    }
}
