// Path: crates/ledger-client-core/src/model/timestamp.rs
//! `(seconds, nanos)` timestamps with nanosecond precision, normalized and
//! formatted in the Ledger's canonical `seconds.nanos` form.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// A nanosecond-precision timestamp. `nanos` is always normalized into
/// `[0, 1_000_000_000)` by [`Timestamp::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    /// Whole seconds since the Unix epoch.
    pub seconds: i64,
    /// Nanoseconds within the second, always in `[0, 1_000_000_000)`.
    pub nanos: i64,
}

impl Timestamp {
    /// Constructs a timestamp, normalizing `nanos` into `[0, 10^9)` and
    /// carrying the remainder into `seconds`.
    pub fn new(seconds: i64, nanos: i64) -> Self {
        let extra_seconds = nanos.div_euclid(NANOS_PER_SECOND);
        let normalized_nanos = nanos.rem_euclid(NANOS_PER_SECOND);
        Self {
            seconds: seconds + extra_seconds,
            nanos: normalized_nanos,
        }
    }

    /// Returns a timestamp strictly greater than `self` under lexicographic
    /// `(seconds, nanos)` ordering, incrementing nanos by one with carry
    /// into seconds. Used to advance pagination and subscription cursors.
    pub fn advance(self) -> Timestamp {
        Timestamp::new(self.seconds, self.nanos + 1)
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.seconds, self.nanos).cmp(&(other.seconds, other.nanos))
    }
}

impl fmt::Display for Timestamp {
    /// Dotted form `S.NNNNNNNNN`, nine-digit nanosecond padding, for REST.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

/// Error returned when a `S.NNNNNNNNN` timestamp string fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp: {0}")]
pub struct ParseTimestampError(pub String);

impl FromStr for Timestamp {
    type Err = ParseTimestampError;

    /// Splits at the dot; the nanosecond component is left-padded or
    /// right-truncated to exactly nine digits before parsing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sec_str, nanos_str) = s
            .split_once('.')
            .ok_or_else(|| ParseTimestampError(s.to_string()))?;
        let seconds: i64 = sec_str
            .parse()
            .map_err(|_| ParseTimestampError(s.to_string()))?;
        let mut digits = nanos_str.to_string();
        if digits.len() < 9 {
            digits.push_str(&"0".repeat(9 - digits.len()));
        } else {
            digits.truncate(9);
        }
        let nanos: i64 = digits
            .parse()
            .map_err(|_| ParseTimestampError(s.to_string()))?;
        Ok(Timestamp::new(seconds, nanos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_overflowing_nanos() {
        let ts = Timestamp::new(10, 1_000_000_005);
        assert_eq!(ts.seconds, 11);
        assert_eq!(ts.nanos, 5);
    }

    #[test]
    fn advance_carries_into_seconds() {
        let ts = Timestamp::new(5, 999_999_999);
        let next = ts.advance();
        assert_eq!(next, Timestamp::new(6, 0));
        assert!(next > ts);
    }

    #[test]
    fn parse_format_roundtrip_with_short_nanos() {
        let ts: Timestamp = "1700000000.42".parse().unwrap();
        assert_eq!(ts, Timestamp::new(1_700_000_000, 42));
        assert_eq!(ts.to_string(), "1700000000.000000042");
        let reparsed: Timestamp = ts.to_string().parse().unwrap();
        assert_eq!(reparsed, ts);
    }

    #[test]
    fn advance_is_always_strictly_greater() {
        for seconds in [-1i64, 0, 1, 1_700_000_000] {
            for nanos in [0i64, 1, 999_999_998, 999_999_999] {
                let ts = Timestamp::new(seconds, nanos);
                assert!(ts.advance() > ts);
            }
        }
    }
}
