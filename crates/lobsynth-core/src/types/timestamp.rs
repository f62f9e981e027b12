//! Wall-clock timestamp attached to book snapshots.

use std::cmp::Ordering;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::constants::NS_PER_SEC;

/// Nanosecond-precision timestamp since Unix epoch.
///
/// Snapshots expose it in fractional seconds; the integer representation keeps
/// ordering exact.
///
/// # Example
///
/// ```rust
/// use std::time::{Duration, UNIX_EPOCH};
///
/// use lobsynth_core::types::Timestamp;
///
/// let ts = Timestamp::from(UNIX_EPOCH + Duration::from_millis(1_500));
/// assert_eq!(ts.as_secs_f64(), 1.5);
/// assert!(Timestamp::now() > ts);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Zero timestamp (Unix epoch)
    pub const EPOCH: Self = Self(0);

    /// Get the current wall-clock timestamp.
    /// A clock set before the epoch reads as `EPOCH`.
    #[inline]
    #[must_use]
    pub fn now() -> Self {
        SystemTime::now().into()
    }

    /// Get fractional seconds since epoch
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NS_PER_SEC as f64
    }
}

impl PartialOrd for Timestamp {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ns)", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

impl From<SystemTime> for Timestamp {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn from(time: SystemTime) -> Self {
        time.duration_since(UNIX_EPOCH)
            .map_or(Self::EPOCH, |d| Self(d.as_nanos() as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at_millis(millis: u64) -> Timestamp {
        Timestamp::from(UNIX_EPOCH + Duration::from_millis(millis))
    }

    #[test]
    fn test_from_system_time() {
        assert!((at_millis(1_250).as_secs_f64() - 1.25).abs() < 1e-12);
        assert_eq!(Timestamp::from(UNIX_EPOCH), Timestamp::EPOCH);
    }

    #[test]
    fn test_before_epoch_clamps() {
        let before = UNIX_EPOCH - Duration::from_secs(5);
        assert_eq!(Timestamp::from(before), Timestamp::EPOCH);
    }

    #[test]
    fn test_timestamp_ordering() {
        let t1 = at_millis(1);
        let t2 = at_millis(2);

        assert!(t2 > t1);
        assert_eq!(t1.max(t2), t2);
    }

    #[test]
    fn test_timestamp_now_is_after_epoch() {
        assert!(Timestamp::now() > Timestamp::EPOCH);
    }

    #[test]
    fn test_display_in_seconds() {
        assert_eq!(at_millis(1_500).to_string(), "1.500s");
    }
}
