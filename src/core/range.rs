//! Half-open time ranges
//!
//! A [`Range`] is the `[start, end)` window every timeline operation is
//! phrased in. Touching ranges (`a.end == b.start`) do not overlap.

use crate::error::{Result, TimelineError};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

/// A point on the timeline
pub type Timestamp = DateTime<Utc>;

/// Immutable half-open interval `[start, end)`
///
/// # Invariants
/// `start <= end` always holds; [`Range::new`] refuses anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    start: Timestamp,
    end: Timestamp,
}

impl Range {
    /// Create a range, failing with `InvalidRange` if `start > end`
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Duration, TimeZone, Utc};
    /// use timeline_rs::Range;
    ///
    /// let t = Utc.with_ymd_and_hms(2014, 2, 11, 0, 0, 0).unwrap();
    /// let r = Range::new(t, t + Duration::hours(24)).unwrap();
    /// assert_eq!(r.duration(), Duration::hours(24));
    ///
    /// assert!(Range::new(t + Duration::nanoseconds(1), t).is_err());
    /// ```
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        if start > end {
            return Err(TimelineError::InvalidRange { start, end });
        }
        Ok(Range { start, end })
    }

    /// Create a range starting at `start` and lasting `duration`
    pub fn starting_at(start: Timestamp, duration: Duration) -> Result<Self> {
        let end = start.checked_add_signed(duration).ok_or_else(|| {
            TimelineError::Precondition(format!("{} + {} overflows", start, duration))
        })?;
        Range::new(start, end)
    }

    /// Build a range whose ordering the caller already guarantees
    pub(crate) fn from_ordered(start: Timestamp, end: Timestamp) -> Self {
        debug_assert!(start <= end, "range {} .. {} is reversed", start, end);
        Range { start, end }
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if the two ranges share at least one instant
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// The shared part of two ranges, if they overlap
    pub fn intersection(&self, other: &Range) -> Option<Range> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Range {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// `duration mod unit`, exact for any duration chrono can represent
///
/// `unit` must be positive. The arithmetic runs on `i128` nanoseconds so
/// multi-century windows do not overflow.
pub(crate) fn duration_rem(duration: Duration, unit: Duration) -> Duration {
    let rem = total_nanos(duration) % total_nanos(unit);
    Duration::seconds((rem / NANOS_PER_SEC) as i64) + Duration::nanoseconds((rem % NANOS_PER_SEC) as i64)
}

const NANOS_PER_SEC: i128 = 1_000_000_000;

fn total_nanos(duration: Duration) -> i128 {
    duration.num_seconds() as i128 * NANOS_PER_SEC + duration.subsec_nanos() as i128
}
