//! Single-block allocation (earliest first fit)
//!
//! Candidates are the free blocks overlapping the window, scanned in time
//! order. The first one whose overlap with the window is at least the
//! request wins, and the request is retained from that block's own start.
//! When the winning block begins before the window, the retained span does
//! too; the overlap check is what keeps the request honest, not clamping.

use super::ensure_positive_need;
use crate::block::Block;
use crate::error::{Result, TimelineError};
use crate::range::Range;
use crate::timeline::Timeline;
use chrono::Duration;
use tracing::debug;

impl Timeline {
    /// Allocate one contiguous block of exactly `need` within `range`
    ///
    /// The timeline grows to cover `range` if it extends past the current
    /// bounds. After the block a retained buffer of
    /// `spare - (need mod spare)` is inserted, capped to the free time left.
    ///
    /// # Errors
    ///
    /// - `Busy` if no single free block offers `need` inside `range`
    /// - `Precondition` if `need` is not positive
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Duration, TimeZone, Utc};
    /// use timeline_rs::{Range, Timeline};
    ///
    /// let t = Utc.with_ymd_and_hms(2014, 2, 11, 0, 0, 0).unwrap();
    /// let mut timeline = Timeline::new();
    ///
    /// let window = Range::new(t, t + Duration::hours(1)).unwrap();
    /// let first = timeline.alloc(window, Duration::minutes(1)).unwrap();
    /// let second = timeline.alloc(window, Duration::minutes(15)).unwrap();
    ///
    /// assert_eq!(first.start(), t);
    /// // 14 minutes of buffer follow the first booking
    /// assert_eq!(second.start(), t + Duration::minutes(15));
    /// ```
    pub fn alloc(&mut self, range: Range, need: Duration) -> Result<Block> {
        ensure_positive_need(need)?;

        let candidate = self
            .free_view(&range)
            .into_iter()
            .find(|&id| {
                self.block(id)
                    .is_some_and(|block| block.capacity_in_range(&range) >= need)
            });

        let Some(id) = candidate else {
            debug!("No free time for {} within {}", need, range);
            return Err(TimelineError::Busy { range, need });
        };

        let block = self.retain(id, need)?;
        debug!("Allocated {} for {} within {}", block.range(), need, range);
        debug_assert!(self.validate().is_ok());
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Timestamp;
    use chrono::{TimeZone, Utc};

    fn at(min: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2014, 2, 11, 0, 0, 0).unwrap() + Duration::minutes(min)
    }

    fn range(from: i64, to: i64) -> Range {
        Range::new(at(from), at(to)).unwrap()
    }

    #[test]
    fn test_alloc_sequence_inserts_buffers() {
        let mut tl = Timeline::new();

        let cases = [
            (range(0, 60), 1, range(0, 1)),
            (range(0, 60), 15, range(15, 30)),
            (range(0, 60), 2, range(45, 47)),
        ];
        for (window, minutes, expect) in cases {
            let block = tl.alloc(window, Duration::minutes(minutes)).unwrap();
            assert_eq!(block.capacity(), Duration::minutes(minutes));
            assert_eq!(block.range(), expect);
            assert!(block.is_retained());
        }

        // padding after the last booking consumed the rest of the hour
        assert!(tl.blocks().all(|b| b.is_retained()));
    }

    #[test]
    fn test_alloc_exact_fit_on_empty_timeline() {
        let mut tl = Timeline::new();
        let block = tl.alloc(range(0, 1), Duration::minutes(1)).unwrap();

        assert_eq!(block.range(), range(0, 1));
        assert_eq!(tl.len(), 1);
        assert!(tl.blocks().all(|b| b.is_retained()));
    }

    #[test]
    fn test_alloc_busy_when_window_too_small() {
        let mut tl = Timeline::new();
        let result = tl.alloc(range(0, 1), Duration::minutes(1) + Duration::nanoseconds(1));

        assert!(matches!(result, Err(TimelineError::Busy { .. })));
        // the window was still materialized
        assert_eq!(tl.len(), 1);
        assert!(!tl.blocks().next().unwrap().is_retained());
    }

    #[test]
    fn test_alloc_rejects_non_positive_need() {
        let mut tl = Timeline::new();
        let result = tl.alloc(range(0, 60), Duration::zero());

        assert!(matches!(result, Err(TimelineError::Precondition(_))));
        assert!(tl.is_empty());
    }

    #[test]
    fn test_alloc_starts_at_block_start_even_before_window() {
        let mut tl = Timeline::new();
        tl.alloc(range(0, 120), Duration::minutes(1)).unwrap();

        // free block is [15, 120); the window begins later, but the
        // allocation is taken from the free block's own start
        let block = tl.alloc(range(30, 120), Duration::minutes(30)).unwrap();
        assert_eq!(block.range(), range(15, 45));
    }

    #[test]
    fn test_alloc_skips_blocks_without_enough_overlap() {
        let mut tl = Timeline::new();
        // [0,5) booked, [5,15) padding, [15,60) free
        tl.alloc(range(0, 60), Duration::minutes(5)).unwrap();
        // [15,55) booked, [55,60) padding
        tl.alloc(range(0, 60), Duration::minutes(40)).unwrap();

        let block = tl.alloc(range(0, 90), Duration::minutes(20)).unwrap();
        assert_eq!(block.range(), range(60, 80));
    }
}
