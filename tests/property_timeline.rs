//! Property-based tests for timeline allocation
//!
//! Uses proptest to drive random sequences of allocations and check that the
//! timeline's invariants hold after every call.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use std::collections::HashSet;
use timeline_rs::{Block, ErrorKind, Range, Timeline, Timestamp};

fn base() -> Timestamp {
    Utc.with_ymd_and_hms(2014, 2, 11, 0, 0, 0).unwrap()
}

/// (window offset, window length, need, use fragments), all in seconds
fn op() -> impl Strategy<Value = (i64, i64, i64, bool)> {
    (-7200i64..36_000, 0i64..14_400, 1i64..7_200, any::<bool>())
}

fn window(offset: i64, len: i64) -> Range {
    let start = base() + Duration::seconds(offset);
    Range::new(start, start + Duration::seconds(len)).unwrap()
}

fn total(blocks: &[Block]) -> Duration {
    blocks.iter().fold(Duration::zero(), |acc, b| acc + b.capacity())
}

proptest! {
    #[test]
    fn prop_range_duration_matches_bounds(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
        let (lo, hi) = (a.min(b), a.max(b));
        let start = base() + Duration::seconds(lo);
        let end = base() + Duration::seconds(hi);

        let range = Range::new(start, end).unwrap();
        prop_assert_eq!(range.duration(), end - start);
        prop_assert!(range.duration() >= Duration::zero());

        if lo != hi {
            prop_assert!(Range::new(end, start).is_err());
        }
    }

    #[test]
    fn prop_timeline_stays_contiguous(
        spare_mins in 1i64..60,
        ops in prop::collection::vec(op(), 1..40)
    ) {
        let mut tl = Timeline::with_spare(Duration::minutes(spare_mins)).unwrap();

        for (offset, len, need_secs, fragments) in ops {
            let range = window(offset, len);
            let need = Duration::seconds(need_secs);

            let result = if fragments {
                tl.alloc_fragments(range, need).map(|_| ())
            } else {
                tl.alloc(range, need).map(|_| ())
            };
            if let Err(e) = result {
                prop_assert_eq!(e.kind(), ErrorKind::Busy, "unexpected error: {}", e);
            }

            prop_assert!(tl.validate().is_ok());
            let blocks: Vec<_> = tl.blocks().collect();
            for pair in blocks.windows(2) {
                prop_assert_eq!(pair[0].end(), pair[1].start());
            }
            if !tl.is_empty() {
                prop_assert!(tl.start() <= range.start() || range.is_empty());
                prop_assert!(tl.end() >= range.end() || range.is_empty());
            }
        }
    }

    #[test]
    fn prop_allocations_are_exact_and_disjoint(
        ops in prop::collection::vec(op(), 1..40)
    ) {
        let mut tl = Timeline::new();
        let mut allocated: Vec<Block> = Vec::new();

        for (offset, len, need_secs, fragments) in ops {
            let range = window(offset, len);
            let need = Duration::seconds(need_secs);

            if fragments {
                if let Ok(blocks) = tl.alloc_fragments(range, need) {
                    prop_assert_eq!(total(&blocks), need);
                    for pair in blocks.windows(2) {
                        prop_assert!(pair[0].end() <= pair[1].start());
                    }
                    allocated.extend(blocks);
                }
            } else if let Ok(block) = tl.alloc(range, need) {
                prop_assert_eq!(block.capacity(), need);
                allocated.push(block);
            }
        }

        // handed-out blocks never change and never overlap each other
        let mut ids = HashSet::new();
        for block in &allocated {
            prop_assert!(ids.insert(block.id()));
            prop_assert_eq!(tl.block(block.id()), Some(block));
            prop_assert!(block.is_retained());
        }
        let mut sorted = allocated.clone();
        sorted.sort_by_key(|b| b.start());
        for pair in sorted.windows(2) {
            prop_assert!(pair[0].end() <= pair[1].start());
        }
    }

    #[test]
    fn prop_buffer_follows_split_allocation(
        setup in prop::collection::vec(op(), 0..10),
        (offset, len, need_secs) in (-7200i64..36_000, 1i64..14_400, 1i64..7_200)
    ) {
        let mut tl = Timeline::new();
        for (o, l, n, _) in setup {
            let _ = tl.alloc(window(o, l), Duration::seconds(n));
        }

        let range = window(offset, len);
        let need = Duration::seconds(need_secs);
        let spare = tl.spare();

        // grow first so the free blocks we inspect are the ones alloc will see
        let _ = tl.alloc_fragments(range, Duration::seconds(1_000_000_000));
        let before: Vec<Block> = tl.blocks().copied().collect();

        if let Ok(block) = tl.alloc(range, need) {
            let source = before.iter().find(|b| b.start() == block.start() && !b.is_retained());
            prop_assert!(source.is_some());
            let source = source.unwrap();

            let after: Vec<&Block> = tl.blocks().skip_while(|b| b.id() != block.id()).collect();
            if source.capacity() > need {
                let padding = after[1];
                let wanted = spare - Duration::seconds(need_secs % spare.num_seconds());
                prop_assert!(padding.is_retained());
                prop_assert_eq!(padding.start(), block.end());
                prop_assert_eq!(padding.capacity(), wanted.min(source.capacity() - need));
            } else {
                prop_assert_eq!(block.end(), source.end());
            }
        }
    }

    #[test]
    fn prop_inner_window_does_not_grow(
        first in (0i64..3_600, 3_600i64..20_000),
        inner in (0i64..3_600, 0i64..3_600),
        need_secs in 1i64..3_600
    ) {
        let mut tl = Timeline::new();
        let outer = window(first.0, first.1);
        let _ = tl.alloc(outer, Duration::seconds(60));
        let (start, end) = (tl.start(), tl.end());

        let offset = first.0 + inner.0;
        let len = inner.1.min(first.1 - inner.0);
        let _ = tl.alloc(window(offset, len), Duration::seconds(need_secs));
        let _ = tl.alloc_fragments(window(offset, len), Duration::seconds(need_secs));

        prop_assert_eq!(tl.start(), start);
        prop_assert_eq!(tl.end(), end);
    }
}
