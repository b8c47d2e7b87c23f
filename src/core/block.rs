//! Timeline blocks
//!
//! A block is a contiguous span of a timeline that is either free or
//! retained. Blocks are addressed by [`BlockId`], a handle into the owning
//! timeline's arena; handles stay valid for the timeline's whole life since
//! blocks are only ever split, never removed.

use crate::range::{Range, Timestamp};
use chrono::Duration;
use serde::Serialize;

/// Handle of a block inside its timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BlockId(pub(crate) usize);

impl BlockId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// A contiguous span of the timeline, free or retained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Block {
    pub(crate) id: BlockId,
    pub(crate) start: Timestamp,
    pub(crate) end: Timestamp,
    pub(crate) retained: bool,
}

impl Block {
    pub(crate) fn free(id: BlockId, range: Range) -> Self {
        Block {
            id,
            start: range.start(),
            end: range.end(),
            retained: false,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn is_retained(&self) -> bool {
        self.retained
    }

    pub fn range(&self) -> Range {
        Range::from_ordered(self.start, self.end)
    }

    /// Length of the whole block
    pub fn capacity(&self) -> Duration {
        self.end - self.start
    }

    /// Length of the part of this block that falls inside `range`
    pub fn capacity_in_range(&self, range: &Range) -> Duration {
        self.range()
            .intersection(range)
            .map(|shared| shared.duration())
            .unwrap_or_else(Duration::zero)
    }

    pub fn overlaps(&self, range: &Range) -> bool {
        self.start < range.end() && self.end > range.start()
    }
}
