//! Timeline block storage
//!
//! The timeline keeps its blocks in an arena (`Vec<Node>`) threaded by
//! `prev`/`next` handles, so splitting a block and splicing the remainder
//! after it never moves existing blocks or invalidates a [`BlockId`].
//!
//! # Invariants
//!
//! Walking from `head` along `next` yields blocks sorted by time with
//! `block[i].end == block[i + 1].start`. Free time is a block with
//! `retained == false`, never a gap.
//!
//! Blocks are never removed or merged. Growth prepends/appends free blocks,
//! retaining splits a free block in two.

use crate::block::{Block, BlockId};
use crate::error::{Result, TimelineError};
use crate::range::{duration_rem, Range, Timestamp};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, trace};

/// Default buffer unit inserted after every allocation (15 minutes)
pub const DEFAULT_SPARE_SECS: i64 = 15 * 60;

#[derive(Debug, Clone)]
struct Node {
    block: Block,
    prev: Option<BlockId>,
    next: Option<BlockId>,
}

/// A growable, contiguous sequence of free and retained blocks
#[derive(Debug, Clone)]
pub struct Timeline {
    /// Minimum buffer after each allocation, also the alignment unit
    pub(crate) spare: Duration,

    nodes: Vec<Node>,
    head: Option<BlockId>,
    tail: Option<BlockId>,
}

impl Timeline {
    /// Create an empty timeline with the default 15 minute spare
    pub fn new() -> Self {
        Timeline {
            spare: Duration::seconds(DEFAULT_SPARE_SECS),
            nodes: Vec::new(),
            head: None,
            tail: None,
        }
    }

    /// Create an empty timeline with a custom spare
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if `spare` is not positive.
    pub fn with_spare(spare: Duration) -> Result<Self> {
        if spare <= Duration::zero() {
            return Err(TimelineError::Precondition(format!(
                "spare must be positive, got {}",
                spare
            )));
        }

        let mut timeline = Timeline::new();
        timeline.spare = spare;
        Ok(timeline)
    }

    pub fn spare(&self) -> Duration {
        self.spare
    }

    /// Earliest covered instant, or the Unix epoch if nothing was ever allocated
    pub fn start(&self) -> Timestamp {
        match self.head {
            Some(id) => self.node(id).block.start,
            None => DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// End of the covered span (exclusive), or the Unix epoch when empty
    pub fn end(&self) -> Timestamp {
        match self.tail {
            Some(id) => self.node(id).block.end,
            None => DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// Number of blocks, free and retained
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Current state of a block
    ///
    /// A [`BlockId`] is an index into the timeline that issued it. Looking
    /// it up on any other timeline returns an unrelated block or `None`.
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.nodes.get(id.index()).map(|node| &node.block)
    }

    /// Blocks in time order
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks {
            timeline: self,
            cursor: self.head,
        }
    }

    fn node(&self, id: BlockId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: BlockId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    fn next_id(&self) -> BlockId {
        BlockId(self.nodes.len())
    }

    fn push_front(&mut self, range: Range) -> BlockId {
        let id = self.next_id();
        self.nodes.push(Node {
            block: Block::free(id, range),
            prev: None,
            next: self.head,
        });
        match self.head {
            Some(old) => self.node_mut(old).prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        id
    }

    fn push_back(&mut self, range: Range) -> BlockId {
        let id = self.next_id();
        self.nodes.push(Node {
            block: Block::free(id, range),
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(old) => self.node_mut(old).next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    fn insert_after(&mut self, after: BlockId, range: Range) -> BlockId {
        let id = self.next_id();
        let next = self.node(after).next;
        self.nodes.push(Node {
            block: Block::free(id, range),
            prev: Some(after),
            next,
        });
        self.node_mut(after).next = Some(id);
        match next {
            Some(n) => self.node_mut(n).prev = Some(id),
            None => self.tail = Some(id),
        }
        id
    }

    /// Prepend a free block so the timeline starts at `target`
    pub(crate) fn grow_start(&mut self, target: Timestamp) {
        let start = self.start();
        if target < start {
            let id = self.push_front(Range::from_ordered(target, start));
            debug!("Timeline grew backward to {} (block {:?})", target, id);
        }
    }

    /// Append a free block so the timeline ends at `target`
    pub(crate) fn grow_end(&mut self, target: Timestamp) {
        let end = self.end();
        if target > end {
            let id = self.push_back(Range::from_ordered(end, target));
            debug!("Timeline grew forward to {} (block {:?})", target, id);
        }
    }

    /// Free blocks overlapping `range`, in time order
    ///
    /// Grows the timeline to cover `range` first; an untouched timeline is
    /// materialized as a single free block equal to `range`. The returned
    /// handles are only meaningful until the timeline is next mutated by
    /// anything other than the allocation that asked for them.
    pub(crate) fn free_view(&mut self, range: &Range) -> Vec<BlockId> {
        if self.head.is_none() {
            if range.is_empty() {
                return Vec::new();
            }
            let id = self.push_back(*range);
            debug!("Timeline materialized as {} (block {:?})", range, id);
        }
        self.grow_start(range.start());
        self.grow_end(range.end());

        let mut view = Vec::new();
        for block in self.blocks() {
            if block.start >= range.end() {
                break;
            }
            if !block.retained && block.overlaps(range) {
                view.push(block.id);
            }
        }
        view
    }

    /// Retain `n` from the front of a free block
    ///
    /// Returns the free remainder spliced in after it, or `None` when `n`
    /// covered the whole block.
    pub(crate) fn retain_front(&mut self, id: BlockId, n: Duration) -> Result<Option<BlockId>> {
        let block = self.node(id).block;
        let split = block
            .start
            .checked_add_signed(n)
            .filter(|split| *split >= block.start && *split <= block.end)
            .ok_or_else(|| {
                let msg = format!("cannot retain {} from block {:?} ({})", n, id, block.range());
                error!("{}", msg);
                TimelineError::Invariant(msg)
            })?;

        if split == block.end {
            self.node_mut(id).block.retained = true;
            trace!("Retained whole block {:?} ({})", id, block.range());
            return Ok(None);
        }

        let remainder = self.insert_after(id, Range::from_ordered(split, block.end));
        let head = &mut self.node_mut(id).block;
        head.end = split;
        head.retained = true;
        trace!(
            "Split block {:?} at {}, free remainder {:?}",
            id,
            split,
            remainder
        );
        Ok(Some(remainder))
    }

    /// Retain `n` from the front of a free block and pad it with a buffer
    ///
    /// The padding is `spare - (n mod spare)` (a full spare when `n` is an
    /// exact multiple), capped to whatever free time trails the allocation.
    /// Returns the allocated block, whose capacity is exactly `n`.
    pub(crate) fn retain(&mut self, id: BlockId, n: Duration) -> Result<Block> {
        if let Some(remainder) = self.retain_front(id, n)? {
            let available = self.node(remainder).block.capacity();
            let padding = (self.spare - duration_rem(n, self.spare)).min(available);

            self.retain_front(remainder, padding)?;
            trace!("Padded block {:?} with {} of buffer", id, padding);
        }
        Ok(self.node(id).block)
    }

    /// Totals over the whole timeline
    pub fn stats(&self) -> TimelineStats {
        let mut stats = TimelineStats {
            block_count: 0,
            free_block_count: 0,
            retained: Duration::zero(),
            free: Duration::zero(),
            largest_free: Duration::zero(),
        };
        for block in self.blocks() {
            stats.block_count += 1;
            if block.retained {
                stats.retained = stats.retained + block.capacity();
            } else {
                stats.free_block_count += 1;
                stats.free = stats.free + block.capacity();
                stats.largest_free = stats.largest_free.max(block.capacity());
            }
        }
        stats
    }

    /// How scattered the free time is
    ///
    /// 0.0 means all free time is one block (or there is none); values
    /// approach 1.0 as free time splinters into many small blocks.
    pub fn fragmentation_score(&self) -> f64 {
        self.stats().fragmentation_score()
    }

    /// Check ordering, contiguity and link consistency of the block sequence
    pub fn validate(&self) -> Result<()> {
        let mut visited = 0usize;
        let mut prev: Option<&Block> = None;
        let mut prev_id: Option<BlockId> = None;
        let mut cursor = self.head;

        while let Some(id) = cursor {
            let node = self.nodes.get(id.index()).ok_or_else(|| {
                broken(format!("dangling handle {:?}", id))
            })?;
            let block = &node.block;

            if block.id != id {
                return Err(broken(format!("block {:?} stored under {:?}", block.id, id)));
            }
            if node.prev != prev_id {
                return Err(broken(format!("block {:?} has a stale prev link", id)));
            }
            if block.start > block.end {
                return Err(broken(format!("block {:?} is reversed", id)));
            }
            if let Some(p) = prev {
                if p.end != block.start {
                    return Err(broken(format!(
                        "gap or overlap between {:?} ({}) and {:?} ({})",
                        p.id,
                        p.range(),
                        id,
                        block.range()
                    )));
                }
            }

            visited += 1;
            if visited > self.nodes.len() {
                return Err(broken("cycle in block links".to_string()));
            }
            prev = Some(block);
            prev_id = Some(id);
            cursor = node.next;
        }

        if prev_id != self.tail {
            return Err(broken("tail does not match last block".to_string()));
        }
        if visited != self.nodes.len() {
            return Err(broken(format!(
                "{} blocks stored but {} reachable",
                self.nodes.len(),
                visited
            )));
        }
        Ok(())
    }
}

fn broken(msg: String) -> TimelineError {
    error!("Timeline invariant broken: {}", msg);
    TimelineError::Invariant(msg)
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a timeline's blocks in time order
pub struct Blocks<'a> {
    timeline: &'a Timeline,
    cursor: Option<BlockId>,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.timeline.node(self.cursor?);
        self.cursor = node.next;
        Some(&node.block)
    }
}

/// Totals over a timeline's blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineStats {
    pub block_count: usize,
    pub free_block_count: usize,
    /// Allocated time plus buffer padding
    pub retained: Duration,
    pub free: Duration,
    pub largest_free: Duration,
}

impl TimelineStats {
    pub fn fragmentation_score(&self) -> f64 {
        let (Some(free), Some(largest)) = (
            self.free.num_nanoseconds(),
            self.largest_free.num_nanoseconds(),
        ) else {
            return 0.0;
        };
        if free <= 0 {
            return 0.0;
        }
        1.0 - largest as f64 / free as f64
    }
}
