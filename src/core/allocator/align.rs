//! Spare-aligned capacity planning
//!
//! Before anything is retained, each candidate block is asked how much of its
//! overlap with the query window can actually be handed out once room for the
//! trailing buffer is set aside:
//!
//! - overlap is an exact multiple of spare: one full spare is held back
//! - otherwise: the overlap is usable as is, the leftover below one spare
//!   becomes the buffer when the block is retained
//!
//! This is only an estimate used for eligibility and fragment sizing.

use crate::block::BlockId;
use crate::range::{duration_rem, Range};
use crate::timeline::Timeline;
use chrono::Duration;

impl Timeline {
    /// Usable capacity of a block's overlap with `range` after reserving a buffer
    pub(crate) fn aligned_capacity_in_range(&self, id: BlockId, range: &Range) -> Duration {
        let Some(block) = self.block(id) else {
            return Duration::zero();
        };
        aligned_capacity(block.capacity_in_range(range), self.spare)
    }
}

/// `capacity` with a full `spare` held back when it divides evenly, never negative
pub(crate) fn aligned_capacity(capacity: Duration, spare: Duration) -> Duration {
    let usable = if duration_rem(capacity, spare) == Duration::zero() {
        capacity - spare
    } else {
        capacity
    };

    usable.max(Duration::zero())
}
