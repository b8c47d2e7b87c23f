//! Multi-fragment allocation
//!
//! When no single free block can take a request, it can still be satisfied
//! by several smaller blocks. Fragment sizes come from the spare-aligned
//! capacity of each candidate, so every fragment keeps room for its buffer.
//! The request is checked against the total first; nothing is retained
//! unless all of it fits.

use super::ensure_positive_need;
use crate::block::{Block, BlockId};
use crate::error::{Result, TimelineError};
use crate::range::Range;
use crate::timeline::Timeline;
use chrono::Duration;
use tracing::{debug, error};

impl Timeline {
    /// Allocate `need` within `range` as one or more blocks, earliest first
    ///
    /// The returned blocks are in time order, never overlap, and their
    /// capacities add up to exactly `need`. Each fragment is followed by a
    /// retained buffer like a single [`alloc`](Timeline::alloc).
    ///
    /// # Errors
    ///
    /// - `Busy` if the aligned free capacity in `range` is less than `need`;
    ///   the timeline is left without new allocations
    /// - `Precondition` if `need` is not positive
    /// - `Invariant` if the planned capacity ran out before `need` was met
    pub fn alloc_fragments(&mut self, range: Range, need: Duration) -> Result<Vec<Block>> {
        ensure_positive_need(need)?;

        let plan = self.plan_fragments(&range);
        let total = plan
            .iter()
            .fold(Duration::zero(), |total, (_, usable)| total + *usable);
        if total < need {
            debug!(
                "No free time for {} within {} ({} usable in {} blocks)",
                need,
                range,
                total,
                plan.len()
            );
            return Err(TimelineError::Busy { range, need });
        }

        let mut blocks = Vec::with_capacity(plan.len());
        let mut remaining = need;
        for (id, usable) in plan {
            if remaining <= Duration::zero() {
                break;
            }
            let chunk = usable.min(remaining);
            if chunk <= Duration::zero() {
                continue;
            }
            blocks.push(self.retain(id, chunk)?);
            remaining = remaining - chunk;
        }

        if remaining > Duration::zero() {
            let msg = format!(
                "fragment plan for {} within {} came up {} short",
                need, range, remaining
            );
            error!("{}", msg);
            return Err(TimelineError::Invariant(msg));
        }

        debug!(
            "Allocated {} in {} fragments within {}",
            need,
            blocks.len(),
            range
        );
        debug_assert!(self.validate().is_ok());
        Ok(blocks)
    }

    /// Free candidates in `range` paired with their spare-aligned capacity
    ///
    /// Retaining from one candidate only splits that candidate, so the
    /// capacities stay accurate while the plan is carried out.
    fn plan_fragments(&mut self, range: &Range) -> Vec<(BlockId, Duration)> {
        self.free_view(range)
            .into_iter()
            .map(|id| (id, self.aligned_capacity_in_range(id, range)))
            .collect()
    }
}
