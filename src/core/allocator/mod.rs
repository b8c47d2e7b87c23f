//! Allocation strategies for a [`Timeline`](crate::timeline::Timeline)
//!
//! Two strategies share one buffer policy:
//! - [`contiguous`]: one block of exactly the requested length, earliest first fit
//! - [`fragments`]: several blocks that together add up to the request,
//!   all or nothing
//!
//! Every allocation is followed by retained padding that rounds the occupied
//! span up to the next multiple of the timeline's spare (see [`align`]).

pub mod align;
pub mod contiguous;
pub mod fragments;

use crate::error::{Result, TimelineError};
use chrono::Duration;

/// Reject requests for zero or negative time
pub(crate) fn ensure_positive_need(need: Duration) -> Result<()> {
    if need <= Duration::zero() {
        return Err(TimelineError::Precondition(format!(
            "requested duration must be positive, got {}",
            need
        )));
    }
    Ok(())
}
