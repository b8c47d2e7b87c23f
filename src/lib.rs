//! # Timeline - Growable Time-Interval Allocator
//!
//! `timeline-rs` answers one question repeatedly: "can I carve out a block of
//! duration N within window W, and if so, where?" It works like a memory
//! allocator over time:
//!
//! - The **timeline** is a contiguous sequence of blocks, each free or retained
//! - It **grows automatically** backward and forward to cover any requested window
//! - **Allocations** take free time earliest-first, splitting blocks as needed
//! - Every allocation is followed by a **buffer** that rounds the occupied
//!   span up to a multiple of the configured spare (15 minutes by default),
//!   so bookings are never back to back
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use timeline_rs::{Range, Result, Timeline};
//!
//! # fn main() -> Result<()> {
//! let mut timeline = Timeline::new();
//! let nine = Utc.with_ymd_and_hms(2014, 2, 11, 9, 0, 0).unwrap();
//! let morning = Range::new(nine, nine + Duration::hours(3))?;
//!
//! // One contiguous hour
//! let meeting = timeline.alloc(morning, Duration::hours(1))?;
//! assert_eq!(meeting.start(), nine);
//!
//! // 40 minutes, split across free time if needed
//! let parts = timeline.alloc_fragments(morning, Duration::minutes(40))?;
//! assert!(parts.iter().all(|b| b.start() >= meeting.end()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use timeline_rs::{Result, TimelineBuilder, TimelineConfig};
//!
//! # fn main() -> Result<()> {
//! let config = TimelineConfig::from_toml_str("spare_secs = 300")?;
//! let timeline = TimelineBuilder::new().config(&config)?.build()?;
//! assert_eq!(timeline.spare().num_minutes(), 5);
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Allocation failures come back as [`TimelineError`]. [`ErrorKind`] sorts
//! them into the three cases callers handle differently:
//!
//! - `Busy`: not enough free time; retry with another window or split the request
//! - `Precondition`: the caller passed a reversed range, a non-positive
//!   duration, or a bad configuration
//! - `Invariant`: the allocator's own bookkeeping is wrong; a bug, not a retry
//!
//! A [`Timeline`] is a plain mutable value with no internal locking. Share
//! it across threads behind a mutex of your choice.

// Allocation engine
pub mod core;

// Re-export core modules internally so crate:: paths in core still work
#[allow(unused_imports)]
pub(crate) use self::core::{allocator, block, config, error, range, timeline};

pub use crate::core::{
    block::{Block, BlockId},
    config::{TimelineBuilder, TimelineConfig},
    error::{ErrorKind, Result, TimelineError},
    range::{Range, Timestamp},
    timeline::{Blocks, Timeline, TimelineStats, DEFAULT_SPARE_SECS},
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
