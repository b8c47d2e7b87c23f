//! Timeline allocation engine
//!
//! - [`range`]: half-open `[start, end)` windows
//! - [`block`]: free and retained spans of a timeline
//! - [`timeline`]: block storage, growth, splitting
//! - [`allocator`]: contiguous and fragmented allocation with buffer padding
//! - [`config`]: TOML configuration and the timeline builder
//! - [`error`]: error types

pub mod allocator;
pub mod block;
pub mod config;
pub mod error;
pub mod range;
pub mod timeline;
