//! Error types for timeline allocation

use crate::range::{Range, Timestamp};
use chrono::Duration;
use thiserror::Error;

/// Coarse classification of a [`TimelineError`].
///
/// Callers usually only care about `Busy`, which is the one outcome worth
/// retrying with a different window or a split request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Not enough free time in the requested window
    Busy,
    /// The caller broke a contract (bad range, bad duration, bad config)
    Precondition,
    /// The allocator's own bookkeeping is inconsistent
    Invariant,
}

#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("No free time: need {need} within {range}")]
    Busy { range: Range, need: Duration },

    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: Timestamp, end: Timestamp },

    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("Timeline invariant broken: {0}")]
    Invariant(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl TimelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TimelineError::Busy { .. } => ErrorKind::Busy,
            TimelineError::Invariant(_) => ErrorKind::Invariant,
            TimelineError::InvalidRange { .. }
            | TimelineError::Precondition(_)
            | TimelineError::Config(_)
            | TimelineError::Io(_)
            | TimelineError::Toml(_)
            | TimelineError::Validation(_) => ErrorKind::Precondition,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.kind() == ErrorKind::Busy
    }
}

pub type Result<T> = std::result::Result<T, TimelineError>;
