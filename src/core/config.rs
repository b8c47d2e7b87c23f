//! Timeline configuration
//!
//! Timelines can be configured in code through [`TimelineBuilder`] or loaded
//! from TOML:
//!
//! ```toml
//! # buffer after each booking, and the unit bookings are rounded up to
//! spare_secs = 600
//! ```

use crate::error::{Result, TimelineError};
use crate::timeline::{Timeline, DEFAULT_SPARE_SECS};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TimelineConfig {
    /// Minimum buffer after every allocation, in seconds
    #[serde(default = "default_spare_secs")]
    #[validate(range(min = 1))]
    pub spare_secs: i64,
}

fn default_spare_secs() -> i64 {
    DEFAULT_SPARE_SECS
}

impl Default for TimelineConfig {
    fn default() -> Self {
        TimelineConfig {
            spare_secs: DEFAULT_SPARE_SECS,
        }
    }
}

impl TimelineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: TimelineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("Loading timeline config from {:?}", path.as_ref());
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| TimelineError::Config(e.to_string()))
    }

    /// The configured spare as a duration
    pub fn spare(&self) -> Result<Duration> {
        Duration::try_seconds(self.spare_secs).ok_or_else(|| {
            TimelineError::Config(format!("spare_secs {} is out of range", self.spare_secs))
        })
    }
}

/// Builder for [`Timeline`]
///
/// # Examples
///
/// ```
/// use chrono::Duration;
/// use timeline_rs::TimelineBuilder;
///
/// let timeline = TimelineBuilder::new()
///     .spare(Duration::minutes(10))
///     .build()
///     .unwrap();
/// assert_eq!(timeline.spare(), Duration::minutes(10));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimelineBuilder {
    spare: Option<Duration>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        TimelineBuilder { spare: None }
    }

    /// Set the buffer unit (defaults to 15 minutes)
    pub fn spare(mut self, spare: Duration) -> Self {
        self.spare = Some(spare);
        self
    }

    /// Take settings from a loaded configuration
    pub fn config(mut self, config: &TimelineConfig) -> Result<Self> {
        config.validate()?;
        self.spare = Some(config.spare()?);
        Ok(self)
    }

    pub fn build(self) -> Result<Timeline> {
        let timeline = match self.spare {
            Some(spare) => Timeline::with_spare(spare)?,
            None => Timeline::new(),
        };
        info!("Created timeline with spare {}", timeline.spare());
        Ok(timeline)
    }
}

impl Timeline {
    /// Create an empty timeline from a configuration
    pub fn from_config(config: &TimelineConfig) -> Result<Self> {
        TimelineBuilder::new().config(config)?.build()
    }
}
