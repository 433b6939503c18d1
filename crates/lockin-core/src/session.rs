//! Session parameters: what the user is avoiding and for how long.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_INTENT: &str = "Quit Instagram";

/// Focus length in minutes, always a multiple of [`DurationMinutes::STEP`]
/// within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DurationMinutes(u32);

impl DurationMinutes {
    pub const MIN: u32 = 5;
    pub const MAX: u32 = 120;
    pub const STEP: u32 = 5;
    pub const DEFAULT: DurationMinutes = DurationMinutes(45);

    /// Strict constructor; rejects anything the range control could not produce.
    pub fn new(minutes: u32) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&minutes) && minutes % Self::STEP == 0 {
            Ok(Self(minutes))
        } else {
            Err(ValidationError::InvalidDuration {
                minutes,
                min: Self::MIN,
                max: Self::MAX,
                step: Self::STEP,
            })
        }
    }

    /// Snap to the nearest step, then clamp into range.
    pub fn snapped(minutes: u32) -> Self {
        let rounded = (minutes.saturating_add(Self::STEP / 2) / Self::STEP) * Self::STEP;
        Self(rounded.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn total_secs(self) -> u64 {
        u64::from(self.0) * 60
    }

    /// Every value the range control offers, ascending.
    pub fn all() -> impl Iterator<Item = DurationMinutes> {
        (Self::MIN..=Self::MAX).step_by(Self::STEP as usize).map(DurationMinutes)
    }
}

impl Default for DurationMinutes {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for DurationMinutes {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DurationMinutes> for u32 {
    fn from(value: DurationMinutes) -> Self {
        value.0
    }
}

impl fmt::Display for DurationMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

/// One focus run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub intent: String,
    pub duration: DurationMinutes,
    /// Set when the session starts; informational only.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(intent: impl Into<String>, duration: DurationMinutes) -> Self {
        Self {
            intent: intent.into(),
            duration,
            started_at: None,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_INTENT, DurationMinutes::DEFAULT)
    }
}
