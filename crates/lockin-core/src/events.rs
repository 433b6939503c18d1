use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::controller::ScreenState;
use crate::session::DurationMinutes;
use crate::streak::RecordOutcome;

/// Every state change in the controller produces an Event.
/// `lockin focus --events` writes them as JSON lines on stderr.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        intent: String,
        duration: DurationMinutes,
        at: DateTime<Utc>,
    },
    InterventionTriggered {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// User chose to stay; the countdown starts over.
    InterventionResolved {
        at: DateTime<Utc>,
    },
    /// Hold-to-forfeit completed.
    SessionForfeited {
        intent: String,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        intent: String,
        duration: DurationMinutes,
        history: RecordOutcome,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        screen: ScreenState,
        intent: String,
        duration: DurationMinutes,
        remaining_secs: Option<u64>,
        hold_progress: Option<f64>,
        message: String,
        loading: bool,
        generation: u64,
        at: DateTime<Utc>,
    },
}
