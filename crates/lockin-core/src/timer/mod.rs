mod clock;
mod countdown;
mod hold;

pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::{Countdown, CountdownEvent};
pub use hold::{
    skewed_hold_duration_ms, HoldDurationSampler, HoldEvent, HoldGesture, HoldInput,
    HoldProgress, MAX_HOLD_MS, MIN_HOLD_MS,
};
