//! One-second-resolution countdown.
//!
//! Like the rest of the timer module this has no internal thread: the owner
//! calls `tick()` once per second of cadence. Completion is reported exactly
//! once, as the return value of the tick that reaches zero.
//!
//! ```text
//! Running --tick()--> ... --tick()--> Finished
//!    \--cancel()--> Cancelled
//! ```

use crate::session::DurationMinutes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    Completed,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    total_secs: u64,
    remaining_secs: u64,
    paused: bool,
    finished: bool,
    cancelled: bool,
}

impl Countdown {
    pub fn new(duration: DurationMinutes) -> Self {
        Self::with_pause(duration, false)
    }

    /// Nothing in the session flow pauses a countdown; the flag is honoured
    /// for callers that want to.
    pub fn with_pause(duration: DurationMinutes, paused: bool) -> Self {
        let total_secs = duration.total_secs();
        Self {
            total_secs,
            remaining_secs: total_secs,
            paused,
            finished: false,
            cancelled: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_active(&self) -> bool {
        !self.finished && !self.cancelled
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// 1.0 at start, 0.0 at completion.
    pub fn fraction(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        self.remaining_secs as f64 / self.total_secs as f64
    }

    /// `MM:SS`, zero-padded.
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> Option<CountdownEvent> {
        if !self.is_active() || self.paused {
            return None;
        }
        if self.remaining_secs <= 1 {
            self.remaining_secs = 0;
            self.finished = true;
            return Some(CountdownEvent::Completed);
        }
        self.remaining_secs -= 1;
        None
    }

    /// Stop for good. No completion will ever be reported.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(m: u32) -> DurationMinutes {
        DurationMinutes::new(m).unwrap()
    }

    #[test]
    fn starts_full() {
        let c = Countdown::new(minutes(25));
        assert_eq!(c.remaining_secs(), 1500);
        assert_eq!(c.display(), "25:00");
        assert_eq!(c.fraction(), 1.0);
    }

    #[test]
    fn long_sessions_show_three_digit_minutes() {
        assert_eq!(Countdown::new(minutes(120)).display(), "120:00");
    }

    #[test]
    fn completes_exactly_once() {
        let mut c = Countdown::new(minutes(5));
        let mut completions = 0;
        for _ in 0..(5 * 60 + 30) {
            if c.tick().is_some() {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(c.display(), "00:00");
        assert_eq!(c.fraction(), 0.0);
        assert!(c.is_finished());
    }

    #[test]
    fn completion_lands_on_the_last_second() {
        let mut c = Countdown::new(minutes(5));
        for _ in 0..299 {
            assert!(c.tick().is_none());
        }
        assert_eq!(c.display(), "00:01");
        assert_eq!(c.tick(), Some(CountdownEvent::Completed));
    }

    #[test]
    fn cancel_suppresses_completion() {
        let mut c = Countdown::new(minutes(5));
        c.tick();
        c.cancel();
        for _ in 0..400 {
            assert!(c.tick().is_none());
        }
        assert_eq!(c.remaining_secs(), 299);
        assert!(!c.is_finished());
    }

    #[test]
    fn paused_does_not_decrement() {
        let mut c = Countdown::with_pause(minutes(5), true);
        c.tick();
        assert_eq!(c.remaining_secs(), 300);
        c.set_paused(false);
        c.tick();
        assert_eq!(c.remaining_secs(), 299);
    }

    #[test]
    fn fraction_tracks_remaining() {
        let mut c = Countdown::new(minutes(10));
        for _ in 0..300 {
            c.tick();
        }
        assert!((c.fraction() - 0.5).abs() < f64::EPSILON);
        assert_eq!(c.display(), "05:00");
    }
}
