//! Hold-to-forfeit gesture.
//!
//! Giving up requires holding a control for an unpredictable stretch of time.
//! Each press samples a fresh target between 10s and 40s, weighted toward the
//! long end, and the owner samples progress once per frame. Releasing early
//! throws the attempt away.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::clock::Clock;

pub const MIN_HOLD_MS: u64 = 10_000;
pub const MAX_HOLD_MS: u64 = 40_000;

/// Map `u` in [0,1) to a hold target: `(40 - 30u²)` seconds.
///
/// Squaring keeps most draws small, so most targets land near 40s.
pub fn skewed_hold_duration_ms(u: f64) -> u64 {
    let u = u.clamp(0.0, 1.0);
    let skewed = u * u;
    let seconds = 40.0 - 30.0 * skewed;
    (seconds * 1000.0).round() as u64
}

/// Draws hold targets from a random source.
pub struct HoldDurationSampler {
    rng: Box<dyn RngCore + Send>,
}

impl HoldDurationSampler {
    pub fn new<R: RngCore + Send + 'static>(rng: R) -> Self {
        Self { rng: Box::new(rng) }
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn sample(&mut self) -> u64 {
        let u: f64 = self.rng.gen();
        skewed_hold_duration_ms(u)
    }
}

impl Default for HoldDurationSampler {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl std::fmt::Debug for HoldDurationSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoldDurationSampler").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldProgress {
    pub is_holding: bool,
    /// 0.0 ..= 100.0
    pub progress: f64,
    pub target_duration_ms: u64,
}

impl Default for HoldProgress {
    fn default() -> Self {
        Self {
            is_holding: false,
            progress: 0.0,
            target_duration_ms: MIN_HOLD_MS,
        }
    }
}

/// Raw input from whatever surface hosts the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldInput {
    Press,
    PointerUp,
    PointerLeave,
    TouchEnd,
    /// Long-press menus are swallowed so they cannot break a hold.
    ContextMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldEvent {
    Forfeit,
}

pub struct HoldGesture {
    clock: Arc<dyn Clock>,
    sampler: HoldDurationSampler,
    state: HoldProgress,
    started_at_ms: Option<u64>,
}

impl HoldGesture {
    pub fn new(clock: Arc<dyn Clock>, sampler: HoldDurationSampler) -> Self {
        Self {
            clock,
            sampler,
            state: HoldProgress::default(),
            started_at_ms: None,
        }
    }

    pub fn progress(&self) -> HoldProgress {
        self.state
    }

    pub fn is_holding(&self) -> bool {
        self.state.is_holding
    }

    pub fn handle(&mut self, input: HoldInput) {
        match input {
            HoldInput::Press => self.press(),
            HoldInput::PointerUp | HoldInput::PointerLeave | HoldInput::TouchEnd => self.release(),
            HoldInput::ContextMenu => {}
        }
    }

    /// Begin a hold with a freshly sampled target. Ignored mid-hold.
    pub fn press(&mut self) {
        if self.state.is_holding {
            return;
        }
        let target = self.sampler.sample();
        self.state = HoldProgress {
            is_holding: true,
            progress: 0.0,
            target_duration_ms: target,
        };
        self.started_at_ms = Some(self.clock.now_ms());
        tracing::debug!(target_ms = target, "hold started");
    }

    pub fn release(&mut self) {
        if self.state.is_holding {
            tracing::debug!(progress = self.state.progress, "hold released early");
        }
        self.reset();
    }

    /// Per-frame sample. Returns `Some(HoldEvent::Forfeit)` once, when the
    /// target is reached; the gesture is then back at rest.
    pub fn sample(&mut self) -> Option<HoldEvent> {
        let started = match (self.state.is_holding, self.started_at_ms) {
            (true, Some(started)) => started,
            _ => return None,
        };
        let elapsed = self.clock.now_ms().saturating_sub(started);
        let target = self.state.target_duration_ms.max(1);
        let progress = (elapsed as f64 / target as f64 * 100.0).min(100.0);
        self.state.progress = self.state.progress.max(progress);

        if self.state.progress >= 100.0 {
            self.reset();
            return Some(HoldEvent::Forfeit);
        }
        None
    }

    fn reset(&mut self) {
        self.state.is_holding = false;
        self.state.progress = 0.0;
        self.started_at_ms = None;
    }
}

impl std::fmt::Debug for HoldGesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoldGesture")
            .field("state", &self.state)
            .field("started_at_ms", &self.started_at_ms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualClock;
    use rand::rngs::mock::StepRng;

    fn gesture(clock: &ManualClock) -> HoldGesture {
        HoldGesture::new(Arc::new(clock.clone()), HoldDurationSampler::from_entropy())
    }

    #[test]
    fn skew_endpoints() {
        assert_eq!(skewed_hold_duration_ms(0.0), 40_000);
        assert_eq!(skewed_hold_duration_ms(0.5), 32_500);
        assert_eq!(skewed_hold_duration_ms(1.0), 10_000);
    }

    #[test]
    fn constant_rng_gives_constant_target() {
        // StepRng(0, 0) always yields zero, so u = 0 and the target is the max.
        let mut sampler = HoldDurationSampler::new(StepRng::new(0, 0));
        assert_eq!(sampler.sample(), MAX_HOLD_MS);
        assert_eq!(sampler.sample(), MAX_HOLD_MS);
    }

    #[test]
    fn early_release_resets_without_forfeit() {
        let clock = ManualClock::new();
        let mut g = gesture(&clock);
        g.press();
        let target = g.progress().target_duration_ms;
        clock.advance(target - 1);
        assert!(g.sample().is_none());
        assert!(g.progress().progress > 0.0);

        g.handle(HoldInput::PointerUp);
        assert!(!g.is_holding());
        assert_eq!(g.progress().progress, 0.0);
        clock.advance(target);
        assert!(g.sample().is_none());
    }

    #[test]
    fn full_hold_forfeits_once() {
        let clock = ManualClock::new();
        let mut g = gesture(&clock);
        g.handle(HoldInput::Press);
        clock.advance(MAX_HOLD_MS);
        assert_eq!(g.sample(), Some(HoldEvent::Forfeit));
        assert!(!g.is_holding());
        assert_eq!(g.progress().progress, 0.0);
        assert!(g.sample().is_none());
    }

    #[test]
    fn progress_is_monotonic_within_a_hold() {
        let clock = ManualClock::new();
        let mut g = gesture(&clock);
        g.press();
        let mut last = 0.0;
        for _ in 0..50 {
            clock.advance(16);
            assert!(g.sample().is_none());
            let p = g.progress().progress;
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn context_menu_does_not_interrupt() {
        let clock = ManualClock::new();
        let mut g = gesture(&clock);
        g.press();
        clock.advance(1_000);
        g.handle(HoldInput::ContextMenu);
        assert!(g.is_holding());
    }

    #[test]
    fn repress_mid_hold_keeps_first_start() {
        let clock = ManualClock::new();
        let mut g = gesture(&clock);
        g.press();
        let target = g.progress().target_duration_ms;
        clock.advance(target / 2);
        g.press();
        assert_eq!(g.progress().target_duration_ms, target);
        clock.advance(target - target / 2);
        assert_eq!(g.sample(), Some(HoldEvent::Forfeit));
    }

    #[test]
    fn new_hold_forgets_previous_elapsed_time() {
        let clock = ManualClock::new();
        let mut g = gesture(&clock);
        g.press();
        clock.advance(9_000);
        g.sample();
        g.handle(HoldInput::TouchEnd);

        g.press();
        clock.advance(1_000);
        assert!(g.sample().is_none());
        // 1s into a hold of at least 10s
        assert!(g.progress().progress <= 10.0);
    }
}
