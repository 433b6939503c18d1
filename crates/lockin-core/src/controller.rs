//! Session state machine.
//!
//! The controller owns every piece of mutable UI state (screen, session,
//! coaching message) and changes it only through the named transitions below.
//! It never awaits anything: transitions that want coaching copy hand back a
//! [`CoachRequest`], and whoever runs the request feeds the text back through
//! [`AppController::apply_message`].
//!
//! ## State Transitions
//!
//! ```text
//! Setup --start--> Focusing --countdown done--> Completed --new_session--> Setup
//!                    |  ^
//!             tempted|  |stay
//!                    v  |
//!                Intervention --hold completes--> Setup
//! ```
//!
//! Each transition bumps a generation counter. A coaching result is applied
//! only if it carries the current generation, so a slow reply for a screen the
//! user already left is dropped.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::coach::{CoachPrompt, CoachRequest};
use crate::events::Event;
use crate::session::{DurationMinutes, Session};
use crate::storage::KvStore;
use crate::streak::{local_today, RecordOutcome, StreakGrid, StreakRecorder};
use crate::timer::{
    Clock, Countdown, CountdownEvent, HoldDurationSampler, HoldEvent, HoldGesture, HoldInput,
    HoldProgress,
};

pub const STAY_MESSAGE: &str = "good choice. stay locked in.";
pub const FORFEIT_MESSAGE: &str = "resetting. try again when you're ready.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenState {
    Setup,
    Focusing,
    Intervention,
    Completed,
    /// Reserved. Declared alongside the others but no transition enters it.
    Shame,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachMessage {
    pub text: String,
    pub loading: bool,
}

/// Result of a successful transition.
#[derive(Debug, Clone)]
pub struct Transition {
    pub event: Event,
    /// Coaching copy to fetch for the new screen, if any.
    pub request: Option<CoachRequest>,
}

type Calendar = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

pub struct AppController {
    screen: ScreenState,
    session: Session,
    default_session: Session,
    message: CoachMessage,
    generation: u64,
    countdown: Option<Countdown>,
    hold: HoldGesture,
    store: Arc<dyn KvStore>,
    calendar: Calendar,
}

impl AppController {
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            screen: ScreenState::Setup,
            session: Session::default(),
            default_session: Session::default(),
            message: CoachMessage::default(),
            generation: 0,
            countdown: None,
            hold: HoldGesture::new(clock, HoldDurationSampler::from_entropy()),
            store,
            calendar: Arc::new(local_today),
        }
    }

    /// Replace the random source behind hold targets.
    pub fn with_sampler(mut self, clock: Arc<dyn Clock>, sampler: HoldDurationSampler) -> Self {
        self.hold = HoldGesture::new(clock, sampler);
        self
    }

    /// Replace the "what day is it" source used for streaks.
    pub fn with_calendar(mut self, calendar: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.calendar = Arc::new(calendar);
        self
    }

    /// Session that setup starts from, and returns to after a completed run.
    pub fn with_default_session(mut self, session: Session) -> Self {
        self.session = session.clone();
        self.default_session = session;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn screen(&self) -> ScreenState {
        self.screen
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn message(&self) -> &CoachMessage {
        &self.message
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    pub fn hold_progress(&self) -> HoldProgress {
        self.hold.progress()
    }

    pub fn today(&self) -> NaiveDate {
        (self.calendar)()
    }

    /// Fresh read of the persisted history.
    pub fn streak_grid(&self) -> StreakGrid {
        StreakGrid::load(self.store.as_ref(), self.today())
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            screen: self.screen,
            intent: self.session.intent.clone(),
            duration: self.session.duration,
            remaining_secs: self.countdown.as_ref().map(Countdown::remaining_secs),
            hold_progress: (self.screen == ScreenState::Intervention)
                .then(|| self.hold.progress().progress),
            message: self.message.text.clone(),
            loading: self.message.loading,
            generation: self.generation,
            at: Utc::now(),
        }
    }

    // ── Setup edits ──────────────────────────────────────────────────

    /// Returns false (and changes nothing) outside setup.
    pub fn set_intent(&mut self, intent: impl Into<String>) -> bool {
        if self.screen != ScreenState::Setup {
            return false;
        }
        self.session.intent = intent.into();
        true
    }

    /// Snaps to the range control's grid. `None` outside setup.
    pub fn set_duration(&mut self, minutes: u32) -> Option<DurationMinutes> {
        if self.screen != ScreenState::Setup {
            return None;
        }
        self.session.duration = DurationMinutes::snapped(minutes);
        Some(self.session.duration)
    }

    // ── Transitions ──────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Transition> {
        if self.screen != ScreenState::Setup {
            return None;
        }
        self.session.started_at = Some(Utc::now());
        self.enter(ScreenState::Focusing);
        self.countdown = Some(Countdown::new(self.session.duration));
        let request = self.request(CoachPrompt::Start {
            intent: self.session.intent.clone(),
            duration: self.session.duration,
        });
        Some(Transition {
            event: Event::SessionStarted {
                intent: self.session.intent.clone(),
                duration: self.session.duration,
                at: Utc::now(),
            },
            request: Some(request),
        })
    }

    /// One second of countdown. Completes the session when it runs out.
    pub fn tick(&mut self) -> Option<Transition> {
        if self.screen != ScreenState::Focusing {
            return None;
        }
        let event = self.countdown.as_mut()?.tick()?;
        match event {
            CountdownEvent::Completed => Some(self.complete()),
        }
    }

    pub fn tempted(&mut self) -> Option<Transition> {
        if self.screen != ScreenState::Focusing {
            return None;
        }
        let remaining_secs = self.teardown_countdown();
        self.enter(ScreenState::Intervention);
        self.hold.release();
        let request = self.request(CoachPrompt::Intervention {
            intent: self.session.intent.clone(),
        });
        Some(Transition {
            event: Event::InterventionTriggered {
                remaining_secs,
                at: Utc::now(),
            },
            request: Some(request),
        })
    }

    /// Back to focusing. The countdown starts over from the full duration.
    pub fn stay(&mut self) -> Option<Transition> {
        if self.screen != ScreenState::Intervention {
            return None;
        }
        self.hold.release();
        self.enter(ScreenState::Focusing);
        self.countdown = Some(Countdown::new(self.session.duration));
        self.show_local(STAY_MESSAGE);
        Some(Transition {
            event: Event::InterventionResolved { at: Utc::now() },
            request: None,
        })
    }

    /// Feed pointer/touch input to the forfeit control. Ignored outside the
    /// intervention screen.
    pub fn hold_input(&mut self, input: HoldInput) {
        if self.screen == ScreenState::Intervention {
            self.hold.handle(input);
        }
    }

    /// Per-frame hold sample. Forfeits the session when the hold completes.
    pub fn sample_hold(&mut self) -> Option<Transition> {
        if self.screen != ScreenState::Intervention {
            return None;
        }
        let event = self.hold.sample()?;
        match event {
            HoldEvent::Forfeit => Some(self.forfeit()),
        }
    }

    pub fn new_session(&mut self) -> Option<Transition> {
        if self.screen != ScreenState::Completed {
            return None;
        }
        self.enter(ScreenState::Setup);
        self.countdown = None;
        self.session = self.default_session.clone();
        self.message = CoachMessage::default();
        Some(Transition {
            event: Event::SessionReset { at: Utc::now() },
            request: None,
        })
    }

    /// Apply coaching text if it belongs to the current generation.
    /// Returns whether it was applied.
    pub fn apply_message(&mut self, generation: u64, text: impl Into<String>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "discarding coaching message for a screen already left"
            );
            return false;
        }
        self.message = CoachMessage {
            text: text.into(),
            loading: false,
        };
        true
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Transition {
        self.countdown = None;
        self.enter(ScreenState::Completed);
        let today = self.today();
        let history = StreakRecorder::new(self.store.as_ref()).record(today);
        if history == RecordOutcome::Failed {
            tracing::warn!("session completed but history was not saved");
        }
        let request = self.request(CoachPrompt::Completion {
            intent: self.session.intent.clone(),
        });
        Transition {
            event: Event::SessionCompleted {
                intent: self.session.intent.clone(),
                duration: self.session.duration,
                history,
                at: Utc::now(),
            },
            request: Some(request),
        }
    }

    fn forfeit(&mut self) -> Transition {
        self.hold.release();
        self.enter(ScreenState::Setup);
        self.countdown = None;
        self.show_local(FORFEIT_MESSAGE);
        Transition {
            event: Event::SessionForfeited {
                intent: self.session.intent.clone(),
                at: Utc::now(),
            },
            request: None,
        }
    }

    fn enter(&mut self, screen: ScreenState) {
        tracing::debug!(from = ?self.screen, to = ?screen, "transition");
        self.screen = screen;
        self.generation += 1;
    }

    fn teardown_countdown(&mut self) -> u64 {
        match self.countdown.take() {
            Some(mut countdown) => {
                countdown.cancel();
                countdown.remaining_secs()
            }
            None => 0,
        }
    }

    fn request(&mut self, prompt: CoachPrompt) -> CoachRequest {
        self.message.loading = true;
        CoachRequest {
            generation: self.generation,
            prompt,
        }
    }

    fn show_local(&mut self, text: &str) {
        self.message = CoachMessage {
            text: text.to_string(),
            loading: false,
        };
    }
}

impl std::fmt::Debug for AppController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppController")
            .field("screen", &self.screen)
            .field("session", &self.session)
            .field("message", &self.message)
            .field("generation", &self.generation)
            .field("countdown", &self.countdown)
            .field("hold", &self.hold)
            .finish_non_exhaustive()
    }
}
