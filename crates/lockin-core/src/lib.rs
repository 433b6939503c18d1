//! # Lock In Core Library
//!
//! Business logic for the Lock In focus timer. The `lockin` CLI is a thin
//! terminal layer over this crate.
//!
//! ## Architecture
//!
//! - **Controller**: the four-screen session state machine; the only owner of
//!   mutable UI state
//! - **Timer**: the one-second countdown and the hold-to-forfeit gesture, both
//!   driven by the caller (`tick()` / `sample()`), no internal threads
//! - **Streak**: completion-day history over an injected key-value store, and
//!   the 14-day grid
//! - **Coach**: short coaching lines from a remote text generator, with fixed
//!   fallbacks when it fails
//! - **Storage**: SQLite key-value store and TOML configuration
//!
//! ## Key Components
//!
//! - [`AppController`]: session state machine
//! - [`Countdown`], [`HoldGesture`]: timing primitives
//! - [`StreakRecorder`], [`StreakGrid`]: history
//! - [`Coach`]: fallback-applying coaching front
//! - [`Database`], [`Config`]: persistence

pub mod coach;
pub mod controller;
pub mod error;
pub mod events;
pub mod session;
pub mod storage;
pub mod streak;
pub mod timer;

pub use coach::{Coach, CoachPrompt, CoachProvider, CoachRequest, GeminiProvider, OfflineProvider};
pub use controller::{AppController, CoachMessage, ScreenState, Transition};
pub use error::{CoachError, ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use session::{DurationMinutes, Session};
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use streak::{GridCell, RecordOutcome, StreakGrid, StreakRecorder};
pub use timer::{Clock, Countdown, HoldGesture, HoldInput, ManualClock, SystemClock};
