//! Interactive session loop.
//!
//! One task owns the controller. `select!` multiplexes the one-second
//! countdown tick, the hold-frame tick (only while holding), stdin lines and
//! coaching replies. Coaching fetches run as spawned tasks and come back
//! through a channel tagged with their generation.
//!
//! `status` on any screen prints the controller snapshot as JSON.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use lockin_core::timer::HoldInput;
use lockin_core::{
    AppController, Coach, Config, Database, KvStore, MemoryStore, ScreenState, SystemClock,
    Transition,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use crate::ui;

const FRAME: Duration = Duration::from_millis(16);

#[derive(Args)]
pub struct FocusArgs {
    /// What you are avoiding (defaults to config `session.default_intent`)
    #[arg(long)]
    intent: Option<String>,
    /// Session length in minutes; snapped to a multiple of 5 in 5..=120
    #[arg(long)]
    minutes: Option<u32>,
    /// Use built-in coaching messages only
    #[arg(long)]
    offline: bool,
    /// Write every state transition to stderr as a JSON line
    #[arg(long)]
    events: bool,
}

pub fn run(args: FocusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    let store: Arc<dyn KvStore> = match Database::open() {
        Ok(db) => Arc::new(db),
        Err(e) => {
            tracing::warn!(error = %e, "history database unavailable, streaks will not persist");
            Arc::new(MemoryStore::new())
        }
    };

    let coach = if args.offline {
        Coach::offline()
    } else {
        Coach::from_config(&config.coach)
    };

    let mut app = AppController::new(store, Arc::new(SystemClock::new()))
        .with_default_session(config.default_session());
    if let Some(intent) = args.intent {
        app.set_intent(intent);
    }
    if let Some(minutes) = args.minutes {
        app.set_duration(minutes);
    }

    super::runtime()?.block_on(session_loop(app, coach, args.events))
}

enum Flow {
    Continue,
    Quit,
}

struct Session {
    app: AppController,
    coach: Coach,
    replies: mpsc::UnboundedSender<(u64, String)>,
    events: bool,
}

impl Session {
    /// Render the new screen and kick off its coaching fetch, if any.
    fn dispatch(&self, transition: Transition) {
        tracing::debug!(event = ?transition.event, "transition");
        if self.events {
            match serde_json::to_string(&transition.event) {
                Ok(line) => eprintln!("{line}"),
                Err(e) => tracing::warn!(error = %e, "could not encode event"),
            }
        }
        if let Some(request) = transition.request {
            let coach = self.coach.clone();
            let replies = self.replies.clone();
            tokio::spawn(async move {
                let text = coach.resolve(&request).await;
                let _ = replies.send((request.generation, text));
            });
        }
        ui::print_screen(&self.app);
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((line, ""));

        if command == "status" && !self.app.hold_progress().is_holding {
            match serde_json::to_string(&self.app.snapshot()) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "could not encode snapshot"),
            }
            return Flow::Continue;
        }

        match self.app.screen() {
            ScreenState::Setup => match command {
                "start" | "" => {
                    if let Some(t) = self.app.start() {
                        self.dispatch(t);
                    }
                }
                "intent" => {
                    self.app.set_intent(rest);
                    ui::print_screen(&self.app);
                }
                "minutes" => match rest.parse::<u32>() {
                    Ok(m) => {
                        self.app.set_duration(m);
                        ui::print_screen(&self.app);
                    }
                    Err(_) => println!("minutes must be a number"),
                },
                "quit" | "q" => return Flow::Quit,
                _ => println!("unknown command: {command}"),
            },
            ScreenState::Focusing => match command {
                "tempted" | "t" => {
                    if let Some(t) = self.app.tempted() {
                        self.dispatch(t);
                    }
                }
                _ => println!("\n  stay with it. type 'tempted' if you need to."),
            },
            ScreenState::Intervention => {
                if self.app.hold_progress().is_holding {
                    // Any input lets go of the control.
                    self.app.hold_input(HoldInput::PointerUp);
                    ui::hold_line(&self.app.hold_progress());
                    println!();
                    return Flow::Continue;
                }
                match command {
                    "stay" | "s" => {
                        if let Some(t) = self.app.stay() {
                            self.dispatch(t);
                        }
                    }
                    "hold" | "h" => {
                        self.app.hold_input(HoldInput::Press);
                        ui::hold_line(&self.app.hold_progress());
                    }
                    _ => println!("stay (s) or hold (h)"),
                }
            }
            ScreenState::Completed => match command {
                "new" | "n" => {
                    if let Some(t) = self.app.new_session() {
                        self.dispatch(t);
                    }
                }
                "quit" | "q" => return Flow::Quit,
                _ => println!("new (n) or quit"),
            },
            ScreenState::Shame => {}
        }
        Flow::Continue
    }
}

async fn session_loop(
    app: AppController,
    coach: Coach,
    events: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (replies, mut inbox) = mpsc::unbounded_channel::<(u64, String)>();
    let mut session = Session {
        app,
        coach,
        replies,
        events,
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut second = interval(Duration::from_secs(1));
    second.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut frame = interval(FRAME);
    frame.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_drawn_pct: i64 = -1;

    ui::print_screen(&session.app);

    loop {
        tokio::select! {
            _ = second.tick() => {
                if session.app.screen() != ScreenState::Focusing {
                    continue;
                }
                match session.app.tick() {
                    Some(t) => session.dispatch(t),
                    None => {
                        if let Some(countdown) = session.app.countdown() {
                            ui::countdown_line(countdown);
                        }
                    }
                }
            }
            _ = frame.tick(), if session.app.hold_progress().is_holding => {
                match session.app.sample_hold() {
                    Some(t) => {
                        last_drawn_pct = -1;
                        session.dispatch(t);
                    }
                    None => {
                        let progress = session.app.hold_progress();
                        let pct = progress.progress as i64;
                        if pct != last_drawn_pct {
                            last_drawn_pct = pct;
                            ui::hold_line(&progress);
                        }
                    }
                }
            }
            Some((generation, text)) = inbox.recv() => {
                if session.app.apply_message(generation, text) {
                    ui::print_message(&session.app);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let before = session.app.screen();
                if let Flow::Quit = session.handle_line(&line) {
                    break;
                }
                if session.app.screen() == ScreenState::Focusing && before != ScreenState::Focusing {
                    // Fresh countdown: first decrement one full second from now.
                    second.reset();
                }
                if !session.app.hold_progress().is_holding {
                    last_drawn_pct = -1;
                }
            }
        }
    }

    println!();
    Ok(())
}
