//! Plain-text rendering of the four screens.

use std::io::Write;

use lockin_core::timer::HoldProgress;
use lockin_core::{AppController, Countdown, ScreenState, StreakGrid};

const BAR_WIDTH: usize = 30;
const INTERVENTION_PLACEHOLDER: &str = "remember why you started.";

fn bar(fraction: f64) -> String {
    let filled = ((fraction.clamp(0.0, 1.0)) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "▓".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn overwrite(line: &str) {
    let mut out = std::io::stdout();
    let _ = write!(out, "\r\x1b[2K{line}");
    let _ = out.flush();
}

pub fn print_grid(grid: &StreakGrid) {
    println!("  {}", grid.render());
    println!(
        "  focus history · {} of 14 days · streak {}",
        grid.filled_count(),
        grid.current_streak
    );
}

pub fn countdown_line(countdown: &Countdown) {
    overwrite(&format!("  {}  {}", countdown.display(), bar(countdown.fraction())));
}

pub fn hold_line(progress: &HoldProgress) {
    let label = if progress.is_holding {
        "RESISTING..."
    } else {
        "HOLD TO FORFEIT"
    };
    overwrite(&format!("  {}  {label}", bar(progress.progress / 100.0)));
}

/// Coaching line for the current screen, or the loading indicator.
pub fn print_message(app: &AppController) {
    let message = app.message();
    match app.screen() {
        ScreenState::Intervention => {
            let text = if message.loading || message.text.is_empty() {
                INTERVENTION_PLACEHOLDER
            } else {
                message.text.as_str()
            };
            println!("\n  {}", text.to_uppercase());
        }
        _ if message.loading => println!("\n  thinking..."),
        _ if !message.text.is_empty() => println!("\n  \"{}\"", message.text),
        _ => {}
    }
}

pub fn print_screen(app: &AppController) {
    println!();
    match app.screen() {
        ScreenState::Setup => {
            let session = app.session();
            println!("LOCK IN /// PROTOCOL");
            println!("Disconnect to reconnect. What are we avoiding today?");
            if !app.message().text.is_empty() {
                println!("\n  {}", app.message().text);
            }
            println!();
            println!("  objective: {}", session.intent);
            println!("  duration:  {}", session.duration);
            println!();
            print_grid(&app.streak_grid());
            println!();
            println!("commands: intent <text> | minutes <5-120> | start | status | quit");
        }
        ScreenState::Focusing => {
            print_message(app);
            println!("\n  FOCUS MODE ACTIVE · {}", app.session().intent);
            println!("commands: tempted (t)");
            if let Some(countdown) = app.countdown() {
                countdown_line(countdown);
            }
        }
        ScreenState::Intervention => {
            println!("!!! LOCKDOWN PROTOCOL ACTIVE !!!");
            print_message(app);
            println!("\ncommands: stay (s) | hold (h), then any line to let go");
            hold_line(&app.hold_progress());
        }
        ScreenState::Completed => {
            println!("Session Complete.");
            print_message(app);
            println!(
                "\n  {} minutes reclaimed from the algorithm.",
                app.session().duration.get()
            );
            println!("commands: new (n) | quit");
        }
        ScreenState::Shame => {}
    }
}
