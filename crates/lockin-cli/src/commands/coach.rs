use clap::Subcommand;
use lockin_core::{Coach, Config, DurationMinutes};

#[derive(Subcommand)]
pub enum CoachAction {
    /// Message shown when a session starts
    Start {
        #[arg(long)]
        intent: String,
        #[arg(long, default_value = "45")]
        minutes: u32,
        /// Skip the provider and print the built-in message
        #[arg(long)]
        offline: bool,
    },
    /// Message shown on the intervention screen
    Intervention {
        #[arg(long)]
        intent: String,
        #[arg(long)]
        offline: bool,
    },
    /// Message shown when a session completes
    Completion {
        #[arg(long)]
        intent: String,
        #[arg(long)]
        offline: bool,
    },
}

fn coach(offline: bool) -> Coach {
    if offline {
        Coach::offline()
    } else {
        Coach::from_config(&Config::load_or_default().coach)
    }
}

pub fn run(action: CoachAction) -> Result<(), Box<dyn std::error::Error>> {
    let rt = super::runtime()?;
    let text = match action {
        CoachAction::Start {
            intent,
            minutes,
            offline,
        } => rt.block_on(coach(offline).start_message(&intent, DurationMinutes::snapped(minutes))),
        CoachAction::Intervention { intent, offline } => {
            rt.block_on(coach(offline).intervention_message(&intent))
        }
        CoachAction::Completion { intent, offline } => {
            rt.block_on(coach(offline).completion_message(&intent))
        }
    };
    println!("{text}");
    Ok(())
}
