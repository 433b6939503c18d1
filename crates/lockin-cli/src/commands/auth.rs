use clap::Subcommand;
use lockin_core::coach::credentials::{self, KeySource};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store the coaching API key in the OS keyring
    SetKey {
        /// API key
        key: String,
    },
    /// Remove the stored API key
    Clear,
    /// Show where the active API key comes from
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::SetKey { key } => {
            if key.trim().is_empty() {
                return Err("API key is empty".into());
            }
            credentials::store_api_key(&key)?;
            println!("API key stored in keyring");
        }
        AuthAction::Clear => {
            credentials::clear_api_key()?;
            println!("API key removed from keyring");
        }
        AuthAction::Status => match credentials::lookup() {
            Some((_, KeySource::Env(var))) => println!("configured (from ${var})"),
            Some((_, KeySource::Keyring)) => println!("configured (from keyring)"),
            None => println!("not configured; coaching will use built-in messages"),
        },
    }
    Ok(())
}
