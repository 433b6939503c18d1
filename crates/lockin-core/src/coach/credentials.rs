//! API key lookup for the coaching provider.
//!
//! Order: `LOCKIN_API_KEY`, `GEMINI_API_KEY`, then the OS keyring.

const SERVICE: &str = "lockin";
const KEYRING_ENTRY: &str = "gemini_api_key";
const ENV_VARS: [&str; 2] = ["LOCKIN_API_KEY", "GEMINI_API_KEY"];

/// Where the active key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Env(&'static str),
    Keyring,
}

pub fn api_key() -> Option<String> {
    lookup().map(|(key, _)| key)
}

pub fn lookup() -> Option<(String, KeySource)> {
    for var in ENV_VARS {
        if let Ok(value) = std::env::var(var) {
            if !value.trim().is_empty() {
                return Some((value.trim().to_string(), KeySource::Env(var)));
            }
        }
    }
    match keyring_store::get(KEYRING_ENTRY) {
        Ok(Some(key)) if !key.trim().is_empty() => Some((key, KeySource::Keyring)),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "keyring unavailable");
            None
        }
    }
}

pub fn store_api_key(key: &str) -> Result<(), keyring::Error> {
    keyring_store::set(KEYRING_ENTRY, key.trim())
}

pub fn clear_api_key() -> Result<(), keyring::Error> {
    keyring_store::delete(KEYRING_ENTRY)
}

/// Thin wrapper around the OS keyring for credential storage.
mod keyring_store {
    use super::SERVICE;

    pub fn get(key: &str) -> Result<Option<String>, keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)
    }

    pub fn delete(key: &str) -> Result<(), keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
