//! Coaching copy shown at session transitions.
//!
//! A [`CoachProvider`] talks to whatever generates the text and is allowed to
//! fail. [`Coach`] sits in front of it and always produces something to show:
//! each operation has one fallback for "answered with nothing" and another
//! for "did not answer".

pub mod credentials;
mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoachError;
use crate::session::DurationMinutes;
use crate::storage::CoachConfig;

pub use gemini::GeminiProvider;

pub const START_EMPTY_FALLBACK: &str = "time to lock in. let's flow.";
pub const START_ERROR_FALLBACK: &str = "focus mode active. you got this.";
pub const INTERVENTION_EMPTY_FALLBACK: &str = "why are you running from yourself?";
pub const INTERVENTION_ERROR_FALLBACK: &str = "stay with the feeling. don't distract yourself.";
pub const COMPLETION_EMPTY_FALLBACK: &str = "session clear. well done.";
pub const COMPLETION_ERROR_FALLBACK: &str = "session complete. good work.";

/// Generates short coaching lines.
#[async_trait]
pub trait CoachProvider: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    async fn start_message(&self, intent: &str, minutes: u32) -> Result<String, CoachError>;

    async fn intervention_message(&self, intent: &str) -> Result<String, CoachError>;

    async fn completion_message(&self, intent: &str) -> Result<String, CoachError>;
}

/// Provider used when no credential is available. Every call fails, so every
/// message is a fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineProvider;

#[async_trait]
impl CoachProvider for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    async fn start_message(&self, _intent: &str, _minutes: u32) -> Result<String, CoachError> {
        Err(CoachError::NotConfigured)
    }

    async fn intervention_message(&self, _intent: &str) -> Result<String, CoachError> {
        Err(CoachError::NotConfigured)
    }

    async fn completion_message(&self, _intent: &str) -> Result<String, CoachError> {
        Err(CoachError::NotConfigured)
    }
}

/// Which message a transition wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoachPrompt {
    Start {
        intent: String,
        duration: DurationMinutes,
    },
    Intervention {
        intent: String,
    },
    Completion {
        intent: String,
    },
}

impl CoachPrompt {
    fn fallbacks(&self) -> (&'static str, &'static str) {
        match self {
            CoachPrompt::Start { .. } => (START_EMPTY_FALLBACK, START_ERROR_FALLBACK),
            CoachPrompt::Intervention { .. } => {
                (INTERVENTION_EMPTY_FALLBACK, INTERVENTION_ERROR_FALLBACK)
            }
            CoachPrompt::Completion { .. } => {
                (COMPLETION_EMPTY_FALLBACK, COMPLETION_ERROR_FALLBACK)
            }
        }
    }
}

/// A prompt tagged with the controller generation that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachRequest {
    pub generation: u64,
    pub prompt: CoachPrompt,
}

/// Fallback-applying front for a provider. Never fails.
#[derive(Clone)]
pub struct Coach {
    provider: Arc<dyn CoachProvider>,
}

impl Coach {
    pub fn new(provider: Arc<dyn CoachProvider>) -> Self {
        Self { provider }
    }

    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineProvider))
    }

    /// Pick a provider from configuration and the stored credential.
    pub fn from_config(config: &CoachConfig) -> Self {
        if !config.enabled {
            return Self::offline();
        }
        match credentials::api_key() {
            Some(key) => match GeminiProvider::new(config, key) {
                Ok(provider) => Self::new(Arc::new(provider)),
                Err(e) => {
                    tracing::warn!(error = %e, "could not build coaching client, using fallbacks");
                    Self::offline()
                }
            },
            None => {
                tracing::debug!("no coaching API key configured, using fallbacks");
                Self::offline()
            }
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn start_message(&self, intent: &str, duration: DurationMinutes) -> String {
        self.prompt(&CoachPrompt::Start {
            intent: intent.to_string(),
            duration,
        })
        .await
    }

    pub async fn intervention_message(&self, intent: &str) -> String {
        self.prompt(&CoachPrompt::Intervention {
            intent: intent.to_string(),
        })
        .await
    }

    pub async fn completion_message(&self, intent: &str) -> String {
        self.prompt(&CoachPrompt::Completion {
            intent: intent.to_string(),
        })
        .await
    }

    pub async fn resolve(&self, request: &CoachRequest) -> String {
        self.prompt(&request.prompt).await
    }

    pub async fn prompt(&self, prompt: &CoachPrompt) -> String {
        let result = match prompt {
            CoachPrompt::Start { intent, duration } => {
                self.provider.start_message(intent, duration.get()).await
            }
            CoachPrompt::Intervention { intent } => self.provider.intervention_message(intent).await,
            CoachPrompt::Completion { intent } => self.provider.completion_message(intent).await,
        };

        let (empty_fallback, error_fallback) = prompt.fallbacks();
        match result {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) | Err(CoachError::EmptyResponse) => {
                tracing::debug!(provider = self.provider.name(), "coaching reply was empty");
                empty_fallback.to_string()
            }
            Err(e) => {
                tracing::warn!(provider = self.provider.name(), error = %e, "coaching request failed");
                error_fallback.to_string()
            }
        }
    }
}

impl std::fmt::Debug for Coach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coach")
            .field("provider", &self.provider.name())
            .finish()
    }
}
