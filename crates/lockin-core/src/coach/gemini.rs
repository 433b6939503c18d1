//! Gemini `generateContent` provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::CoachProvider;
use crate::error::CoachError;
use crate::storage::CoachConfig;

const SYSTEM_INSTRUCTION: &str = indoc::indoc! {"
    You are the focus coach inside a minimalist lock-in timer.
    Calm, short, quietly motivating. Never robotic, never hyped.
    Write like a person texting, mostly lowercase, readable.
    Stay under 20 words. At most one emoji, usually none.
"};

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiProvider {
    pub fn new(config: &CoachConfig, api_key: impl Into<String>) -> Result<Self, CoachError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(&self, prompt: String) -> Result<String, CoachError> {
        if self.api_key.is_empty() {
            return Err(CoachError::NotConfigured);
        }

        let body = json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CoachError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| CoachError::Decode(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(CoachError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl CoachProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn start_message(&self, intent: &str, minutes: u32) -> Result<String, CoachError> {
        self.generate(format!(
            "The user is about to spend {minutes} minutes on \"{intent}\". \
             Give them a short, cool opening line to lock in."
        ))
        .await
    }

    async fn intervention_message(&self, intent: &str) -> Result<String, CoachError> {
        self.generate(format!(
            "The user wants to abandon their \"{intent}\" session. \
             Do not repeat the intent back. Ask one short, personal question about \
             what they are avoiding, or give a stoic reality check, like a text \
             from a disappointed mentor. Under 15 words, lowercase."
        ))
        .await
    }

    async fn completion_message(&self, intent: &str) -> Result<String, CoachError> {
        self.generate(format!(
            "The user just finished their \"{intent}\" session. Offer short, low-key praise."
        ))
        .await
    }
}
