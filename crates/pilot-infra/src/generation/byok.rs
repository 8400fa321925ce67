//! BYOK backend - a user-keyed OpenAI-compatible chat-completion endpoint
//! (OpenRouter by default).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use pilot_core::generation::{GenerationRequest, decode_chat_content};
use pilot_core::ports::{GeneratedPost, GenerationError, PostGenerator};

use super::http_client::status_error;

pub const DEFAULT_BYOK_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_BYOK_TITLE: &str = "SocialPilot AI";

#[derive(Debug, Clone)]
pub struct ByokConfig {
    pub url: String,
    /// Sent as `HTTP-Referer` for attribution on the provider's side.
    pub referer: String,
    pub title: String,
}

impl Default for ByokConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BYOK_URL.to_string(),
            referer: "http://localhost".to_string(),
            title: DEFAULT_BYOK_TITLE.to_string(),
        }
    }
}

impl ByokConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("BYOK_BASE_URL").unwrap_or(defaults.url),
            referer: std::env::var("BYOK_REFERER").unwrap_or(defaults.referer),
            title: std::env::var("BYOK_TITLE").unwrap_or(defaults.title),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct ByokGenerator {
    config: ByokConfig,
    client: reqwest::Client,
}

impl ByokGenerator {
    pub fn new(config: ByokConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn build_request_body(model: &str, prompt: &str) -> Value {
        json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt }],
            "response_format": { "type": "json_object" }
        })
    }
}

#[async_trait]
impl PostGenerator for ByokGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<GeneratedPost>, GenerationError> {
        let api_key = request.settings.byok_key().ok_or_else(|| {
            GenerationError::Configuration("no BYOK key in settings".to_string())
        })?;
        let model = request.settings.byok_model();

        tracing::debug!(model = %model, slots = request.slots.len(), "Calling BYOK backend");

        let response = self
            .client
            .post(&self.config.url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&Self::build_request_body(model, &request.prompt))
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(status_error("BYOK backend", status, &body));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::ResponseShape(format!("chat envelope: {e}")))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                GenerationError::ResponseShape("response has no message content".to_string())
            })?;

        decode_chat_content(&content)
    }
}
