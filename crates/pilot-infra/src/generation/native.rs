//! Native backend - the managed generative service, asked for output that
//! conforms to a JSON array schema.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use pilot_core::generation::{GenerationRequest, decode_schema_array};
use pilot_core::ports::{GeneratedPost, GenerationError, PostGenerator};

use super::http_client::status_error;

pub const DEFAULT_NATIVE_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_NATIVE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct NativeConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_NATIVE_MODEL.to_string(),
            base_url: DEFAULT_NATIVE_BASE_URL.to_string(),
        }
    }
}

impl NativeConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .ok()
                .filter(|k| !k.trim().is_empty()),
            model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default()
    }
}

pub struct NativeGenerator {
    config: NativeConfig,
    client: reqwest::Client,
}

impl NativeGenerator {
    pub fn new(config: NativeConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request_body(prompt: &str) -> Value {
        json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "content": { "type": "STRING" },
                            "topic": { "type": "STRING" },
                            "personaId": { "type": "STRING" }
                        },
                        "required": ["content", "topic", "personaId"]
                    }
                }
            }
        })
    }
}

#[async_trait]
impl PostGenerator for NativeGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<GeneratedPost>, GenerationError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            GenerationError::Configuration("GEMINI_API_KEY is not set".to_string())
        })?;

        tracing::debug!(model = %self.config.model, slots = request.slots.len(), "Calling native backend");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&Self::build_request_body(&request.prompt))
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(status_error("native backend", status, &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::ResponseShape(format!("native envelope: {e}")))?;
        decode_schema_array(&parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pilot_core::domain::Settings;
    use pilot_core::planner::{CampaignSession, GenerationPlan};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> GenerationRequest {
        let settings = Settings::default();
        let plan = GenerationPlan::new(
            &CampaignSession::new(),
            &[],
            &settings.content_pillars,
            &settings.personas,
        );
        GenerationRequest::new(&settings, &[], &plan, chrono::Utc::now())
    }

    fn generator(server: &MockServer) -> NativeGenerator {
        NativeGenerator::new(
            NativeConfig {
                api_key: Some("test-key".to_string()),
                model: "test-model".to_string(),
                base_url: server.uri(),
            },
            reqwest::Client::new(),
        )
    }

    fn candidate(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    #[tokio::test]
    async fn test_schema_constrained_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/test-model:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": { "type": "ARRAY" }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate(
                r#"[{"content":"Hi #a","topic":"Intro","personaId":"p1"}]"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let posts = generator(&server).generate(&request()).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].persona_id, "p1");
    }

    #[tokio::test]
    async fn test_no_candidates_is_an_empty_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        assert!(generator(&server).generate(&request()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_conforming_output_is_a_parse_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate(r#"{"posts":[]}"#)),
            )
            .mount(&server)
            .await;

        assert!(matches!(
            generator(&server).generate(&request()).await,
            Err(GenerationError::ResponseShape(_))
        ));
    }

    #[tokio::test]
    async fn test_http_error_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        assert!(matches!(
            generator(&server).generate(&request()).await,
            Err(GenerationError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let generator = NativeGenerator::new(NativeConfig::default(), reqwest::Client::new());
        assert!(matches!(
            generator.generate(&request()).await,
            Err(GenerationError::Configuration(_))
        ));
    }
}
