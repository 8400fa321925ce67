use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Persona;
use crate::error::DomainError;
use crate::registry::PersonaRegistry;

/// Model used by the BYOK backend when none is configured.
pub const DEFAULT_BYOK_MODEL: &str = "google/gemini-2.0-flash-001";

/// Which generation backend serves requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiEngine {
    /// Managed generative service with schema-constrained output.
    #[default]
    Native,
    /// User-keyed chat-completion endpoint.
    #[serde(alias = "openrouter")]
    Byok,
}

/// A named content theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPillar {
    pub name: String,
    pub description: String,
}

impl ContentPillar {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Brand configuration, pillar catalog, personas and engine choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub brand_name: String,
    pub industry: String,
    pub target_audience: String,
    pub tone: String,
    pub topics: Vec<String>,
    /// Posts per week.
    pub post_frequency: u32,
    pub content_pillars: Vec<ContentPillar>,
    pub style_guide: String,
    pub brand_mission: String,
    pub ai_engine: AiEngine,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_router_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_router_model: Option<String>,
    pub personas: PersonaRegistry,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            brand_name: "Brandly".to_string(),
            industry: "Software as a Service".to_string(),
            target_audience: "Marketing Managers & Small Business Owners".to_string(),
            tone: "Professional yet Friendly".to_string(),
            topics: vec![
                "Productivity Hacks".to_string(),
                "Marketing Trends".to_string(),
                "Business Growth".to_string(),
            ],
            post_frequency: 7,
            content_pillars: vec![
                ContentPillar::new(
                    "Education",
                    "Share tips, tutorials, and how-to guides related to our software.",
                ),
                ContentPillar::new(
                    "Engagement",
                    "Ask questions and run polls to get the audience talking.",
                ),
                ContentPillar::new(
                    "Social Proof",
                    "Highlight customer testimonials and success stories.",
                ),
                ContentPillar::new(
                    "Promotion",
                    "Talk about product features, benefits, and special offers.",
                ),
                ContentPillar::new(
                    "Behind the Scenes",
                    "Show the people and culture behind the brand.",
                ),
            ],
            style_guide:
                "Use short sentences. No corporate jargon. Always include 5 relevant hashtags."
                    .to_string(),
            brand_mission: "Helping entrepreneurs reclaim their time through smart automation."
                .to_string(),
            ai_engine: AiEngine::Native,
            open_router_key: None,
            open_router_model: Some(DEFAULT_BYOK_MODEL.to_string()),
            personas: PersonaRegistry::default(),
        }
    }
}

impl Settings {
    /// Rebuild settings from a saved record.
    ///
    /// Defaults are applied first and the saved object is merged over them key
    /// by key. A missing or empty persona list is replaced by the built-in
    /// persona.
    pub fn from_saved(saved: Value) -> Result<Self, DomainError> {
        let Value::Object(overlay) = saved else {
            return Err(DomainError::Validation(
                "saved settings must be a JSON object".to_string(),
            ));
        };

        let mut merged = match serde_json::to_value(Settings::default()) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(DomainError::Internal("settings did not serialize to an object".to_string())),
            Err(e) => return Err(DomainError::Internal(e.to_string())),
        };
        merged.extend(overlay);

        let has_personas = merged
            .get("personas")
            .and_then(Value::as_array)
            .is_some_and(|p| !p.is_empty());
        if !has_personas {
            let builtin = serde_json::to_value(vec![Persona::builtin()])
                .map_err(|e| DomainError::Internal(e.to_string()))?;
            merged.insert("personas".to_string(), builtin);
        }

        let settings: Settings = serde_json::from_value(Value::Object(merged))
            .map_err(|e| DomainError::Validation(format!("invalid saved settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check invariants that the type system does not enforce.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for pillar in &self.content_pillars {
            if !seen.insert(pillar.name.as_str()) {
                return Err(DomainError::Duplicate(format!(
                    "content pillar '{}'",
                    pillar.name
                )));
            }
        }
        Ok(())
    }

    pub fn add_pillar(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::Validation("pillar name is required".to_string()));
        }
        if self.content_pillars.iter().any(|p| p.name == name) {
            return Err(DomainError::Duplicate(format!("content pillar '{name}'")));
        }
        self.content_pillars.push(ContentPillar::new(name, description));
        Ok(())
    }

    /// Returns `true` if a pillar was removed.
    pub fn remove_pillar(&mut self, name: &str) -> bool {
        let before = self.content_pillars.len();
        self.content_pillars.retain(|p| p.name != name);
        self.content_pillars.len() != before
    }

    /// Returns `false` for empty or already-known topics.
    pub fn add_topic(&mut self, topic: impl Into<String>) -> bool {
        let topic = topic.into();
        if topic.is_empty() || self.topics.contains(&topic) {
            return false;
        }
        self.topics.push(topic);
        true
    }

    pub fn remove_topic(&mut self, topic: &str) -> bool {
        let before = self.topics.len();
        self.topics.retain(|t| t != topic);
        self.topics.len() != before
    }

    pub fn posts_per_day(&self) -> f64 {
        f64::from(self.post_frequency) / 7.0
    }

    /// The BYOK credential, if one is configured and non-blank.
    pub fn byok_key(&self) -> Option<&str> {
        self.open_router_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn byok_model(&self) -> &str {
        self.open_router_model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_BYOK_MODEL)
    }
}
