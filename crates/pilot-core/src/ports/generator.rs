//! Generation port - abstraction over AI text backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::PostDraft;
use crate::generation::GenerationRequest;

/// One post as returned by a backend. All three fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPost {
    pub content: String,
    pub topic: String,
    pub persona_id: String,
}

impl From<GeneratedPost> for PostDraft {
    fn from(generated: GeneratedPost) -> Self {
        PostDraft::new(generated.content, generated.topic).with_persona(generated.persona_id)
    }
}

/// Post generator.
///
/// One call is one network round trip. Implementations never retry, and the
/// number of returned posts is whatever the backend produced.
#[async_trait]
pub trait PostGenerator: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<GeneratedPost>, GenerationError>;
}

/// Generation errors. Always surfaced to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The backend could not be reached or answered with an HTTP error.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered, but not in any accepted shape.
    #[error("Unexpected response shape: {0}")]
    ResponseShape(String),

    /// The generator itself is misconfigured.
    #[error("Configuration error: {0}")]
    Configuration(String),
}
