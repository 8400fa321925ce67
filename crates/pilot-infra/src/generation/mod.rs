//! Generation backends and the router that picks one per call.

mod byok;
mod http_client;
mod native;

use std::sync::Arc;

use async_trait::async_trait;

use pilot_core::domain::AiEngine;
use pilot_core::generation::GenerationRequest;
use pilot_core::ports::{GeneratedPost, GenerationError, PostGenerator};

pub use byok::{ByokConfig, ByokGenerator, DEFAULT_BYOK_TITLE, DEFAULT_BYOK_URL};
pub use http_client::build_http_client;
pub use native::{DEFAULT_NATIVE_BASE_URL, DEFAULT_NATIVE_MODEL, NativeConfig, NativeGenerator};

#[derive(Debug, Clone, Default)]
pub struct GenerationConfig {
    pub native: NativeConfig,
    pub byok: ByokConfig,
}

impl GenerationConfig {
    pub fn from_env() -> Self {
        Self {
            native: NativeConfig::from_env(),
            byok: ByokConfig::from_env(),
        }
    }
}

/// Routes each request by the engine named in its settings snapshot.
///
/// BYOK is used only when a key is configured; otherwise the native backend
/// serves the request.
pub struct EngineRouter {
    native: Arc<dyn PostGenerator>,
    byok: Arc<dyn PostGenerator>,
}

impl EngineRouter {
    pub fn new(native: Arc<dyn PostGenerator>, byok: Arc<dyn PostGenerator>) -> Self {
        Self { native, byok }
    }

    /// Build both HTTP backends over one shared client.
    pub fn from_config(config: GenerationConfig) -> Result<Self, GenerationError> {
        let client = build_http_client(None)?;
        if config.native.api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not set, native generation will fail");
        }
        Ok(Self::new(
            Arc::new(NativeGenerator::new(config.native, client.clone())),
            Arc::new(ByokGenerator::new(config.byok, client)),
        ))
    }

    fn select(&self, request: &GenerationRequest) -> &dyn PostGenerator {
        match request.settings.ai_engine {
            AiEngine::Byok if request.settings.byok_key().is_some() => self.byok.as_ref(),
            AiEngine::Byok => {
                tracing::warn!("BYOK engine selected without a key, using native backend");
                self.native.as_ref()
            }
            AiEngine::Native => self.native.as_ref(),
        }
    }
}

#[async_trait]
impl PostGenerator for EngineRouter {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<GeneratedPost>, GenerationError> {
        let result = self.select(request).generate(request).await;
        match &result {
            Ok(posts) => tracing::info!(
                returned = posts.len(),
                requested = request.slots.len(),
                "Generation finished"
            ),
            Err(e) => tracing::warn!(error = %e, "Generation failed"),
        }
        result
    }
}
