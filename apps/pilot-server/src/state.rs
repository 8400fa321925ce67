//! Application state - shared across all handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use pilot_core::Workspace;
use pilot_core::ports::PostGenerator;
use pilot_infra::{EngineRouter, kv};

use crate::config::AppConfig;

/// Shared application state.
///
/// The workspace has a single writer; the mutex serializes handlers.
#[derive(Clone)]
pub struct AppState {
    pub workspace: Arc<Mutex<Workspace>>,
    pub generator: Arc<dyn PostGenerator>,
    generating: Arc<AtomicBool>,
}

/// Marks a generation call as in flight until dropped.
pub struct GenerationGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for GenerationGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl AppState {
    pub fn new(workspace: Workspace, generator: Arc<dyn PostGenerator>) -> Self {
        Self {
            workspace: Arc::new(Mutex::new(workspace)),
            generator,
            generating: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Build the application state from configuration.
    pub async fn from_config(config: &AppConfig) -> std::io::Result<Self> {
        let store = kv::connect(&config.store).await.map_err(std::io::Error::other)?;
        let notifier = config.notify.build();
        let workspace = Workspace::load_with(
            store,
            notifier,
            Arc::new(chrono::Utc::now),
            config.wall_clock,
        )
        .await
        .map_err(std::io::Error::other)?;

        let generator =
            EngineRouter::from_config(config.generation.clone()).map_err(std::io::Error::other)?;

        tracing::info!("Application state initialized");
        Ok(Self::new(workspace, Arc::new(generator)))
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::Acquire)
    }

    /// Claim the generation slot, or `None` if a call is already running.
    pub fn begin_generation(&self) -> Option<GenerationGuard> {
        self.generating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GenerationGuard {
                flag: self.generating.clone(),
            })
    }
}
