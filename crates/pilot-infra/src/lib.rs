//! # SocialPilot Infrastructure
//!
//! Concrete implementations of the ports defined in `pilot-core`:
//! key-value stores, notification gateways and generation backends.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, file and in-memory stores only
//! - `redis` - Redis key-value store

pub mod generation;
pub mod kv;
pub mod notify;

// Re-exports - stores
pub use kv::{InMemoryStore, JsonFileStore, StoreBackend, StoreConfig};
#[cfg(feature = "redis")]
pub use kv::{RedisConfig, RedisStore};

// Re-exports - notifications
pub use notify::{LogNotifier, NotifyConfig, SilentNotifier, WebhookNotifier};

// Re-exports - generation
pub use generation::{
    ByokConfig, ByokGenerator, EngineRouter, GenerationConfig, NativeConfig, NativeGenerator,
};
