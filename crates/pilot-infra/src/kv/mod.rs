//! Key-value store implementations - JSON files, Redis and in-memory.

mod file;
mod memory;
#[cfg(feature = "redis")]
mod redis;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use pilot_core::ports::{KeyValueStore, StoreError};

pub use file::JsonFileStore;
pub use memory::InMemoryStore;
#[cfg(feature = "redis")]
pub use redis::{RedisConfig, RedisStore};

/// Which persistence backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    File,
    Memory,
    Redis,
}

impl FromStr for StoreBackend {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "memory" => Ok(StoreBackend::Memory),
            "redis" => Ok(StoreBackend::Redis),
            other => Err(StoreError::Connection(format!(
                "unknown store backend '{other}' (expected file, memory or redis)"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Directory for the file backend.
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            dir: PathBuf::from("./data"),
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, StoreError> {
        let defaults = Self::default();
        Ok(Self {
            backend: match std::env::var("STORE_BACKEND") {
                Ok(v) => v.parse()?,
                Err(_) => defaults.backend,
            },
            dir: std::env::var("STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dir),
        })
    }
}

/// Open the configured store.
///
/// With the `redis` feature, an unreachable Redis server falls back to the
/// in-memory store when `REDIS_FALLBACK_TO_MEMORY` allows it.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    match config.backend {
        StoreBackend::File => Ok(Arc::new(JsonFileStore::open(&config.dir).await?)),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data will not survive a restart");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StoreBackend::Redis => connect_redis().await,
    }
}

#[cfg(feature = "redis")]
async fn connect_redis() -> Result<Arc<dyn KeyValueStore>, StoreError> {
    let redis_config = RedisConfig::from_env();
    match RedisStore::new(redis_config.clone()).await {
        Ok(store) => Ok(Arc::new(store)),
        Err(e) if redis_config.fallback_to_memory => {
            tracing::warn!(error = %e, "Redis unavailable, falling back to in-memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        Err(e) => Err(e),
    }
}

#[cfg(not(feature = "redis"))]
async fn connect_redis() -> Result<Arc<dyn KeyValueStore>, StoreError> {
    Err(StoreError::Connection(
        "built without the `redis` feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_names() {
        assert_eq!("FILE".parse::<StoreBackend>().unwrap(), StoreBackend::File);
        assert_eq!(" memory ".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!("redis".parse::<StoreBackend>().unwrap(), StoreBackend::Redis);
        assert!("postgres".parse::<StoreBackend>().is_err());
    }

    #[tokio::test]
    async fn test_connect_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            backend: StoreBackend::File,
            dir: dir.path().to_path_buf(),
        };
        let store = connect(&config).await.unwrap();
        store.set("social_pilot_posts", "[]").await.unwrap();
        assert!(dir.path().join("social_pilot_posts.json").exists());
    }
}
