//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod generator;
mod kv_store;
mod notifier;

pub use generator::{GeneratedPost, GenerationError, PostGenerator};
pub use kv_store::{KeyValueStore, StoreError};
pub use notifier::{Notifier, NotifyError};
