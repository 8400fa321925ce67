//! Notification port - best-effort user alerts.

use async_trait::async_trait;

/// Notification gateway.
///
/// Implementations without permission to notify should return `Ok(())`.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Failed to deliver notification: {0}")]
    Delivery(String),
}
