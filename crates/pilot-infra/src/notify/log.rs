//! Notifiers that never leave the process.

use async_trait::async_trait;

use pilot_core::ports::{NotifyError, Notifier};

/// Writes each notification to the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(title = %title, body = %body, "Notification");
        Ok(())
    }
}

/// Drops every notification. Stands in for a user who has not granted
/// notification permission.
pub struct SilentNotifier;

#[async_trait]
impl Notifier for SilentNotifier {
    async fn notify(&self, title: &str, _body: &str) -> Result<(), NotifyError> {
        tracing::trace!(title = %title, "Notification suppressed");
        Ok(())
    }
}
