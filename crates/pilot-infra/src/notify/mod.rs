//! Notification gateways.

mod log;
mod webhook;

use std::sync::Arc;

use pilot_core::ports::Notifier;

pub use log::{LogNotifier, SilentNotifier};
pub use webhook::WebhookNotifier;

#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// `false` models a user who denied notification permission.
    pub enabled: bool,
    pub webhook_url: Option<String>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            webhook_url: None,
        }
    }
}

impl NotifyConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var("NOTIFICATIONS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            webhook_url: std::env::var("NOTIFY_WEBHOOK_URL")
                .ok()
                .filter(|u| !u.trim().is_empty()),
        }
    }

    pub fn build(&self) -> Arc<dyn Notifier> {
        match (self.enabled, &self.webhook_url) {
            (false, _) => Arc::new(SilentNotifier),
            (true, Some(url)) => {
                tracing::info!(url = %url, "Notifications go to webhook");
                Arc::new(WebhookNotifier::new(url.clone()))
            }
            (true, None) => Arc::new(LogNotifier),
        }
    }
}
