//! Webhook notifier - posts notifications to a chat webhook (Slack, Discord,
//! etc.).

use async_trait::async_trait;
use serde_json::json;

use pilot_core::ports::{NotifyError, Notifier};

pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let payload = json!({
            "title": title,
            "body": body,
            "text": format!("*{title}*\n{body}"),
        });

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Delivery(format!("webhook returned {status}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_posts_title_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_partial_json(json!({
                "title": "Post Published!",
                "body": "Your post about \"Launch\" is now live on Facebook.",
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(format!("{}/hook", server.uri()));
        notifier
            .notify(
                "Post Published!",
                "Your post about \"Launch\" is now live on Facebook.",
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_error_status_is_a_delivery_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(server.uri());
        assert!(matches!(
            notifier.notify("Queue is Low!", "...").await,
            Err(NotifyError::Delivery(_))
        ));
    }
}
