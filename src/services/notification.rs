//! Best-effort webhook notifications

use crate::error::{AppError, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info, warn};

pub const NOTIFICATION_TITLE: &str = "Multi-Cloud Deployment Update";

/// Marker that turns the attachment green
const POSITIVE_MARKER: &str = "successful";

const WEBHOOK_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub text: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub color: String,
    pub text: String,
}

impl WebhookPayload {
    pub fn for_report(report: &str) -> Self {
        let color = if report.to_lowercase().contains(POSITIVE_MARKER) {
            "good"
        } else {
            "danger"
        };

        Self {
            text: NOTIFICATION_TITLE.to_string(),
            attachments: vec![Attachment {
                color: color.to_string(),
                text: report.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Skipped,
    Delivered,
    Failed(String),
}

pub struct NotificationDispatcher {
    client: reqwest::Client,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self { client }
    }

    /// Post the report to the webhook. Never fails the caller: errors are
    /// logged and reported through the returned outcome.
    pub async fn notify(&self, webhook_url: Option<&str>, report: &str) -> NotificationOutcome {
        let url = match webhook_url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => url,
            None => {
                warn!("Slack webhook not configured");
                return NotificationOutcome::Skipped;
            }
        };

        match self.post(url, &WebhookPayload::for_report(report)).await {
            Ok(()) => {
                info!("Slack notification sent");
                NotificationOutcome::Delivered
            }
            Err(e) => {
                error!("Failed to send Slack notification: {}", e);
                NotificationOutcome::Failed(e.to_string())
            }
        }
    }

    async fn post(&self, url: &str, payload: &WebhookPayload) -> Result<()> {
        let response = self.client.post(url).json(payload).send().await?;
        response
            .error_for_status()
            .map_err(|e| AppError::NotificationError(e.to_string()))?;
        Ok(())
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_color() {
        let payload = WebhookPayload::for_report("Deployment SUCCESSFUL everywhere");
        assert_eq!(payload.attachments[0].color, "good");

        let payload = WebhookPayload::for_report("Overall Success Rate: 0/3 (0.0%)");
        assert_eq!(payload.attachments[0].color, "danger");
    }

    #[test]
    fn test_payload_shape() {
        let payload = WebhookPayload::for_report("body");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["text"], NOTIFICATION_TITLE);
        assert_eq!(json["attachments"][0]["text"], "body");
        assert_eq!(json["attachments"][0]["color"], "danger");
    }

    #[tokio::test]
    async fn test_no_webhook_is_skipped() {
        let dispatcher = NotificationDispatcher::new();
        assert_eq!(dispatcher.notify(None, "report").await, NotificationOutcome::Skipped);
        assert_eq!(
            dispatcher.notify(Some("   "), "report").await,
            NotificationOutcome::Skipped
        );
    }

    #[tokio::test]
    async fn test_report_is_posted_to_webhook() {
        use wiremock::matchers::{body_json, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let report = "Overall Success Rate: 2/2 (100.0%)";
        Mock::given(method("POST"))
            .and(path("/hooks/deploy"))
            .and(body_json(serde_json::json!({
                "text": NOTIFICATION_TITLE,
                "attachments": [{ "color": "danger", "text": report }]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/hooks/deploy", server.uri());
        let outcome = NotificationDispatcher::new().notify(Some(&url), report).await;

        assert_eq!(outcome, NotificationOutcome::Delivered);
    }

    #[tokio::test]
    async fn test_server_error_is_reported_as_failed() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/hooks/deploy", server.uri());
        let outcome = NotificationDispatcher::new().notify(Some(&url), "report").await;

        match outcome {
            NotificationOutcome::Failed(reason) => assert!(reason.contains("500")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delivery_failure_is_swallowed() {
        let dispatcher = NotificationDispatcher::new();
        // nothing listens on port 9 locally
        let outcome = dispatcher
            .notify(Some("http://127.0.0.1:9/hooks/deploy"), "report")
            .await;
        assert!(matches!(outcome, NotificationOutcome::Failed(_)));
    }
}
