//! Completion webhook notifications

use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Action name reported for finished sessions
pub const SESSION_COMPLETED: &str = "Session Completed";

/// Request timeout for webhook deliveries
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// A finished focus session
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub total_seconds: u64,
    pub completed_at: DateTime<Local>,
}

impl Completion {
    pub fn now(total_seconds: u64) -> Self {
        Self {
            total_seconds,
            completed_at: Local::now(),
        }
    }
}

/// JSON body posted to the webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub user: String,
    pub app: String,
    pub action: String,
    pub time: String,
}

impl WebhookPayload {
    pub fn session_completed(user: &str, app: &str, completion: &Completion) -> Self {
        Self {
            user: user.to_string(),
            app: app.to_string(),
            action: SESSION_COMPLETED.to_string(),
            time: locale_timestamp(&completion.completed_at),
        }
    }
}

/// Local time in `M/D/YYYY, h:mm:ss AM` form
pub fn locale_timestamp(time: &DateTime<Local>) -> String {
    time.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Receives completion events; must return without waiting on delivery
pub trait Notifier: Send + Sync {
    fn session_completed(&self, completion: &Completion);
}

/// Notifier used when no webhook is configured
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn session_completed(&self, _completion: &Completion) {
        debug!("No webhook configured, skipping completion notification");
    }
}

/// Posts completion events to an HTTP webhook
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
    user: String,
    app: String,
}

impl WebhookNotifier {
    pub fn new(url: String, user: String, app: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .map_err(|e| anyhow!("Failed to build webhook client: {}", e))?;

        Ok(Self {
            client,
            url,
            user,
            app,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Deliver one payload, failing on transport errors and non-success statuses
    pub async fn send(&self, payload: &WebhookPayload) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| anyhow!("Webhook request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(anyhow!("Webhook returned {}", status));
        }

        Ok(())
    }
}

impl Notifier for WebhookNotifier {
    fn session_completed(&self, completion: &Completion) {
        let payload = WebhookPayload::session_completed(&self.user, &self.app, completion);

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime available, dropping completion webhook");
                return;
            }
        };

        let notifier = self.clone();
        handle.spawn(async move {
            match notifier.send(&payload).await {
                Ok(()) => info!("Completion webhook delivered to {}", notifier.url),
                Err(e) => error!("Failed to deliver completion webhook: {}", e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_payload_shape() {
        let completion = Completion {
            total_seconds: 1500,
            completed_at: Local.with_ymd_and_hms(2024, 3, 7, 14, 5, 9).unwrap(),
        };
        let payload = WebhookPayload::session_completed("sam", "Focus Timer", &completion);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["user"], "sam");
        assert_eq!(json["app"], "Focus Timer");
        assert_eq!(json["action"], "Session Completed");
        assert_eq!(json["time"], "3/7/2024, 2:05:09 PM");
    }

    #[test]
    fn test_notify_outside_runtime_does_not_panic() {
        let notifier = WebhookNotifier::new(
            "http://127.0.0.1:9/hook".to_string(),
            "sam".to_string(),
            "Focus Timer".to_string(),
        )
        .unwrap();
        notifier.session_completed(&Completion::now(60));
    }
}
