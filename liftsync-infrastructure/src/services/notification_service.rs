use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use liftsync_domain::ports::NotificationSink;
use liftsync_domain::RunNotification;

use crate::config::NotifierConfig;
use crate::utils::http_client;

/// Posts the run result to a webhook. The body is `{"count_added": n}` unless a
/// template is configured, in which case `{count}` and `{run_id}` are substituted.
pub struct WebhookNotifier {
    http: Client,
    url: String,
    template: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: String, template: Option<String>, http: Client) -> Self {
        Self {
            http,
            url,
            template,
        }
    }
}

#[async_trait]
impl NotificationSink for WebhookNotifier {
    async fn notify(&self, notification: &RunNotification) -> Result<()> {
        let payload = build_payload(notification, self.template.as_deref())?;
        self.http
            .post(&self.url)
            .header("Content-Type", "application/json")
            .body(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(Default)]
pub struct NoopNotifier;

#[async_trait]
impl NotificationSink for NoopNotifier {
    async fn notify(&self, notification: &RunNotification) -> Result<()> {
        debug!(count_added = notification.count_added, "no notify_url configured");
        Ok(())
    }
}

pub fn build_notifier(config: &NotifierConfig) -> Result<Arc<dyn NotificationSink>> {
    match &config.url {
        Some(url) => Ok(Arc::new(WebhookNotifier::new(
            url.clone(),
            config.template.clone(),
            http_client(config.request_timeout)?,
        ))),
        None => Ok(Arc::new(NoopNotifier)),
    }
}

fn build_payload(notification: &RunNotification, template: Option<&str>) -> Result<String> {
    match template {
        Some(template) => Ok(template
            .replace("{count}", &notification.count_added.to_string())
            .replace("{run_id}", &notification.run_id.to_string())),
        None => Ok(serde_json::to_string(&json!({
            "count_added": notification.count_added,
        }))?),
    }
}
