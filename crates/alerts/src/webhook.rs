//! Chat webhook channel (Discord-compatible `content` payload).

use crate::channel::{http_client, Channel, DeliveryError, DELIVERY_TIMEOUT};
use crate::config::ChannelKind;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const CHANNEL: &str = "Webhook";

pub struct WebhookChannel {
    url: String,
    http_client: reqwest::Client,
}

impl WebhookChannel {
    pub fn new(url: String) -> Result<Self, reqwest::Error> {
        Self::with_timeout(url, DELIVERY_TIMEOUT)
    }

    pub fn with_timeout(url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            url,
            http_client: http_client(timeout)?,
        })
    }
}

#[async_trait]
impl Channel for WebhookChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Webhook
    }

    async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        let response = self
            .http_client
            .post(&self.url)
            .json(&json!({ "content": text }))
            .send()
            .await
            .map_err(|e| DeliveryError::from_reqwest(CHANNEL, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status {
                channel: CHANNEL,
                status: status.as_u16(),
                description: response.text().await.unwrap_or_default(),
            });
        }

        debug!("Webhook message delivered");
        Ok(())
    }
}
