//! Telegram Bot API channel.

use crate::channel::{http_client, Channel, DeliveryError, DELIVERY_TIMEOUT};
use crate::config::ChannelKind;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

const CHANNEL: &str = "Telegram";

/// Error body returned by the Bot API on failure.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages to one chat through `sendMessage`.
pub struct TelegramChannel {
    bot_token: String,
    chat_id: String,
    api_base: String,
    http_client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(bot_token: String, chat_id: String) -> Result<Self, reqwest::Error> {
        Ok(Self {
            bot_token,
            chat_id,
            api_base: TELEGRAM_API_BASE.to_string(),
            http_client: http_client(DELIVERY_TIMEOUT)?,
        })
    }

    /// Point the channel at a different Bot API server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Telegram
    }

    async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        let params = [
            ("chat_id", self.chat_id.as_str()),
            ("text", text),
            ("parse_mode", "MarkdownV2"),
            ("disable_web_page_preview", "true"),
        ];

        let response = self
            .http_client
            .post(self.send_message_url())
            .form(&params)
            .send()
            .await
            .map_err(|e| DeliveryError::from_reqwest(CHANNEL, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let description = serde_json::from_str::<ApiResponse>(&body)
                .ok()
                .and_then(|r| r.description)
                .unwrap_or(body);
            return Err(DeliveryError::Status {
                channel: CHANNEL,
                status: status.as_u16(),
                description,
            });
        }

        debug!("Telegram message delivered to chat {}", self.chat_id);
        Ok(())
    }
}
