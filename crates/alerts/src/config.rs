//! Channel configuration types.

use crate::channel::Channel;
use crate::message::LinkStyle;
use crate::telegram::TelegramChannel;
use crate::webhook::WebhookChannel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Telegram,
    Webhook,
}

impl ChannelKind {
    pub fn name(self) -> &'static str {
        match self {
            ChannelKind::Telegram => "telegram",
            ChannelKind::Webhook => "webhook",
        }
    }

    pub fn link_style(self) -> LinkStyle {
        match self {
            ChannelKind::Telegram => LinkStyle::MarkdownV2,
            ChannelKind::Webhook => LinkStyle::Markdown,
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Credentials for one enabled channel.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChannelConfig {
    Telegram { bot_token: String, chat_id: String },
    Webhook { url: String },
}

// Tokens and webhook URLs are credentials; keep them out of logs.
impl fmt::Debug for ChannelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelConfig::Telegram { chat_id, .. } => f
                .debug_struct("Telegram")
                .field("bot_token", &"<redacted>")
                .field("chat_id", chat_id)
                .finish(),
            ChannelConfig::Webhook { .. } => f
                .debug_struct("Webhook")
                .field("url", &"<redacted>")
                .finish(),
        }
    }
}

impl ChannelConfig {
    pub fn kind(&self) -> ChannelKind {
        match self {
            ChannelConfig::Telegram { .. } => ChannelKind::Telegram,
            ChannelConfig::Webhook { .. } => ChannelKind::Webhook,
        }
    }

    /// Build the channel client for this configuration.
    pub fn build(&self) -> Result<Box<dyn Channel>, reqwest::Error> {
        Ok(match self {
            ChannelConfig::Telegram { bot_token, chat_id } => {
                Box::new(TelegramChannel::new(bot_token.clone(), chat_id.clone())?)
            }
            ChannelConfig::Webhook { url } => Box::new(WebhookChannel::new(url.clone())?),
        })
    }
}
