//! Notification delivery for wallet changes.
//!
//! This crate provides:
//! - Channel configuration resolved once at startup
//! - Telegram Bot API and chat webhook channels
//! - Message templates for "monitoring started" and "change detected"
//! - A notifier that fans a message out to every channel, tolerating failures

pub mod channel;
pub mod config;
pub mod message;
pub mod notifier;
pub mod telegram;
pub mod webhook;

pub use channel::{Channel, DeliveryError};
pub use config::{ChannelConfig, ChannelKind};
pub use message::{AlertMessage, LinkStyle};
pub use notifier::{DeliveryReport, Notifier};
pub use telegram::TelegramChannel;
pub use webhook::WebhookChannel;

#[cfg(test)]
pub(crate) mod test_server;
