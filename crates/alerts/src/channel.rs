//! Delivery channel abstraction.

use crate::config::ChannelKind;
use crate::message::LinkStyle;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Timeout applied to every outbound notification request.
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("{channel} request timed out")]
    Timeout { channel: &'static str },
    #[error("{channel} request failed: {source}")]
    Request {
        channel: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{channel} returned HTTP {status}: {description}")]
    Status {
        channel: &'static str,
        status: u16,
        description: String,
    },
}

impl DeliveryError {
    pub(crate) fn from_reqwest(channel: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DeliveryError::Timeout { channel }
        } else {
            DeliveryError::Request {
                channel,
                source: err,
            }
        }
    }
}

/// A configured destination for text notifications.
#[async_trait]
pub trait Channel: Send + Sync {
    fn kind(&self) -> ChannelKind;

    /// Markup convention the channel renders messages with.
    fn link_style(&self) -> LinkStyle {
        self.kind().link_style()
    }

    /// Deliver one already-rendered message.
    async fn send(&self, text: &str) -> Result<(), DeliveryError>;
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}
