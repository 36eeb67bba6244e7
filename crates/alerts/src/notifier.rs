//! Fan-out of alert messages to every configured channel.

use crate::channel::Channel;
use crate::config::{ChannelConfig, ChannelKind};
use crate::message::AlertMessage;
use tracing::{debug, error, info};

/// Outcome of delivering one message to all channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: Vec<ChannelKind>,
    pub failed: Vec<ChannelKind>,
}

impl DeliveryReport {
    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Sends alert messages to a fixed set of channels.
pub struct Notifier {
    channels: Vec<Box<dyn Channel>>,
}

impl Notifier {
    pub fn new(channels: Vec<Box<dyn Channel>>) -> Self {
        Self { channels }
    }

    /// Build one channel client per configuration entry.
    pub fn from_configs(configs: &[ChannelConfig]) -> Result<Self, reqwest::Error> {
        let channels = configs
            .iter()
            .map(ChannelConfig::build)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(channels))
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel_kinds(&self) -> Vec<ChannelKind> {
        self.channels.iter().map(|c| c.kind()).collect()
    }

    /// Deliver `message` to every channel in order.
    ///
    /// A failing channel is logged and skipped; it never prevents delivery
    /// to the remaining channels and no error reaches the caller.
    pub async fn notify(&self, message: &AlertMessage) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        if self.channels.is_empty() {
            debug!("No notification channels enabled");
            return report;
        }

        for channel in &self.channels {
            let kind = channel.kind();
            let text = message.render(channel.link_style());

            match channel.send(&text).await {
                Ok(()) => report.delivered.push(kind),
                Err(e) => {
                    error!(channel = %kind, "Failed to send notification: {}", e);
                    report.failed.push(kind);
                }
            }
        }

        info!(
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            "Notification sent"
        );
        report
    }
}
