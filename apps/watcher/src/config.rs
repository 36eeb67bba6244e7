//! Command line and environment configuration.

use clap::Parser;
use std::time::Duration;
use thiserror::Error;
use wallet_alert_alerts::{ChannelConfig, ChannelKind};
use wallet_alert_core::{AddressError, WalletAddress, DEFAULT_EXPLORER_BASE};
use wallet_alert_feeds::DEFAULT_FETCH_TIMEOUT;

pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENV_TELEGRAM_CHAT: &str = "TELEGRAM_CHAT";
pub const ENV_WEBHOOK_URL: &str = "DISCORD_WEBHOOK_URL";

pub const DEFAULT_POLL_PERIOD_SECS: u64 = 60;

/// Bitcoin wallet alert
#[derive(Parser, Debug, Clone)]
#[command(name = "wallet-alert")]
#[command(about = "Notify when a Bitcoin wallet's transaction count changes", long_about = None)]
pub struct Cli {
    /// Wallet address to check
    #[arg(long)]
    pub wallet: String,

    /// Send a Telegram notification
    #[arg(long)]
    pub telegram_notify: bool,

    /// Send a Discord (webhook) notification
    #[arg(long, visible_alias = "webhook-notify")]
    pub discord_notify: bool,

    /// Time in seconds between successive checks
    #[arg(
        long = "time",
        value_name = "SECS",
        default_value_t = DEFAULT_POLL_PERIOD_SECS,
        num_args = 0..=1,
        default_missing_value = "1"
    )]
    pub period_secs: u64,

    /// Enable debug level logging
    #[arg(long)]
    pub debug: bool,

    /// Explorer base URL
    #[arg(long, default_value = DEFAULT_EXPLORER_BASE)]
    pub explorer_url: String,

    /// Page fetch timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs())]
    pub fetch_timeout: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid wallet address: {0}")]
    InvalidAddress(#[from] AddressError),

    #[error("polling period must be at least 1 second")]
    ZeroPeriod,

    #[error("fetch timeout must be at least 1 second")]
    ZeroTimeout,

    #[error("{channel} notifications enabled but {var} is not set")]
    MissingCredential {
        channel: ChannelKind,
        var: &'static str,
    },

    #[error("invalid {what} URL {value:?}: {reason}")]
    InvalidUrl {
        what: &'static str,
        value: String,
        reason: String,
    },
}

/// Fully resolved configuration, built once before the watch loop starts.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub wallet: WalletAddress,
    pub page_url: String,
    pub poll_period: Duration,
    pub fetch_timeout: Duration,
    pub channels: Vec<ChannelConfig>,
}

impl AppConfig {
    /// Resolve CLI flags plus credentials looked up through `env`.
    pub fn resolve<F>(cli: &Cli, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let wallet = WalletAddress::parse(&cli.wallet)?;

        if cli.period_secs == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if cli.fetch_timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        check_http_url("explorer", &cli.explorer_url)?;

        let required = |channel: ChannelKind, var: &'static str| {
            env(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingCredential { channel, var })
        };

        let mut channels = Vec::new();

        if cli.telegram_notify {
            channels.push(ChannelConfig::Telegram {
                bot_token: required(ChannelKind::Telegram, ENV_TELEGRAM_TOKEN)?,
                chat_id: required(ChannelKind::Telegram, ENV_TELEGRAM_CHAT)?,
            });
        }

        if cli.discord_notify {
            let url = required(ChannelKind::Webhook, ENV_WEBHOOK_URL)?;
            check_http_url("webhook", &url)?;
            channels.push(ChannelConfig::Webhook { url });
        }

        Ok(Self {
            page_url: wallet.observation_url(&cli.explorer_url),
            wallet,
            poll_period: Duration::from_secs(cli.period_secs),
            fetch_timeout: Duration::from_secs(cli.fetch_timeout),
            channels,
        })
    }
}

fn check_http_url(what: &'static str, value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        what,
        value: value.to_string(),
        reason,
    };

    let parsed = url::Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme {other:?}"))),
    }
}
