//! Watched wallet address and explorer URL construction.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Explorer used when no base URL is configured.
pub const DEFAULT_EXPLORER_BASE: &str = "https://www.blockchain.com";

/// Number of leading address characters used as a display label.
pub const LABEL_LEN: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("wallet address is empty")]
    Empty,
    #[error("wallet address contains invalid character {0:?}")]
    InvalidChar(char),
}

/// A public blockchain address being watched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletAddress(CompactString);

impl WalletAddress {
    /// Parse an address, rejecting values that would corrupt the observation URL.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }
        if let Some(c) = trimmed
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
        {
            return Err(AddressError::InvalidChar(c));
        }
        Ok(Self(CompactString::new(trimmed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short label: the first 8 characters, or the whole address if shorter.
    pub fn label(&self) -> &str {
        match self.0.char_indices().nth(LABEL_LEN) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }

    /// Address page on the explorer, e.g. `https://www.blockchain.com/btc/address/<addr>`.
    pub fn observation_url(&self, explorer_base: &str) -> String {
        format!(
            "{}/btc/address/{}",
            explorer_base.trim_end_matches('/'),
            self.0
        )
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
