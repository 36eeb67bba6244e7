//! Explorer page collection for the wallet alert watcher.
//!
//! - `page` - fetching the raw address page over HTTP
//! - `extractor` - turning page markup into a [`Snapshot`](wallet_alert_core::Snapshot)
//! - `error` - fetch and extraction error types

pub mod error;
pub mod extractor;
pub mod page;

pub use error::*;
pub use extractor::{ExplorerPageExtractor, SnapshotExtractor};
pub use page::{HttpPageSource, PageSource, BROWSER_USER_AGENT, DEFAULT_FETCH_TIMEOUT};

#[cfg(test)]
pub(crate) mod test_server;
