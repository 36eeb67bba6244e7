//! Core data types for the wallet alert watcher.

pub mod snapshot;
pub mod wallet;

pub use snapshot::*;
pub use wallet::*;
