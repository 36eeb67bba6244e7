//! Per-address watch state.

use wallet_alert_core::{Snapshot, TransactionCount, WalletAddress};

/// Result of comparing a fresh snapshot with the retained one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// First successful observation of the address.
    Started,
    /// Transaction count differs from the previous snapshot.
    Changed { previous: TransactionCount },
    /// Same transaction count as before.
    Unchanged,
}

/// State owned by one watch loop.
///
/// `previous` only changes on the first observation or when the transaction
/// count differs; failed polls never reach this type.
#[derive(Debug)]
pub struct WatchState {
    address: WalletAddress,
    previous: Option<Snapshot>,
    is_first_observation: bool,
}

impl WatchState {
    pub fn new(address: WalletAddress) -> Self {
        Self {
            address,
            previous: None,
            is_first_observation: true,
        }
    }

    pub fn address(&self) -> &WalletAddress {
        &self.address
    }

    pub fn previous(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }

    pub fn is_first_observation(&self) -> bool {
        self.is_first_observation
    }

    /// Diff `snapshot` against the retained snapshot and update state.
    pub fn observe(&mut self, snapshot: &Snapshot) -> Observation {
        match &self.previous {
            None => {
                self.previous = Some(snapshot.clone());
                self.is_first_observation = false;
                Observation::Started
            }
            Some(prev) if prev.same_count(snapshot) => Observation::Unchanged,
            Some(prev) => {
                let previous = prev.transaction_count.clone();
                self.previous = Some(snapshot.clone());
                Observation::Changed { previous }
            }
        }
    }
}
