//! Snapshot of an address page at one point in time.

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction count exactly as displayed by the explorer (e.g. "1,284").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionCount(CompactString);

impl TransactionCount {
    pub fn new(token: &str) -> Self {
        Self(CompactString::new(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, ignoring thousands separators. `None` if the token is not a number.
    pub fn as_u64(&self) -> Option<u64> {
        let digits: String = self
            .0
            .chars()
            .filter(|c| !matches!(c, ',' | '_' | '\u{202f}' | '\u{a0}'))
            .collect();
        digits.parse().ok()
    }

    /// Signed change from `previous` to `self`, if both tokens are numeric.
    pub fn delta_from(&self, previous: &TransactionCount) -> Option<i128> {
        Some(i128::from(self.as_u64()?) - i128::from(previous.as_u64()?))
    }
}

impl fmt::Display for TransactionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fields extracted from one fetch of the address page.
///
/// Equality only looks at `transaction_count`; amount and date are
/// message payload, not part of change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub transaction_count: TransactionCount,
    pub last_transaction_amount: String,
    pub last_transaction_date: String,
    pub observed_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(
        transaction_count: TransactionCount,
        last_transaction_amount: impl Into<String>,
        last_transaction_date: impl Into<String>,
    ) -> Self {
        Self {
            transaction_count,
            last_transaction_amount: last_transaction_amount.into(),
            last_transaction_date: last_transaction_date.into(),
            observed_at: Utc::now(),
        }
    }

    #[inline]
    pub fn same_count(&self, other: &Snapshot) -> bool {
        self.transaction_count == other.transaction_count
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.same_count(other)
    }
}

impl Eq for Snapshot {}
