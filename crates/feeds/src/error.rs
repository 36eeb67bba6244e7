//! Error types for page fetching and extraction.

use thiserror::Error;

/// Errors while downloading the address page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("explorer returned HTTP {0}")]
    Status(u16),

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout(_))
    }

    /// 429 and 5xx are usually the explorer throttling or having a bad moment.
    pub fn is_upstream_busy(&self) -> bool {
        matches!(self, FetchError::Status(code) if *code == 429 || *code >= 500)
    }
}

/// The page was fetched but did not have the expected shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("anchor word {0:?} not found in page text")]
    MissingAnchor(&'static str),

    #[error("no token follows the transaction count anchor")]
    MissingCountToken,

    #[error("last transaction amount not found")]
    MissingAmount,

    #[error("last transaction date not found")]
    MissingDate,

    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_classification() {
        let timeout = FetchError::Timeout(std::time::Duration::from_secs(30));
        assert!(timeout.is_timeout());
        assert!(!timeout.is_upstream_busy());

        assert!(FetchError::Status(429).is_upstream_busy());
        assert!(FetchError::Status(503).is_upstream_busy());
        assert!(!FetchError::Status(404).is_upstream_busy());
    }

    #[test]
    fn test_extraction_error_display() {
        assert_eq!(
            ExtractionError::MissingAnchor("transacted").to_string(),
            "anchor word \"transacted\" not found in page text"
        );
    }
}
