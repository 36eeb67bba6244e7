//! Snapshot extraction from explorer address pages.
//!
//! The explorer has no stable data API for this, so the fields are recovered
//! from rendered markup:
//! - transaction count: the word after "transacted" in the visible text
//! - last amount / date: the last `<span>` inside fixed positions of the
//!   vertical transaction list
//!
//! All knowledge of the page layout lives here. When the explorer changes its
//! markup, this is the only file that needs to change.

use crate::error::ExtractionError;
use scraper::{ElementRef, Html, Selector};
use wallet_alert_core::{Snapshot, TransactionCount};

/// Word that precedes the transaction count in the page summary.
pub const COUNT_ANCHOR: &str = "transacted";

/// Cell holding the amount of the most recent transaction.
pub const AMOUNT_SELECTOR: &str = r#"div[direction="vertical"] > div > div:last-of-type"#;

/// Row holding the date of the most recent transaction.
pub const DATE_SELECTOR: &str = r#"div[direction="vertical"] > div:nth-of-type(2)"#;

/// Elements whose text is never rendered.
const HIDDEN_ELEMENTS: [&str; 2] = ["script", "style"];

/// Turns page markup into a [`Snapshot`].
pub trait SnapshotExtractor: Send + Sync {
    fn extract(&self, markup: &str) -> Result<Snapshot, ExtractionError>;
}

/// Extractor for the blockchain.com address page layout.
#[derive(Debug)]
pub struct ExplorerPageExtractor {
    amount: Selector,
    date: Selector,
    span: Selector,
}

impl ExplorerPageExtractor {
    pub fn new() -> Result<Self, ExtractionError> {
        Ok(Self {
            amount: parse_selector(AMOUNT_SELECTOR)?,
            date: parse_selector(DATE_SELECTOR)?,
            span: parse_selector("span")?,
        })
    }

    /// Text of the last `<span>` below the first element matching `container`.
    fn last_span_text(&self, document: &Html, container: &Selector) -> Option<String> {
        let element = document.select(container).next()?;
        let span = element.select(&self.span).last()?;
        Some(span.text().collect::<String>().trim().to_string())
    }
}

impl SnapshotExtractor for ExplorerPageExtractor {
    fn extract(&self, markup: &str) -> Result<Snapshot, ExtractionError> {
        let document = Html::parse_document(markup);

        let transaction_count = transaction_count(&document)?;

        let amount = self
            .last_span_text(&document, &self.amount)
            .ok_or(ExtractionError::MissingAmount)?;

        let date = self
            .last_span_text(&document, &self.date)
            .ok_or(ExtractionError::MissingDate)?;

        Ok(Snapshot::new(transaction_count, amount, date))
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector).map_err(|e| ExtractionError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

fn transaction_count(document: &Html) -> Result<TransactionCount, ExtractionError> {
    let text = visible_text(document.root_element());
    let mut tokens = text.split_whitespace();

    if !tokens.any(|t| t == COUNT_ANCHOR) {
        return Err(ExtractionError::MissingAnchor(COUNT_ANCHOR));
    }

    tokens
        .next()
        .map(TransactionCount::new)
        .ok_or(ExtractionError::MissingCountToken)
}

/// Concatenated text of every text node not inside a `<script>` or `<style>`.
fn visible_text(root: ElementRef<'_>) -> String {
    let mut out = String::new();

    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| HIDDEN_ELEMENTS.contains(&e.name()))
        });

        if !hidden {
            out.push_str(text);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(summary: &str) -> String {
        format!(
            r#"<html>
<head>
  <title>Bitcoin Address</title>
  <style>.x {{ content: "transacted 999"; }}</style>
</head>
<body>
  <script>var t = "transacted 12345";</script>
  <p>{summary}</p>
  <div direction="vertical">
    <div>
      <div><span>Hash</span></div>
      <div><span>Amount</span><span>-0.00120000 BTC</span></div>
    </div>
    <div>
      <span>Date</span><span>2021-04-03 10:21</span>
    </div>
  </div>
</body>
</html>"#
        )
    }

    fn extractor() -> ExplorerPageExtractor {
        ExplorerPageExtractor::new().unwrap()
    }

    #[test]
    fn test_extracts_all_fields() {
        let markup = page("This address has transacted 1,284 times on the Bitcoin blockchain.");
        let snapshot = extractor().extract(&markup).unwrap();

        assert_eq!(snapshot.transaction_count.as_str(), "1,284");
        assert_eq!(snapshot.last_transaction_amount, "-0.00120000 BTC");
        assert_eq!(snapshot.last_transaction_date, "2021-04-03 10:21");
    }

    #[test]
    fn test_ignores_script_and_style_text() {
        let markup = page("No activity summary here.");
        let err = extractor().extract(&markup).unwrap_err();
        assert_eq!(err, ExtractionError::MissingAnchor(COUNT_ANCHOR));
    }

    #[test]
    fn test_anchor_split_across_elements() {
        let markup = page("has <b>transacted</b> <span>7</span> times");
        let snapshot = extractor().extract(&markup).unwrap();
        assert_eq!(snapshot.transaction_count.as_str(), "7");
    }

    #[test]
    fn test_anchor_must_be_whole_token() {
        let markup = page("nontransacted 5 times");
        let err = extractor().extract(&markup).unwrap_err();
        assert_eq!(err, ExtractionError::MissingAnchor(COUNT_ANCHOR));
    }

    #[test]
    fn test_anchor_as_last_token() {
        let markup = r#"<html><body><p>has transacted</p></body></html>"#;
        let err = extractor().extract(markup).unwrap_err();
        assert_eq!(err, ExtractionError::MissingCountToken);
    }

    #[test]
    fn test_missing_amount_container() {
        let markup = r#"<html><body><p>transacted 3 times</p></body></html>"#;
        let err = extractor().extract(markup).unwrap_err();
        assert_eq!(err, ExtractionError::MissingAmount);
    }

    #[test]
    fn test_missing_date_spans() {
        let markup = r#"<html><body>
<p>transacted 3 times</p>
<div direction="vertical">
  <div><div><span>0.5 BTC</span></div></div>
  <div>no spans here</div>
</div>
</body></html>"#;
        let err = extractor().extract(markup).unwrap_err();
        assert_eq!(err, ExtractionError::MissingDate);
    }

    #[test]
    fn test_error_page_never_yields_snapshot() {
        for markup in [
            "",
            "<html></html>",
            "<html><body><h1>429 Too Many Requests</h1></body></html>",
            "transacted",
        ] {
            assert!(extractor().extract(markup).is_err(), "markup: {markup:?}");
        }
    }
}
