//! Notification message templates.

use wallet_alert_core::{Snapshot, WalletAddress};

/// Markup convention used by a channel when rendering links and code spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// Telegram MarkdownV2: reserved characters must be escaped.
    MarkdownV2,
    /// Discord-style markdown: `<url>` suppresses the link embed.
    Markdown,
}

/// A notification about the watched wallet.
#[derive(Debug, Clone)]
pub enum AlertMessage {
    /// First successful observation.
    Started {
        wallet: WalletAddress,
        url: String,
        snapshot: Snapshot,
    },
    /// Transaction count changed since the previous observation.
    Changed {
        wallet: WalletAddress,
        url: String,
        snapshot: Snapshot,
    },
}

impl AlertMessage {
    pub fn started(wallet: &WalletAddress, url: &str, snapshot: &Snapshot) -> Self {
        AlertMessage::Started {
            wallet: wallet.clone(),
            url: url.to_string(),
            snapshot: snapshot.clone(),
        }
    }

    pub fn changed(wallet: &WalletAddress, url: &str, snapshot: &Snapshot) -> Self {
        AlertMessage::Changed {
            wallet: wallet.clone(),
            url: url.to_string(),
            snapshot: snapshot.clone(),
        }
    }

    /// Render the message text for a channel's markup style.
    pub fn render(&self, style: LinkStyle) -> String {
        match self {
            AlertMessage::Started {
                wallet,
                url,
                snapshot,
            } => format!(
                "Start monitoring of Bitcoin wallet {}\nLast transaction: {}",
                link(style, wallet.label(), url),
                code(
                    style,
                    &format!(
                        "{} ({} UTC)",
                        snapshot.last_transaction_amount, snapshot.last_transaction_date
                    )
                ),
            ),
            AlertMessage::Changed {
                wallet,
                url,
                snapshot,
            } => format!(
                "🚨 The wallet {} changed by {}",
                link(style, wallet.label(), url),
                code(style, &snapshot.last_transaction_amount),
            ),
        }
    }
}

fn link(style: LinkStyle, label: &str, url: &str) -> String {
    match style {
        LinkStyle::MarkdownV2 => format!("[{}]({})", escape_text(label), escape_link_url(url)),
        LinkStyle::Markdown => format!("[{}](<{}>)", label, url),
    }
}

fn code(style: LinkStyle, content: &str) -> String {
    match style {
        LinkStyle::MarkdownV2 => format!("`{}`", escape_code(content)),
        LinkStyle::Markdown => format!("`{}`", content.replace('`', "'")),
    }
}

/// MarkdownV2 characters that must be escaped in plain text.
const MARKDOWN_V2_RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

fn escape_with(input: &str, reserved: &[char]) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if reserved.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn escape_text(input: &str) -> String {
    escape_with(input, MARKDOWN_V2_RESERVED)
}

fn escape_code(input: &str) -> String {
    escape_with(input, &['`', '\\'])
}

fn escape_link_url(input: &str) -> String {
    escape_with(input, &[')', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wallet_alert_core::TransactionCount;

    const ADDR: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";

    fn fixture() -> (WalletAddress, String, Snapshot) {
        let wallet = WalletAddress::parse(ADDR).unwrap();
        let url = format!("https://www.blockchain.com/btc/address/{}", ADDR);
        let snapshot = Snapshot::new(
            TransactionCount::new("1,284"),
            "-0.0012 BTC",
            "2021-04-03 10:21",
        );
        (wallet, url, snapshot)
    }

    #[test]
    fn test_started_markdown() {
        let (wallet, url, snapshot) = fixture();
        let msg = AlertMessage::started(&wallet, &url, &snapshot);
        assert_eq!(
            msg.render(LinkStyle::Markdown),
            format!(
                "Start monitoring of Bitcoin wallet [1A1zP1eP](<{}>)\n\
                 Last transaction: `-0.0012 BTC (2021-04-03 10:21 UTC)`",
                url
            )
        );
    }

    #[test]
    fn test_started_markdown_v2() {
        let (wallet, url, snapshot) = fixture();
        let msg = AlertMessage::started(&wallet, &url, &snapshot);
        assert_eq!(
            msg.render(LinkStyle::MarkdownV2),
            format!(
                "Start monitoring of Bitcoin wallet [1A1zP1eP]({})\n\
                 Last transaction: `-0.0012 BTC (2021-04-03 10:21 UTC)`",
                url
            )
        );
    }

    #[test]
    fn test_changed_contains_amount() {
        let (wallet, url, snapshot) = fixture();
        let msg = AlertMessage::changed(&wallet, &url, &snapshot);
        assert_eq!(
            msg.render(LinkStyle::Markdown),
            format!("🚨 The wallet [1A1zP1eP](<{}>) changed by `-0.0012 BTC`", url)
        );
        assert!(msg.render(LinkStyle::MarkdownV2).contains("`-0.0012 BTC`"));
    }

    #[test]
    fn test_markdown_v2_escaping() {
        assert_eq!(escape_text("a_b.c-d!"), r"a\_b\.c\-d\!");
        assert_eq!(escape_code(r"1`2\3"), r"1\`2\\3");
        assert_eq!(escape_link_url("https://x.io/a(b)"), r"https://x.io/a(b\)");
    }
}
