//! The poll → extract → diff → notify → sleep loop for one address.

use crate::state::{Observation, WatchState};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use wallet_alert_alerts::{AlertMessage, Notifier};
use wallet_alert_core::{Snapshot, WalletAddress};
use wallet_alert_feeds::{ExtractionError, FetchError, PageSource, SnapshotExtractor};

const OBSERVED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Failed iterations in a row before each repeated outage warning.
const OUTAGE_WARN_EVERY: u32 = 10;

/// Why a single poll produced no snapshot.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("unexpected page layout: {0}")]
    Extraction(#[from] ExtractionError),
}

/// Delay until the next period boundary measured from the loop start.
///
/// Keeps iterations on a fixed cadence no matter how long each one took:
/// `period - (elapsed % period)`. A zero period yields no delay.
pub fn next_delay(period: Duration, elapsed: Duration) -> Duration {
    let period_nanos = period.as_nanos();
    if period_nanos == 0 {
        return Duration::ZERO;
    }
    let into_period = (elapsed.as_nanos() % period_nanos) as u64;
    period - Duration::from_nanos(into_period)
}

/// Watches a single address until told to stop.
pub struct WatchLoop {
    state: WatchState,
    page_url: String,
    period: Duration,
    source: Box<dyn PageSource>,
    extractor: Box<dyn SnapshotExtractor>,
    notifier: Notifier,
    consecutive_failures: u32,
}

impl WatchLoop {
    pub fn new(
        wallet: WalletAddress,
        page_url: String,
        period: Duration,
        source: Box<dyn PageSource>,
        extractor: Box<dyn SnapshotExtractor>,
        notifier: Notifier,
    ) -> Self {
        Self {
            state: WatchState::new(wallet),
            page_url,
            period,
            source,
            extractor,
            notifier,
            consecutive_failures: 0,
        }
    }

    pub fn state(&self) -> &WatchState {
        &self.state
    }

    /// One fetch, extract, diff and (maybe) notify pass.
    ///
    /// Errors abort the pass before the state is touched.
    pub async fn poll_once(&mut self) -> Result<Observation, PollError> {
        let markup = self.source.fetch(&self.page_url).await?;
        let snapshot = self.extractor.extract(&markup)?;

        let observation = self.state.observe(&snapshot);
        match &observation {
            Observation::Started => {
                self.log_started(&snapshot);
                let message = AlertMessage::started(self.state.address(), &self.page_url, &snapshot);
                self.deliver(&message).await;
            }
            Observation::Changed { previous } => {
                info!(
                    "+-+-+-+-+ Changes detected ({}) +-+-+-+-+",
                    snapshot.observed_at.format(OBSERVED_AT_FORMAT)
                );
                info!("New number of transactions: {}", snapshot.transaction_count);
                if let Some(delta) = snapshot.transaction_count.delta_from(previous) {
                    debug!("Transaction count moved by {:+}", delta);
                }
                info!("The wallet changed by: {}", snapshot.last_transaction_amount);
                let message = AlertMessage::changed(self.state.address(), &self.page_url, &snapshot);
                self.deliver(&message).await;
            }
            Observation::Unchanged => debug!("No changes"),
        }

        Ok(observation)
    }

    fn log_started(&self, snapshot: &Snapshot) {
        info!(
            "+-+-+-+-+ Start Monitoring ({}) +-+-+-+-+",
            snapshot.observed_at.format(OBSERVED_AT_FORMAT)
        );
        info!("Wallet: {}", self.state.address());
        info!("URL: {}", self.page_url);
        info!(
            "Original number of transactions: {}",
            snapshot.transaction_count
        );
        info!(
            "Last transaction was: {} ({} UTC)",
            snapshot.last_transaction_amount, snapshot.last_transaction_date
        );
    }

    /// Send `message` to every channel, warning when any channel missed it.
    async fn deliver(&self, message: &AlertMessage) {
        let report = self.notifier.notify(message).await;
        if !report.all_delivered() {
            warn!(
                failed = ?report.failed,
                "Notification not delivered to every channel; it will not be resent"
            );
        }
    }

    fn record_failure(&mut self, err: &PollError) {
        self.consecutive_failures += 1;
        error!(
            failures = self.consecutive_failures,
            "Check of {} failed: {}",
            self.state.address().label(),
            err
        );
        if let PollError::Fetch(e) = err {
            if e.is_upstream_busy() {
                warn!("Explorer is throttling or unavailable, retrying next period");
            }
        }
        if self.consecutive_failures % OUTAGE_WARN_EVERY == 0 {
            warn!(
                "{} consecutive checks failed; still polling every {:?}",
                self.consecutive_failures, self.period
            );
        }
    }

    /// Poll forever on a period-aligned cadence until `shutdown` becomes true
    /// or its sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Watching {} every {:?} ({} channel(s))",
            self.state.address(),
            self.period,
            self.notifier.channel_kinds().len()
        );
        let started_at = Instant::now();

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.poll_once().await {
                Ok(_) => {
                    if self.consecutive_failures > 0 {
                        info!(
                            "Check recovered after {} failure(s)",
                            self.consecutive_failures
                        );
                    }
                    self.consecutive_failures = 0;
                }
                Err(e) => self.record_failure(&e),
            }

            let delay = next_delay(self.period, started_at.elapsed());
            debug!("Next check in {:?}", delay);

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        if self.state.is_first_observation() {
            warn!("Stopped before the first successful check");
        }
        info!("Watch loop stopped");
    }
}
