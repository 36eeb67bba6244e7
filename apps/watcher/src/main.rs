//! Wallet Alert - address watcher
//!
//! Polls a block explorer address page and sends a notification whenever the
//! wallet's transaction count changes.

mod config;
mod state;
mod watch;

use clap::Parser;
use config::{AppConfig, Cli};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tokio::sync::watch::Sender;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use wallet_alert_alerts::Notifier;
use wallet_alert_feeds::{ExplorerPageExtractor, HttpPageSource};
use watch::WatchLoop;

/// Exit code for configuration errors detected before the loop starts.
const EXIT_CONFIG: u8 = 2;

/// How long the loop gets to finish its current iteration after Ctrl+C.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

fn init_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// `.env` next to the executable, if there is one.
fn env_file_beside(exe: &Path) -> Option<PathBuf> {
    let path = exe.parent()?.join(".env");
    path.is_file().then_some(path)
}

/// Load `.env` from the executable's directory, then from the working
/// directory. Variables already set are never overridden.
fn load_dotenv() {
    if let Some(path) = std::env::current_exe()
        .ok()
        .and_then(|exe| env_file_beside(&exe))
    {
        match dotenvy::from_path(&path) {
            Ok(()) => debug!("Loaded environment from {}", path.display()),
            Err(e) => warn!("Failed to load {}: {}", path.display(), e),
        }
    }

    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);
    load_dotenv();

    let config = match AppConfig::resolve(&cli, |key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    debug!("Resolved configuration: {:?}", config);

    let source = match HttpPageSource::new(config.fetch_timeout) {
        Ok(source) => source,
        Err(e) => {
            error!("Failed to create page client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let extractor = match ExplorerPageExtractor::new() {
        Ok(extractor) => extractor,
        Err(e) => {
            error!("Failed to create page extractor: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let notifier = match Notifier::from_configs(&config.channels) {
        Ok(notifier) => notifier,
        Err(e) => {
            error!("Failed to create notification channels: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if notifier.is_empty() {
        warn!("No notification channel enabled; changes will only be logged");
    }

    let watch_loop = WatchLoop::new(
        config.wallet,
        config.page_url,
        config.poll_period,
        Box::new(source),
        Box::new(extractor),
        notifier,
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let loop_handle = tokio::spawn(watch_loop.run(shutdown_rx));

    info!("Press Ctrl+C to stop...");

    let outcome = supervise(loop_handle, shutdown_tx, tokio::signal::ctrl_c()).await;
    if outcome == Outcome::Graceful {
        info!("👋 Wallet alert stopped");
    }
    outcome.exit_code()
}

/// How the watcher ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Stopped after an external termination signal.
    Graceful,
    /// The watch loop ended without being asked to.
    LoopExited,
}

impl Outcome {
    fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Graceful => ExitCode::SUCCESS,
            Outcome::LoopExited => ExitCode::FAILURE,
        }
    }
}

/// Wait for `signal`, then stop the loop. If the signal cannot be
/// listened for, keep the loop running until the process is killed.
async fn supervise<S>(
    mut loop_handle: JoinHandle<()>,
    shutdown_tx: Sender<bool>,
    signal: S,
) -> Outcome
where
    S: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        signal = signal => match signal {
            Ok(()) => {
                warn!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
                if tokio::time::timeout(SHUTDOWN_GRACE, &mut loop_handle).await.is_err() {
                    warn!("Watch loop did not stop in time, aborting");
                    loop_handle.abort();
                }
                return Outcome::Graceful;
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}; running until the process is killed", e);
            }
        },
        result = &mut loop_handle => return loop_exited(result),
    }

    loop_exited(loop_handle.await)
}

fn loop_exited(result: Result<(), JoinError>) -> Outcome {
    match result {
        Ok(()) => error!("Watch loop exited without a shutdown request"),
        Err(e) => error!("Watch loop terminated unexpectedly: {}", e),
    }
    Outcome::LoopExited
}
