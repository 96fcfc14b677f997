// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `chime serve` command implementation.
//!
//! Opens the SQLite store, wires the delivery scheduler to a console
//! messenger and the system clock, and runs three interval loops: one-shot
//! deliveries, recurring deliveries, and the slow orphan purge. Each loop
//! selects on a shared cancellation token, so SIGINT/SIGTERM drains all
//! three and exits cleanly.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use chime_config::model::ChimeConfig;
use chime_core::error::ChimeError;
use chime_core::traits::{Clock, Messenger, ReminderStore, SystemClock};
use chime_scheduler::{install_signal_handler, DeliveryScheduler};
use chime_storage::SqliteReminderStore;

use crate::console::ConsoleMessenger;

/// Runs the `chime serve` command.
///
/// Blocks until a shutdown signal arrives and all pass loops have drained.
pub async fn run_serve(config: ChimeConfig) -> Result<(), ChimeError> {
    // Initialize tracing subscriber.
    init_tracing(&config.daemon.log_level);

    info!("starting chime serve");

    let store = Arc::new(SqliteReminderStore::open(&config.storage).await?);
    info!(
        path = config.storage.database_path.as_str(),
        wal = config.storage.wal_mode,
        "reminder store opened"
    );

    let messenger: Arc<dyn Messenger> = Arc::new(ConsoleMessenger::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let scheduler = Arc::new(DeliveryScheduler::new(
        store.clone() as Arc<dyn ReminderStore>,
        messenger,
        clock,
    ));

    info!(
        one_shot_secs = config.scheduler.one_shot_interval_secs,
        recurring_secs = config.scheduler.recurring_interval_secs,
        purge_secs = config.scheduler.purge_interval_secs,
        timezone = config.time.default_timezone.as_str(),
        "scheduler wired"
    );

    // Install signal handler.
    let cancel = install_signal_handler();

    // One-shot delivery loop. The first tick fires immediately, so a daemon
    // restart sweeps anything that came due while it was down.
    let one_shot_handle = {
        let scheduler = scheduler.clone();
        let cancel = cancel.clone();
        let interval_secs = config.scheduler.one_shot_interval_secs;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = scheduler.run_one_shot_pass().await {
                            warn!(error = %e, "one-shot pass failed (non-fatal)");
                        }
                    }
                    _ = cancel.cancelled() => {
                        info!("one-shot loop shutting down");
                        break;
                    }
                }
            }
        })
    };

    // Recurring delivery loop. Also sweeps immediately on startup; elapsed
    // occurrences deliver late rather than dropping.
    let recurring_handle = {
        let scheduler = scheduler.clone();
        let cancel = cancel.clone();
        let interval_secs = config.scheduler.recurring_interval_secs;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = scheduler.run_recurring_pass().await {
                            warn!(error = %e, "recurring pass failed (non-fatal)");
                        }
                    }
                    _ = cancel.cancelled() => {
                        info!("recurring loop shutting down");
                        break;
                    }
                }
            }
        })
    };

    // Orphan purge loop. Exhausted rule sets linger as orphans until this
    // sweep; there is no rush, so the first immediate tick is skipped.
    let purge_handle = {
        let store = store.clone();
        let cancel = cancel.clone();
        let interval_secs = config.scheduler.purge_interval_secs;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        match store.purge_orphans().await {
                            Ok(0) => {}
                            Ok(removed) => {
                                info!(removed, "purged exhausted recurring reminders");
                            }
                            Err(e) => {
                                warn!(error = %e, "purge pass failed (non-fatal)");
                            }
                        }
                    }
                    _ = cancel.cancelled() => {
                        info!("purge loop shutting down");
                        break;
                    }
                }
            }
        })
    };

    let _ = tokio::join!(one_shot_handle, recurring_handle, purge_handle);

    store.close().await?;
    info!("chime serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chime={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
