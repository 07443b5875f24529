// src/pipeline/watch.rs

//! Polling lifecycle: load, fetch, diff, notify, save, sleep, repeat.
//!
//! A [`Watcher`] moves through `Bootstrap → Polling → (Restarting | Stopped)`.
//! Once it has been alive longer than the configured lifetime it returns
//! [`LoopExit::Restart`], and [`supervise`] replaces it with a fresh instance
//! that starts over from the durable snapshot.

use std::time::{Duration, Instant};

use tokio::sync::watch;

use crate::models::{Snapshot, WatchConfig};
use crate::pipeline::diff::{ChangeSummary, detect_changes};
use crate::services::{EventSource, FetchOutcome, Notifier};
use crate::storage::{SnapshotStore, StoredSnapshot};

/// Loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Sleep between polls
    pub poll_interval: Duration,
    /// Age at which the watcher asks to be restarted
    pub max_lifetime: Duration,
}

impl From<&WatchConfig> for Timing {
    fn from(config: &WatchConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            max_lifetime: config.max_lifetime(),
        }
    }
}

/// Lifecycle states of a watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Bootstrap,
    Polling,
    Restarting,
    Stopped,
}

/// Why [`Watcher::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Lifetime exceeded; run a fresh watcher.
    Restart,
    /// Shutdown was requested.
    Stopped,
}

/// What a single cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleReport {
    /// The fetched snapshot became the baseline without notifications.
    Baseline { count: usize, saved: bool },
    /// The fetch failed; nothing was compared or written.
    Skipped,
    /// Source matches the stored snapshot.
    Unchanged,
    /// Changes were detected and dispatched.
    Changed {
        delivered: usize,
        failed: usize,
        saved: bool,
    },
}

/// Drives one watcher lifetime.
pub struct Watcher<'a> {
    store: &'a dyn SnapshotStore,
    source: &'a dyn EventSource,
    notifier: &'a dyn Notifier,
    timing: Timing,
    started_at: Instant,
    state: LoopState,
}

impl<'a> Watcher<'a> {
    pub fn new(
        store: &'a dyn SnapshotStore,
        source: &'a dyn EventSource,
        notifier: &'a dyn Notifier,
        timing: Timing,
    ) -> Self {
        Self {
            store,
            source,
            notifier,
            timing,
            started_at: Instant::now(),
            state: LoopState::Bootstrap,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    fn lifetime_exceeded(&self) -> bool {
        self.started_at.elapsed() >= self.timing.max_lifetime
    }

    /// Run until the lifetime is exceeded or shutdown is signalled.
    ///
    /// Shutdown is honoured during the sleep and at cycle boundaries; a cycle
    /// that has started always runs to completion.
    pub async fn run(&mut self, shutdown: &mut watch::Receiver<bool>) -> LoopExit {
        loop {
            match self.state {
                LoopState::Bootstrap => {
                    if *shutdown.borrow() {
                        self.state = LoopState::Stopped;
                        continue;
                    }
                    let report = self.run_cycle().await;
                    log::debug!("Bootstrap cycle: {:?}", report);
                    self.state = LoopState::Polling;
                }
                LoopState::Polling => {
                    tokio::select! {
                        _ = tokio::time::sleep(self.timing.poll_interval) => {}
                        _ = stop_signalled(shutdown) => {
                            self.state = LoopState::Stopped;
                            continue;
                        }
                    }

                    log::info!("Checking for updates...");
                    let report = self.run_cycle().await;
                    log::debug!("Poll cycle: {:?}", report);

                    if *shutdown.borrow() {
                        self.state = LoopState::Stopped;
                    } else if self.lifetime_exceeded() {
                        log::info!(
                            "Watcher has run for {:?}; restarting",
                            self.started_at.elapsed()
                        );
                        self.state = LoopState::Restarting;
                    }
                }
                LoopState::Restarting => return LoopExit::Restart,
                LoopState::Stopped => return LoopExit::Stopped,
            }
        }
    }

    /// Why the stored state cannot be diffed against, if it cannot.
    ///
    /// Absent or corrupt state is always re-seeded. A valid empty snapshot
    /// is a first run only at bootstrap; later it is diffed like any other.
    fn baseline_reason(&self, stored: &StoredSnapshot) -> Option<&'static str> {
        match stored {
            StoredSnapshot::Absent => Some("No stored snapshot"),
            StoredSnapshot::Corrupt => Some("Stored snapshot is unreadable"),
            StoredSnapshot::Loaded(snapshot)
                if snapshot.is_empty() && self.state == LoopState::Bootstrap =>
            {
                Some("Stored snapshot is empty")
            }
            StoredSnapshot::Loaded(_) => None,
        }
    }

    /// Run one load → fetch → diff → notify → save pass.
    pub async fn run_cycle(&self) -> CycleReport {
        let stored = self.store.load_state().await;

        let current = match self.source.fetch().await {
            FetchOutcome::Events(snapshot) => snapshot,
            FetchOutcome::Empty => Snapshot::new(),
            FetchOutcome::Failed(reason) => {
                log::warn!("Skipping cycle, fetch failed: {}", reason);
                return CycleReport::Skipped;
            }
        };

        if let Some(reason) = self.baseline_reason(&stored) {
            log::info!("{}. Creating baseline with {} events", reason, current.len());
            let saved = self.persist(&current).await;
            return CycleReport::Baseline {
                count: current.len(),
                saved,
            };
        }

        let previous = stored.into_snapshot();
        log::debug!(
            "Loaded {} stored events, fetched {} events",
            previous.len(),
            current.len()
        );

        let changes = detect_changes(&previous, &current);
        if changes.is_empty() {
            log::info!("No changes detected.");
            return CycleReport::Unchanged;
        }

        log::info!("Detected changes: {}", ChangeSummary::of(&changes));

        let mut delivered = 0;
        let mut failed = 0;
        for change in &changes {
            let event = change.event();
            match self.notifier.notify(change).await {
                Ok(()) => {
                    delivered += 1;
                    log::info!("Sent {} event: {}", change.kind(), event.display_name());
                }
                Err(e) => {
                    failed += 1;
                    log::error!(
                        "Failed to send {} event {} ({}): {}",
                        change.kind(),
                        event.id,
                        event.display_name(),
                        e
                    );
                }
            }
        }

        let saved = self.persist(&current).await;
        CycleReport::Changed {
            delivered,
            failed,
            saved,
        }
    }

    async fn persist(&self, snapshot: &Snapshot) -> bool {
        match self.store.save(snapshot).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save snapshot: {}", e);
                false
            }
        }
    }
}

/// Resolve once shutdown has been requested. Pends forever if the sender is
/// gone, since then nobody can request it.
async fn stop_signalled(shutdown: &mut watch::Receiver<bool>) {
    let signalled = shutdown.wait_for(|stop| *stop).await.is_ok();
    if !signalled {
        std::future::pending::<()>().await;
    }
}

/// Run watchers back to back until shutdown, restarting whenever one
/// exceeds its lifetime. Returns the number of restarts.
pub async fn supervise(
    store: &dyn SnapshotStore,
    source: &dyn EventSource,
    notifier: &dyn Notifier,
    timing: Timing,
    mut shutdown: watch::Receiver<bool>,
) -> usize {
    let mut restarts = 0;
    loop {
        let mut watcher = Watcher::new(store, source, notifier, timing);
        match watcher.run(&mut shutdown).await {
            LoopExit::Restart => {
                restarts += 1;
                log::info!("Restart #{}: reloading state from storage", restarts);
            }
            LoopExit::Stopped => {
                log::info!("Watcher stopped");
                return restarts;
            }
        }
    }
}
