//! Single dedicated worker that runs reconciliation cycles for one repository.
//!
//! All cycles for a repository run on one task, one at a time, because the
//! provider hands each batch of changes to exactly one `fetch` caller. A
//! cycle runs on the blocking pool so a slow repository never stalls the
//! runtime, and its result is swapped into the [`LiveCache`] only when the
//! whole reconciliation succeeded.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use quire_update::Updater;

use crate::cache::LiveCache;
use crate::error::{SyncError, SyncResult};

/// What one cycle did to the live cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleReport {
    /// The repository had nothing pending.
    Unchanged,
    /// A new snapshot was swapped in.
    Applied {
        generation: u64,
        posts: usize,
        configurations: usize,
    },
}

enum Command {
    CheckNow(oneshot::Sender<SyncResult<CycleReport>>),
    Shutdown,
}

/// Spawns the per-repository sync task.
pub struct SyncWorker;

impl SyncWorker {
    /// Start the worker on the current tokio runtime.
    ///
    /// The worker runs one cycle immediately, then one per `interval`, plus
    /// any requested through [`SyncClient::check_now`]. A zero `interval`
    /// is rejected before anything is spawned.
    pub fn spawn(
        updater: Arc<Updater>,
        cache: Arc<LiveCache>,
        interval: Duration,
    ) -> SyncResult<WorkerHandle> {
        if interval.is_zero() {
            return Err(SyncError::ZeroInterval);
        }
        let (tx, rx) = mpsc::channel(16);
        let task = tokio::spawn(run(updater, cache, interval, rx));
        Ok(WorkerHandle {
            client: SyncClient { tx },
            task,
        })
    }
}

/// Owner handle for a running worker.
pub struct WorkerHandle {
    client: SyncClient,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// A cloneable client for requesting immediate checks.
    pub fn client(&self) -> SyncClient {
        self.client.clone()
    }

    pub async fn check_now(&self) -> SyncResult<CycleReport> {
        self.client.check_now().await
    }

    /// Stop the worker after any in-flight cycle and wait for it to exit.
    pub async fn shutdown(self) -> SyncResult<()> {
        // A send error means the task already exited.
        let _ = self.client.tx.send(Command::Shutdown).await;
        self.task
            .await
            .map_err(|e| SyncError::CycleAborted(e.to_string()))
    }
}

/// Requests cycles from a running worker.
#[derive(Clone)]
pub struct SyncClient {
    tx: mpsc::Sender<Command>,
}

impl SyncClient {
    /// Run a cycle now and wait for its report.
    ///
    /// Queued behind any cycle already in progress.
    pub async fn check_now(&self) -> SyncResult<CycleReport> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::CheckNow(reply))
            .await
            .map_err(|_| SyncError::WorkerStopped)?;
        rx.await.map_err(|_| SyncError::WorkerStopped)?
    }
}

async fn run(
    updater: Arc<Updater>,
    cache: Arc<LiveCache>,
    interval: Duration,
    mut rx: mpsc::Receiver<Command>,
) {
    let repo = updater.repository().reference().clone();
    info!(%repo, interval_secs = interval.as_secs(), "sync worker started");

    log_cycle(run_cycle(&updater, &cache).await);

    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => log_cycle(run_cycle(&updater, &cache).await),
            command = rx.recv() => match command {
                Some(Command::CheckNow(reply)) => {
                    // The requester may have gone away; the cycle still counts.
                    let _ = reply.send(run_cycle(&updater, &cache).await);
                }
                Some(Command::Shutdown) | None => break,
            },
        }
    }

    info!(%repo, "sync worker stopped");
}

/// One fetch-and-reconcile cycle against the current snapshot.
async fn run_cycle(updater: &Arc<Updater>, cache: &Arc<LiveCache>) -> SyncResult<CycleReport> {
    let current = cache.snapshot();
    let updater = Arc::clone(updater);
    let outcome = tokio::task::spawn_blocking(move || updater.check_updates(&current))
        .await
        .map_err(|e| SyncError::CycleAborted(e.to_string()))??;

    let Some(next) = outcome.into_snapshot() else {
        return Ok(CycleReport::Unchanged);
    };
    let posts = next.posts.len();
    let configurations = next.configurations.len();
    let generation = cache.replace(next);
    Ok(CycleReport::Applied {
        generation,
        posts,
        configurations,
    })
}

fn log_cycle(result: SyncResult<CycleReport>) {
    match result {
        Ok(CycleReport::Unchanged) => debug!("sync cycle: no changes"),
        Ok(CycleReport::Applied {
            generation,
            posts,
            configurations,
        }) => info!(generation, posts, configurations, "sync cycle applied"),
        Err(e) => warn!(error = %e, "sync cycle failed, keeping previous snapshot"),
    }
}
