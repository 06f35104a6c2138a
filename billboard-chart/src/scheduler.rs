//! Periodic, cancellable driver for [`LeaderboardRegistry::tick`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::LeaderboardRegistry;

/// Default pause between ticks.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(60 * 60);

/// Spawns the background recompute loop.
#[derive(Debug, Clone, Copy)]
pub struct RecomputeScheduler;

impl RecomputeScheduler {
    /// Start ticking `registry` every `period` on the current tokio runtime.
    ///
    /// The first tick runs immediately. Each tick runs on the blocking pool
    /// and the next sleep starts only after it finishes, so ticks never
    /// overlap.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(registry: Arc<LeaderboardRegistry>, period: Duration) -> SchedulerHandle {
        let token = CancellationToken::new();
        let ticks = Arc::new(AtomicU64::new(0));
        let task = tokio::spawn(run(registry, period, token.clone(), Arc::clone(&ticks)));
        SchedulerHandle { token, ticks, task }
    }
}

/// Handle to a running scheduler.
#[derive(Debug)]
pub struct SchedulerHandle {
    token: CancellationToken,
    ticks: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Token that stops the loop when cancelled.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Number of completed ticks.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Cancel the loop and wait for it to exit.
    ///
    /// A tick already in progress finishes first.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        self.token.cancel();
        self.task.await
    }
}

async fn run(
    registry: Arc<LeaderboardRegistry>,
    period: Duration,
    token: CancellationToken,
    ticks: Arc<AtomicU64>,
) {
    log::info!("recompute scheduler started; period {period:?}");
    while !token.is_cancelled() {
        let worker = Arc::clone(&registry);
        match tokio::task::spawn_blocking(move || worker.tick()).await {
            Ok(report) => {
                log::debug!(
                    "tick finished: {} recomputed, {} skipped, {} failed",
                    report.recomputed.len(),
                    report.skipped,
                    report.failures.len()
                );
            }
            Err(err) => log::error!("recompute tick aborted: {err}"),
        }
        ticks.fetch_add(1, Ordering::AcqRel);

        tokio::select! {
            () = token.cancelled() => break,
            () = tokio::time::sleep(period) => {}
        }
    }
    log::info!("recompute scheduler stopped");
}
