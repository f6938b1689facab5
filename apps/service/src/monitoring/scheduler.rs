use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::executor::ProbeExecutor;
use super::store::ResultStore;

/// Default time between two probe rounds
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(120);

/// Lifecycle of a [`MonitoringScheduler`]. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SchedulerState {
    Idle = 0,
    Running = 1,
    Stopped = 2,
}

impl SchedulerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Running,
            _ => Self::Stopped,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("scheduler is already running")]
    AlreadyStarted,
    #[error("scheduler has been stopped")]
    Stopped,
}

/// Monitoring scheduler - probes every target once per round, one round per tick
pub struct MonitoringScheduler {
    executor: Arc<ProbeExecutor>,
    store: Arc<ResultStore>,
    targets: Arc<[String]>,
    period: Duration,
    cancel: CancellationToken,
    state: Arc<AtomicU8>,
    rounds: Arc<AtomicU64>,
}

impl MonitoringScheduler {
    /// `cancel` stops the timer loop once cancelled, typically the process-wide shutdown token
    pub fn new(
        executor: Arc<ProbeExecutor>,
        store: Arc<ResultStore>,
        targets: Vec<String>,
        period: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            executor,
            store,
            targets: targets.into(),
            period,
            cancel,
            state: Arc::new(AtomicU8::new(SchedulerState::Idle as u8)),
            rounds: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> SchedulerState {
        SchedulerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Number of probe rounds launched so far
    pub fn rounds_launched(&self) -> u64 {
        self.rounds.load(Ordering::Acquire)
    }

    /// Run the first round right away, then one round per period until cancelled.
    ///
    /// The returned handle completes when the timer loop has exited. Checks
    /// launched before that keep running and still record their outcome.
    pub fn start(&self) -> Result<JoinHandle<()>, SchedulerError> {
        if self.cancel.is_cancelled() {
            let _ = self.state.compare_exchange(
                SchedulerState::Idle as u8,
                SchedulerState::Stopped as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
            return Err(match self.state() {
                SchedulerState::Running => SchedulerError::AlreadyStarted,
                _ => SchedulerError::Stopped,
            });
        }

        self.state
            .compare_exchange(
                SchedulerState::Idle as u8,
                SchedulerState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|current| match SchedulerState::from_u8(current) {
                SchedulerState::Stopped => SchedulerError::Stopped,
                _ => SchedulerError::AlreadyStarted,
            })?;

        if self.targets.is_empty() {
            warn!("Monitoring started without any targets");
        }
        info!("Monitoring {} targets every {:?}", self.targets.len(), self.period);

        launch_round(&self.executor, &self.store, &self.targets, &self.rounds);

        let executor = self.executor.clone();
        let store = self.store.clone();
        let targets = self.targets.clone();
        let rounds = self.rounds.clone();
        let state = self.state.clone();
        let cancel = self.cancel.clone();

        // The first round already ran, so the first tick is one period out
        let mut timer = interval_at(tokio::time::Instant::now() + self.period, self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Ok(tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    _ = cancel.cancelled() => {
                        info!("Monitoring stopped");
                        break;
                    }
                    _ = timer.tick() => {
                        launch_round(&executor, &store, &targets, &rounds);
                    }
                }
            }

            state.store(SchedulerState::Stopped as u8, Ordering::Release);
        }))
    }

    /// Stop launching rounds. In-flight checks are left to finish on their own.
    pub fn stop(&self) {
        // Idle goes straight to Stopped; Running becomes Stopped when the loop exits
        let _ = self.state.compare_exchange(
            SchedulerState::Idle as u8,
            SchedulerState::Stopped as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        self.cancel.cancel();
    }

    /// Launch one round outside the timer, without waiting for it
    pub fn run_round(&self) {
        launch_round(&self.executor, &self.store, &self.targets, &self.rounds);
    }
}

/// Spawn one detached check per target. Each writes its own outcome when done.
fn launch_round(
    executor: &Arc<ProbeExecutor>,
    store: &Arc<ResultStore>,
    targets: &[String],
    rounds: &AtomicU64,
) {
    let round = rounds.fetch_add(1, Ordering::AcqRel) + 1;
    info!("Starting probe round {} for {} targets", round, targets.len());

    for target in targets {
        let executor = executor.clone();
        let store = store.clone();
        let target = target.clone();

        tokio::spawn(async move {
            info!("Checking {}...", target);
            let outcome = executor.check(&target).await;

            info!(
                "HTTP check for {} - Status: {}, Loss: {}, Avg time: {}",
                target,
                outcome.status(),
                outcome.loss(),
                outcome.latency().unwrap_or("-")
            );

            store.upsert(target, outcome).await;
        });
    }
}
