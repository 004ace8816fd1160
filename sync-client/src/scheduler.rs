//! Periodic sync scheduling.
//!
//! Each instance gets one background task that triggers a cycle on every
//! tick of its interval, plus one immediately at startup when configured.
//! Manual refreshes go straight to the instance; single-flight there keeps
//! them from overlapping with scheduled cycles.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::instance::{SyncInstance, TriggerOutcome};
use crate::source::MessageSource;
use crate::store::CacheStore;

/// Default time between scheduled cycles (30 minutes).
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30 * 60);

const MIN_INTERVAL: Duration = Duration::from_secs(1);

const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Scheduling settings for one instance.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Time between scheduled cycles.
    pub interval: Duration,
    /// Run a cycle as soon as the scheduler starts.
    pub refresh_on_start: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            refresh_on_start: true,
        }
    }
}

/// Handle to a running scheduler.
pub struct SchedulerHandle<S: MessageSource, C: CacheStore> {
    instance: Arc<SyncInstance<S, C>>,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl<S, C> SchedulerHandle<S, C>
where
    S: MessageSource + 'static,
    C: CacheStore + 'static,
{
    /// Trigger a cycle now and wait for its outcome.
    pub async fn refresh(&self) -> TriggerOutcome {
        tracing::debug!("[{}] Manual refresh requested", self.instance.id());
        self.instance.trigger().await
    }

    /// The scheduled instance.
    pub fn instance(&self) -> &Arc<SyncInstance<S, C>> {
        &self.instance
    }

    /// Stop scheduling and shut the instance down.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            tracing::error!("[{}] Scheduler task failed: {}", self.instance.id(), e);
        }
        self.instance.shutdown().await;
    }
}

/// Spawn the background scheduler for an instance.
pub fn spawn_scheduler<S, C>(
    instance: Arc<SyncInstance<S, C>>,
    config: ScheduleConfig,
) -> SchedulerHandle<S, C>
where
    S: MessageSource + 'static,
    C: CacheStore + 'static,
{
    let (shutdown, mut stop) = oneshot::channel();
    let period = config.interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
    let start = if config.refresh_on_start {
        Instant::now()
    } else {
        Instant::now() + period
    };

    let task = {
        let instance = instance.clone();
        tokio::spawn(async move {
            tracing::info!(
                "[{}] Scheduler started (interval: {}s)",
                instance.id(),
                period.as_secs()
            );

            let mut timer = interval_at(start, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop => break,
                    _ = timer.tick() => {}
                }

                match instance.trigger().await {
                    TriggerOutcome::Completed(report) => {
                        if report.added > 0 {
                            tracing::info!(
                                "[{}] Scheduled sync: {} new messages",
                                instance.id(),
                                report.added
                            );
                        } else {
                            tracing::debug!("[{}] Scheduled sync: no new messages", instance.id());
                        }
                    }
                    TriggerOutcome::Failed(_) => {}
                    TriggerOutcome::Coalesced => {
                        tracing::debug!("[{}] Scheduled sync skipped, cycle running", instance.id())
                    }
                    TriggerOutcome::Closed => break,
                }
            }

            tracing::info!("[{}] Scheduler stopped", instance.id());
        })
    };

    SchedulerHandle {
        instance,
        shutdown,
        task,
    }
}
