// Background collection worker: one cycle per tick, never two at once.

use crate::collector::{Collector, CycleOutcome};
use crate::config::MIN_INTERVAL_SECS;
use crate::docker_repo::ContainerRuntime;
use tokio::sync::oneshot;
use tokio::time::{Duration, Instant, interval_at};
use tracing::Instrument;

pub struct WorkerConfig {
    /// Seconds between cycles; raised to [`MIN_INTERVAL_SECS`] if lower.
    pub interval_secs: u64,
}

impl WorkerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(MIN_INTERVAL_SECS))
    }
}

/// Spawn the collection loop. The first cycle runs one interval after the call (bootstrap
/// already sampled once). A tick that fires while a cycle is running is skipped.
pub fn spawn<R>(
    mut collector: Collector<R>,
    config: WorkerConfig,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()>
where
    R: ContainerRuntime + 'static,
{
    let period = config.interval();
    let worker_span = tracing::span!(
        tracing::Level::DEBUG,
        "worker",
        interval_secs = period.as_secs()
    );
    tokio::spawn(async move {
        let mut tick = interval_at(Instant::now() + period, period);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut cycles_failed: u64 = 0;
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    match collector.collect_once().await {
                        CycleOutcome::Committed { failed, .. } if failed > 0 => {
                            tracing::info!(failed, "Cycle committed with skipped containers");
                        }
                        CycleOutcome::Committed { .. } | CycleOutcome::Unsupported(_) => {}
                        CycleOutcome::Failed(_) => {
                            cycles_failed += 1;
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!(cycles_failed, "Worker shutting down");
                    break;
                }
            }
        }
    }
    .instrument(worker_span))
}
