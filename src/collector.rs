// One collection pass: sample every container, account deltas, commit, update baselines.

use futures_util::future::join_all;
use std::sync::Arc;

use crate::accountant::account;
use crate::docker_repo::{ContainerRuntime, RuntimeError};
use crate::labels::LabelUniverse;
use crate::metrics::MetricRegistry;
use crate::models::{ContainerSnapshot, RuntimePlatform};
use crate::snapshot_store::SnapshotStore;

/// Why a cycle was abandoned without touching any state.
#[derive(Debug, thiserror::Error)]
pub enum CycleFailure {
    #[error("unable to list containers: {0}")]
    ListFailed(#[source] RuntimeError),
    #[error("unable to get containers: none listed")]
    NoContainers,
}

#[derive(Debug)]
pub enum CycleOutcome {
    /// Updates were committed and baselines stored.
    Committed {
        sampled: usize,
        failed: usize,
        updates: usize,
    },
    Failed(CycleFailure),
    /// The runtime platform's stats are not accounted.
    Unsupported(RuntimePlatform),
}

struct Pass {
    snapshots: Vec<ContainerSnapshot>,
    failed: usize,
}

/// Owns the baseline store and drives accounting into the shared registry.
pub struct Collector<R> {
    runtime: Arc<R>,
    store: SnapshotStore,
    registry: Arc<MetricRegistry>,
}

impl<R: ContainerRuntime> Collector<R> {
    /// Run the first pass, derive the label universe from it, register every metric, and keep
    /// the pass as the initial baseline. Nothing is emitted for the first pass.
    pub async fn bootstrap(runtime: Arc<R>, collect_default_metrics: bool) -> anyhow::Result<Self> {
        let pass = match sample_all(runtime.as_ref()).await {
            Ok(pass) => pass,
            Err(e) => {
                tracing::warn!(error = %e, operation = "bootstrap", "Initial collection failed");
                Pass {
                    snapshots: Vec::new(),
                    failed: 0,
                }
            }
        };

        let universe = LabelUniverse::from_metadata(pass.snapshots.iter().map(|s| &s.metadata));
        let registry = Arc::new(MetricRegistry::bootstrap(universe, collect_default_metrics)?);

        let mut store = SnapshotStore::new();
        if runtime.platform().is_supported() {
            for snapshot in pass.snapshots {
                store.put(snapshot.id.clone(), snapshot);
            }
        }
        tracing::info!(
            baselines = store.len(),
            failed = pass.failed,
            "Bootstrap complete"
        );

        Ok(Self {
            runtime,
            store,
            registry,
        })
    }

    pub fn registry(&self) -> Arc<MetricRegistry> {
        self.registry.clone()
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// One collection cycle. A failed cycle leaves the registry and baselines untouched.
    pub async fn collect_once(&mut self) -> CycleOutcome {
        let pass = match sample_all(self.runtime.as_ref()).await {
            Ok(pass) => pass,
            Err(e) => {
                tracing::error!(error = %e, operation = "collect", "Collection cycle failed");
                return CycleOutcome::Failed(e);
            }
        };

        let platform = self.runtime.platform();
        if !platform.is_supported() {
            tracing::error!(?platform, "not supported yet, use cadvisor");
            return CycleOutcome::Unsupported(platform);
        }

        let universe = self.registry.universe();
        let mut updates = Vec::new();
        for snapshot in &pass.snapshots {
            updates.extend(account(self.store.get(&snapshot.id), snapshot, universe));
        }
        self.registry.apply(&updates).await;

        let sampled = pass.snapshots.len();
        for snapshot in pass.snapshots {
            self.store.put(snapshot.id.clone(), snapshot);
        }

        tracing::debug!(
            sampled,
            failed = pass.failed,
            updates = updates.len(),
            "Collection cycle committed"
        );
        CycleOutcome::Committed {
            sampled,
            failed: pass.failed,
            updates: updates.len(),
        }
    }
}

/// List containers, then inspect and sample each one concurrently. A container whose calls
/// fail is logged and left out; only listing failures abandon the pass.
async fn sample_all<R: ContainerRuntime>(runtime: &R) -> Result<Pass, CycleFailure> {
    let ids = runtime
        .list_containers()
        .await
        .map_err(CycleFailure::ListFailed)?;
    if ids.is_empty() {
        return Err(CycleFailure::NoContainers);
    }

    let results = join_all(ids.iter().map(|id| sample_one(runtime, id))).await;

    let mut snapshots = Vec::with_capacity(results.len());
    let mut failed = 0;
    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(e) => {
                failed += 1;
                tracing::warn!(
                    error = %e,
                    container_id = %id,
                    operation = "sample_container",
                    "Skipping container this cycle"
                );
            }
        }
    }
    Ok(Pass { snapshots, failed })
}

async fn sample_one<R: ContainerRuntime>(
    runtime: &R,
    id: &str,
) -> Result<ContainerSnapshot, RuntimeError> {
    let (metadata, stats) = tokio::try_join!(runtime.inspect(id), runtime.stats(id))?;
    Ok(ContainerSnapshot::new(metadata, stats))
}
