// Shared test helpers: scripted in-memory container runtime and payload builders

#![allow(dead_code)]

use dockerstats::docker_repo::{ContainerRuntime, Result, RuntimeError};
use dockerstats::metrics::fields;
use dockerstats::models::*;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
struct FakeState {
    list_fails: bool,
    containers: BTreeMap<String, (ContainerMetadata, StatsSample)>,
    failing: HashSet<String>,
    hold: Option<(Arc<Notify>, Arc<Notify>)>,
}

pub struct FakeRuntime {
    platform: RuntimePlatform,
    state: Mutex<FakeState>,
}

impl FakeRuntime {
    pub fn new(platform: RuntimePlatform) -> Self {
        Self {
            platform,
            state: Mutex::new(FakeState::default()),
        }
    }

    pub fn windows() -> Self {
        Self::new(RuntimePlatform::Windows)
    }

    pub fn set_container(&self, metadata: ContainerMetadata, stats: StatsSample) {
        let mut state = self.state.lock().unwrap();
        state
            .containers
            .insert(metadata.id.clone(), (metadata, stats));
    }

    pub fn set_stats(&self, id: &str, stats: StatsSample) {
        let mut state = self.state.lock().unwrap();
        if let Some(entry) = state.containers.get_mut(id) {
            entry.1 = stats;
        }
    }

    pub fn remove_container(&self, id: &str) {
        self.state.lock().unwrap().containers.remove(id);
    }

    pub fn fail_container(&self, id: &str, fail: bool) {
        let mut state = self.state.lock().unwrap();
        if fail {
            state.failing.insert(id.to_string());
        } else {
            state.failing.remove(id);
        }
    }

    pub fn fail_list(&self, fail: bool) {
        self.state.lock().unwrap().list_fails = fail;
    }

    /// Make the next stats calls wait on `release`; `entered` is notified when one starts waiting.
    pub fn hold_stats(&self, entered: Arc<Notify>, release: Arc<Notify>) {
        self.state.lock().unwrap().hold = Some((entered, release));
    }

    pub fn clear_hold(&self) {
        self.state.lock().unwrap().hold = None;
    }

    fn lookup(&self, id: &str) -> Result<(ContainerMetadata, StatsSample)> {
        let state = self.state.lock().unwrap();
        if state.failing.contains(id) {
            return Err(RuntimeError::malformed(id, "scripted failure"));
        }
        state
            .containers
            .get(id)
            .cloned()
            .ok_or_else(|| RuntimeError::malformed(id, "no such container"))
    }
}

impl ContainerRuntime for FakeRuntime {
    fn platform(&self) -> RuntimePlatform {
        self.platform
    }

    async fn list_containers(&self) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        if state.list_fails {
            return Err(RuntimeError::malformed("<list>", "scripted list failure"));
        }
        Ok(state.containers.keys().cloned().collect())
    }

    async fn inspect(&self, id: &str) -> Result<ContainerMetadata> {
        self.lookup(id).map(|(metadata, _)| metadata)
    }

    async fn stats(&self, id: &str) -> Result<StatsSample> {
        let hold = self.state.lock().unwrap().hold.clone();
        if let Some((entered, release)) = hold {
            entered.notify_one();
            release.notified().await;
        }
        self.lookup(id).map(|(_, stats)| stats)
    }
}

pub fn metadata(id: &str, labels: &[(&str, &str)]) -> ContainerMetadata {
    ContainerMetadata {
        id: id.to_string(),
        name: format!("/{}", id),
        image: format!("{}:latest", id),
        labels: labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        networks: vec![AttachedNetwork {
            name: "nat".into(),
            endpoint_id: Some(format!("ep-{}", id)),
        }],
        ..Default::default()
    }
}

/// Windows-style stats with CPU, memory, storage and one `eth0` interface.
pub fn stats(id: &str, cpu_total: u64, rx_bytes: u64) -> StatsSample {
    let mut networks = BTreeMap::new();
    networks.insert(
        "eth0".to_string(),
        NetworkSample {
            endpoint_id: Some(format!("ep-{}", id)),
            counters: CounterFields::from([(fields::RX_BYTES, rx_bytes), (fields::TX_BYTES, 0)]),
        },
    );
    StatsSample {
        name: Some(format!("/{}", id)),
        cpu: Some(CpuSample {
            total_usage: cpu_total,
            kernel_usage: cpu_total / 2,
        }),
        memory: Some(MemorySample {
            commit_bytes: 4096,
            private_working_set_bytes: 2048,
        }),
        filesystem: Some(CounterFields::from([
            (fields::READ_SIZE_BYTES, cpu_total / 1000),
            (fields::READ_COUNT_NORMALIZED, 1),
        ])),
        networks,
    }
}

/// Value of the series of `metric` whose `id` label is `/docker/<id>`.
pub fn sample_value(rendered: &str, metric: &str, id: &str) -> Option<f64> {
    let prefix = format!("{}{{", metric);
    let id_label = format!("id=\"/docker/{}\"", id);
    rendered
        .lines()
        .filter(|l| l.starts_with(&prefix) && l.contains(&id_label))
        .find_map(|l| l.rsplit(' ').next()?.parse().ok())
}
