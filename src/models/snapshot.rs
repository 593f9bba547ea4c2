// Point-in-time container snapshot: inspection metadata plus one stats sample

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::{ContainerMetadata, NetworkSample};

/// Cumulative counters keyed by their runtime field name (e.g. "read_size_bytes", "rx_bytes").
/// Only fields present in the payload are inserted.
pub type CounterFields = BTreeMap<&'static str, u64>;

/// Cumulative CPU usage in the runtime's native 100ns units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuSample {
    pub total_usage: u64,
    pub kernel_usage: u64,
}

/// Point-in-time memory values in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySample {
    pub commit_bytes: u64,
    pub private_working_set_bytes: u64,
}

/// Typed result of one non-streaming stats call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSample {
    pub name: Option<String>,
    pub cpu: Option<CpuSample>,
    pub memory: Option<MemorySample>,
    pub filesystem: Option<CounterFields>,
    /// Keyed by the stats payload's interface key.
    pub networks: BTreeMap<String, NetworkSample>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerSnapshot {
    pub id: String,
    pub metadata: ContainerMetadata,
    pub stats: StatsSample,
    pub sampled_at: DateTime<Utc>,
}

impl ContainerSnapshot {
    pub fn new(metadata: ContainerMetadata, stats: StatsSample) -> Self {
        Self::at(metadata, stats, Utc::now())
    }

    pub fn at(metadata: ContainerMetadata, stats: StatsSample, sampled_at: DateTime<Utc>) -> Self {
        Self {
            id: metadata.id.clone(),
            metadata,
            stats,
            sampled_at,
        }
    }

    /// Name reported by the stats call, falling back to the inspected name.
    pub fn name(&self) -> &str {
        self.stats
            .name
            .as_deref()
            .unwrap_or(self.metadata.name.as_str())
    }
}
