// Delta accounting: turn two snapshots of one container into metric updates

use crate::labels::{LabelSet, LabelUniverse, resolve_interface, resolve_labels, with_interface};
use crate::metrics::{MetricId, MetricUpdate, UpdateOp};
use crate::models::{ContainerSnapshot, CounterFields};

/// Native CPU usage units (100ns) per reported unit.
pub const CPU_USAGE_DIVISOR: f64 = 10_000_000.0;
/// NanoCpus per reported quota unit.
pub const CPU_QUOTA_DIVISOR: f64 = 10_000.0;

/// Updates implied by moving from `previous` to `current`.
///
/// Without a baseline nothing is emitted: counters would otherwise report the container's
/// whole lifetime as one interval, and gauges start with the second observation.
/// A cumulative field that went backwards yields no increment for that field.
pub fn account(
    previous: Option<&ContainerSnapshot>,
    current: &ContainerSnapshot,
    universe: &LabelUniverse,
) -> Vec<MetricUpdate> {
    let Some(previous) = previous else {
        return Vec::new();
    };

    if let Ok(elapsed) = (current.sampled_at - previous.sampled_at).to_std() {
        tracing::trace!(
            container_id = %current.id,
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "Accounting interval"
        );
    }

    let labels = resolve_labels(&current.metadata, current.name(), universe);
    let mut out = Accounting {
        container_id: &current.id,
        updates: Vec::new(),
    };

    if let (Some(new), Some(old)) = (current.stats.cpu, previous.stats.cpu) {
        if let Some(d) = out.delta("total_usage", new.total_usage, old.total_usage) {
            out.increment(MetricId::CpuUsageSeconds, &labels, d as f64 / CPU_USAGE_DIVISOR);
        }
        if let Some(d) = out.delta("usage_in_kernelmode", new.kernel_usage, old.kernel_usage) {
            out.increment(MetricId::CpuSystemSeconds, &labels, d as f64 / CPU_USAGE_DIVISOR);
        }
    }

    if let Some(quota) = current.metadata.nano_cpus.filter(|q| *q > 0) {
        out.set(MetricId::CpuQuota, &labels, quota as f64 / CPU_QUOTA_DIVISOR);
    }

    if let Some(memory) = current.stats.memory {
        out.set(MetricId::MemoryUsageBytes, &labels, memory.commit_bytes as f64);
        out.set(
            MetricId::MemoryWorkingSetBytes,
            &labels,
            memory.private_working_set_bytes as f64,
        );
    }

    if let Some(limit) = current.metadata.memory_limit_bytes.filter(|l| *l > 0) {
        out.set(MetricId::MemoryLimitBytes, &labels, limit as f64);
    }

    if let (Some(new), Some(old)) = (&current.stats.filesystem, &previous.stats.filesystem) {
        out.dispatch(new, old, MetricId::for_filesystem_field, &labels);
    }

    for (key, sample) in &current.stats.networks {
        // An interface first seen this cycle has no baseline yet.
        let Some(old) = previous.stats.networks.get(key) else {
            continue;
        };
        let interface = resolve_interface(&current.metadata, key, sample);
        let net_labels = with_interface(&labels, &interface);
        out.dispatch(
            &sample.counters,
            &old.counters,
            MetricId::for_network_field,
            &net_labels,
        );
    }

    out.updates
}

struct Accounting<'a> {
    container_id: &'a str,
    updates: Vec<MetricUpdate>,
}

impl Accounting<'_> {
    /// `new - old`, or `None` when the counter went backwards (reset on the runtime side).
    fn delta(&self, field: &str, new: u64, old: u64) -> Option<u64> {
        let d = new.checked_sub(old);
        if d.is_none() {
            tracing::debug!(
                container_id = %self.container_id,
                field,
                old,
                new,
                "Counter went backwards; treating as discontinuity"
            );
        }
        d
    }

    /// Increment the counter bound to each field present in both `new` and `old`.
    fn dispatch(
        &mut self,
        new: &CounterFields,
        old: &CounterFields,
        binding: fn(&str) -> Option<MetricId>,
        labels: &LabelSet,
    ) {
        for (field, new_value) in new {
            let Some(old_value) = old.get(field) else {
                continue;
            };
            let Some(metric) = binding(field) else {
                continue;
            };
            if let Some(d) = self.delta(field, *new_value, *old_value) {
                self.increment(metric, labels, d as f64);
            }
        }
    }

    fn increment(&mut self, metric: MetricId, labels: &LabelSet, value: f64) {
        self.updates.push(MetricUpdate {
            metric,
            labels: labels.clone(),
            op: UpdateOp::Increment(value),
        });
    }

    fn set(&mut self, metric: MetricId, labels: &LabelSet, value: f64) {
        self.updates.push(MetricUpdate {
            metric,
            labels: labels.clone(),
            op: UpdateOp::Set(value),
        });
    }
}
