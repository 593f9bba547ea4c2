// Metric table: names, kinds, help text, label scope and payload field bindings

use crate::labels::LabelSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

/// Which label schema a metric carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelScope {
    Container,
    /// Container labels plus `interface`.
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricId {
    CpuUsageSeconds,
    CpuSystemSeconds,
    CpuQuota,
    MemoryUsageBytes,
    MemoryWorkingSetBytes,
    MemoryLimitBytes,
    NetworkReceiveBytes,
    NetworkReceiveErrors,
    NetworkReceiveDropped,
    NetworkReceivePackets,
    NetworkTransmitBytes,
    NetworkTransmitErrors,
    NetworkTransmitDropped,
    NetworkTransmitPackets,
    FsReadBytes,
    FsReads,
    FsWriteBytes,
    FsWrites,
}

impl MetricId {
    pub const ALL: [MetricId; 18] = [
        MetricId::CpuUsageSeconds,
        MetricId::CpuSystemSeconds,
        MetricId::CpuQuota,
        MetricId::MemoryUsageBytes,
        MetricId::MemoryWorkingSetBytes,
        MetricId::MemoryLimitBytes,
        MetricId::NetworkReceiveBytes,
        MetricId::NetworkReceiveErrors,
        MetricId::NetworkReceiveDropped,
        MetricId::NetworkReceivePackets,
        MetricId::NetworkTransmitBytes,
        MetricId::NetworkTransmitErrors,
        MetricId::NetworkTransmitDropped,
        MetricId::NetworkTransmitPackets,
        MetricId::FsReadBytes,
        MetricId::FsReads,
        MetricId::FsWriteBytes,
        MetricId::FsWrites,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MetricId::CpuUsageSeconds => "container_cpu_usage_seconds_total",
            MetricId::CpuSystemSeconds => "container_cpu_system_seconds_total",
            MetricId::CpuQuota => "container_spec_cpu_quota",
            MetricId::MemoryUsageBytes => "container_memory_usage_bytes",
            MetricId::MemoryWorkingSetBytes => "container_memory_working_set_bytes",
            MetricId::MemoryLimitBytes => "container_spec_memory_limit_bytes",
            MetricId::NetworkReceiveBytes => "container_network_receive_bytes_total",
            MetricId::NetworkReceiveErrors => "container_network_receive_errors_total",
            MetricId::NetworkReceiveDropped => "container_network_receive_packets_dropped_total",
            MetricId::NetworkReceivePackets => "container_network_receive_packets_total",
            MetricId::NetworkTransmitBytes => "container_network_transmit_bytes_total",
            MetricId::NetworkTransmitErrors => "container_network_transmit_errors_total",
            MetricId::NetworkTransmitDropped => "container_network_transmit_packets_dropped_total",
            MetricId::NetworkTransmitPackets => "container_network_transmit_packets_total",
            MetricId::FsReadBytes => "container_fs_reads_bytes_total",
            MetricId::FsReads => "container_fs_reads_total",
            MetricId::FsWriteBytes => "container_fs_writes_bytes_total",
            MetricId::FsWrites => "container_fs_writes_total",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            MetricId::CpuUsageSeconds => "Cumulative cpu time consumed in seconds.",
            MetricId::CpuSystemSeconds => "Cumulative system cpu time consumed in seconds.",
            MetricId::CpuQuota => "CPU quota of the container.",
            MetricId::MemoryUsageBytes => {
                "Current memory usage in bytes, including all memory regardless of when it was accessed."
            }
            MetricId::MemoryWorkingSetBytes => "Current working set in bytes.",
            MetricId::MemoryLimitBytes => "Memory limit for the container.",
            MetricId::NetworkReceiveBytes => "Cumulative count of bytes received.",
            MetricId::NetworkReceiveErrors => {
                "Cumulative count of errors encountered while receiving."
            }
            MetricId::NetworkReceiveDropped => "Cumulative count of packets dropped while receiving.",
            MetricId::NetworkReceivePackets => "Cumulative count of packets received.",
            MetricId::NetworkTransmitBytes => "Cumulative count of bytes transmitted.",
            MetricId::NetworkTransmitErrors => {
                "Cumulative count of errors encountered while transmitting."
            }
            MetricId::NetworkTransmitDropped => {
                "Cumulative count of packets dropped while transmitting."
            }
            MetricId::NetworkTransmitPackets => "Cumulative count of packets transmitted.",
            MetricId::FsReadBytes => "Cumulative count of bytes read.",
            MetricId::FsReads => "Cumulative count of reads completed.",
            MetricId::FsWriteBytes => "Cumulative count of bytes written.",
            MetricId::FsWrites => "Cumulative count of writes completed.",
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            MetricId::CpuQuota
            | MetricId::MemoryUsageBytes
            | MetricId::MemoryWorkingSetBytes
            | MetricId::MemoryLimitBytes => MetricKind::Gauge,
            _ => MetricKind::Counter,
        }
    }

    pub fn scope(&self) -> LabelScope {
        match self {
            MetricId::NetworkReceiveBytes
            | MetricId::NetworkReceiveErrors
            | MetricId::NetworkReceiveDropped
            | MetricId::NetworkReceivePackets
            | MetricId::NetworkTransmitBytes
            | MetricId::NetworkTransmitErrors
            | MetricId::NetworkTransmitDropped
            | MetricId::NetworkTransmitPackets => LabelScope::Network,
            _ => LabelScope::Container,
        }
    }

    /// Counter fed by a filesystem (storage stats) field.
    pub fn for_filesystem_field(field: &str) -> Option<MetricId> {
        match field {
            fields::READ_SIZE_BYTES => Some(MetricId::FsReadBytes),
            fields::READ_COUNT_NORMALIZED => Some(MetricId::FsReads),
            fields::WRITE_SIZE_BYTES => Some(MetricId::FsWriteBytes),
            fields::WRITE_COUNT_NORMALIZED => Some(MetricId::FsWrites),
            _ => None,
        }
    }

    /// Counter fed by a per-interface network field.
    pub fn for_network_field(field: &str) -> Option<MetricId> {
        match field {
            fields::RX_BYTES => Some(MetricId::NetworkReceiveBytes),
            fields::RX_ERRORS => Some(MetricId::NetworkReceiveErrors),
            fields::RX_DROPPED => Some(MetricId::NetworkReceiveDropped),
            fields::RX_PACKETS => Some(MetricId::NetworkReceivePackets),
            fields::TX_BYTES => Some(MetricId::NetworkTransmitBytes),
            fields::TX_ERRORS => Some(MetricId::NetworkTransmitErrors),
            fields::TX_DROPPED => Some(MetricId::NetworkTransmitDropped),
            fields::TX_PACKETS => Some(MetricId::NetworkTransmitPackets),
            _ => None,
        }
    }
}

/// Field names of the stats payload that feed generic counters.
pub mod fields {
    pub const READ_SIZE_BYTES: &str = "read_size_bytes";
    pub const READ_COUNT_NORMALIZED: &str = "read_count_normalized";
    pub const WRITE_SIZE_BYTES: &str = "write_size_bytes";
    pub const WRITE_COUNT_NORMALIZED: &str = "write_count_normalized";

    pub const RX_BYTES: &str = "rx_bytes";
    pub const RX_ERRORS: &str = "rx_errors";
    pub const RX_DROPPED: &str = "rx_dropped";
    pub const RX_PACKETS: &str = "rx_packets";
    pub const TX_BYTES: &str = "tx_bytes";
    pub const TX_ERRORS: &str = "tx_errors";
    pub const TX_DROPPED: &str = "tx_dropped";
    pub const TX_PACKETS: &str = "tx_packets";
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateOp {
    /// Add to a counter; never negative.
    Increment(f64),
    /// Overwrite a gauge.
    Set(f64),
}

/// One mutation of one series, produced by the delta accountant.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricUpdate {
    pub metric: MetricId,
    pub labels: LabelSet,
    pub op: UpdateOp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = MetricId::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names.len(), MetricId::ALL.len());
    }

    #[test]
    fn counters_end_in_total() {
        for m in MetricId::ALL {
            if m.kind() == MetricKind::Counter {
                assert!(m.name().ends_with("_total"), "{}", m.name());
            }
        }
    }

    #[test]
    fn network_metrics_are_network_scoped() {
        for m in MetricId::ALL {
            let is_net = m.name().starts_with("container_network_");
            assert_eq!(m.scope() == LabelScope::Network, is_net, "{}", m.name());
        }
    }

    #[test]
    fn field_bindings_resolve() {
        assert_eq!(
            MetricId::for_filesystem_field("read_count_normalized"),
            Some(MetricId::FsReads)
        );
        assert_eq!(
            MetricId::for_network_field("tx_dropped"),
            Some(MetricId::NetworkTransmitDropped)
        );
        assert_eq!(MetricId::for_network_field("read_size_bytes"), None);
    }
}
