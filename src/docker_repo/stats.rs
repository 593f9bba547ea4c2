// Parse raw Docker inspect/stats API responses into typed snapshot parts.

use bollard::models::{ContainerInspectResponse, ContainerStatsResponse};
use std::collections::BTreeMap;

use super::error::{Result, RuntimeError};
use crate::metrics::fields;
use crate::models::{
    AttachedNetwork, ContainerMetadata, CounterFields, CpuSample, MemorySample, NetworkSample,
    StatsSample,
};

/// Static metadata from an inspect response. Fails only when the id is missing.
pub(crate) fn process_inspect(s: &ContainerInspectResponse) -> Result<ContainerMetadata> {
    let id = s
        .id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| RuntimeError::malformed("<unknown>", "inspect response has no Id"))?;

    let config = s.config.as_ref();
    let image = config.and_then(|c| c.image.clone()).unwrap_or_default();
    let labels: BTreeMap<String, String> = config
        .and_then(|c| c.labels.as_ref())
        .map(|l| l.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();

    let host_config = s.host_config.as_ref();
    let nano_cpus = host_config.and_then(|h| h.nano_cpus);
    let memory_limit_bytes = host_config.and_then(|h| h.memory);

    let mut networks: Vec<AttachedNetwork> = s
        .network_settings
        .as_ref()
        .and_then(|n| n.networks.as_ref())
        .map(|n| {
            n.iter()
                .map(|(name, endpoint)| AttachedNetwork {
                    name: name.clone(),
                    endpoint_id: endpoint.endpoint_id.clone().filter(|e| !e.is_empty()),
                })
                .collect()
        })
        .unwrap_or_default();
    networks.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(ContainerMetadata {
        id,
        name: s.name.clone().unwrap_or_default(),
        image,
        labels,
        nano_cpus,
        memory_limit_bytes,
        networks,
    })
}

/// Typed sample from a non-streaming stats response. Sub-structures the runtime did not
/// report are `None`; a response for another container is rejected.
pub(crate) fn process_statistics(s: &ContainerStatsResponse, id: &str) -> Result<StatsSample> {
    if let Some(reported) = s.id.as_deref()
        && !reported.is_empty()
        && reported != id
    {
        return Err(RuntimeError::malformed(
            id,
            format!("stats response is for container {reported}"),
        ));
    }

    let cpu = s
        .cpu_stats
        .as_ref()
        .and_then(|c| c.cpu_usage.as_ref())
        .and_then(|u| {
            Some(CpuSample {
                total_usage: u.total_usage?,
                kernel_usage: u.usage_in_kernelmode?,
            })
        });

    let memory = s.memory_stats.as_ref().and_then(|m| {
        Some(MemorySample {
            commit_bytes: m.commitbytes?,
            private_working_set_bytes: m.privateworkingset?,
        })
    });

    let filesystem = s.storage_stats.as_ref().map(|st| {
        counter_fields([
            (fields::READ_SIZE_BYTES, st.read_size_bytes),
            (fields::READ_COUNT_NORMALIZED, st.read_count_normalized),
            (fields::WRITE_SIZE_BYTES, st.write_size_bytes),
            (fields::WRITE_COUNT_NORMALIZED, st.write_count_normalized),
        ])
    });

    let networks = s
        .networks
        .as_ref()
        .map(|n| {
            n.iter()
                .map(|(key, v)| {
                    let sample = NetworkSample {
                        endpoint_id: v.endpoint_id.clone().filter(|e| !e.is_empty()),
                        counters: counter_fields([
                            (fields::RX_BYTES, v.rx_bytes),
                            (fields::RX_ERRORS, v.rx_errors),
                            (fields::RX_DROPPED, v.rx_dropped),
                            (fields::RX_PACKETS, v.rx_packets),
                            (fields::TX_BYTES, v.tx_bytes),
                            (fields::TX_ERRORS, v.tx_errors),
                            (fields::TX_DROPPED, v.tx_dropped),
                            (fields::TX_PACKETS, v.tx_packets),
                        ]),
                    };
                    (key.clone(), sample)
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(StatsSample {
        name: s.name.clone().filter(|n| !n.is_empty()),
        cpu,
        memory,
        filesystem,
        networks,
    })
}

fn counter_fields<const N: usize>(values: [(&'static str, Option<u64>); N]) -> CounterFields {
    values
        .into_iter()
        .filter_map(|(name, v)| v.map(|v| (name, v)))
        .collect()
}
