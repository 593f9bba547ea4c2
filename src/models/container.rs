// Static container metadata (from inspection) and runtime platform

use std::collections::BTreeMap;

use super::AttachedNetwork;

/// Operating system the container runtime reports; decides which stats semantics apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimePlatform {
    Windows,
    Linux,
    Unknown,
}

impl RuntimePlatform {
    /// Parse from the Docker version API `Os` string (e.g. "windows", "linux").
    pub fn from_docker(os: &str) -> Self {
        match os.to_lowercase().as_str() {
            "windows" => RuntimePlatform::Windows,
            "linux" => RuntimePlatform::Linux,
            _ => RuntimePlatform::Unknown,
        }
    }

    /// Only Windows stats payloads are accounted; other platforms are a known gap.
    pub fn is_supported(&self) -> bool {
        matches!(self, RuntimePlatform::Windows)
    }
}

/// Inspection metadata; assumed immutable for the container's lifetime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerMetadata {
    pub id: String,
    /// Name as reported by the runtime (leading `/` included).
    pub name: String,
    /// Configured image reference.
    pub image: String,
    /// Raw user-defined labels, keys not yet normalized.
    pub labels: BTreeMap<String, String>,
    /// CPU quota in units of 10^-9 CPUs.
    pub nano_cpus: Option<i64>,
    pub memory_limit_bytes: Option<i64>,
    /// Attached networks, ordered by network name.
    pub networks: Vec<AttachedNetwork>,
}
