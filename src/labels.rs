// Label resolution: label-name universe and per-container label values

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{ContainerMetadata, NetworkSample};

/// Namespace for user-defined container labels.
pub const USER_LABEL_PREFIX: &str = "container_label_";
/// Prefix of the `id` label value (cAdvisor-style cgroup path).
pub const ID_PREFIX: &str = "/docker/";

pub const ID_LABEL: &str = "id";
pub const IMAGE_LABEL: &str = "image";
pub const NAME_LABEL: &str = "name";
pub const INTERFACE_LABEL: &str = "interface";

/// Label name to value for one series. Universe labels missing here render as empty.
pub type LabelSet = BTreeMap<String, String>;

/// Turn a raw user label key into a valid exposition label name,
/// e.g. `com.docker.compose.service` -> `container_label_com_docker_compose_service`.
pub fn normalize_label(raw: &str) -> String {
    let mut out = String::with_capacity(USER_LABEL_PREFIX.len() + raw.len());
    out.push_str(USER_LABEL_PREFIX);
    out.extend(raw.chars().map(|c| {
        if c.is_ascii_alphanumeric() || c == '_' {
            c
        } else {
            '_'
        }
    }));
    out
}

/// The fixed set of label names attached to every container-scoped series.
/// Computed once at bootstrap and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelUniverse {
    names: BTreeSet<String>,
}

impl Default for LabelUniverse {
    fn default() -> Self {
        Self::from_metadata(std::iter::empty())
    }
}

impl LabelUniverse {
    /// Union of every normalized user label seen, plus `id`, `image` and `name`.
    pub fn from_metadata<'a>(containers: impl IntoIterator<Item = &'a ContainerMetadata>) -> Self {
        let mut names: BTreeSet<String> = containers
            .into_iter()
            .flat_map(|m| m.labels.keys())
            .map(|k| normalize_label(k))
            .collect();
        names.insert(ID_LABEL.to_string());
        names.insert(IMAGE_LABEL.to_string());
        names.insert(NAME_LABEL.to_string());
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Label names for container-scoped metrics, sorted.
    pub fn container_label_names(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    /// Container-scoped names followed by `interface`.
    pub fn network_label_names(&self) -> Vec<String> {
        let mut names = self.container_label_names();
        names.push(INTERFACE_LABEL.to_string());
        names
    }
}

/// Label values for a container, restricted to the universe.
pub fn resolve_labels(metadata: &ContainerMetadata, name: &str, universe: &LabelUniverse) -> LabelSet {
    let mut labels = LabelSet::new();
    labels.insert(ID_LABEL.to_string(), format!("{ID_PREFIX}{}", metadata.id));
    labels.insert(IMAGE_LABEL.to_string(), metadata.image.clone());
    labels.insert(NAME_LABEL.to_string(), name.to_string());

    for (key, value) in &metadata.labels {
        let normalized = normalize_label(key);
        if universe.contains(&normalized) {
            labels.insert(normalized, value.clone());
        }
    }
    labels
}

/// Copy of `labels` with the `interface` entry set.
pub fn with_interface(labels: &LabelSet, interface: &str) -> LabelSet {
    let mut out = labels.clone();
    out.insert(INTERFACE_LABEL.to_string(), interface.to_string());
    out
}

/// Logical interface name for a stats network entry.
///
/// Pairs the entry with an attached network by endpoint id. When nothing matches and the
/// container is attached to exactly one network, that network is used; otherwise the raw stats
/// key is the interface name. Depends only on inspection metadata and the entry itself, so an
/// interface keeps its name when other interfaces come and go.
pub fn resolve_interface(
    metadata: &ContainerMetadata,
    stats_key: &str,
    sample: &NetworkSample,
) -> String {
    if let Some(endpoint_id) = sample.endpoint_id.as_deref().filter(|e| !e.is_empty())
        && let Some(network) = metadata
            .networks
            .iter()
            .find(|n| n.endpoint_id.as_deref() == Some(endpoint_id))
    {
        return network.name.clone();
    }
    match metadata.networks.as_slice() {
        [only] => only.name.clone(),
        _ => stats_key.to_string(),
    }
}
