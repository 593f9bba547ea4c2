// Network attachment and per-interface counter models

use super::CounterFields;

/// A network the container is attached to, as listed by inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedNetwork {
    pub name: String,
    pub endpoint_id: Option<String>,
}

/// One interface entry of a stats payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkSample {
    /// Endpoint the interface belongs to; pairs it with an [`AttachedNetwork`].
    pub endpoint_id: Option<String>,
    /// Cumulative rx_*/tx_* counters present in the payload.
    pub counters: CounterFields,
}
