// Domain models for sampled container state

mod container;
mod network;
mod snapshot;

pub use container::{ContainerMetadata, RuntimePlatform};
pub use network::{AttachedNetwork, NetworkSample};
pub use snapshot::{ContainerSnapshot, CounterFields, CpuSample, MemorySample, StatsSample};
