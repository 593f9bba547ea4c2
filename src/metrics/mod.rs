// Metric definitions and the registry served on the exposition endpoint

mod definitions;
mod registry;

pub use definitions::{LabelScope, MetricId, MetricKind, MetricUpdate, UpdateOp, fields};
pub use registry::MetricRegistry;
