mod aggregator;
mod collector;
mod naming;
mod registry;
mod types;

pub use aggregator::{aggregate, AggregatedMetrics, MetricsAggregator};
pub use collector::{
    CollectError, Collector, CpuCollector, DiskCollector, MemoryCollector, NetworkCollector,
    ProcessCollector,
};
pub use naming::{item_key, sanitize_identifier};
pub use registry::CollectorRegistry;
pub use types::{CycleWarning, Fragment, HealthInputs, MetricRecord};
