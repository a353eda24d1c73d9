use crate::metrics::naming::{item_key, sanitize_identifier};
use crate::metrics::types::{Fragment, HealthInputs};
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use vitals_provider::{Category, MetricsProvider, ProviderError, Reading};

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid {field} value: {value}")]
    InvalidValue { field: &'static str, value: f64 },

    #[error("Collector task aborted: {0}")]
    Aborted(String),
}

pub type Result<T> = std::result::Result<T, CollectError>;

/// Turns one category's raw sample into a [`Fragment`].
///
/// A collector queries exactly one category from the provider. Unreadable
/// sub-items are skipped and noted on the fragment; only a failure of the
/// whole category query is returned as an error.
#[async_trait]
pub trait Collector: Send + Sync {
    fn category(&self) -> Category;

    async fn collect(&self, provider: &dyn MetricsProvider) -> Result<Fragment>;
}

fn require_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CollectError::InvalidValue { field, value })
    }
}

pub struct CpuCollector;

#[async_trait]
impl Collector for CpuCollector {
    fn category(&self) -> Category {
        Category::Cpu
    }

    async fn collect(&self, provider: &dyn MetricsProvider) -> Result<Fragment> {
        let sample = provider.cpu().await?;
        let total = require_finite("cpu_usage_total", sample.total_percent)?;
        // No load average on this platform: report zeros
        let load = sample.load_average.unwrap_or_default();
        let cores = sample.core_count.unwrap_or(sample.per_core_percent.len());

        let mut fragment = Fragment::new(Category::Cpu);
        fragment.put("cpu_usage_total", total);
        fragment.put("cpu_cores_count", cores as f64);
        fragment.put("load_average_1m", load.one);
        fragment.put("load_average_5m", load.five);
        fragment.put("load_average_15m", load.fifteen);
        for (i, usage) in sample.per_core_percent.iter().enumerate() {
            fragment.put(format!("cpu_core_{i}_usage"), *usage);
        }
        fragment.inputs = HealthInputs {
            cpu_usage: Some(total),
            ..Default::default()
        };

        debug!("CPU metrics collected: {} values", fragment.len());
        Ok(fragment)
    }
}

pub struct MemoryCollector;

#[async_trait]
impl Collector for MemoryCollector {
    fn category(&self) -> Category {
        Category::Memory
    }

    async fn collect(&self, provider: &dyn MetricsProvider) -> Result<Fragment> {
        let sample = provider.memory().await?;
        let percent = require_finite("memory_usage_percent", sample.percent)?;

        let mut fragment = Fragment::new(Category::Memory);
        fragment.put("memory_total_bytes", sample.total_bytes as f64);
        fragment.put("memory_available_bytes", sample.available_bytes as f64);
        fragment.put("memory_used_bytes", sample.used_bytes as f64);
        fragment.put("memory_usage_percent", percent);
        fragment.put("memory_cached_bytes", sample.cached_bytes as f64);
        fragment.put("memory_buffers_bytes", sample.buffers_bytes as f64);
        fragment.put("swap_total_bytes", sample.swap_total_bytes as f64);
        fragment.put("swap_used_bytes", sample.swap_used_bytes as f64);
        fragment.put("swap_usage_percent", sample.swap_percent);
        fragment.inputs = HealthInputs {
            memory_usage: Some(percent),
            ..Default::default()
        };

        debug!("Memory metrics collected: {} values", fragment.len());
        Ok(fragment)
    }
}

pub struct DiskCollector;

#[async_trait]
impl Collector for DiskCollector {
    fn category(&self) -> Category {
        Category::Disk
    }

    async fn collect(&self, provider: &dyn MetricsProvider) -> Result<Fragment> {
        let sample = provider.disks().await?;

        let mut fragment = Fragment::new(Category::Disk);
        // Keyed by token so a mount that collides with an earlier one
        // replaces its usage, matching what the record keeps.
        let mut usages: Vec<(String, f64)> = Vec::with_capacity(sample.partitions.len());

        for partition in &sample.partitions {
            let usage = match &partition.reading {
                Reading::Available(usage) => usage,
                Reading::Unavailable { reason } => {
                    fragment.skip(&partition.mount_id, reason.as_str());
                    continue;
                }
            };
            let Some(percent) = usage.percent() else {
                fragment.skip(&partition.mount_id, "zero capacity");
                continue;
            };

            let token = sanitize_identifier(&partition.mount_id);
            fragment.put(item_key("disk", &token, "total_bytes"), usage.total_bytes as f64);
            fragment.put(item_key("disk", &token, "used_bytes"), usage.used_bytes as f64);
            fragment.put(item_key("disk", &token, "free_bytes"), usage.free_bytes as f64);
            fragment.put(item_key("disk", &token, "usage_percent"), percent);
            match usages.iter_mut().find(|(seen, _)| *seen == token) {
                Some(entry) => entry.1 = percent,
                None => usages.push((token, percent)),
            }
        }

        if let Some(io) = sample.io {
            fragment.put("disk_read_bytes_total", io.read_bytes as f64);
            fragment.put("disk_write_bytes_total", io.write_bytes as f64);
            if let Some(count) = io.read_count {
                fragment.put("disk_read_count_total", count as f64);
            }
            if let Some(count) = io.write_count {
                fragment.put("disk_write_count_total", count as f64);
            }
        }

        fragment.inputs = HealthInputs {
            disk_usage: Some(usages.into_iter().map(|(_, percent)| percent).collect()),
            ..Default::default()
        };

        debug!("Disk metrics collected: {} values", fragment.len());
        Ok(fragment)
    }
}

pub struct NetworkCollector;

#[async_trait]
impl Collector for NetworkCollector {
    fn category(&self) -> Category {
        Category::Network
    }

    async fn collect(&self, provider: &dyn MetricsProvider) -> Result<Fragment> {
        let sample = provider.networks().await?;

        let mut fragment = Fragment::new(Category::Network);
        let mut tokens: Vec<String> = Vec::with_capacity(sample.interfaces.len());

        for iface in &sample.interfaces {
            let counters = match &iface.reading {
                Reading::Available(counters) => counters,
                Reading::Unavailable { reason } => {
                    fragment.skip(&iface.iface_id, reason.as_str());
                    continue;
                }
            };

            let token = sanitize_identifier(&iface.iface_id);
            let fields = [
                ("bytes_sent", counters.bytes_sent),
                ("bytes_recv", counters.bytes_recv),
                ("packets_sent", counters.packets_sent),
                ("packets_recv", counters.packets_recv),
                ("errors_in", counters.errors_in),
                ("errors_out", counters.errors_out),
                ("drops_in", counters.drops_in),
                ("drops_out", counters.drops_out),
            ];
            for (suffix, value) in fields {
                fragment.put(item_key("network", &token, suffix), value as f64);
            }
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
        fragment.put("network_interfaces_count", tokens.len() as f64);
        if let Some(connections) = sample.connections {
            fragment.put("network_connections_total", connections as f64);
        }

        debug!("Network metrics collected: {} values", fragment.len());
        Ok(fragment)
    }
}

pub struct ProcessCollector;

#[async_trait]
impl Collector for ProcessCollector {
    fn category(&self) -> Category {
        Category::Process
    }

    async fn collect(&self, provider: &dyn MetricsProvider) -> Result<Fragment> {
        let sample = provider.processes().await?;

        let mut fragment = Fragment::new(Category::Process);
        fragment.put("processes_total", sample.total as f64);
        fragment.put("processes_running", sample.running as f64);
        fragment.put("processes_sleeping", sample.sleeping as f64);
        fragment.put("processes_zombie", sample.zombie as f64);

        debug!("Process metrics collected: {} values", fragment.len());
        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::CycleWarning;
    use vitals_provider::*;

    fn provider(samples: SampleSet) -> FixedProvider {
        FixedProvider::new(samples)
    }

    #[tokio::test]
    async fn test_cpu_fragment() {
        let p = provider(SampleSet::new().with_cpu(CpuSample {
            total_percent: 37.5,
            per_core_percent: vec![30.0, 45.0],
            load_average: Some(LoadAverage {
                one: 0.5,
                five: 0.25,
                fifteen: 0.125,
            }),
            core_count: None,
        }));

        let fragment = CpuCollector.collect(&p).await.unwrap();
        let keys: Vec<&str> = fragment.metrics.keys().collect();
        assert_eq!(
            keys,
            [
                "cpu_usage_total",
                "cpu_cores_count",
                "load_average_1m",
                "load_average_5m",
                "load_average_15m",
                "cpu_core_0_usage",
                "cpu_core_1_usage",
            ]
        );
        assert_eq!(fragment.metrics.get("cpu_cores_count"), Some(2.0));
        assert_eq!(fragment.inputs.cpu_usage, Some(37.5));
        assert!(fragment.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_cpu_missing_load_average_is_zero() {
        let p = provider(SampleSet::new().with_cpu(CpuSample {
            total_percent: 10.0,
            core_count: Some(8),
            ..Default::default()
        }));

        let fragment = CpuCollector.collect(&p).await.unwrap();
        assert_eq!(fragment.metrics.get("load_average_1m"), Some(0.0));
        assert_eq!(fragment.metrics.get("load_average_15m"), Some(0.0));
        assert_eq!(fragment.metrics.get("cpu_cores_count"), Some(8.0));
    }

    #[tokio::test]
    async fn test_cpu_non_finite_total_fails_category() {
        let p = provider(SampleSet::new().with_cpu(CpuSample {
            total_percent: f64::NAN,
            ..Default::default()
        }));

        let result = CpuCollector.collect(&p).await;
        assert!(matches!(result, Err(CollectError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_provider_failure_is_error() {
        let p = provider(SampleSet::new());
        assert!(matches!(
            MemoryCollector.collect(&p).await,
            Err(CollectError::Provider(ProviderError::Unavailable(Category::Memory)))
        ));
    }

    #[tokio::test]
    async fn test_disk_skips_unreadable_partitions() {
        let p = provider(SampleSet::new().with_disk(DiskSample {
            partitions: vec![
                PartitionSample::new(
                    "/",
                    PartitionUsage {
                        total_bytes: 1000,
                        used_bytes: 650,
                        free_bytes: 350,
                    },
                ),
                PartitionSample::unavailable("/root/private", "permission denied"),
                PartitionSample::new(
                    "/proc",
                    PartitionUsage {
                        total_bytes: 0,
                        used_bytes: 0,
                        free_bytes: 0,
                    },
                ),
            ],
            io: None,
        }));

        let fragment = DiskCollector.collect(&p).await.unwrap();
        assert_eq!(fragment.metrics.get("disk_root_usage_percent"), Some(65.0));
        assert_eq!(fragment.metrics.get("disk_root_free_bytes"), Some(350.0));
        assert!(!fragment.metrics.contains_key("disk_proc_usage_percent"));
        assert_eq!(fragment.inputs.disk_usage, Some(vec![65.0]));
        assert_eq!(fragment.warnings.len(), 2);
        assert!(fragment
            .warnings
            .iter()
            .all(|w| matches!(w, CycleWarning::PartialCollection { category: Category::Disk, .. })));
    }

    #[tokio::test]
    async fn test_disk_mounts_sharing_a_token() {
        let usage = |used| PartitionUsage {
            total_bytes: 100,
            used_bytes: used,
            free_bytes: 100 - used,
        };
        let p = provider(SampleSet::new().with_disk(DiskSample {
            partitions: vec![
                PartitionSample::new("/a-b", usage(10)),
                PartitionSample::new("/a_b", usage(100)),
            ],
            io: None,
        }));

        let fragment = DiskCollector.collect(&p).await.unwrap();
        assert_eq!(fragment.metrics.get("disk_a_b_usage_percent"), Some(100.0));
        assert_eq!(fragment.inputs.disk_usage, Some(vec![100.0]));
        assert!(fragment
            .warnings
            .iter()
            .any(|w| matches!(w, CycleWarning::Collision { key, .. } if key == "disk_a_b_usage_percent")));
    }

    #[tokio::test]
    async fn test_network_interfaces_sharing_a_token() {
        let p = provider(SampleSet::new().with_network(NetworkSample {
            interfaces: vec![
                InterfaceSample::new("br-lan", InterfaceCounters::default()),
                InterfaceSample::new(
                    "br_lan",
                    InterfaceCounters {
                        bytes_sent: 9,
                        ..Default::default()
                    },
                ),
            ],
            connections: None,
        }));

        let fragment = NetworkCollector.collect(&p).await.unwrap();
        assert_eq!(fragment.metrics.get("network_br_lan_bytes_sent"), Some(9.0));
        assert_eq!(fragment.metrics.get("network_interfaces_count"), Some(1.0));
        assert_eq!(fragment.warnings.len(), 8);
    }

    #[tokio::test]
    async fn test_disk_without_partitions() {
        let p = provider(SampleSet::new().with_disk(DiskSample {
            partitions: vec![],
            io: Some(DiskIoCounters {
                read_bytes: 4096,
                write_bytes: 8192,
                read_count: Some(1),
                write_count: None,
            }),
        }));

        let fragment = DiskCollector.collect(&p).await.unwrap();
        assert_eq!(fragment.inputs.disk_usage, Some(vec![]));
        assert_eq!(fragment.metrics.get("disk_write_bytes_total"), Some(8192.0));
        assert_eq!(fragment.metrics.get("disk_read_count_total"), Some(1.0));
        assert!(!fragment.metrics.contains_key("disk_write_count_total"));
    }

    #[tokio::test]
    async fn test_network_fragment() {
        let p = provider(SampleSet::new().with_network(NetworkSample {
            interfaces: vec![
                InterfaceSample::new(
                    "eth0",
                    InterfaceCounters {
                        bytes_sent: 100,
                        bytes_recv: 200,
                        drops_in: 3,
                        ..Default::default()
                    },
                ),
                InterfaceSample::unavailable("wg0", "vanished"),
            ],
            connections: None,
        }));

        let fragment = NetworkCollector.collect(&p).await.unwrap();
        assert_eq!(fragment.metrics.get("network_eth0_bytes_recv"), Some(200.0));
        assert_eq!(fragment.metrics.get("network_eth0_drops_in"), Some(3.0));
        assert_eq!(fragment.metrics.get("network_interfaces_count"), Some(1.0));
        assert!(!fragment.metrics.contains_key("network_connections_total"));
        assert_eq!(fragment.warnings.len(), 1);
        assert_eq!(fragment.inputs, HealthInputs::default());
    }

    #[tokio::test]
    async fn test_network_connection_count() {
        let p = provider(SampleSet::new().with_network(NetworkSample {
            interfaces: vec![InterfaceSample::new("lo", InterfaceCounters::default())],
            connections: Some(42),
        }));

        let fragment = NetworkCollector.collect(&p).await.unwrap();
        assert_eq!(fragment.metrics.get("network_connections_total"), Some(42.0));
        let keys: Vec<&str> = fragment.metrics.keys().collect();
        assert_eq!(keys.last(), Some(&"network_connections_total"));
    }

    #[tokio::test]
    async fn test_process_fragment() {
        let p = provider(SampleSet::new().with_process(ProcessSample {
            total: 120,
            running: 3,
            sleeping: 110,
            zombie: 1,
        }));

        let fragment = ProcessCollector.collect(&p).await.unwrap();
        assert_eq!(fragment.len(), 4);
        assert_eq!(fragment.metrics.get("processes_zombie"), Some(1.0));
    }
}
