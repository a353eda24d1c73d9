use serde::{Deserialize, Serialize};
use std::fmt;

/// One resource dimension sampled by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cpu,
    Memory,
    Disk,
    Network,
    Process,
}

impl Category {
    /// All categories in merge order.
    pub const ALL: [Category; 5] = [
        Category::Cpu,
        Category::Memory,
        Category::Disk,
        Category::Network,
        Category::Process,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cpu => "cpu",
            Category::Memory => "memory",
            Category::Disk => "disk",
            Category::Network => "network",
            Category::Process => "process",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of reading a single enumerated sub-item (a partition, an interface).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reading<T> {
    Available(T),
    Unavailable { reason: String },
}

impl<T> Reading<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuSample {
    pub total_percent: f64,
    #[serde(default)]
    pub per_core_percent: Vec<f64>,
    /// `None` where the platform has no load average.
    #[serde(default)]
    pub load_average: Option<LoadAverage>,
    /// Logical core count; falls back to the per-core list length.
    #[serde(default)]
    pub core_count: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySample {
    pub total_bytes: u64,
    #[serde(default)]
    pub available_bytes: u64,
    pub used_bytes: u64,
    pub percent: f64,
    #[serde(default)]
    pub cached_bytes: u64,
    #[serde(default)]
    pub buffers_bytes: u64,
    #[serde(default)]
    pub swap_total_bytes: u64,
    #[serde(default)]
    pub swap_used_bytes: u64,
    #[serde(default)]
    pub swap_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartitionUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
}

impl PartitionUsage {
    /// Used share of the partition, `None` for a zero-capacity filesystem.
    pub fn percent(&self) -> Option<f64> {
        if self.total_bytes == 0 {
            return None;
        }
        Some(self.used_bytes as f64 / self.total_bytes as f64 * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionSample {
    pub mount_id: String,
    pub reading: Reading<PartitionUsage>,
}

impl PartitionSample {
    pub fn new(mount_id: impl Into<String>, usage: PartitionUsage) -> Self {
        Self {
            mount_id: mount_id.into(),
            reading: Reading::Available(usage),
        }
    }

    pub fn unavailable(mount_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            mount_id: mount_id.into(),
            reading: Reading::unavailable(reason),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskIoCounters {
    pub read_bytes: u64,
    pub write_bytes: u64,
    /// Operation counts, where the platform reports them.
    #[serde(default)]
    pub read_count: Option<u64>,
    #[serde(default)]
    pub write_count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskSample {
    #[serde(default)]
    pub partitions: Vec<PartitionSample>,
    #[serde(default)]
    pub io: Option<DiskIoCounters>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    #[serde(default)]
    pub packets_sent: u64,
    #[serde(default)]
    pub packets_recv: u64,
    #[serde(default)]
    pub errors_in: u64,
    #[serde(default)]
    pub errors_out: u64,
    #[serde(default)]
    pub drops_in: u64,
    #[serde(default)]
    pub drops_out: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceSample {
    pub iface_id: String,
    pub reading: Reading<InterfaceCounters>,
}

impl InterfaceSample {
    pub fn new(iface_id: impl Into<String>, counters: InterfaceCounters) -> Self {
        Self {
            iface_id: iface_id.into(),
            reading: Reading::Available(counters),
        }
    }

    pub fn unavailable(iface_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            iface_id: iface_id.into(),
            reading: Reading::unavailable(reason),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSample {
    #[serde(default)]
    pub interfaces: Vec<InterfaceSample>,
    /// Open TCP and UDP sockets, where the platform reports them.
    #[serde(default)]
    pub connections: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessSample {
    pub total: u64,
    #[serde(default)]
    pub running: u64,
    #[serde(default)]
    pub sleeping: u64,
    #[serde(default)]
    pub zombie: u64,
}
