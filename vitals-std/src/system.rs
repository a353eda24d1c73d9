use crate::procfs;
use async_trait::async_trait;
use std::time::Duration;
use sysinfo::{Disks, Networks, ProcessStatus, ProcessesToUpdate, System};
use tracing::debug;
use vitals_core::config::ProviderConfig;
use vitals_provider::{
    CpuSample, DiskIoCounters, DiskSample, InterfaceCounters, InterfaceSample, LoadAverage,
    MemorySample, MetricsProvider, NetworkSample, PartitionSample, PartitionUsage, ProcessSample,
    ProviderError, Result,
};

/// Samples the local host through `sysinfo`.
///
/// Every query builds a fresh [`System`] on the blocking pool, so concurrent
/// collectors never contend on shared state.
#[derive(Debug, Clone)]
pub struct SysinfoProvider {
    cpu_window: Duration,
}

impl SysinfoProvider {
    pub fn new(cpu_window: Duration) -> Self {
        Self { cpu_window }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(config.cpu_sample_window())
    }

    pub fn cpu_window(&self) -> Duration {
        self.cpu_window
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::from_config(&ProviderConfig::default())
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ProviderError::Task(e.to_string()))
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn sample_cpu(window: Duration) -> CpuSample {
    let mut sys = System::new();
    sys.refresh_cpu_usage();
    std::thread::sleep(window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
    sys.refresh_cpu_usage();

    let per_core_percent: Vec<f64> = sys.cpus().iter().map(|c| c.cpu_usage() as f64).collect();
    let load_average = if cfg!(windows) {
        None
    } else {
        let load = System::load_average();
        Some(LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        })
    };

    CpuSample {
        total_percent: sys.global_cpu_usage() as f64,
        core_count: Some(per_core_percent.len()),
        per_core_percent,
        load_average,
    }
}

fn sample_memory() -> MemorySample {
    let mut sys = System::new();
    sys.refresh_memory();

    let total = sys.total_memory();
    let available = sys.available_memory();
    let (cached, buffers) = procfs::meminfo();

    MemorySample {
        total_bytes: total,
        available_bytes: available,
        used_bytes: sys.used_memory(),
        percent: percent(total.saturating_sub(available), total),
        cached_bytes: cached,
        buffers_bytes: buffers,
        swap_total_bytes: sys.total_swap(),
        swap_used_bytes: sys.used_swap(),
        swap_percent: percent(sys.used_swap(), sys.total_swap()),
    }
}

fn sample_disks() -> DiskSample {
    let disks = Disks::new_with_refreshed_list();
    let mut io = DiskIoCounters::default();

    let partitions = disks
        .list()
        .iter()
        .map(|disk| {
            let usage = disk.usage();
            io.read_bytes += usage.total_read_bytes;
            io.write_bytes += usage.total_written_bytes;

            let total = disk.total_space();
            let free = disk.available_space();
            PartitionSample::new(
                disk.mount_point().to_string_lossy(),
                PartitionUsage {
                    total_bytes: total,
                    used_bytes: total.saturating_sub(free),
                    free_bytes: free,
                },
            )
        })
        .collect();

    DiskSample {
        partitions,
        io: Some(io),
    }
}

fn sample_networks() -> NetworkSample {
    let networks = Networks::new_with_refreshed_list();

    let mut interfaces: Vec<InterfaceSample> = networks
        .iter()
        .map(|(name, data)| {
            let (drops_in, drops_out) = procfs::interface_drops(name);
            InterfaceSample::new(
                name.clone(),
                InterfaceCounters {
                    bytes_sent: data.total_transmitted(),
                    bytes_recv: data.total_received(),
                    packets_sent: data.total_packets_transmitted(),
                    packets_recv: data.total_packets_received(),
                    errors_in: data.total_errors_on_received(),
                    errors_out: data.total_errors_on_transmitted(),
                    drops_in,
                    drops_out,
                },
            )
        })
        .collect();
    interfaces.sort_by(|a, b| a.iface_id.cmp(&b.iface_id));

    NetworkSample {
        interfaces,
        connections: procfs::connections(),
    }
}

fn sample_processes() -> ProcessSample {
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::All, true);

    let mut sample = ProcessSample::default();
    // Linux lists threads as tasks alongside their process
    for process in sys.processes().values().filter(|p| p.thread_kind().is_none()) {
        sample.total += 1;
        match process.status() {
            ProcessStatus::Run => sample.running += 1,
            ProcessStatus::Sleep => sample.sleeping += 1,
            ProcessStatus::Zombie => sample.zombie += 1,
            _ => {}
        }
    }
    sample
}

#[async_trait]
impl MetricsProvider for SysinfoProvider {
    async fn cpu(&self) -> Result<CpuSample> {
        let window = self.cpu_window;
        debug!("Sampling CPU over {:?}", window);
        blocking(move || sample_cpu(window)).await
    }

    async fn memory(&self) -> Result<MemorySample> {
        blocking(sample_memory).await
    }

    async fn disks(&self) -> Result<DiskSample> {
        let sample = blocking(sample_disks).await?;
        debug!("Found {} mounted filesystems", sample.partitions.len());
        Ok(sample)
    }

    async fn networks(&self) -> Result<NetworkSample> {
        let sample = blocking(sample_networks).await?;
        debug!("Found {} network interfaces", sample.interfaces.len());
        Ok(sample)
    }

    async fn processes(&self) -> Result<ProcessSample> {
        blocking(sample_processes).await
    }

    async fn host_name(&self) -> Option<String> {
        System::host_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_of_zero_is_zero() {
        assert_eq!(percent(5, 0), 0.0);
        assert_eq!(percent(25, 100), 25.0);
    }

    #[test]
    fn test_window_from_config() {
        let provider = SysinfoProvider::from_config(&ProviderConfig {
            cpu_sample_millis: 250,
        });
        assert_eq!(provider.cpu_window(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_samples_local_host() {
        let provider = SysinfoProvider::new(Duration::from_millis(10));

        let memory = provider.memory().await.unwrap();
        assert!((0.0..=100.0).contains(&memory.percent));

        let cpu = provider.cpu().await.unwrap();
        assert!(cpu.total_percent.is_finite());

        let processes = provider.processes().await.unwrap();
        assert!(processes.total >= processes.running + processes.sleeping + processes.zombie);
    }
}
