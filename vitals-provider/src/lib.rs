//! vitals-provider - System metrics provider interface
//!
//! Defines the boundary between the health-scoring engine and whatever samples
//! the host. The engine never touches the OS itself; it only consumes the
//! sample structs returned by a [`MetricsProvider`].
//!
//! - `sample`: raw, per-category sample types
//! - `fixed`: a provider serving a pre-captured sample set (tests, replays)

mod fixed;
mod sample;

pub use fixed::{FixedProvider, SampleSet};
pub use sample::{
    Category, CpuSample, DiskIoCounters, DiskSample, InterfaceCounters, InterfaceSample,
    LoadAverage, MemorySample, NetworkSample, PartitionSample, PartitionUsage, ProcessSample,
    Reading,
};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} metrics are not available")]
    Unavailable(Category),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse sample set: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Sampling task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Source of raw host samples, one query per category.
///
/// Implementations must be cheap to share between the concurrently running
/// collectors of a cycle. A query either returns the full sample for its
/// category or an error; sub-items that could not be read are reported inside
/// the sample as [`Reading::Unavailable`] rather than failing the whole query.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    async fn cpu(&self) -> Result<CpuSample>;

    async fn memory(&self) -> Result<MemorySample>;

    async fn disks(&self) -> Result<DiskSample>;

    async fn networks(&self) -> Result<NetworkSample>;

    async fn processes(&self) -> Result<ProcessSample>;

    /// Host name to stamp on snapshots, if the provider knows it.
    async fn host_name(&self) -> Option<String> {
        None
    }
}
