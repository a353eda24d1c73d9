//! Provider backed by a pre-captured sample set.
//!
//! Serves the same samples on every query, which makes a health check fully
//! reproducible. A category left out of the set answers with
//! [`ProviderError::Unavailable`], the same way a real provider reports a
//! category it cannot sample.

use crate::sample::*;
use crate::{MetricsProvider, ProviderError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Serializable set of samples, one optional entry per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub cpu: Option<CpuSample>,
    #[serde(default)]
    pub memory: Option<MemorySample>,
    #[serde(default)]
    pub disk: Option<DiskSample>,
    #[serde(default)]
    pub network: Option<NetworkSample>,
    #[serde(default)]
    pub process: Option<ProcessSample>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cpu(mut self, sample: CpuSample) -> Self {
        self.cpu = Some(sample);
        self
    }

    pub fn with_memory(mut self, sample: MemorySample) -> Self {
        self.memory = Some(sample);
        self
    }

    pub fn with_disk(mut self, sample: DiskSample) -> Self {
        self.disk = Some(sample);
        self
    }

    pub fn with_network(mut self, sample: NetworkSample) -> Self {
        self.network = Some(sample);
        self
    }

    pub fn with_process(mut self, sample: ProcessSample) -> Self {
        self.process = Some(sample);
        self
    }

    pub fn with_host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = Some(host_name.into());
        self
    }

    /// Loads a sample set from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or isn't a valid sample set.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).await?;
        let set: SampleSet = serde_json::from_str(&contents)?;
        Ok(set)
    }
}

/// A [`MetricsProvider`] that replays a [`SampleSet`].
#[derive(Debug, Clone, Default)]
pub struct FixedProvider {
    samples: SampleSet,
}

impl FixedProvider {
    pub fn new(samples: SampleSet) -> Self {
        Self { samples }
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(SampleSet::load(path).await?))
    }

    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }
}

fn served<T: Clone>(sample: &Option<T>, category: Category) -> Result<T> {
    sample
        .clone()
        .ok_or(ProviderError::Unavailable(category))
}

#[async_trait]
impl MetricsProvider for FixedProvider {
    async fn cpu(&self) -> Result<CpuSample> {
        served(&self.samples.cpu, Category::Cpu)
    }

    async fn memory(&self) -> Result<MemorySample> {
        served(&self.samples.memory, Category::Memory)
    }

    async fn disks(&self) -> Result<DiskSample> {
        served(&self.samples.disk, Category::Disk)
    }

    async fn networks(&self) -> Result<NetworkSample> {
        served(&self.samples.network, Category::Network)
    }

    async fn processes(&self) -> Result<ProcessSample> {
        served(&self.samples.process, Category::Process)
    }

    async fn host_name(&self) -> Option<String> {
        self.samples.host_name.clone()
    }
}
