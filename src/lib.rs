//! vitals - host resource sampling and health scoring
//!
//! Re-exports the engine, the provider interface and (with the default `std`
//! feature) the sysinfo-backed provider, so a single dependency is enough:
//!
//! ```no_run
//! use std::sync::Arc;
//! use vitals::{HealthCheck, SysinfoProvider};
//!
//! # async fn demo() {
//! let check = HealthCheck::new(Arc::new(SysinfoProvider::default()));
//! let outcome = check.run_cycle().await;
//! std::process::exit(outcome.exit_code());
//! # }
//! ```

pub use vitals_core::*;
pub use vitals_provider::{
    Category, CpuSample, DiskIoCounters, DiskSample, FixedProvider, InterfaceCounters,
    InterfaceSample, LoadAverage, MemorySample, MetricsProvider, NetworkSample, PartitionSample,
    PartitionUsage, ProcessSample, ProviderError, Reading, SampleSet,
};

#[cfg(feature = "std")]
pub use vitals_std::SysinfoProvider;

/// Provider interface and sample types.
pub mod provider {
    pub use vitals_provider::*;
}
