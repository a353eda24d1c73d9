//! Standard providers for vitals
//!
//! Samples the local host so the engine works out of the box:
//! - CPU, memory and swap usage
//! - Mounted filesystems and cumulative disk I/O
//! - Per-interface network counters
//! - Process counts by state

mod procfs;
mod system;

pub use system::SysinfoProvider;
