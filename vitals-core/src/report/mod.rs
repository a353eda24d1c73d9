//! Reporting of cycle outcomes.
//!
//! The reporter is organized into separate concerns:
//! - `format`: the one-line cycle summary
//! - `sinks`: where outcomes are written (JSON files, log file, memory)

mod format;
mod sinks;

pub use format::summary_line;
pub use sinks::{JsonSnapshotSink, LogLineSink, MemorySink};

use crate::check::CycleOutcome;
use crate::config::ReportConfig;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// Destination for cycle outcomes.
#[async_trait]
pub trait Sink: Send + Sync {
    fn name(&self) -> &str;

    async fn emit(&self, outcome: &CycleOutcome) -> Result<()>;
}

/// Hands every outcome to each configured sink.
///
/// A failing sink is logged and skipped; it never stops the other sinks or
/// the surrounding loop.
#[derive(Default)]
pub struct Reporter {
    sinks: Vec<Box<dyn Sink>>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the sinks described by the report configuration.
    pub fn from_config(config: &ReportConfig) -> Self {
        let mut reporter = Self::new();
        if config.write_snapshots {
            reporter.add_sink(JsonSnapshotSink::new(&config.output_dir));
        }
        if let Some(log_file) = &config.log_file {
            reporter.add_sink(LogLineSink::new(config.output_dir.join(log_file)));
        }
        reporter
    }

    pub fn with_sink<T: Sink + 'static>(mut self, sink: T) -> Self {
        self.add_sink(sink);
        self
    }

    pub fn add_sink<T: Sink + 'static>(&mut self, sink: T) {
        self.sinks.push(Box::new(sink));
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Emit an outcome to all sinks. Returns how many accepted it.
    pub async fn report(&self, outcome: &CycleOutcome) -> usize {
        match outcome {
            CycleOutcome::Completed(_) => info!("{}", summary_line(outcome)),
            CycleOutcome::Failed(_) => error!("{}", summary_line(outcome)),
        }

        let mut delivered = 0;
        for sink in &self.sinks {
            match sink.emit(outcome).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Sink {} failed: {}", sink.name(), e),
            }
        }
        delivered
    }
}
