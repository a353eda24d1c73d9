//! Sinks that write cycle outcomes to durable storage.

use super::format::summary_line;
use super::{Result, Sink};
use crate::check::CycleOutcome;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

/// Writes every outcome as a pretty-printed JSON file.
///
/// Files are named `health_metrics_<YYYYmmdd_HHMMSS>.json` after the cycle's
/// timestamp, inside `dir`. The directory is created on first write.
pub struct JsonSnapshotSink {
    dir: PathBuf,
}

impl JsonSnapshotSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the given outcome will be written to.
    pub fn path_for(&self, outcome: &CycleOutcome) -> PathBuf {
        let stamp = outcome.timestamp().format("%Y%m%d_%H%M%S");
        self.dir.join(format!("health_metrics_{stamp}.json"))
    }
}

#[async_trait]
impl Sink for JsonSnapshotSink {
    fn name(&self) -> &str {
        "json"
    }

    async fn emit(&self, outcome: &CycleOutcome) -> Result<()> {
        let path = self.path_for(outcome);
        ensure_parent(&path).await?;

        let json = serde_json::to_string_pretty(outcome)?;
        fs::write(&path, json).await?;

        info!("Metrics saved to {}", path.display());
        Ok(())
    }
}

/// Appends the one-line summary of every outcome to a log file.
pub struct LogLineSink {
    path: PathBuf,
}

impl LogLineSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Sink for LogLineSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn emit(&self, outcome: &CycleOutcome) -> Result<()> {
        ensure_parent(&self.path).await?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let mut line = summary_line(outcome);
        line.push('\n');
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

/// Keeps outcomes in memory.
///
/// Clones share the same buffer, so a clone kept outside the reporter can
/// read back what was emitted.
#[derive(Clone, Default)]
pub struct MemorySink {
    outcomes: Arc<Mutex<Vec<CycleOutcome>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn outcomes(&self) -> Vec<CycleOutcome> {
        self.outcomes.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.outcomes.lock().await.len()
    }
}

#[async_trait]
impl Sink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn emit(&self, outcome: &CycleOutcome) -> Result<()> {
        self.outcomes.lock().await.push(outcome.clone());
        Ok(())
    }
}
