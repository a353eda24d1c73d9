//! One health-check cycle: fan out to collectors, merge, score, snapshot.

use crate::health::{HealthScorer, HealthStatus};
use crate::metrics::{CollectError, CollectorRegistry, MetricsAggregator};
use crate::snapshot::{CycleFailure, Snapshot, SnapshotBuilder};
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, Serializer};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{info, warn};
use vitals_provider::MetricsProvider;

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("No collectors registered")]
    NoCollectors,

    #[error("No metrics collected: {0}")]
    NoMetrics(String),
}

pub type Result<T> = std::result::Result<T, CycleError>;

/// Source of time for a cycle.
///
/// `now` stamps the snapshot; `elapsed` measures the cycle and must be
/// monotonic, so wall-clock steps never distort the duration.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn elapsed(&self, since: Instant) -> Duration {
        since.elapsed()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }

    fn elapsed(&self, _since: Instant) -> Duration {
        Duration::ZERO
    }
}

/// What a cycle hands to the reporter.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Completed(Snapshot),
    Failed(CycleFailure),
}

impl CycleOutcome {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            CycleOutcome::Completed(snapshot) => snapshot.timestamp(),
            CycleOutcome::Failed(failure) => failure.timestamp,
        }
    }

    pub fn status(&self) -> HealthStatus {
        match self {
            CycleOutcome::Completed(snapshot) => snapshot.status(),
            CycleOutcome::Failed(failure) => failure.status(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CycleOutcome::Completed(snapshot) => snapshot.exit_code(),
            CycleOutcome::Failed(failure) => failure.exit_code(),
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            CycleOutcome::Completed(snapshot) => Some(snapshot),
            CycleOutcome::Failed(_) => None,
        }
    }
}

impl Serialize for CycleOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CycleOutcome::Completed(snapshot) => snapshot.serialize(serializer),
            CycleOutcome::Failed(failure) => failure.serialize(serializer),
        }
    }
}

/// Runs health-check cycles against a provider.
///
/// Owns everything a cycle needs: the provider, the collectors, the scorer
/// and the clock. Cycles share no state with each other.
pub struct HealthCheck {
    provider: Arc<dyn MetricsProvider>,
    registry: CollectorRegistry,
    scorer: HealthScorer,
    clock: Arc<dyn Clock>,
}

impl HealthCheck {
    /// Creates a health check with every built-in collector, an unweighted
    /// scorer and the system clock.
    pub fn new(provider: Arc<dyn MetricsProvider>) -> Self {
        Self {
            provider,
            registry: CollectorRegistry::with_defaults(),
            scorer: HealthScorer::new(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_registry(mut self, registry: CollectorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_scorer(mut self, scorer: HealthScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn registry(&self) -> &CollectorRegistry {
        &self.registry
    }

    /// Run one cycle and produce a snapshot.
    ///
    /// Collectors run as concurrent tasks; aggregation waits for all of them.
    /// A collector that errors or panics only removes its own category.
    ///
    /// # Errors
    ///
    /// Returns an error if no collector produced a fragment.
    pub async fn run(&self) -> Result<Snapshot> {
        if self.registry.is_empty() {
            return Err(CycleError::NoCollectors);
        }

        info!("Starting health check");
        let started = self.clock.now();
        let started_at = Instant::now();

        let tasks: Vec<_> = self
            .registry
            .all()
            .into_iter()
            .map(|collector| {
                let collector = Arc::clone(collector);
                let provider = Arc::clone(&self.provider);
                let category = collector.category();
                let handle =
                    tokio::spawn(async move { collector.collect(provider.as_ref()).await });
                (category, handle)
            })
            .collect();

        let (categories, handles): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
        let joined = futures::future::join_all(handles).await;

        let mut aggregator = MetricsAggregator::new();
        for (category, joined) in categories.into_iter().zip(joined) {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => Err(CollectError::Aborted(e.to_string())),
            };
            match &outcome {
                Ok(fragment) => info!("Collected {} {} metrics", fragment.len(), category),
                Err(e) => warn!("Failed to collect {} metrics: {}", category, e),
            }
            aggregator.add(category, outcome);
        }

        let aggregated = aggregator.finalize();
        if aggregated.is_empty() {
            let reasons: Vec<String> = aggregated
                .failed
                .iter()
                .map(|(category, reason)| format!("{category}: {reason}"))
                .collect();
            return Err(CycleError::NoMetrics(reasons.join("; ")));
        }

        let score = self.scorer.score(&aggregated.inputs);
        for category in score.excluded() {
            warn!("{} excluded from overall health score", category);
        }

        let host_name = self.provider.host_name().await;
        let duration = self.clock.elapsed(started_at);

        let snapshot = SnapshotBuilder::new(aggregated, score)
            .timestamp(started)
            .duration(duration)
            .host_name(host_name)
            .build();

        info!(
            "Health check completed in {:.2} seconds: {} metrics, overall {:.1} ({})",
            duration.as_secs_f64(),
            snapshot.metrics_count(),
            snapshot.score().overall(),
            snapshot.status()
        );

        Ok(snapshot)
    }

    /// Run one cycle, turning a total failure into an error record.
    pub async fn run_cycle(&self) -> CycleOutcome {
        match self.run().await {
            Ok(snapshot) => CycleOutcome::Completed(snapshot),
            Err(e) => {
                warn!("Health check failed: {}", e);
                CycleOutcome::Failed(CycleFailure::new(self.clock.now(), e.to_string()))
            }
        }
    }
}
