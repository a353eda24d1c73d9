//! Scheduled health checks.
//!
//! The monitor runs one cycle per tick and reports it before waiting for the
//! next tick, so at most one cycle is ever in flight. A cycle that overruns
//! the interval pushes the following tick back instead of overlapping it.
//! Shutdown is only observed between cycles.

use crate::check::{CycleOutcome, HealthCheck};
use crate::config::MonitorConfig;
use crate::report::Reporter;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Shortest interval the ticker accepts.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// What a finished monitor run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub cycles: u64,
    pub last: Option<CycleOutcome>,
}

pub struct Monitor {
    check: HealthCheck,
    reporter: Reporter,
    interval: Duration,
    max_cycles: Option<u64>,
}

impl Monitor {
    /// Intervals below [`MIN_INTERVAL`] are raised to it.
    pub fn new(check: HealthCheck, reporter: Reporter, interval: Duration) -> Self {
        if interval < MIN_INTERVAL {
            warn!(
                "Monitor interval {:?} is too short, using {:?}",
                interval, MIN_INTERVAL
            );
        }
        Self {
            check,
            reporter,
            interval: interval.max(MIN_INTERVAL),
            max_cycles: None,
        }
    }

    pub fn from_config(check: HealthCheck, reporter: Reporter, config: &MonitorConfig) -> Self {
        let mut monitor = Self::new(check, reporter, config.interval());
        monitor.max_cycles = config.max_cycles;
        monitor
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stop after `max_cycles` cycles.
    pub fn with_max_cycles(mut self, max_cycles: u64) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }

    /// Run one cycle and report it.
    pub async fn tick(&self) -> CycleOutcome {
        let outcome = self.check.run_cycle().await;
        self.reporter.report(&outcome).await;
        outcome
    }

    /// Run cycles until `shutdown` is cancelled or `max_cycles` is reached.
    pub async fn run(&self, shutdown: CancellationToken) -> RunSummary {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Monitor started, checking every {:.1} seconds",
            self.interval.as_secs_f64()
        );

        let mut summary = RunSummary {
            cycles: 0,
            last: None,
        };

        loop {
            if self.max_cycles.is_some_and(|max| summary.cycles >= max) {
                info!("Reached {} cycles, stopping", summary.cycles);
                break;
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested, stopping monitor");
                    break;
                }
                _ = ticker.tick() => {}
            }

            // Once started, a cycle runs to completion and is reported
            let outcome = self.tick().await;
            summary.cycles += 1;
            summary.last = Some(outcome);
        }

        info!("Monitor stopped after {} cycles", summary.cycles);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::FixedClock;
    use crate::report::MemorySink;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use vitals_provider::*;

    fn check() -> HealthCheck {
        let samples = SampleSet::new().with_cpu(CpuSample {
            total_percent: 70.0,
            ..Default::default()
        });
        HealthCheck::new(Arc::new(FixedProvider::new(samples))).with_clock(Arc::new(
            FixedClock(Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()),
        ))
    }

    #[tokio::test]
    async fn test_stops_after_max_cycles() {
        let sink = MemorySink::new();
        let monitor = Monitor::new(
            check(),
            Reporter::new().with_sink(sink.clone()),
            Duration::from_millis(5),
        )
        .with_max_cycles(3);

        let summary = monitor.run(CancellationToken::new()).await;
        assert_eq!(summary.cycles, 3);
        assert_eq!(sink.len().await, 3);
        assert_eq!(summary.last.map(|o| o.exit_code()), Some(1));
    }

    #[tokio::test]
    async fn test_zero_interval_is_raised() {
        let sink = MemorySink::new();
        let monitor = Monitor::new(
            check(),
            Reporter::new().with_sink(sink.clone()),
            Duration::ZERO,
        )
        .with_max_cycles(2);
        assert_eq!(monitor.interval(), MIN_INTERVAL);

        let summary = monitor.run(CancellationToken::new()).await;
        assert_eq!(summary.cycles, 2);
        assert_eq!(sink.len().await, 2);
    }

    #[tokio::test]
    async fn test_from_unvalidated_config() {
        let config = MonitorConfig {
            interval_secs: 0,
            max_cycles: Some(1),
        };
        let monitor = Monitor::from_config(check(), Reporter::new(), &config);
        assert_eq!(monitor.interval(), MIN_INTERVAL);
        assert_eq!(monitor.run(CancellationToken::new()).await.cycles, 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_runs_nothing() {
        let sink = MemorySink::new();
        let monitor = Monitor::new(
            check(),
            Reporter::new().with_sink(sink.clone()),
            Duration::from_millis(5),
        );

        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let summary = monitor.run(shutdown).await;
        assert_eq!(summary.cycles, 0);
        assert!(summary.last.is_none());
        assert_eq!(sink.len().await, 0);
    }

    #[tokio::test]
    async fn test_cancel_between_cycles() {
        let sink = MemorySink::new();
        let monitor = Monitor::new(
            check(),
            Reporter::new().with_sink(sink.clone()),
            Duration::from_secs(3600),
        );

        let shutdown = CancellationToken::new();
        let trigger = shutdown.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        // First tick fires immediately; the next one is an hour away
        let summary = monitor.run(shutdown).await;
        handle.await.unwrap();

        assert_eq!(summary.cycles, 1);
        assert_eq!(sink.len().await, 1);
    }
}
