//! Finalized result of one health-check cycle.
//!
//! A [`Snapshot`] is built once from the aggregated metrics and the health
//! score, then only read. Building it does no I/O; given the same inputs and
//! timestamp it is identical on every run.

use crate::health::{HealthScore, HealthStatus, EXIT_INTERNAL_ERROR};
use crate::metrics::{AggregatedMetrics, CycleWarning, MetricRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::time::Duration;

/// Render a timestamp the way every snapshot and log line does.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    metrics: MetricRecord,
    score: HealthScore,
    status: HealthStatus,
    timestamp: DateTime<Utc>,
    duration: Duration,
    metrics_count: usize,
    host_name: Option<String>,
    warnings: Vec<CycleWarning>,
}

impl Snapshot {
    pub fn metrics(&self) -> &MetricRecord {
        &self.metrics
    }

    pub fn score(&self) -> &HealthScore {
        &self.score
    }

    pub fn status(&self) -> HealthStatus {
        self.status
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Collected metrics plus the health entries written alongside them.
    pub fn metrics_count(&self) -> usize {
        self.metrics_count
    }

    pub fn host_name(&self) -> Option<&str> {
        self.host_name.as_deref()
    }

    pub fn warnings(&self) -> &[CycleWarning] {
        &self.warnings
    }

    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.metrics.iter() {
            map.serialize_entry(key, &value)?;
        }
        for category in self.score.categories() {
            map.serialize_entry(
                &format!("health_{}_score", category.category),
                &category.score,
            )?;
        }
        map.serialize_entry("health_overall_score", &self.score.overall())?;
        map.serialize_entry("health_status_code", &self.status.code())?;
        map.serialize_entry("health_check_timestamp", &format_timestamp(&self.timestamp))?;
        map.serialize_entry("health_check_duration_seconds", &self.duration.as_secs_f64())?;
        map.serialize_entry("health_check_metrics_count", &self.metrics_count)?;
        if let Some(host_name) = &self.host_name {
            map.serialize_entry("hostname", host_name)?;
        }
        let warnings: Vec<String> = self.warnings.iter().map(|w| w.to_string()).collect();
        map.serialize_entry("health_check_warnings", &warnings)?;
        map.end()
    }
}

/// Assembles a [`Snapshot`] from one cycle's results.
pub struct SnapshotBuilder {
    aggregated: AggregatedMetrics,
    score: HealthScore,
    timestamp: DateTime<Utc>,
    duration: Duration,
    host_name: Option<String>,
}

impl SnapshotBuilder {
    pub fn new(aggregated: AggregatedMetrics, score: HealthScore) -> Self {
        Self {
            aggregated,
            score,
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            duration: Duration::ZERO,
            host_name: None,
        }
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn host_name(mut self, host_name: Option<String>) -> Self {
        self.host_name = host_name;
        self
    }

    pub fn build(self) -> Snapshot {
        let status = HealthStatus::from_score(self.score.overall());

        let mut warnings = self.aggregated.warnings;
        warnings.extend(
            self.score
                .excluded()
                .iter()
                .map(|category| CycleWarning::ScoreExcluded {
                    category: *category,
                }),
        );

        // category scores + overall + status code
        let health_entries = self.score.categories().len() + 2;
        let metrics_count = self.aggregated.record.len() + health_entries;

        Snapshot {
            metrics: self.aggregated.record,
            score: self.score,
            status,
            timestamp: self.timestamp,
            duration: self.duration,
            metrics_count,
            host_name: self.host_name,
            warnings,
        }
    }
}

/// Record emitted in place of a snapshot when a cycle fails outright.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleFailure {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl CycleFailure {
    pub fn new(timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }

    pub fn status(&self) -> HealthStatus {
        HealthStatus::Critical
    }

    pub fn exit_code(&self) -> i32 {
        EXIT_INTERNAL_ERROR
    }
}

impl Serialize for CycleFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("health_check_timestamp", &format_timestamp(&self.timestamp))?;
        map.serialize_entry("error", &self.message)?;
        map.serialize_entry("health_overall_score", &0.0)?;
        map.serialize_entry("health_status_code", &self.status().code())?;
        map.end()
    }
}
