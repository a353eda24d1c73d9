use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest overall score still classified as healthy.
pub const HEALTHY_THRESHOLD: f64 = 80.0;
/// Lowest overall score classified as warning.
pub const WARNING_THRESHOLD: f64 = 60.0;

/// Exit code for a cycle that failed before producing a snapshot.
pub const EXIT_INTERNAL_ERROR: i32 = 3;

/// Overall system status, a pure function of the overall health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Classify an overall score. Each band includes its lower bound.
    pub fn from_score(score: f64) -> Self {
        if score >= HEALTHY_THRESHOLD {
            HealthStatus::Healthy
        } else if score >= WARNING_THRESHOLD {
            HealthStatus::Warning
        } else {
            HealthStatus::Critical
        }
    }

    /// Status code written to snapshots.
    pub fn code(&self) -> u8 {
        match self {
            HealthStatus::Healthy => 1,
            HealthStatus::Warning => 2,
            HealthStatus::Critical => 3,
        }
    }

    /// Process exit code for CLI wrappers.
    pub fn exit_code(&self) -> i32 {
        match self {
            HealthStatus::Healthy => 0,
            HealthStatus::Warning => 1,
            HealthStatus::Critical => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "HEALTHY",
            HealthStatus::Warning => "WARNING",
            HealthStatus::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
