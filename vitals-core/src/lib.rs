//! vitals-core - Health-scoring engine
//!
//! Turns raw host samples into a bounded, deterministic health assessment:
//! - Category collectors and the metric aggregator (`metrics`)
//! - Penalty curves, overall score and status (`health`)
//! - The immutable per-cycle record (`snapshot`)
//! - Running a cycle (`check`) and scheduling cycles (`monitor`)
//! - Writing outcomes out (`report`)
//! - Configuration management
//!
//! ## Primary API
//!
//! Most users build a [`HealthCheck`] around a provider and either call
//! [`HealthCheck::run_cycle`] once or hand it to a [`Monitor`].

pub mod check;
pub mod config;
pub mod health;
pub mod metrics;
pub mod monitor;
pub mod report;
pub mod snapshot;

pub use check::{Clock, CycleError, CycleOutcome, FixedClock, HealthCheck, SystemClock};
pub use config::{Config, ConfigError};
pub use health::{HealthScore, HealthScorer, HealthStatus, ScoreWeights, EXIT_INTERNAL_ERROR};
pub use metrics::{CollectorRegistry, CycleWarning, MetricRecord};
pub use monitor::{Monitor, RunSummary};
pub use report::{Reporter, Sink};
pub use snapshot::{CycleFailure, Snapshot, SnapshotBuilder};
