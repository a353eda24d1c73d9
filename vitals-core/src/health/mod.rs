//! Health scoring.
//!
//! - `curve`: per-category penalty curves
//! - `score`: combining category scores into the overall score
//! - `status`: classifying the overall score

mod curve;
mod score;
mod status;

pub use curve::{
    cpu_score, disk_score, memory_score, PenaltyCurve, CPU_CURVE, DISK_CURVE, MAX_SCORE,
    MEMORY_CURVE,
};
pub use score::{CategoryScore, HealthScore, HealthScorer, ScoreWeights, NEUTRAL_SCORE};
pub use status::{HealthStatus, EXIT_INTERNAL_ERROR, HEALTHY_THRESHOLD, WARNING_THRESHOLD};
