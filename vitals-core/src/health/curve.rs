//! Piecewise-linear penalty curves mapping a usage percent to a health score.
//!
//! Every curve has three segments: flat at 100 up to `healthy_until`, a
//! gentle slope up to `degraded_until`, then a steeper slope down to 0. The
//! start of the last segment is derived from the end of the second one, so the
//! curves are continuous at both breakpoints.

/// Upper bound of every score.
pub const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyCurve {
    pub healthy_until: f64,
    pub degraded_until: f64,
    pub degraded_slope: f64,
    pub critical_slope: f64,
}

/// CPU: 100 up to 50%, -2/pt up to 80% (score 40), then -2/pt.
pub const CPU_CURVE: PenaltyCurve = PenaltyCurve {
    healthy_until: 50.0,
    degraded_until: 80.0,
    degraded_slope: 2.0,
    critical_slope: 2.0,
};

/// Memory: 100 up to 60%, -2/pt up to 85% (score 50), then -3/pt.
pub const MEMORY_CURVE: PenaltyCurve = PenaltyCurve {
    healthy_until: 60.0,
    degraded_until: 85.0,
    degraded_slope: 2.0,
    critical_slope: 3.0,
};

/// Disk, per mount: 100 up to 70%, -2.5/pt up to 90% (score 50), then -5/pt.
pub const DISK_CURVE: PenaltyCurve = PenaltyCurve {
    healthy_until: 70.0,
    degraded_until: 90.0,
    degraded_slope: 2.5,
    critical_slope: 5.0,
};

impl PenaltyCurve {
    /// Score at the second breakpoint, where the critical segment starts.
    pub fn degraded_floor(&self) -> f64 {
        MAX_SCORE - self.degraded_slope * (self.degraded_until - self.healthy_until)
    }

    /// Health score in [0, 100] for a usage percent.
    ///
    /// NaN usage scores 0.
    pub fn score(&self, usage: f64) -> f64 {
        if usage.is_nan() {
            return 0.0;
        }
        let score = if usage <= self.healthy_until {
            MAX_SCORE
        } else if usage <= self.degraded_until {
            MAX_SCORE - self.degraded_slope * (usage - self.healthy_until)
        } else {
            self.degraded_floor() - self.critical_slope * (usage - self.degraded_until)
        };
        score.clamp(0.0, MAX_SCORE)
    }
}

pub fn cpu_score(usage: f64) -> f64 {
    CPU_CURVE.score(usage)
}

pub fn memory_score(usage: f64) -> f64 {
    MEMORY_CURVE.score(usage)
}

/// Mean of the per-mount disk scores; 100 when there is nothing mounted.
pub fn disk_score(usages: &[f64]) -> f64 {
    if usages.is_empty() {
        return MAX_SCORE;
    }
    usages.iter().map(|u| DISK_CURVE.score(*u)).sum::<f64>() / usages.len() as f64
}
