use crate::check::CycleOutcome;
use crate::snapshot::format_timestamp;

fn percent(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.1}%"),
        None => "n/a".to_string(),
    }
}

/// One-line, human-readable summary of a cycle.
///
/// ```text
/// [2026-03-14T09:26:53.000Z] Health Score: 100.0/100 - Status: HEALTHY - CPU: 45.0% - Memory: 55.0%
/// [2026-03-14T09:26:53.000Z] ERROR: No metrics collected: ...
/// ```
pub fn summary_line(outcome: &CycleOutcome) -> String {
    let timestamp = format_timestamp(&outcome.timestamp());
    match outcome {
        CycleOutcome::Completed(snapshot) => format!(
            "[{}] Health Score: {:.1}/100 - Status: {} - CPU: {} - Memory: {}",
            timestamp,
            snapshot.score().overall(),
            snapshot.status(),
            percent(snapshot.metrics().get("cpu_usage_total")),
            percent(snapshot.metrics().get("memory_usage_percent")),
        ),
        CycleOutcome::Failed(failure) => format!("[{}] ERROR: {}", timestamp, failure.message),
    }
}
