//! Terminal rendering of a cycle outcome.

use colored::{ColoredString, Colorize};
use vitals_core::{CycleOutcome, HealthStatus, Snapshot};

fn status_label(status: HealthStatus) -> ColoredString {
    match status {
        HealthStatus::Healthy => status.as_str().green().bold(),
        HealthStatus::Warning => status.as_str().yellow().bold(),
        HealthStatus::Critical => status.as_str().red().bold(),
    }
}

fn print_snapshot(snapshot: &Snapshot) {
    println!(
        "{} {:.1}/100 {}",
        "Health score:".bold(),
        snapshot.score().overall(),
        status_label(snapshot.status())
    );

    for category in snapshot.score().categories() {
        println!("  {:<8} {:>5.1}", category.category.as_str(), category.score);
    }

    if let Some(host) = snapshot.host_name() {
        println!("  {:<8} {}", "host", host);
    }
    println!(
        "  {} metrics in {:.2}s",
        snapshot.metrics_count(),
        snapshot.duration().as_secs_f64()
    );

    for warning in snapshot.warnings() {
        println!("  {} {}", "warning:".yellow(), warning);
    }
}

pub fn print_outcome(outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Completed(snapshot) => print_snapshot(snapshot),
        CycleOutcome::Failed(failure) => {
            println!(
                "{} {}",
                "Health check failed:".red().bold(),
                failure.message
            );
        }
    }
}
