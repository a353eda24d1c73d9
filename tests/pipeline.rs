//! End-to-end cycles driven through a fixed provider and a fixed clock.

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vitals::config::ReportConfig;
use vitals::report::MemorySink;
use vitals::*;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap(),
    ))
}

fn host(cpu: f64, memory: f64, disk: f64) -> SampleSet {
    let total = 1_000_000_u64;
    let used = (total as f64 * disk / 100.0) as u64;

    SampleSet::new()
        .with_cpu(CpuSample {
            total_percent: cpu,
            per_core_percent: vec![cpu, cpu],
            load_average: Some(LoadAverage {
                one: 0.5,
                five: 0.4,
                fifteen: 0.3,
            }),
            core_count: Some(2),
        })
        .with_memory(MemorySample {
            total_bytes: 8_000,
            available_bytes: 8_000 - (80.0 * memory) as u64,
            used_bytes: (80.0 * memory) as u64,
            percent: memory,
            ..Default::default()
        })
        .with_disk(DiskSample {
            partitions: vec![PartitionSample::new(
                "/",
                PartitionUsage {
                    total_bytes: total,
                    used_bytes: used,
                    free_bytes: total - used,
                },
            )],
            io: None,
        })
        .with_network(NetworkSample {
            interfaces: vec![InterfaceSample::new(
                "eth0",
                InterfaceCounters {
                    bytes_sent: 10,
                    bytes_recv: 20,
                    ..Default::default()
                },
            )],
            connections: Some(7),
        })
        .with_process(ProcessSample {
            total: 120,
            running: 2,
            sleeping: 117,
            zombie: 1,
        })
}

fn check(samples: SampleSet) -> HealthCheck {
    HealthCheck::new(Arc::new(FixedProvider::new(samples))).with_clock(clock())
}

#[tokio::test]
async fn test_idle_host_is_healthy() {
    let snapshot = check(host(45.0, 55.0, 65.0)).run().await.unwrap();

    assert_eq!(snapshot.score().get(Category::Cpu), Some(100.0));
    assert_eq!(snapshot.score().get(Category::Memory), Some(100.0));
    assert_eq!(snapshot.score().get(Category::Disk), Some(100.0));
    assert_eq!(snapshot.score().overall(), 100.0);
    assert_eq!(snapshot.status(), HealthStatus::Healthy);
    assert_eq!(snapshot.exit_code(), 0);
    assert!(snapshot.warnings().is_empty());

    let metrics = snapshot.metrics();
    assert_eq!(metrics.get("cpu_usage_total"), Some(45.0));
    assert_eq!(metrics.get("disk_root_usage_percent"), Some(65.0));
    assert_eq!(metrics.get("network_eth0_bytes_recv"), Some(20.0));
    assert_eq!(metrics.get("network_interfaces_count"), Some(1.0));
    assert_eq!(metrics.get("network_connections_total"), Some(7.0));
    assert_eq!(metrics.get("processes_zombie"), Some(1.0));
    assert_eq!(snapshot.metrics_count(), metrics.len() + 3 + 2);
}

#[tokio::test]
async fn test_saturated_host_is_critical() {
    let snapshot = check(host(95.0, 92.0, 95.0)).run().await.unwrap();

    assert_eq!(snapshot.score().get(Category::Cpu), Some(10.0));
    assert_eq!(snapshot.score().get(Category::Memory), Some(29.0));
    assert_eq!(snapshot.score().get(Category::Disk), Some(25.0));
    assert!((snapshot.score().overall() - 64.0 / 3.0).abs() < 1e-9);
    assert_eq!(snapshot.status(), HealthStatus::Critical);
    assert_eq!(snapshot.exit_code(), 2);
}

#[tokio::test]
async fn test_snapshot_json_is_deterministic() {
    let first = check(host(70.0, 75.0, 80.0)).run_cycle().await;
    let second = check(host(70.0, 75.0, 80.0)).run_cycle().await;

    let first = serde_json::to_string(&first).unwrap();
    let second = serde_json::to_string(&second).unwrap();
    assert_eq!(first, second);

    let value: serde_json::Value = serde_json::from_str(&first).unwrap();
    assert_eq!(value["health_status_code"], 2);
    assert_eq!(value["health_check_timestamp"], "2026-03-14T09:26:53.000Z");
    assert_eq!(value["health_check_duration_seconds"], 0.0);
    assert!(value["health_check_warnings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_host_without_partitions_scores_full_disk() {
    let samples = host(45.0, 55.0, 0.0).with_disk(DiskSample::default());
    let snapshot = check(samples).run().await.unwrap();

    assert_eq!(snapshot.score().get(Category::Disk), Some(100.0));
    assert_eq!(snapshot.score().overall(), 100.0);
    assert!(snapshot.score().excluded().is_empty());
}

#[tokio::test]
async fn test_missing_memory_is_excluded_from_score() {
    let samples = SampleSet::new()
        .with_cpu(CpuSample {
            total_percent: 95.0,
            ..Default::default()
        })
        .with_disk(DiskSample::default());
    let snapshot = check(samples).run().await.unwrap();

    assert_eq!(snapshot.score().excluded(), &[Category::Memory]);
    assert_eq!(snapshot.score().overall(), 55.0);
    assert_eq!(snapshot.status(), HealthStatus::Critical);

    let warnings: Vec<String> = snapshot.warnings().iter().map(|w| w.to_string()).collect();
    assert!(warnings.contains(&"memory: excluded from overall health score".to_string()));
}

#[tokio::test]
async fn test_weighted_score() {
    let weights = ScoreWeights {
        cpu: 0.5,
        memory: 0.25,
        disk: 0.25,
    };
    let snapshot = check(host(95.0, 55.0, 65.0))
        .with_scorer(HealthScorer::weighted(weights))
        .run()
        .await
        .unwrap();

    // 0.5 * 10 + 0.25 * 100 + 0.25 * 100
    assert!((snapshot.score().overall() - 55.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_nothing_collected_is_internal_error() {
    let outcome = check(SampleSet::new()).run_cycle().await;

    assert_eq!(outcome.exit_code(), 3);
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["health_overall_score"], 0.0);
    assert_eq!(value["health_status_code"], 3);
    assert!(value["error"].as_str().unwrap().contains("memory"));
}

#[tokio::test]
async fn test_monitor_writes_reports() {
    let dir = tempfile::tempdir().unwrap();
    let report = ReportConfig {
        output_dir: dir.path().to_path_buf(),
        write_snapshots: true,
        log_file: Some("system_health.log".into()),
    };
    let memory = MemorySink::new();
    let reporter = Reporter::from_config(&report).with_sink(memory.clone());
    assert_eq!(reporter.sink_names(), ["json", "log", "memory"]);

    let monitor = Monitor::new(
        check(host(45.0, 55.0, 65.0)),
        reporter,
        Duration::from_millis(5),
    )
    .with_max_cycles(2);
    let summary = monitor.run(CancellationToken::new()).await;

    assert_eq!(summary.cycles, 2);
    assert_eq!(memory.len().await, 2);

    let snapshot = dir.path().join("health_metrics_20260314_092653.json");
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(snapshot).unwrap()).unwrap();
    assert_eq!(value["health_overall_score"], 100.0);

    let log = std::fs::read_to_string(dir.path().join("system_health.log")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "[2026-03-14T09:26:53.000Z] Health Score: 100.0/100 - Status: HEALTHY - CPU: 45.0% - Memory: 55.0%"
    );
}
