/// M4: Benchmark harness — timing-driven preference and statistics side effects

use duodex::{
    BenchmarkConfig, DualIndexEngine, DuodexError, EngineConfig, IndexKind, KeySpan, WorkloadKind,
};

fn seeded_engine(seed: u64) -> DualIndexEngine {
    let config = EngineConfig {
        order: 3,
        benchmark: BenchmarkConfig { seed: Some(seed), ..BenchmarkConfig::default() },
    };
    let mut engine = DualIndexEngine::new(config).unwrap();
    engine.load((1..=100).map(|k| (k, format!("game {k}"))));
    engine
}

fn expected_choice(ordered: std::time::Duration, hash: std::time::Duration) -> IndexKind {
    if hash < ordered {
        IndexKind::Hash
    } else {
        IndexKind::Ordered
    }
}

#[test]
fn test_equality_benchmark_picks_faster() {
    let mut engine = seeded_engine(11);
    let report = engine.run_benchmark(1000, WorkloadKind::Equality).unwrap();

    println!(
        "equality x1000: ordered {:?}, hash {:?}, chosen {}",
        report.ordered_total, report.hash_total, report.chosen
    );
    assert_eq!(report.chosen == IndexKind::Hash, report.hash_total < report.ordered_total);
    assert_eq!(engine.current_preference(), report.chosen);
    assert_eq!(report.workload, WorkloadKind::Equality);
    assert_eq!(report.query_count, 1000);
}

#[test]
fn test_every_workload_follows_timings() {
    let mut engine = seeded_engine(12);
    for workload in ["equality", "range", "mixed"] {
        let workload: WorkloadKind = workload.parse().unwrap();
        let report = engine.run_benchmark(300, workload).unwrap();
        assert_eq!(report.chosen, expected_choice(report.ordered_total, report.hash_total));
        assert_eq!(engine.current_preference(), report.chosen);
    }
}

#[test]
fn test_pure_workloads_leave_statistics_alone() {
    let mut engine = seeded_engine(13);
    engine.run_benchmark(500, WorkloadKind::Equality).unwrap();
    engine.run_benchmark(500, WorkloadKind::Range).unwrap();

    let stats = engine.stats();
    assert_eq!(stats.equality_count, 0);
    assert_eq!(stats.range_count, 0);
}

#[test]
fn test_mixed_workload_feeds_statistics() {
    let mut engine = seeded_engine(14);
    engine.run_benchmark(400, WorkloadKind::Mixed).unwrap();

    let stats = engine.stats();
    assert_eq!(stats.total(), 400);
    assert!(stats.equality_count > 100 && stats.range_count > 100, "{stats:?}");
}

#[test]
fn test_benchmark_override_then_query_recomputes() {
    let mut engine = seeded_engine(15);
    let report = engine.run_benchmark(200, WorkloadKind::Range).unwrap();
    assert_eq!(engine.current_preference(), report.chosen);

    // Counters are empty; one range query puts the preference back on Ordered
    engine.range_search(1, 10);
    assert_eq!(engine.current_preference(), IndexKind::Ordered);
}

#[test]
fn test_zero_queries_rejected() {
    let mut engine = seeded_engine(16);
    let before = engine.current_preference();
    let err = engine.run_benchmark(0, WorkloadKind::Mixed).unwrap_err();
    assert!(matches!(err, DuodexError::InvalidQueryCount));
    assert_eq!(engine.current_preference(), before);
}

#[test]
fn test_unknown_workload_rejected() {
    let err = "sequential".parse::<WorkloadKind>().unwrap_err();
    assert!(matches!(err, DuodexError::UnknownWorkload(_)));
    assert!(err.to_string().contains("sequential"));
}

#[test]
fn test_report_json() {
    let mut engine = seeded_engine(17);
    let report = engine.run_benchmark(10, WorkloadKind::Equality).unwrap();
    let json = report.to_json();
    assert_eq!(json["workload"], "equality");
    assert_eq!(json["query_count"], 10);
    assert_eq!(json["chosen"], report.chosen.as_str());
}

#[test]
fn test_range_workload_near_key_limit() {
    let overflowing = EngineConfig {
        order: 3,
        benchmark: BenchmarkConfig {
            range_starts: KeySpan::new(i64::MAX - 7, i64::MAX),
            range_width: KeySpan::new(10, 10),
            seed: Some(1),
            ..BenchmarkConfig::default()
        },
    };
    let err = DualIndexEngine::new(overflowing).err().unwrap();
    assert!(matches!(err, DuodexError::InvalidConfig(_)));

    let edge = EngineConfig {
        order: 3,
        benchmark: BenchmarkConfig {
            range_starts: KeySpan::new(i64::MAX - 20, i64::MAX - 10),
            range_width: KeySpan::new(0, 10),
            seed: Some(1),
            ..BenchmarkConfig::default()
        },
    };
    let mut engine = DualIndexEngine::new(edge).unwrap();
    engine.load((i64::MAX - 15..=i64::MAX).map(|k| (k, format!("game {k}"))));
    for workload in [WorkloadKind::Range, WorkloadKind::Mixed] {
        let report = engine.run_benchmark(10, workload).unwrap();
        assert_eq!(report.query_count, 10);
    }
}
