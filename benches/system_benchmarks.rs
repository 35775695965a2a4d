use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hostpulse::{
    metrics::sources::{parse_cpu_ticks, parse_wireless},
    MetricsCollector, MetricsProvider, MetricsSnapshot,
};

const WIRELESS_TABLE: &str = "\
Inter-| sta-|   Quality        |   Discarded packets               | Missed | WE
 face | tus | link level noise |  nwid  crypt   frag  retry   misc | beacon | 22
 wlan0: 0000   41.  -69.  -256        0      0      0      0      0        0
 wlan1: 0000   70.  -40.  -256        0      0      0      2      1        0
";

/// Benchmark a full collection pass, sampling window included
fn bench_snapshot_collection(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Should create tokio runtime");
    let collector = MetricsCollector::default();

    c.bench_function("snapshot_collection", |b| {
        b.to_async(&rt)
            .iter(|| async { collector.collect_snapshot().await.expect("Should collect snapshot") })
    });
}

/// Benchmark JSON serialization of snapshots
fn bench_json_serialization(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Should create tokio runtime");

    // Collect a real snapshot to benchmark serialization
    let snapshot = rt.block_on(async {
        MetricsCollector::default()
            .collect_snapshot()
            .await
            .expect("Should collect snapshot")
    });

    c.bench_function("json_serialization", |b| {
        b.iter(|| serde_json::to_string(&snapshot).expect("Should serialize"))
    });

    let json_string = serde_json::to_string(&snapshot).expect("Should serialize");
    c.bench_function("json_deserialization", |b| {
        b.iter(|| serde_json::from_str::<MetricsSnapshot>(&json_string).expect("Should deserialize"))
    });
}

/// Benchmark concurrent requests sharing one collector
fn bench_concurrent_collection(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Should create tokio runtime");
    let collector = std::sync::Arc::new(MetricsCollector::default());

    for concurrency in [1, 2, 4, 8].iter() {
        c.bench_with_input(
            BenchmarkId::new("concurrent_collection", concurrency),
            concurrency,
            |b, &concurrency| {
                b.to_async(&rt).iter(|| {
                    let collector = collector.clone();
                    async move {
                        let handles: Vec<_> = (0..concurrency)
                            .map(|_| {
                                let collector = collector.clone();
                                tokio::spawn(async move { collector.collect_snapshot().await })
                            })
                            .collect();

                        futures_util::future::join_all(handles).await
                    }
                })
            },
        );
    }
}

/// Benchmark the pseudo-file parsers
fn bench_parsers(c: &mut Criterion) {
    let stat: String = (0..64)
        .map(|core| format!("cpu{core} 4705 356 584 3699176 23060 0 277 0 0 0\n"))
        .collect();

    c.bench_function("parse_cpu_ticks_64_cores", |b| {
        b.iter(|| parse_cpu_ticks(&stat).expect("Should parse"))
    });

    c.bench_function("parse_wireless", |b| b.iter(|| parse_wireless(WIRELESS_TABLE)));
}

criterion_group!(
    benches,
    bench_snapshot_collection,
    bench_json_serialization,
    bench_concurrent_collection,
    bench_parsers
);

criterion_main!(benches);
