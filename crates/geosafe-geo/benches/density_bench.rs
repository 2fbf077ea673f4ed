//! Benchmarks for GeoSafe density aggregation
//!
//! Measures performance of:
//! - Haversine distance
//! - Full heatmap classification at growing snapshot sizes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geosafe_geo::{distance_m, heatmap, offset_north};
use geosafe_model::{Category, Location, Report, ReportStatus};

fn snapshot(n: usize) -> Vec<Report> {
    let origin = Location::new(14.5995, 120.9842);
    (0..n)
        .map(|i| Report {
            id: format!("r{}", i),
            location: offset_north(origin, (i % 97) as f64 * 75.0),
            title: String::new(),
            description: String::new(),
            reported_by: "bench".into(),
            category: Category::ALL[i % Category::ALL.len()],
            status: ReportStatus::Pending,
            approvers: vec![],
        })
        .collect()
}

/// Benchmark a single distance computation
fn bench_distance(c: &mut Criterion) {
    let a = Location::new(14.5995, 120.9842);
    let b = Location::new(14.6091, 121.0223);
    c.bench_function("distance_m", |bench| {
        bench.iter(|| distance_m(black_box(a), black_box(b)))
    });
}

/// Benchmark classifying every report in a snapshot
fn bench_heatmap(c: &mut Criterion) {
    let mut group = c.benchmark_group("heatmap");

    for &n in &[10usize, 100, 500, 1000] {
        let reports = snapshot(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &reports, |b, reports| {
            b.iter(|| heatmap(black_box(reports), reports))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_distance, bench_heatmap);
criterion_main!(benches);
