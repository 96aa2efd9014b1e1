//! Position list set operation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use steno_base::positions::{intersect, sort, union};
use steno_bench::sorted_positions;

/// Benchmark union and intersection on lists of growing size.
fn bench_set_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("positions");

    for size in [100usize, 10_000, 1_000_000] {
        let a = sorted_positions(size, (size * 4) as i64);
        let b = sorted_positions(size, (size * 4) as i64);
        group.throughput(Throughput::Elements((a.len() + b.len()) as u64));

        group.bench_with_input(BenchmarkId::new("union", size), &(&a, &b), |bench, (a, b)| {
            bench.iter(|| black_box(union(black_box(a), black_box(b))));
        });

        group.bench_with_input(
            BenchmarkId::new("intersect", size),
            &(&a, &b),
            |bench, (a, b)| {
                bench.iter(|| black_box(intersect(black_box(a), black_box(b))));
            },
        );
    }

    group.finish();
}

/// Benchmark establishing the sorted precondition.
fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");

    for size in [10_000usize, 1_000_000] {
        let mut reversed = sorted_positions(size, i64::MAX);
        reversed.reverse();

        group.bench_with_input(BenchmarkId::new("reversed", size), &reversed, |b, input| {
            b.iter(|| {
                let mut positions = input.clone();
                sort(&mut positions);
                black_box(positions);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_set_ops, bench_sort);
criterion_main!(benches);
