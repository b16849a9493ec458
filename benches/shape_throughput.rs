//! Shape normalization throughput benchmarks
//!
//! Measures the two reshaping steps that scale with result size:
//! - Top-N collapsing for categorical charts (100 .. 100k categories)
//! - Dense grid building for the animated chart (months x categories)
//!
//! Run benchmarks: `cargo bench --bench shape_throughput`

use chrono::{Months, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rust_decimal::Decimal;
use std::hint::black_box;
use tally::shape::{CategoryValue, Observation, collapse_top_n, dense_grid};

fn categories(count: usize) -> Vec<CategoryValue> {
    (0..count)
        .map(|i| {
            // Scrambled so the sort has work to do.
            let value = Decimal::from((i * 7919 % 10_007) as i64);
            CategoryValue::new(format!("category_{}", i), value)
        })
        .collect()
}

fn observations(months: u32, categories: usize) -> Vec<Observation> {
    let start = NaiveDate::from_ymd_opt(2016, 9, 1).expect("valid date");
    (0..months)
        .flat_map(|m| {
            let bucket = start.checked_add_months(Months::new(m));
            (0..categories)
                // Sparse: roughly a third of the combinations are absent.
                .filter(move |c| (c + m as usize) % 3 != 0)
                .map(move |c| Observation {
                    bucket,
                    category: Some(format!("category_{}", c)),
                    value: Decimal::from((c * 31 + m as usize) as i64),
                })
        })
        .collect()
}

fn benchmark_collapse(c: &mut Criterion) {
    let mut group = c.benchmark_group("collapse_top_n");

    for count in [100, 1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(count as u64));
        let rows = categories(count);

        group.bench_with_input(BenchmarkId::new("categories", count), &rows, |b, rows| {
            b.iter(|| collapse_top_n(black_box(rows.clone()), 10));
        });
    }

    group.finish();
}

fn benchmark_dense_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_grid");

    for (months, cats) in [(24, 20), (24, 70), (120, 70), (120, 500)] {
        let input = observations(months, cats);
        group.throughput(Throughput::Elements(input.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("months_x_categories", format!("{}x{}", months, cats)),
            &input,
            |b, input| {
                b.iter(|| dense_grid(black_box(input.clone()), 8));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_collapse, benchmark_dense_grid);
criterion_main!(benches);
