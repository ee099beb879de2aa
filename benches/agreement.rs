//! Benchmarks for the agreement engines.
//!
//! The coincidence build dominates Krippendorff's alpha; run with
//! `--features parallel` to compare against the rayon build.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use disagree::{BiDisagreements, CanonicalTable, DistanceKind, Krippendorff, Metrics};

/// Deterministic table: annotator `a` on instance `k` picks a label that
/// mostly follows `k`, with some missing cells.
fn synthetic_table(n_instances: usize, n_annotators: usize, n_labels: usize) -> CanonicalTable {
    let annotators: Vec<String> = (0..n_annotators).map(|a| format!("ann{}", a)).collect();
    let rows = (0..n_instances)
        .map(|k| {
            (0..n_annotators)
                .map(|a| {
                    if (k * 7 + a * 3) % 11 == 0 {
                        None
                    } else if (k + a) % 5 == 0 {
                        Some((k + a) % n_labels)
                    } else {
                        Some(k % n_labels)
                    }
                })
                .collect()
        })
        .collect();
    // Every cell is a valid code by construction.
    CanonicalTable::from_rows(annotators, rows, n_labels).unwrap()
}

fn bench_krippendorff(c: &mut Criterion) {
    let mut group = c.benchmark_group("krippendorff");

    for &n_instances in &[100, 1_000, 10_000] {
        let table = synthetic_table(n_instances, 5, 8);

        group.bench_with_input(
            BenchmarkId::new("coincidence", n_instances),
            &table,
            |b, table| b.iter(|| Krippendorff::new(black_box(table))),
        );

        let kripp = Krippendorff::new(&table);
        group.bench_with_input(
            BenchmarkId::new("alpha_ordinal", n_instances),
            &kripp,
            |b, kripp| b.iter(|| black_box(kripp.alpha(DistanceKind::Ordinal))),
        );
    }

    group.finish();
}

fn bench_kappa(c: &mut Criterion) {
    let mut group = c.benchmark_group("kappa");
    let table = synthetic_table(1_000, 8, 5);
    let metrics = Metrics::new(&table);

    group.bench_function("cohens_kappa_matrix", |b| {
        b.iter(|| black_box(metrics.metric_matrix(|x, y| metrics.cohens_kappa(x, y))))
    });
    group.bench_function("fleiss_kappa", |b| {
        b.iter(|| black_box(metrics.fleiss_kappa()))
    });
    group.bench_function("bidisagreement_summary", |b| {
        let bidis = BiDisagreements::new(&table);
        b.iter(|| black_box(bidis.summarize()))
    });

    group.finish();
}

criterion_group!(benches, bench_krippendorff, bench_kappa);
criterion_main!(benches);
