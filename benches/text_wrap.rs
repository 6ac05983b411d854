//! Criterion benchmarks for the text measurement and wrapping routines.

// `criterion_group!` expands to an undocumented function that cannot carry
// doc comments, so the crate-wide `missing_docs` deny is relaxed here.
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use voxen::text;

const WORDS: [&str; 8] = [
    "stone", "dirt", "grass", "plank", "cobblestone", "sand", "glass", "brick",
];

fn build_input(words: usize) -> String {
    WORDS
        .iter()
        .cycle()
        .take(words)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

fn line_width_benchmark(c: &mut Criterion) {
    let line = build_input(12);
    let _ = c.bench_function("line_width", |b| {
        b.iter(|| black_box(text::line_width(black_box(&line))))
    });
}

fn wrap_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrap");

    for count in [16, 64, 256, 1024].iter() {
        let input = build_input(*count);
        let _ = group.bench_function(format!("{}_words", count), |b| {
            b.iter(|| black_box(text::wrap(black_box(&input), 400)))
        });
    }
    group.finish();
}

criterion_group!(benches, line_width_benchmark, wrap_benchmark);
criterion_main!(benches);
