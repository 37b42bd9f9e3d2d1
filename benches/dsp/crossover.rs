//! Benchmarks for the LR4 band split.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use horn_resonator::dsp::crossover::{CrossoverCoeffs, CrossoverSplitter};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_crossover(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/crossover");
    let coeffs = CrossoverCoeffs::new(600.0, SAMPLE_RATE);

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut splitter = CrossoverSplitter::new();

        group.bench_with_input(BenchmarkId::new("split", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &x in &input {
                    let (low, high) = splitter.split(black_box(x), &coeffs);
                    sum += low + high;
                }
                sum
            })
        });
    }

    // Coefficient derivation happens on every reconfigure
    group.bench_function("coeffs", |b| {
        b.iter(|| CrossoverCoeffs::new(black_box(600.0), black_box(SAMPLE_RATE)))
    });

    group.finish();
}
