//! Benchmarks for the low-band alignment delay.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use horn_resonator::dsp::delay::AlignmentDelay;

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut buffer = input.clone();
        let mut delay = AlignmentDelay::new(98);

        group.bench_with_input(BenchmarkId::new("render", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                delay.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
