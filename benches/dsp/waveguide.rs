//! Benchmarks for scattering-junction updates.
//!
//! Cost scales with the segment count, so the per-sample scatter is measured
//! for a short, medium and maximum-length line.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use horn_resonator::dsp::waveguide::WaveguideLine;

use crate::BLOCK_SIZES;

pub fn bench_waveguide(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/waveguide");

    let segment_counts: &[usize] = &[
        20,  // ~14 cm at 48kHz
        98,  // default 70 cm horn
        400, // maximum
    ];

    for &size in BLOCK_SIZES {
        for &segments in segment_counts {
            let reflection: Vec<f32> = (0..segments).map(|i| -0.01 * (i % 7) as f32).collect();
            let mut line = WaveguideLine::new(segments);

            group.bench_with_input(
                BenchmarkId::new(format!("scatter_{segments}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for i in 0..size {
                            line.scatter(black_box(&reflection), 0.999);
                            sum += line.mouth_arrival();
                            line.set_mouth_reflection(0.0);
                            line.set_throat_injection(if i == 0 { 1.0 } else { 0.0 });
                            line.swap();
                        }
                        sum
                    })
                },
            );
        }
    }

    group.finish();
}
