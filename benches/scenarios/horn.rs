//! Benchmarks for full `process_block` calls.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use horn_resonator::{patch::factory_patches, BufferLayout, HornResonator};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_horn(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/horn");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size * 2)
            .map(|i| (i as f32 * 0.37).sin() * 0.5)
            .collect();
        let mut buffer = input.clone();

        // === STEREO, EVERY FACTORY PATCH ===
        for patch in factory_patches() {
            let mut horn = HornResonator::new();
            horn.configure(SAMPLE_RATE, 2, size, patch.geometry);
            let id = patch.name.to_lowercase().replace(' ', "_");

            group.bench_with_input(BenchmarkId::new(id, size), &size, |b, &size| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    horn.process_block(black_box(&mut buffer), size)
                })
            });
        }

        // === INTERLEAVED LAYOUT ===
        // Same work as planar, different stride through the buffer
        let mut horn = HornResonator::with_layout(BufferLayout::Interleaved);
        horn.configure(SAMPLE_RATE, 2, size, Default::default());
        group.bench_with_input(BenchmarkId::new("interleaved", size), &size, |b, &size| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                horn.process_block(black_box(&mut buffer), size)
            })
        });

        // === RECONFIGURE ===
        // A geometry change on the audio thread, followed by one block
        let mut horn = HornResonator::new();
        horn.configure(SAMPLE_RATE, 2, size, Default::default());
        let patches = factory_patches();
        let mut next = 0;
        group.bench_with_input(BenchmarkId::new("reconfigure", size), &size, |b, &size| {
            b.iter(|| {
                next = (next + 1) % patches.len();
                let _ = horn.set_geometry(patches[next].geometry);
                buffer.copy_from_slice(&input);
                horn.process_block(black_box(&mut buffer), size)
            })
        });
    }

    group.finish();
}
