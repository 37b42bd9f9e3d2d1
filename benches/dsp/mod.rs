//! Benchmarks for low-level DSP primitives.

mod crossover;
mod delay;
mod waveguide;

pub use crossover::bench_crossover;
pub use delay::bench_delay;
pub use waveguide::bench_waveguide;
