//! Whole-resonator benchmarks.
//!
//! These run complete blocks the way a host would call the plugin.

mod horn;

pub use horn::bench_horn;
