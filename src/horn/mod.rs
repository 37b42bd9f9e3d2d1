//! Horn model built on the `dsp` primitives.
//!
//! `geometry` describes the physical horn, `coefficients` turns it into
//! filter and junction coefficients, `channel` runs one audio channel through
//! the model, and `resonator` is the host-facing context that owns all of it.

/// Coefficient derivation from physical geometry.
pub mod coefficients;
/// Per-channel crossover, waveguide and alignment state.
pub mod channel;
/// Physical horn description.
pub mod geometry;
/// Configure/process context owned by the host.
pub mod resonator;
