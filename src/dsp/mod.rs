//! Low-level DSP primitives used by the horn processor.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! making them safe to embed directly inside per-channel state. They stay
//! focused on the signal-processing math so the `horn` layer can handle
//! geometry, configuration, and buffer layout.

/// Two-pole recursive filter section.
pub mod biquad;
/// Mouth and throat reflection filters bounding the waveguide.
pub mod boundary;
/// Four-pole lowpass/highpass band splitter.
pub mod crossover;
/// Fixed-length delay keeping the bypassed band time-aligned.
pub mod delay;
/// Lossy scattering-junction delay line.
pub mod waveguide;
