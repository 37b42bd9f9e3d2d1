//! Four-pole band splitter.

/*
Crossover
=========

The horn only colors the upper band. Everything below the crossover
frequency is routed around the waveguide and summed back in at the output,
so the splitter produces two signals from every input sample:

    input ──┬──→ [LP stage 1] ──→ [LP stage 2] ──→ low   (bypass band)
            └──→ [HP stage 1] ──→ [HP stage 2] ──→ high  (throat excitation)

Each stage is a 2-pole Butterworth section designed with the bilinear
transform, prewarped so the -3 dB point lands exactly on the crossover
frequency:

    ω   = tan(π·fc / fs)
    k   = √2·ω
    den = ω² + k + 1

    lowpass   b = [ω², 2ω², ω²] / den
    highpass  b = [1, -2, 1]    / den
    shared    a1 = 2(ω² - 1) / den,  a2 = (ω² - k + 1) / den

Two cascaded stages give 24 dB/octave slopes and -6 dB per band at fc.

The two bands are filtered independently from the same input sample. They
are not derived from each other, so the split does not strictly conserve
energy; the summed bands form an allpass response rather than a copy of the
input.
*/

use crate::{dsp::biquad::{Biquad, BiquadCoeffs}, EPSILON};
use std::f32::consts::{PI, SQRT_2};

/// Lowest crossover frequency in Hz.
pub const MIN_CROSSOVER_HZ: f32 = 20.0;

/// Valid crossover range for a sample rate: [20 Hz, fs/2 - 1 Hz].
pub fn crossover_range(sample_rate: f32) -> (f32, f32) {
    let max = (sample_rate * 0.5 - 1.0).max(MIN_CROSSOVER_HZ);
    (MIN_CROSSOVER_HZ, max)
}

/// Lowpass and highpass sections sharing one denominator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossoverCoeffs {
    pub lowpass: BiquadCoeffs,
    pub highpass: BiquadCoeffs,
}

impl CrossoverCoeffs {
    /// Butterworth sections at `crossover_hz`, clamped into [`crossover_range`].
    pub fn new(crossover_hz: f32, sample_rate: f32) -> Self {
        let (min, max) = crossover_range(sample_rate);
        let fc = crossover_hz.clamp(min, max);

        let omega = (fc * PI / sample_rate).tan();
        let omega2 = omega * omega;
        let k = SQRT_2 * omega;
        let den = omega2 + k + 1.0;
        let inv_den = if den < EPSILON { 1.0 } else { 1.0 / den };

        let a1 = 2.0 * (omega2 - 1.0) * inv_den;
        let a2 = (omega2 - k + 1.0) * inv_den;

        let b0_lp = omega2 * inv_den;
        let b0_hp = inv_den;

        Self {
            lowpass: BiquadCoeffs {
                b0: b0_lp,
                b1: 2.0 * b0_lp,
                b2: b0_lp,
                a1,
                a2,
            },
            highpass: BiquadCoeffs {
                b0: b0_hp,
                b1: -2.0 * b0_hp,
                b2: b0_hp,
                a1,
                a2,
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn approx_eq(&self, other: &Self, tol: f32) -> bool {
        self.lowpass.approx_eq(&other.lowpass, tol)
            && self.highpass.approx_eq(&other.highpass, tol)
    }
}

/// Two cascaded stages per band, one instance per channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossoverSplitter {
    low1: Biquad,
    low2: Biquad,
    high1: Biquad,
    high2: Biquad,
}

impl CrossoverSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split one sample into `(low, high)`.
    #[inline]
    pub fn split(&mut self, input: f32, coeffs: &CrossoverCoeffs) -> (f32, f32) {
        let low = self.low1.next_sample(input, &coeffs.lowpass);
        let low = self.low2.next_sample(low, &coeffs.lowpass);

        let high = self.high1.next_sample(input, &coeffs.highpass);
        let high = self.high2.next_sample(high, &coeffs.highpass);

        (low, high)
    }

    pub fn reset(&mut self) {
        self.low1.reset();
        self.low2.reset();
        self.high1.reset();
        self.high2.reset();
    }

    pub fn is_silent(&self) -> bool {
        self.low1.is_silent()
            && self.low2.is_silent()
            && self.high1.is_silent()
            && self.high2.is_silent()
    }
}
