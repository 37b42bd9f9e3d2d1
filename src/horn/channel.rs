//! One audio channel through the horn.
//!
//! ```text
//! input ─→ crossover ─┬─ low ──→ alignment delay (N) ────────────────┐
//!                     └─ high ─→ throat ─→ waveguide ─→ mouth ─→ ×gain ─(+)─→ output
//! ```

use crate::{
    dsp::{
        boundary::{MouthFilter, ThroatFilter},
        crossover::CrossoverSplitter,
        delay::AlignmentDelay,
        waveguide::WaveguideLine,
    },
    horn::coefficients::DerivedCoefficients,
};

/// All filter, wave, and delay state owned by a single channel.
pub struct ChannelProcessor {
    crossover: CrossoverSplitter,
    line: WaveguideLine,
    mouth: MouthFilter,
    throat: ThroatFilter,
    low_delay: AlignmentDelay,
}

impl ChannelProcessor {
    pub fn new(segments: usize) -> Self {
        Self {
            crossover: CrossoverSplitter::new(),
            line: WaveguideLine::new(segments),
            mouth: MouthFilter::new(),
            throat: ThroatFilter::new(),
            low_delay: AlignmentDelay::new(segments),
        }
    }

    /// Zero every state and resize for a new segment count.
    pub fn reset(&mut self, segments: usize) {
        self.crossover.reset();
        self.line.set_segments(segments);
        self.mouth.reset();
        self.throat.reset();
        self.low_delay.set_len(segments);
    }

    /// Advance the waveguide one sample with `excitation` entering at the
    /// throat. Returns the signal transmitted through the mouth.
    #[inline]
    pub fn propagate(&mut self, excitation: f32, c: &DerivedCoefficients) -> f32 {
        self.line.scatter(&c.reflection, c.damping_gain);

        let arriving = self.line.mouth_arrival();
        let reflected = self.mouth.reflect(arriving, &c.mouth);
        self.line.set_mouth_reflection(reflected);

        let returning = self.throat.reflect(self.line.throat_arrival(), &c.throat);
        self.line.set_throat_injection(excitation + c.throat_trim * returning);

        self.line.swap();

        arriving + reflected
    }

    /// One sample through the whole chain.
    ///
    /// Non-finite input is treated as silence. If the state overflows anyway
    /// the channel is zeroed and the sample comes out as 0.
    #[inline]
    pub fn process_sample(&mut self, input: f32, c: &DerivedCoefficients) -> f32 {
        debug_assert_eq!(
            self.line.segments(),
            c.segments,
            "channel not reset after reconfigure"
        );

        let input = if input.is_finite() { input } else { 0.0 };
        let (low, high) = self.crossover.split(input, &c.crossover);
        let transmitted = self.propagate(high, c);
        let delayed_low = self.low_delay.next_sample(low);

        let out = transmitted * c.output_gain + delayed_low;
        if out.is_finite() {
            out
        } else {
            self.reset(c.segments);
            0.0
        }
    }

    /// Process a contiguous block of this channel in place.
    pub fn render(&mut self, buffer: &mut [f32], c: &DerivedCoefficients) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample, c);
        }
    }

    pub fn segments(&self) -> usize {
        self.line.segments()
    }

    pub fn waveguide(&self) -> &WaveguideLine {
        &self.line
    }

    pub fn is_silent(&self) -> bool {
        self.crossover.is_silent()
            && self.line.is_silent()
            && self.mouth.is_silent()
            && self.throat.is_silent()
            && self.low_delay.is_silent()
    }
}
