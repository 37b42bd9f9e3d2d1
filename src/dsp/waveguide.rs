//! Lossy scattering-junction waveguide.

/*
Digital Waveguide
=================

A horn is modelled as a chain of N short cylindrical segments. Each segment
is exactly one sample period of sound travel long, so a wave moves one
segment per sample. Two waves travel through the chain at the same time:

    forward   throat ──→ mouth
    backward  throat ←── mouth

      fwd[0]     fwd[1]            fwd[N]
    ──────→ [J0] ──────→ [J1] ... ──────→
    ←────── [J0] ←────── [J1] ... ←──────
      bwd[0]     bwd[1]            bwd[N]

Where two segments meet, the change in cross-section is a change in acoustic
impedance. Junction j reflects part of each arriving wave and transmits the
rest, based on its reflection coefficient R[j]:

    scatter      = R[j] · (fwd[j] − bwd[j+1])
    fwd'[j+1]    = g · (fwd[j]   + scatter)
    bwd'[j]      = g · (bwd[j+1] + scatter)

`g` is the per-segment loss (1.0 = lossless). R[j] = 0 means a uniform
bore: the junction transmits everything and the chain is a pure N-sample
delay.

Double Buffering
----------------

fwd'[j+1] and bwd'[j] both read from neighbours that the same pass also
writes, so updating one array in place would read values that were already
overwritten this sample. The line keeps two buffer pairs: one "current"
(read-only during the pass) and one "next" (write-only). They swap roles
after every sample.

The ends of the chain are not touched by the scattering pass. fwd'[0] and
bwd'[N] belong to the boundary filters, which set them from bwd'[0] and
fwd'[N] before the swap.
*/

use crate::MAX_SEGMENTS;

pub struct WaveguideLine {
    forward: [Vec<f32>; 2],
    backward: [Vec<f32>; 2],
    current: usize,
    segments: usize,
}

/// Borrow the current buffer for reading and the other one for writing.
#[inline]
fn read_write(buffers: &mut [Vec<f32>; 2], current: usize) -> (&[f32], &mut [f32]) {
    let [a, b] = buffers;
    if current == 0 {
        (a.as_slice(), b.as_mut_slice())
    } else {
        (b.as_slice(), a.as_mut_slice())
    }
}

impl WaveguideLine {
    /// Allocate for `MAX_SEGMENTS` so later resizes never touch the heap.
    pub fn new(segments: usize) -> Self {
        let len = MAX_SEGMENTS + 1;
        let mut line = Self {
            forward: [vec![0.0; len], vec![0.0; len]],
            backward: [vec![0.0; len], vec![0.0; len]],
            current: 0,
            segments: 1,
        };
        line.set_segments(segments);
        line
    }

    /// Change the segment count and clear all wave state.
    pub fn set_segments(&mut self, segments: usize) {
        self.segments = segments.clamp(1, MAX_SEGMENTS);
        self.reset();
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Run every junction once, reading "current" and writing "next".
    ///
    /// `reflection` must hold at least `segments` coefficients.
    #[inline]
    pub fn scatter(&mut self, reflection: &[f32], gain: f32) {
        let n = self.segments;
        let reflection = &reflection[..n];
        let (fwd, fwd_next) = read_write(&mut self.forward, self.current);
        let (bwd, bwd_next) = read_write(&mut self.backward, self.current);

        for (j, &r) in reflection.iter().enumerate() {
            let f_in = fwd[j];
            let b_in = bwd[j + 1];
            let scatter = r * (f_in - b_in);
            fwd_next[j + 1] = gain * (f_in + scatter);
            bwd_next[j] = gain * (b_in + scatter);
        }
    }

    /// Forward wave that just reached the mouth (next fwd[N]).
    #[inline]
    pub fn mouth_arrival(&self) -> f32 {
        self.forward[self.current ^ 1][self.segments]
    }

    /// Backward wave that just reached the throat (next bwd[0]).
    #[inline]
    pub fn throat_arrival(&self) -> f32 {
        self.backward[self.current ^ 1][0]
    }

    /// Set the wave the mouth sends back into the horn (next bwd[N]).
    #[inline]
    pub fn set_mouth_reflection(&mut self, value: f32) {
        let n = self.segments;
        self.backward[self.current ^ 1][n] = value;
    }

    /// Set the wave entering at the throat (next fwd[0]).
    #[inline]
    pub fn set_throat_injection(&mut self, value: f32) {
        self.forward[self.current ^ 1][0] = value;
    }

    /// Promote "next" to "current".
    #[inline]
    pub fn swap(&mut self) {
        self.current ^= 1;
    }

    /// Current forward wave, throat to mouth (length N+1).
    pub fn forward(&self) -> &[f32] {
        &self.forward[self.current][..=self.segments]
    }

    /// Current backward wave, throat to mouth (length N+1).
    pub fn backward(&self) -> &[f32] {
        &self.backward[self.current][..=self.segments]
    }

    pub fn reset(&mut self) {
        for buffer in self.forward.iter_mut().chain(self.backward.iter_mut()) {
            buffer.fill(0.0);
        }
        self.current = 0;
    }

    pub fn is_silent(&self) -> bool {
        self.forward
            .iter()
            .chain(self.backward.iter())
            .all(|buffer| buffer.iter().all(|&x| x == 0.0))
    }
}
