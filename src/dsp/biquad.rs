/// Coefficients of a normalized two-pole section (a0 = 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoeffs {
    /// Pass-through section.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Evaluate |H(e^jw)| at `freq_hz`.
    pub fn magnitude_at(&self, freq_hz: f32, sample_rate: f32) -> f32 {
        let w = std::f32::consts::TAU * freq_hz / sample_rate;
        let (s1, c1) = w.sin_cos();
        let (s2, c2) = (2.0 * w).sin_cos();

        let num_re = self.b0 + self.b1 * c1 + self.b2 * c2;
        let num_im = -self.b1 * s1 - self.b2 * s2;
        let den_re = 1.0 + self.a1 * c1 + self.a2 * c2;
        let den_im = -self.a1 * s1 - self.a2 * s2;

        (num_re.hypot(num_im)) / den_re.hypot(den_im)
    }

    /// Coefficient-wise comparison with relative tolerance `tol`.
    #[cfg(test)]
    pub(crate) fn approx_eq(&self, other: &Self, tol: f32) -> bool {
        let close = |a: f32, b: f32| (a - b).abs() <= tol * a.abs().max(b.abs()).max(1.0);
        close(self.b0, other.b0)
            && close(self.b1, other.b1)
            && close(self.b2, other.b2)
            && close(self.a1, other.a1)
            && close(self.a2, other.a2)
    }
}

impl Default for BiquadCoeffs {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Direct Form I two-pole filter state.
///
/// y = b0·x + b1·x1 + b2·x2 − a1·y1 − a2·y2
#[derive(Debug, Clone, Copy, Default)]
pub struct Biquad {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn next_sample(&mut self, x: f32, c: &BiquadCoeffs) -> f32 {
        let y = c.b0 * x + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;

        y
    }

    pub fn render(&mut self, buffer: &mut [f32], c: &BiquadCoeffs) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, c);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_silent(&self) -> bool {
        self.x1 == 0.0 && self.x2 == 0.0 && self.y1 == 0.0 && self.y2 == 0.0
    }
}
