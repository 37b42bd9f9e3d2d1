//! Reflection filters at the two open ends of the waveguide.
//!
//! Both filters share one corner-frequency rule: a radiating end of radius
//! `a` stops reflecting low frequencies around `c / (2π·a)`. The corner is
//! normalized to the sample rate, capped at 0.45·fs, and turned into a pole
//! kept just inside the unit circle.
//!
//! ```text
//! mouth   y = b0·x − a1·y1 − a2·y2    a1 = −2p, a2 = p², b0 = −1 − a1 − a2
//! throat  y = b0·x − a1·y1            a1 = −p,  b0 = 1 − p
//! ```
//!
//! The mouth numerator pins the DC response to exactly −1 (an inverting
//! reflection at the open end). The throat filter has unity DC gain.

use crate::{EPSILON, SPEED_OF_SOUND};
use std::f32::consts::TAU;

/// Pole radius for a boundary of the given physical radius (meters).
pub fn boundary_pole(radius_m: f32, sample_rate: f32) -> f32 {
    let corner_hz = if radius_m > EPSILON {
        SPEED_OF_SOUND / (TAU * radius_m)
    } else {
        sample_rate / 4.0
    };
    let f_norm = corner_hz.min(sample_rate * 0.45) / sample_rate;

    0.99 * (-TAU * f_norm).exp()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouthCoeffs {
    pub b0: f32,
    pub a1: f32,
    pub a2: f32,
}

impl MouthCoeffs {
    pub fn from_radius(radius_m: f32, sample_rate: f32) -> Self {
        let pole = boundary_pole(radius_m, sample_rate);
        let a1 = -2.0 * pole;
        let a2 = pole * pole;

        Self {
            b0: -1.0 - a1 - a2,
            a1,
            a2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThroatCoeffs {
    pub b0: f32,
    pub a1: f32,
}

impl ThroatCoeffs {
    pub fn from_radius(radius_m: f32, sample_rate: f32) -> Self {
        let pole = boundary_pole(radius_m, sample_rate);

        Self {
            b0: 1.0 - pole,
            a1: -pole,
        }
    }
}

/// Two-pole reflection at the mouth (waveguide index N).
#[derive(Debug, Clone, Copy, Default)]
pub struct MouthFilter {
    y1: f32,
    y2: f32,
}

impl MouthFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reflect the wave arriving at the mouth.
    #[inline]
    pub fn reflect(&mut self, arriving: f32, c: &MouthCoeffs) -> f32 {
        let reflected = c.b0 * arriving - c.a1 * self.y1 - c.a2 * self.y2;
        self.y2 = self.y1;
        self.y1 = reflected;
        reflected
    }

    pub fn reset(&mut self) {
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    pub fn is_silent(&self) -> bool {
        self.y1 == 0.0 && self.y2 == 0.0
    }
}

/// One-pole reflection at the throat (waveguide index 0).
#[derive(Debug, Clone, Copy, Default)]
pub struct ThroatFilter {
    y1: f32,
}

impl ThroatFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn reflect(&mut self, arriving: f32, c: &ThroatCoeffs) -> f32 {
        let filtered = c.b0 * arriving - c.a1 * self.y1;
        self.y1 = filtered;
        filtered
    }

    pub fn reset(&mut self) {
        self.y1 = 0.0;
    }

    pub fn is_silent(&self) -> bool {
        self.y1 == 0.0
    }
}
