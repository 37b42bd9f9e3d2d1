#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical description of a horn and its output stage.
///
/// Units follow what a user would type into a horn designer: centimeters for
/// sizes, a percentage-like curvature, dB for losses and gain.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HornGeometry {
    /// Horn length (cm).
    pub length_cm: f32,
    /// Radius at the narrow (driver) end (cm).
    pub throat_radius_cm: f32,
    /// Radius at the open end (cm).
    pub mouth_radius_cm: f32,
    /// Flare curvature. The radius profile exponent is 10^(curvature/100):
    /// 0 is a straight cone, positive values flare late, negative flare early.
    pub curvature: f32,
    /// Wall loss (dB per meter).
    pub damping_db_per_m: f32,
    /// Gain applied to the wave reflected back from the throat (0..0.99).
    pub throat_trim: f32,
    /// Split point between the bypassed low band and the horn band (Hz).
    pub crossover_hz: f32,
    /// Gain applied to the horn band at the output (dB).
    pub output_gain_db: f32,
}

impl Default for HornGeometry {
    fn default() -> Self {
        Self {
            length_cm: 70.0,
            throat_radius_cm: 1.5,
            mouth_radius_cm: 30.0,
            curvature: 40.0,
            damping_db_per_m: 0.03,
            throat_trim: 0.99,
            crossover_hz: 600.0,
            output_gain_db: 30.0,
        }
    }
}

// Change-detection tolerances
const SIZE_TOLERANCE: f32 = 1e-3;
const FINE_TOLERANCE: f32 = 1e-4;

impl HornGeometry {
    /// Straight tube: equal radii everywhere, so every junction is transparent.
    pub fn uniform_tube(length_cm: f32, radius_cm: f32) -> Self {
        Self {
            length_cm,
            throat_radius_cm: radius_cm,
            mouth_radius_cm: radius_cm,
            curvature: 0.0,
            damping_db_per_m: 0.0,
            throat_trim: 0.0,
            ..Self::default()
        }
    }

    pub fn with_length(mut self, length_cm: f32) -> Self {
        self.length_cm = length_cm;
        self
    }

    pub fn with_radii(mut self, throat_radius_cm: f32, mouth_radius_cm: f32) -> Self {
        self.throat_radius_cm = throat_radius_cm;
        self.mouth_radius_cm = mouth_radius_cm;
        self
    }

    pub fn with_curvature(mut self, curvature: f32) -> Self {
        self.curvature = curvature;
        self
    }

    pub fn with_damping(mut self, damping_db_per_m: f32) -> Self {
        self.damping_db_per_m = damping_db_per_m;
        self
    }

    pub fn with_throat_trim(mut self, throat_trim: f32) -> Self {
        self.throat_trim = throat_trim;
        self
    }

    pub fn with_crossover(mut self, crossover_hz: f32) -> Self {
        self.crossover_hz = crossover_hz;
        self
    }

    pub fn with_output_gain(mut self, output_gain_db: f32) -> Self {
        self.output_gain_db = output_gain_db;
        self
    }

    /// True when any field moved far enough to need a new derivation.
    ///
    /// Tiny jitter (e.g. from a smoothed UI control) does not count as a
    /// change, so it never resets the running horn state.
    pub fn differs_from(&self, other: &Self) -> bool {
        let moved = |a: f32, b: f32, tol: f32| !((a - b).abs() <= tol);

        moved(self.length_cm, other.length_cm, SIZE_TOLERANCE)
            || moved(self.throat_radius_cm, other.throat_radius_cm, SIZE_TOLERANCE)
            || moved(self.mouth_radius_cm, other.mouth_radius_cm, SIZE_TOLERANCE)
            || moved(self.curvature, other.curvature, SIZE_TOLERANCE)
            || moved(self.damping_db_per_m, other.damping_db_per_m, FINE_TOLERANCE)
            || moved(self.throat_trim, other.throat_trim, FINE_TOLERANCE)
            || moved(self.crossover_hz, other.crossover_hz, SIZE_TOLERANCE)
            || moved(self.output_gain_db, other.output_gain_db, SIZE_TOLERANCE)
    }
}
