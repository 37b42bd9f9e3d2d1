//! Geometry → DSP coefficient derivation.
//!
//! Derivation never fails. Anything out of range is pulled back to the
//! nearest playable value and the adjustment is recorded in a
//! [`ClampReport`], so strict callers can still refuse the configuration.

use std::f32::consts::PI;
use std::fmt;

use crate::{
    dsp::{
        boundary::{MouthCoeffs, ThroatCoeffs},
        crossover::{crossover_range, CrossoverCoeffs},
    },
    horn::geometry::HornGeometry,
    AIR_IMPEDANCE, EPSILON, MAX_SEGMENTS, SPEED_OF_SOUND,
};

pub const MIN_SAMPLE_RATE: f32 = 8_000.0;
pub const MAX_SAMPLE_RATE: f32 = 384_000.0;
pub const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;
pub const MIN_RADIUS_CM: f32 = 0.01;
pub const MAX_DAMPING_DB_PER_M: f32 = 1_000.0;
pub const MAX_THROAT_TRIM: f32 = 0.99;
pub const MAX_OUTPUT_GAIN_DB: f32 = 120.0;

/// Which inputs had to be adjusted to produce a playable configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClampReport {
    pub sample_rate: bool,
    pub channels: bool,
    pub block_size: bool,
    pub segments: bool,
    pub throat_radius: bool,
    pub mouth_radius: bool,
    pub damping: bool,
    pub throat_trim: bool,
    pub crossover: bool,
    pub output_gain: bool,
    /// A NaN or infinite parameter was replaced by its default.
    pub non_finite: bool,
}

impl ClampReport {
    pub fn any(&self) -> bool {
        self.fields().iter().any(|&(_, clamped)| clamped)
    }

    fn fields(&self) -> [(&'static str, bool); 11] {
        [
            ("sample_rate", self.sample_rate),
            ("channels", self.channels),
            ("block_size", self.block_size),
            ("segments", self.segments),
            ("throat_radius", self.throat_radius),
            ("mouth_radius", self.mouth_radius),
            ("damping", self.damping),
            ("throat_trim", self.throat_trim),
            ("crossover", self.crossover),
            ("output_gain", self.output_gain),
            ("non_finite", self.non_finite),
        ]
    }
}

impl fmt::Display for ClampReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, _) in self.fields().iter().filter(|(_, clamped)| *clamped) {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}

/// Everything the per-sample loop needs, derived once per configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedCoefficients {
    pub sample_rate: f32,
    /// Meters of travel per sample.
    pub segment_length_m: f32,
    /// Number of waveguide segments N.
    pub segments: usize,
    /// Junction reflection coefficients R[0..N].
    pub reflection: Vec<f32>,
    /// Per-segment loss g.
    pub damping_gain: f32,
    pub throat: ThroatCoeffs,
    pub mouth: MouthCoeffs,
    pub crossover: CrossoverCoeffs,
    pub throat_trim: f32,
    /// Linear gain on the horn band.
    pub output_gain: f32,
    /// Geometry after non-finite fallback and clamping.
    pub effective: HornGeometry,
}

impl DerivedCoefficients {
    /// Derive coefficients for `geometry` at `sample_rate`.
    pub fn derive(geometry: &HornGeometry, sample_rate: f32) -> (Self, ClampReport) {
        let mut coeffs = Self::empty();
        let report = coeffs.update(geometry, sample_rate);
        (coeffs, report)
    }

    /// Placeholder with room for `MAX_SEGMENTS` reflections.
    pub(crate) fn empty() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            segment_length_m: SPEED_OF_SOUND / DEFAULT_SAMPLE_RATE,
            segments: 1,
            reflection: Vec::with_capacity(MAX_SEGMENTS),
            damping_gain: 1.0,
            throat: ThroatCoeffs { b0: 1.0, a1: 0.0 },
            mouth: MouthCoeffs {
                b0: -1.0,
                a1: 0.0,
                a2: 0.0,
            },
            crossover: CrossoverCoeffs::new(1_000.0, DEFAULT_SAMPLE_RATE),
            throat_trim: 0.0,
            output_gain: 1.0,
            effective: HornGeometry::default(),
        }
    }

    /// Re-derive in place. Never grows the reflection buffer past
    /// `MAX_SEGMENTS`, so this does not allocate after the first call.
    pub fn update(&mut self, geometry: &HornGeometry, sample_rate: f32) -> ClampReport {
        let mut report = ClampReport::default();
        let sample_rate = sanitize_sample_rate(sample_rate, &mut report);
        let g = sanitize_geometry(geometry, sample_rate, &mut report);

        let dx = SPEED_OF_SOUND / sample_rate;
        let length_m = g.length_cm / 100.0;
        let raw_segments = (length_m / dx).round();
        if !(1.0..=MAX_SEGMENTS as f32).contains(&raw_segments) {
            report.segments = true;
        }
        let n = raw_segments.clamp(1.0, MAX_SEGMENTS as f32) as usize;

        let throat_r = g.throat_radius_cm / 100.0;
        let mouth_r = g.mouth_radius_cm / 100.0;
        let curve_exponent = 10f32.powf(g.curvature / 100.0);

        let radius_at = |i: usize| -> f32 {
            if i == 0 {
                throat_r
            } else if i == n {
                mouth_r
            } else {
                let t = i as f32 / n as f32;
                throat_r + (mouth_r - throat_r) * t.powf(curve_exponent)
            }
        };
        let impedance_at = |i: usize| -> f32 {
            let r = radius_at(i);
            let area = PI * (r * r).max(EPSILON);
            AIR_IMPEDANCE / area
        };

        self.reflection.clear();
        let mut z = impedance_at(0);
        for i in 0..n {
            let z_next = impedance_at(i + 1);
            let sum = z + z_next;
            let r = if sum < EPSILON { 0.0 } else { (z_next - z) / sum };
            self.reflection.push(r);
            z = z_next;
        }

        self.sample_rate = sample_rate;
        self.segment_length_m = dx;
        self.segments = n;
        self.damping_gain = 10f32.powf(-g.damping_db_per_m * dx / 20.0);
        self.throat = ThroatCoeffs::from_radius(throat_r, sample_rate);
        self.mouth = MouthCoeffs::from_radius(mouth_r, sample_rate);
        self.crossover = CrossoverCoeffs::new(g.crossover_hz, sample_rate);
        self.throat_trim = g.throat_trim;
        self.output_gain = 10f32.powf(g.output_gain_db / 20.0);
        self.effective = g;

        report
    }

    /// Nominal transit time through the horn in samples.
    pub fn latency_samples(&self) -> usize {
        self.segments
    }
}

fn sanitize_sample_rate(sample_rate: f32, report: &mut ClampReport) -> f32 {
    if !sample_rate.is_finite() {
        report.non_finite = true;
        return DEFAULT_SAMPLE_RATE;
    }
    let clamped = sample_rate.clamp(MIN_SAMPLE_RATE, MAX_SAMPLE_RATE);
    if clamped != sample_rate {
        report.sample_rate = true;
    }
    clamped
}

/// Replace non-finite fields with defaults and clamp the rest into range.
pub(crate) fn sanitize_geometry(
    geometry: &HornGeometry,
    sample_rate: f32,
    report: &mut ClampReport,
) -> HornGeometry {
    let defaults = HornGeometry::default();
    let mut finite = |value: f32, fallback: f32| {
        if value.is_finite() {
            value
        } else {
            report.non_finite = true;
            fallback
        }
    };

    let mut g = HornGeometry {
        length_cm: finite(geometry.length_cm, defaults.length_cm),
        throat_radius_cm: finite(geometry.throat_radius_cm, defaults.throat_radius_cm),
        mouth_radius_cm: finite(geometry.mouth_radius_cm, defaults.mouth_radius_cm),
        curvature: finite(geometry.curvature, defaults.curvature),
        damping_db_per_m: finite(geometry.damping_db_per_m, defaults.damping_db_per_m),
        throat_trim: finite(geometry.throat_trim, defaults.throat_trim),
        crossover_hz: finite(geometry.crossover_hz, defaults.crossover_hz),
        output_gain_db: finite(geometry.output_gain_db, defaults.output_gain_db),
    };

    let clamp = |value: &mut f32, min: f32, max: f32, flag: &mut bool| {
        let clamped = value.clamp(min, max);
        if clamped != *value {
            *flag = true;
            *value = clamped;
        }
    };

    let (co_min, co_max) = crossover_range(sample_rate);
    clamp(
        &mut g.throat_radius_cm,
        MIN_RADIUS_CM,
        f32::MAX,
        &mut report.throat_radius,
    );
    clamp(
        &mut g.mouth_radius_cm,
        MIN_RADIUS_CM,
        f32::MAX,
        &mut report.mouth_radius,
    );
    clamp(
        &mut g.damping_db_per_m,
        0.0,
        MAX_DAMPING_DB_PER_M,
        &mut report.damping,
    );
    clamp(
        &mut g.throat_trim,
        0.0,
        MAX_THROAT_TRIM,
        &mut report.throat_trim,
    );
    clamp(&mut g.crossover_hz, co_min, co_max, &mut report.crossover);
    clamp(
        &mut g.output_gain_db,
        -MAX_OUTPUT_GAIN_DB,
        MAX_OUTPUT_GAIN_DB,
        &mut report.output_gain,
    );

    g
}
