#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::horn::geometry::HornGeometry;

/// A named horn setting that can be stored alongside a project.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct HornPatch {
    pub name: String,
    pub description: Option<String>,
    pub geometry: HornGeometry,
}

impl HornPatch {
    pub fn new(name: &str, geometry: HornGeometry) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            geometry,
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// General-purpose loudspeaker horn.
pub fn default_horn() -> HornPatch {
    HornPatch::new("Default Horn", HornGeometry::default())
        .describe("70 cm flared horn, 600 Hz crossover")
}

/// Short, narrow-throat horn in front of a compression driver.
pub fn compression_driver() -> HornPatch {
    let geometry = HornGeometry::default()
        .with_length(30.0)
        .with_radii(1.27, 12.0)
        .with_curvature(60.0)
        .with_crossover(1_200.0)
        .with_output_gain(24.0);

    HornPatch::new("Compression Driver", geometry).describe("Bright, forward midrange")
}

/// Long brass-style bell that flares only near the mouth.
pub fn bell() -> HornPatch {
    let geometry = HornGeometry::default()
        .with_length(120.0)
        .with_radii(0.8, 35.0)
        .with_curvature(100.0)
        .with_damping(0.5)
        .with_crossover(300.0)
        .with_output_gain(30.0);

    HornPatch::new("Bell", geometry).describe("Long bore with a late flare")
}

/// Straight tube with no impedance steps; a pure delay for the horn band.
pub fn uniform_tube() -> HornPatch {
    let geometry = HornGeometry::uniform_tube(50.0, 2.0).with_output_gain(0.0);

    HornPatch::new("Uniform Tube", geometry).describe("Transparent bore, useful as a reference")
}

/// Every built-in patch.
pub fn factory_patches() -> Vec<HornPatch> {
    vec![default_horn(), compression_driver(), bell(), uniform_tube()]
}
