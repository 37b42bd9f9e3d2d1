pub mod analysis; // Offline response inspection
pub mod control; // Realtime-safe control messages
pub mod dsp;
pub mod error;
pub mod horn; // Geometry, coefficients and the per-channel processor
pub mod io;
pub mod patch;

pub use error::HornError;
pub use horn::{
    coefficients::{ClampReport, DerivedCoefficients},
    geometry::HornGeometry,
    resonator::HornResonator,
};
pub use io::BufferLayout;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub const MAX_CHANNELS: usize = 2;
pub const MAX_SEGMENTS: usize = 400;

/// Speed of sound in air (m/s).
pub const SPEED_OF_SOUND: f32 = 343.0;
/// Characteristic impedance of air (Pa·s/m).
pub const AIR_IMPEDANCE: f32 = 413.0;

pub(crate) const EPSILON: f32 = 1e-9;
