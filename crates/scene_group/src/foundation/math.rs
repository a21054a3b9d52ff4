//! Math utilities and types
//!
//! Provides the vector and quaternion types used by the group transform
//! manager, plus the magnitude-calibration helper that keeps rotated offset
//! vectors from drifting under repeated incremental rotations.

pub use nalgebra::{Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Rescale `rotated` so its magnitude matches `reference`.
///
/// Rotating an offset vector through a composed quaternion can change its
/// magnitude slightly; calling this after every rotation step pins the
/// magnitude back to the pre-rotation value so repeated incremental rotations
/// do not accumulate drift. A zero-length `rotated` vector is returned as-is:
/// the reference must be zero-length too, and no correction is possible.
pub fn calibrate_to_magnitude(rotated: Vec3, reference: Vec3) -> Vec3 {
    let rotated_len = rotated.magnitude();
    if rotated_len == 0.0 {
        return rotated;
    }
    rotated * (reference.magnitude() / rotated_len)
}
