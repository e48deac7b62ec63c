//! Linear algebra aliases for the six-axis tracker
//!
//! Everything runs in f64; the sensor frame and the pointer frame share
//! these types and only differ by the axis permutation in `geometry`.

use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};

pub type Vec3 = Vector3<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Rot3 = Rotation3<f64>;
pub type Quat = UnitQuaternion<f64>;

/// World up axis in the pointer frame
pub fn unit_up() -> Vec3 {
    Vec3::y()
}

/// Canonical forward axis, used whenever a horizontal projection degenerates
pub fn unit_forward() -> Vec3 {
    Vec3::z()
}
