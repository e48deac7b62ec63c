pub mod linalg;

pub use linalg::*;

use serde::{Deserialize, Serialize};

/// Opaque monotonic system tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tick(pub i64);

impl Tick {
    /// Ticks elapsed since `start` (negative if the clock went backwards)
    pub fn since(self, start: Tick) -> i64 {
        self.0.wrapping_sub(start.0)
    }

    /// Convert a tick delta to seconds for a clock running at `frequency` Hz
    pub fn delta_to_secs(delta: i64, frequency: u64) -> f64 {
        if frequency == 0 {
            return 0.0;
        }
        delta as f64 / frequency as f64
    }
}

/// Orientation basis reported by the sensor each sample.
///
/// Each vector is one axis of the controller expressed in the sensor's
/// reference frame; `y` is the one the pointer follows.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionState {
    pub x: Vec3,
    pub y: Vec3,
    pub z: Vec3,
}

impl DirectionState {
    pub fn new(x: Vec3, y: Vec3, z: Vec3) -> Self {
        Self { x, y, z }
    }

    /// Basis obtained by rotating the identity frame
    pub fn from_rotation(rotation: &Quat) -> Self {
        Self {
            x: rotation * Vec3::x(),
            y: rotation * Vec3::y(),
            z: rotation * Vec3::z(),
        }
    }

    /// Absolute orientation as the rotation nearest to the basis matrix
    pub fn quaternion(&self) -> Quat {
        let basis = Mat3::from_columns(&[self.x, self.y, self.z]);
        Quat::from_rotation_matrix(&Rot3::from_matrix(&basis))
    }
}

impl Default for DirectionState {
    fn default() -> Self {
        Self {
            x: Vec3::x(),
            y: Vec3::y(),
            z: Vec3::z(),
        }
    }
}

/// One six-axis sensor sample as handed over by the HID layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SixAxisSample {
    pub direction: DirectionState,
    /// Monotonic sample index, gaps mean dropped packets
    pub sampling_number: i64,
    /// Nominal interval between samples [ms]
    pub delta_time_ms: f64,
    pub tick: Tick,
    #[serde(default = "zero_vec")]
    pub acceleration: Vec3,
    #[serde(default = "zero_vec")]
    pub angular_velocity: Vec3,
    /// Accumulated rotation per axis [revolutions]
    #[serde(default = "zero_vec")]
    pub angle: Vec3,
}

impl SixAxisSample {
    pub fn new(direction: DirectionState, sampling_number: i64, delta_time_ms: f64, tick: Tick) -> Self {
        Self {
            direction,
            sampling_number,
            delta_time_ms,
            tick,
            acceleration: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            angle: Vec3::zeros(),
        }
    }

    pub fn quaternion(&self) -> Quat {
        self.direction.quaternion()
    }
}

fn zero_vec() -> Vec3 {
    Vec3::zeros()
}
