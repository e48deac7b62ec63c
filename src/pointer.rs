use serde::{Deserialize, Serialize};

use crate::config::PointerConfig;
use crate::geometry::{
    angle_to_coefficient, base_direction, horizontal_front, horizontal_projection, lerp,
    signed_horizontal_angle, vertical_angle,
};
use crate::types::{unit_forward, DirectionState, Vec3};

/// Point on screen [px], origin top-left
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Turns the controller's direction basis into a recenterable screen pointer.
///
/// The reference (`front`, `base_angle`) only changes on `reset()`; every
/// `update()` measures the current direction against it. Angles are
/// saturated before the tangent, so the offset stays finite for any input.
#[derive(Clone, Debug)]
pub struct SixAxisPointer {
    config: PointerConfig,
    /// Baseline elevation [deg]
    base_angle: f64,
    /// Horizontal forward reference, always unit length
    front: Vec3,
    /// Offset from the screen centre, y up
    offset: (f64, f64),
    /// Last direction passed to `update()`
    direction: DirectionState,
}

impl SixAxisPointer {
    pub fn new(config: PointerConfig) -> Self {
        Self {
            config,
            base_angle: 0.0,
            front: unit_forward(),
            offset: (0.0, 0.0),
            direction: DirectionState::default(),
        }
    }

    pub fn config(&self) -> &PointerConfig {
        &self.config
    }

    /// Recompute the pointer offset for this tick's direction
    pub fn update(&mut self, direction: &DirectionState) {
        self.direction = *direction;

        let pointing = base_direction(&direction.y);

        let max_angle = self.config.max_angle_deg;

        // Vertical: elevation relative to the baseline
        let y = {
            let angle = vertical_angle(&pointing) - self.base_angle;
            angle_to_coefficient(angle, max_angle, self.config.bias_y)
        };

        // Horizontal: heading relative to the front vector
        let x = {
            // Pointing straight up or down projects to zero and saturates
            let angle = signed_horizontal_angle(&self.front, &horizontal_projection(&pointing));
            angle_to_coefficient(angle, max_angle, self.config.bias_x)
        };

        let half_w = self.config.width * 0.5;
        let half_h = self.config.height * 0.5;
        self.offset = (lerp(-half_w, half_w, x), lerp(-half_h, half_h, y));
    }

    /// Make the last updated direction the new forward/level reference
    pub fn reset(&mut self) {
        let base = base_direction(&self.direction.y);

        self.front = horizontal_front(&base);
        self.base_angle = vertical_angle(&base);
        self.offset = (0.0, 0.0);
    }

    /// Absolute cursor position, y grows downwards
    pub fn cursor(&self) -> ScreenPoint {
        let (cx, cy) = self.config.center();
        let mut point = ScreenPoint::new(cx + self.offset.0, cy - self.offset.1);

        if self.config.clamp_to_screen {
            point.x = point.x.clamp(0.0, self.config.width.max(0.0));
            point.y = point.y.clamp(0.0, self.config.height.max(0.0));
        }
        point
    }

    /// Signed offset from the screen centre, y up
    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn base_angle(&self) -> f64 {
        self.base_angle
    }

    pub fn direction(&self) -> &DirectionState {
        &self.direction
    }
}

impl Default for SixAxisPointer {
    fn default() -> Self {
        Self::new(PointerConfig::default())
    }
}
