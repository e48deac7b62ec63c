//! Angle helpers shared by the pointer mapping
//!
//! All angles are in degrees. Every function is total: inputs are clamped
//! into the domain of `acos`/`tan` instead of being rejected.

use crate::types::{unit_forward, unit_up, Vec3};

pub fn lerp(x1: f64, x2: f64, coefficient: f64) -> f64 {
    x1 * (1.0 - coefficient) + x2 * coefficient
}

/// Map the sensor's y basis vector into the pointer frame.
///
/// The controller's long axis becomes forward (+z), its face normal becomes up (+y).
pub fn base_direction(direction_y: &Vec3) -> Vec3 {
    Vec3::new(-direction_y.x, direction_y.z, direction_y.y)
}

/// Elevation of `dir` above the horizontal plane: up = 90, level = 0, down = -90
pub fn vertical_angle(dir: &Vec3) -> f64 {
    let v = dir.y.clamp(-1.0, 1.0);

    // Up is 0 degrees, down is 180 degrees
    let degree = v.acos().to_degrees();

    -(degree - 90.0)
}

/// Drop the vertical component and renormalise.
///
/// A vertical vector projects to zero and stays zero.
pub fn horizontal_projection(dir: &Vec3) -> Vec3 {
    let flat = Vec3::new(dir.x, 0.0, dir.z);
    let norm = flat.norm();
    if norm > 0.0 {
        flat / norm
    } else {
        flat
    }
}

/// Horizontal projection, or the canonical forward axis when it is zero
pub fn horizontal_front(dir: &Vec3) -> Vec3 {
    let horizontal = horizontal_projection(dir);
    if horizontal == Vec3::zeros() {
        unit_forward()
    } else {
        horizontal
    }
}

/// Signed angle between `front` and `horizontal`, positive towards `front × up`.
///
/// Both vectors are expected to lie in the horizontal plane. A zero
/// `horizontal` measures as +90.
pub fn signed_horizontal_angle(front: &Vec3, horizontal: &Vec3) -> f64 {
    let right = front.cross(&unit_up());

    let cos = front.dot(horizontal).clamp(-1.0, 1.0);
    let angle = cos.acos().to_degrees();

    if right.dot(horizontal) < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Saturate `angle`, take its tangent and scale it into a [0, 1]-centred
/// coefficient suitable for `lerp`.
pub fn angle_to_coefficient(angle: f64, max_angle: f64, bias: f64) -> f64 {
    let limit = max_angle.max(0.0);
    let angle = angle.clamp(-limit, limit);
    let t = angle.to_radians().tan() * bias;
    t * 0.5 + 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(-640.0, 640.0, 0.5), 0.0);
        assert_eq!(lerp(-640.0, 640.0, 1.0), 640.0);
    }

    #[test]
    fn test_vertical_angle_range() {
        assert_abs_diff_eq!(vertical_angle(&Vec3::new(0.0, 1.0, 0.0)), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(vertical_angle(&Vec3::new(0.0, 0.0, 1.0)), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(vertical_angle(&Vec3::new(0.0, -1.0, 0.0)), -90.0, epsilon = 1e-9);

        // Out-of-range components are clamped rather than producing NaN
        let a = vertical_angle(&Vec3::new(0.0, 3.0, 0.0));
        assert_abs_diff_eq!(a, 90.0, epsilon = 1e-9);

        for i in -20..=20 {
            let y = i as f64 / 20.0;
            let a = vertical_angle(&Vec3::new(0.0, y, 0.0));
            assert!((-90.0..=90.0).contains(&a));
        }
    }

    #[test]
    fn test_base_direction_permutation() {
        let p = base_direction(&Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Vec3::new(-1.0, 3.0, 2.0));
    }

    #[test]
    fn test_horizontal_front_fallback() {
        assert_eq!(horizontal_front(&Vec3::new(0.0, 1.0, 0.0)), Vec3::z());
        let f = horizontal_front(&Vec3::new(3.0, 7.0, 4.0));
        assert_abs_diff_eq!(f.norm(), 1.0, epsilon = 1e-12);
        assert_eq!(f.y, 0.0);
    }

    #[test]
    fn test_horizontal_projection_keeps_tiny_headings() {
        assert_eq!(horizontal_projection(&Vec3::new(0.0, 1.0, 0.0)), Vec3::zeros());
        assert_eq!(horizontal_projection(&Vec3::zeros()), Vec3::zeros());

        let tiny = horizontal_projection(&Vec3::new(5e-7, 1.0, 0.0));
        assert_abs_diff_eq!(tiny, Vec3::x(), epsilon = 1e-12);
    }

    #[test]
    fn test_signed_horizontal_angle_of_zero_vector() {
        assert_abs_diff_eq!(signed_horizontal_angle(&Vec3::z(), &Vec3::zeros()), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_signed_horizontal_angle() {
        let front = Vec3::z();
        // front × up = (0,0,1) × (0,1,0) = (-1,0,0)
        let neg_x = Vec3::new(-1.0, 0.0, 0.0);
        let pos_x = Vec3::new(1.0, 0.0, 0.0);
        assert_abs_diff_eq!(signed_horizontal_angle(&front, &neg_x), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(signed_horizontal_angle(&front, &pos_x), -90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(signed_horizontal_angle(&front, &front), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_angle_to_coefficient_saturates() {
        assert_eq!(angle_to_coefficient(0.0, 85.0, 5.0), 0.5);
        let max = angle_to_coefficient(89.9, 85.0, 5.0);
        let at_limit = angle_to_coefficient(85.0, 85.0, 5.0);
        assert_eq!(max, at_limit);
        assert!(max.is_finite());
        assert_abs_diff_eq!(
            angle_to_coefficient(-200.0, 85.0, 1.0),
            0.5 - 0.5 * 85f64.to_radians().tan(),
            epsilon = 1e-12
        );
    }
}
