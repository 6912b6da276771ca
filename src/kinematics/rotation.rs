//! Rotations about the coordinate axes
//!
//! The neutrino solver assembles its canonical-frame transform from
//! elementary rotations about x, y, and z.

use nalgebra::{Matrix3, Rotation3, Vector3};

/// Coordinate axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Right-handed rotation by `angle` about the given coordinate axis
pub fn axis_rotation(axis: Axis, angle: f64) -> Matrix3<f64> {
    let unit = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&unit, angle).into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_quarter_turn_about_z() {
        let r = axis_rotation(Axis::Z, FRAC_PI_2);
        let v = r * Vector3::new(1.0, 0.0, 0.0);

        // x axis maps onto y axis
        assert!(v.x.abs() < 1e-12);
        assert!((v.y - 1.0).abs() < 1e-12);
        assert!(v.z.abs() < 1e-12);
    }

    #[test]
    fn test_rotation_is_orthogonal() {
        let r = axis_rotation(Axis::X, 0.37);
        let product = r * r.transpose();
        assert!((product - Matrix3::identity()).norm() < 1e-12);
    }
}
