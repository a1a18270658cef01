//! Interpolation from rest toward a stored maximum.
//!
//! Every function clamps `t` into `[0, 1]`. `t = 0` yields exactly zero or
//! identity and `t = 1` yields exactly the maximum.

use glam::{EulerRot, Quat, Vec3};

fn clamp_unit(t: f32) -> f32 {
    if t.is_nan() {
        return 0.0;
    }
    t.clamp(0.0, 1.0)
}

/// Linear interpolation from zero to `max`.
pub fn blended_offset(max: Vec3, t: f32) -> Vec3 {
    let t = clamp_unit(t);
    if t == 0.0 {
        return Vec3::ZERO;
    }
    if t == 1.0 {
        return max;
    }
    Vec3::ZERO.lerp(max, t)
}

/// Spherical interpolation from identity to the rotation given by
/// `max_euler_deg`.
pub fn blended_rotation(max_euler_deg: Vec3, t: f32) -> Quat {
    let t = clamp_unit(t);
    let target = quat_from_euler_degrees(max_euler_deg);
    if t == 0.0 {
        return Quat::IDENTITY;
    }
    if t == 1.0 {
        return target;
    }
    Quat::IDENTITY.slerp(target, t)
}

/// Linear interpolation from zero to `max`. Scale is reported as a delta.
pub fn blended_scale(max: Vec3, t: f32) -> Vec3 {
    blended_offset(max, t)
}

/// Rotation for Euler angles in degrees, applied Z first, then X, then Y.
pub fn quat_from_euler_degrees(euler: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        euler.y.to_radians(),
        euler.x.to_radians(),
        euler.z.to_radians(),
    )
}

/// Inverse of [`quat_from_euler_degrees`].
pub fn euler_degrees_from_quat(rotation: Quat) -> Vec3 {
    let (y, x, z) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_endpoints_are_exact() {
        let max = Vec3::new(0.1, -0.2, 0.3);
        assert_eq!(blended_offset(max, 0.0), Vec3::ZERO);
        assert_eq!(blended_offset(max, 1.0), max);
        assert_eq!(blended_scale(max, 1.0), max);

        let euler = Vec3::new(10.0, 20.0, -5.0);
        assert_eq!(blended_rotation(euler, 0.0), Quat::IDENTITY);
        assert_eq!(blended_rotation(euler, 1.0), quat_from_euler_degrees(euler));
    }

    #[test]
    fn test_out_of_range_t_clamps() {
        let max = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(blended_offset(max, -0.5), Vec3::ZERO);
        assert_eq!(blended_offset(max, 7.0), max);
        assert_eq!(blended_offset(max, f32::NAN), Vec3::ZERO);
    }

    #[test]
    fn test_offset_is_monotonic_per_axis() {
        let max = Vec3::new(0.4, -0.8, 0.0);
        let mut previous = Vec3::ZERO;
        for step in 1..=20 {
            let current = blended_offset(max, step as f32 / 20.0);
            assert!(current.x >= previous.x);
            assert!(current.y <= previous.y);
            assert_eq!(current.z, 0.0);
            previous = current;
        }
    }

    #[test]
    fn test_half_rotation() {
        let half = blended_rotation(Vec3::new(0.0, 90.0, 0.0), 0.5);
        let expected = Quat::from_rotation_y(45f32.to_radians());
        assert!(half.abs_diff_eq(expected, EPS));
    }

    #[test]
    fn test_euler_convention_applies_z_then_x_then_y() {
        let q = quat_from_euler_degrees(Vec3::new(30.0, 45.0, 60.0));
        let manual = Quat::from_rotation_y(45f32.to_radians())
            * Quat::from_rotation_x(30f32.to_radians())
            * Quat::from_rotation_z(60f32.to_radians());
        assert!(q.abs_diff_eq(manual, EPS));

        let back = euler_degrees_from_quat(q);
        assert!(back.abs_diff_eq(Vec3::new(30.0, 45.0, 60.0), 1e-3));
    }
}
