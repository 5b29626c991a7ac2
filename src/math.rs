//! Small vector/rotation helpers shared by the controllers.
//!
//! Conventions: `+Y` is up, `+Z` is forward, `+X` is right. Angles that reach
//! configuration are in degrees; everything handed to `glam` is in radians.

use bevy_math::Dir3;
use glam::{Mat3, Quat, Vec3};

/// Interpolation factor for frame-rate independent exponential damping.
///
/// `1 - e^(-rate * dt)`: zero when `dt` is zero, tending to one as `dt` grows.
/// Non-positive `dt` yields `0.0` so a stalled frame never moves anything.
pub fn damping_factor(rate: f32, dt: f32) -> f32 {
    if dt <= 0.0 || rate <= 0.0 || !dt.is_finite() {
        return 0.0;
    }
    1.0 - (-rate * dt).exp()
}

/// Exponentially damps a scalar toward `target`.
pub fn damp(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let s = damping_factor(rate, dt);
    current + (target - current) * s
}

/// Exponentially damps a vector toward `target`.
pub fn damp_vec3(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    current.lerp(target, damping_factor(rate, dt))
}

/// Exponentially damps a rotation toward `target` along the shortest arc.
pub fn damp_quat(current: Quat, target: Quat, rate: f32, dt: f32) -> Quat {
    current.slerp(target, damping_factor(rate, dt))
}

/// Builds the rotation whose local `+Z` points along `forward` and whose local
/// `+Y` lies in the plane spanned by `forward` and `up`.
///
/// Returns `None` when `forward` has no usable length. When `up` is parallel to
/// `forward` the shortest-arc rotation from `+Z` is used instead.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let forward = Dir3::new(forward).ok()?;
    let Ok(right) = Dir3::new(up.cross(*forward)) else {
        return Some(Quat::from_rotation_arc(Vec3::Z, *forward));
    };
    let up = forward.cross(*right);
    Some(Quat::from_mat3(&Mat3::from_cols(*right, up, *forward)).normalize())
}

/// Rotates the unit vector `from` toward `to`, by at most `max_angle` radians.
///
/// Only the final angular deviation from `from` is limited; the result is unit
/// length. Returns `None` when `to` is degenerate.
pub fn rotate_towards(from: Vec3, to: Vec3, max_angle: f32) -> Option<Vec3> {
    let to = Dir3::new(to).ok()?;
    let angle = from.angle_between(*to);
    if angle <= max_angle {
        return Some(*to);
    }
    let axis = match Dir3::new(from.cross(*to)) {
        Ok(axis) => *axis,
        // `to` is opposite `from`: any perpendicular axis works, prefer yaw.
        Err(_) => Dir3::new(Vec3::Y.reject_from(from))
            .map(|d| *d)
            .unwrap_or_else(|_| from.any_orthonormal_vector()),
    };
    Some((Quat::from_axis_angle(axis, max_angle.max(0.0)) * from).normalize())
}

/// Signed angle in degrees from `from` to `to` around `axis`.
///
/// Positive when `to` lies clockwise of `from` seen from above `axis`, i.e.
/// to the right for `+Y` up and `+Z` forward. Degenerate input yields `0.0`.
pub fn signed_angle(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    if from.length_squared() <= f32::EPSILON || to.length_squared() <= f32::EPSILON {
        return 0.0;
    }
    let unsigned = from.angle_between(to).to_degrees();
    let sign = axis.dot(from.cross(to));
    if sign < 0.0 { -unsigned } else { unsigned }
}

/// Wraps an angle in degrees into `(-180, 180]`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Quadratic Bezier through `a`, control point `b`, ending at `c`.
pub fn quadratic_bezier(a: Vec3, b: Vec3, c: Vec3, t: f32) -> Vec3 {
    let ab = a.lerp(b, t);
    let bc = b.lerp(c, t);
    ab.lerp(bc, t)
}
