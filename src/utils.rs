use macroquad::math::{Quat, Vec3};
use std::f32::consts::{PI, TAU};

/// Move `current` toward `target` by at most `step`, never overshooting
pub fn approach(current: f32, target: f32, step: f32) -> f32 {
    if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    }
}

/// Wrap an angle in radians into (-PI, PI]
pub fn wrap_angle(radians: f32) -> f32 {
    let wrapped = (radians + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Rotation for a heading angle about +Y
pub fn yaw_rotation(yaw: f32) -> Quat {
    Quat::from_rotation_y(yaw)
}

/// Direction of travel for a yaw angle.
/// The airframe flies along the inverse of its local +Z axis, so yaw 0 heads toward -Z.
pub fn heading(yaw: f32) -> Vec3 {
    -(yaw_rotation(yaw) * Vec3::Z)
}
