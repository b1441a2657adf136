//! Small 2D helpers shared by the player and enemy controllers.
//!
//! Sprites are authored facing +Y, so "look at" angles are `atan2(dy, dx) - 90°`.

use bevy::prelude::*;

/// Step from `current` toward `target` by at most `max_step`; never overshoots.
#[inline]
pub fn move_towards(current: Vec2, target: Vec2, max_step: f32) -> Vec2 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_step || dist == 0.0 {
        return target;
    }
    current + delta / dist * max_step
}

/// Z rotation (radians) that points a +Y-facing sprite along `dir`.
#[inline]
pub fn facing_angle(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x) - std::f32::consts::FRAC_PI_2
}

#[inline]
pub fn facing_rotation(dir: Vec2) -> Quat {
    Quat::from_rotation_z(facing_angle(dir))
}

/// The sprite's "up" in world space, i.e. where it is looking.
#[inline]
pub fn facing_dir(rotation: Quat) -> Vec2 {
    (rotation * Vec3::Y).truncate()
}
