//! Enemy steering and fire gate.
//!
//! ```text
//!            retreat_distance        stop_distance
//!   player ------|-----------------------|-------------->  distance
//!     Retreat    |          Hold         |   Approach
//! ```
//!
//! Firing does not depend on the stance: anything inside `shooting_range` gets shot at
//! whenever the cooldown has run out.

use bevy::prelude::*;

use crate::common::math::move_towards;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stance {
    Approach,
    Retreat,
    Hold,
}

#[derive(Component, Debug, Clone)]
pub struct EnemyBehaviour {
    pub move_speed: f32,
    pub stop_distance: f32,
    pub retreat_distance: f32,
    pub shooting_range: f32,
    /// Seconds between shots.
    pub fire_rate: f32,
    pub bullet_force: f32,
    pub bullet_damage: f32,
    pub muzzle_offset: f32,
    /// Seconds until the next shot is allowed. Starts at zero.
    pub(crate) fire_cooldown: f32,
}

impl Default for EnemyBehaviour {
    /// Values in meters; see [`EnemyBehaviour::scaled`].
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            stop_distance: 5.0,
            retreat_distance: 3.0,
            shooting_range: 10.0,
            fire_rate: 1.2,
            bullet_force: 12.0,
            bullet_damage: 1.0,
            muzzle_offset: 1.0,
            fire_cooldown: 0.0,
        }
    }
}

impl EnemyBehaviour {
    /// Convert every length and speed by `units_per_meter`. Times and damage are unchanged.
    pub fn scaled(mut self, units_per_meter: f32) -> Self {
        self.move_speed *= units_per_meter;
        self.stop_distance *= units_per_meter;
        self.retreat_distance *= units_per_meter;
        self.shooting_range *= units_per_meter;
        self.bullet_force *= units_per_meter;
        self.muzzle_offset *= units_per_meter;
        self
    }

    pub fn stance(&self, distance: f32) -> Stance {
        if distance > self.stop_distance {
            Stance::Approach
        } else if distance < self.retreat_distance {
            Stance::Retreat
        } else {
            Stance::Hold
        }
    }

    /// Where the enemy should be after `dt` seconds, given its position and the target's.
    pub fn step(&self, pos: Vec2, target: Vec2, dt: f32) -> Vec2 {
        let max_step = self.move_speed * dt;
        match self.stance(pos.distance(target)) {
            Stance::Approach => move_towards(pos, target, max_step),
            // Full step straight away from the target, in any length unit.
            Stance::Retreat => match (pos - target).try_normalize() {
                Some(away) => pos + away * max_step,
                None => pos,
            },
            Stance::Hold => pos,
        }
    }

    /// Advance the cooldown and report whether a shot is due this frame.
    pub fn tick_fire(&mut self, dt: f32, distance: f32) -> bool {
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        if distance >= self.shooting_range || self.fire_cooldown > 0.0 {
            return false;
        }
        self.fire_cooldown = self.fire_rate;
        true
    }

    #[inline]
    pub fn fire_cooldown(&self) -> f32 {
        self.fire_cooldown
    }
}
