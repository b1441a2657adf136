//! Tunable gameplay constants.
//!
//! Distances and speeds are in world units (pixels); durations in seconds.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub player_speed: f32,

    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,

    /// Launch speed of player shots (impulse on a unit-mass bullet).
    pub player_bullet_force: f32,
    pub player_bullet_damage: f32,
    /// Distance from the shooter's centre to the muzzle along its facing.
    pub muzzle_offset: f32,

    pub enemy_health: f32,
    pub enemy_bullet_damage: f32,

    pub bullet_max_lifetime: f32,
    pub hit_effect_lifetime: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            player_speed: 320.0,
            dash_speed: 1100.0,
            dash_duration: 0.15,
            dash_cooldown: 0.6,
            player_bullet_force: 900.0,
            player_bullet_damage: 1.0,
            muzzle_offset: 20.0,
            enemy_health: 3.0,
            enemy_bullet_damage: 10.0,
            bullet_max_lifetime: 3.0,
            hit_effect_lifetime: 5.0,
        }
    }
}
