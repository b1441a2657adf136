//! Core plugin: shared resources and global settings.
//!
//! `Tunables` must exist before `physics::plugin` reads the length unit from it.

use bevy::prelude::*;

use crate::common::tunables::Tunables;

/// Fixed simulation rate: dash timers, movement and physics.
pub const FIXED_HZ: f64 = 64.0;

pub fn plugin(app: &mut App) {
    app.insert_resource(Tunables::default())
        .insert_resource(ClearColor(Color::srgb(0.16, 0.12, 0.09)))
        .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ));
}
